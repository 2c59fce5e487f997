//! Connection manager types.

use super::security::ConnectionInfo;

/// Result of a trim pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrimOutcome {
    /// Connections selected for closing, oldest activity first. They are
    /// already removed from tracking.
    pub closed: Vec<ConnectionInfo>,
    /// Trimming stopped above the low watermark because every remaining
    /// connection is within its grace period or protected.
    pub starved: bool,
}

/// Connection statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Connections currently tracked.
    pub count: usize,
    /// Protected connections among them.
    pub protected: usize,
    pub low_water: usize,
    pub high_water: usize,
}
