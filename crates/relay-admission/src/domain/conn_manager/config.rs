//! Connection manager configuration.

use std::time::Duration;

/// Watermarks and grace period for connection trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnManagerConfig {
    /// Trimming stops once the count is down to this many connections
    pub low_water: usize,
    /// Trimming starts when the count goes above this
    pub high_water: usize,
    /// Connections younger than this are never trimmed
    pub grace: Duration,
}

impl Default for ConnManagerConfig {
    fn default() -> Self {
        Self {
            low_water: 512,
            high_water: 768,
            grace: Duration::from_secs(120),
        }
    }
}

impl ConnManagerConfig {
    /// Testing config with smaller limits
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            low_water: 2,
            high_water: 4,
            grace: Duration::from_secs(30),
        }
    }
}
