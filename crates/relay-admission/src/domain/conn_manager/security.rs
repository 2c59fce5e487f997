//! Trim eligibility.
//!
//! Connections younger than the grace period and protected connections are
//! exempt from trimming, even while the manager is over its high watermark.

use std::time::Duration;

use crate::domain::{ConnectionId, PeerId, Timestamp};

/// An open connection tracked by the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub id: ConnectionId,
    pub peer: PeerId,
    /// When the transport reported the connection open
    pub opened_at: Timestamp,
    /// Last time traffic was seen on the connection
    pub last_active: Timestamp,
    /// Protected connections are never trimmed
    pub protected: bool,
}

impl ConnectionInfo {
    pub fn new(id: ConnectionId, peer: PeerId, now: Timestamp) -> Self {
        Self {
            id,
            peer,
            opened_at: now,
            last_active: now,
            protected: false,
        }
    }

    pub fn age(&self, now: Timestamp) -> Duration {
        now.saturating_since(self.opened_at)
    }

    /// Whether this connection may be selected for trimming.
    pub fn is_trimmable(&self, now: Timestamp, grace: Duration) -> bool {
        !self.protected && self.age(now) >= grace
    }
}
