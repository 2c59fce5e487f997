//! Connection manager implementation.

use std::collections::HashMap;

use super::config::ConnManagerConfig;
use super::security::ConnectionInfo;
use super::types::{ConnectionStats, TrimOutcome};
use crate::domain::{ConnectionId, PeerId, Timestamp};

/// Keeps the number of open connections between the watermarks.
#[derive(Debug)]
pub struct ConnectionManager {
    /// All open connections
    connections: HashMap<ConnectionId, ConnectionInfo>,
    /// Configuration
    config: ConnManagerConfig,
}

impl ConnectionManager {
    pub fn new(config: ConnManagerConfig) -> Self {
        Self {
            connections: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &ConnManagerConfig {
        &self.config
    }

    /// Number of open connections
    pub fn count(&self) -> usize {
        self.connections.len()
    }

    /// Whether the count is above the high watermark
    pub fn is_over_high_water(&self) -> bool {
        self.count() > self.config.high_water
    }

    /// Start tracking a connection. Returns false if it is already tracked.
    pub fn on_connect(&mut self, id: ConnectionId, peer: PeerId, now: Timestamp) -> bool {
        if self.connections.contains_key(&id) {
            return false;
        }
        self.connections
            .insert(id, ConnectionInfo::new(id, peer, now));
        true
    }

    /// Stop tracking a connection.
    pub fn on_disconnect(&mut self, id: &ConnectionId) -> Option<ConnectionInfo> {
        self.connections.remove(id)
    }

    /// Record activity on a connection
    pub fn touch(&mut self, id: &ConnectionId, now: Timestamp) {
        if let Some(conn) = self.connections.get_mut(id) {
            conn.last_active = conn.last_active.max(now);
        }
    }

    /// Exempt a connection from trimming. Returns false if unknown.
    pub fn protect(&mut self, id: &ConnectionId) -> bool {
        self.set_protected(id, true)
    }

    /// Make a protected connection trimmable again. Returns false if unknown.
    pub fn unprotect(&mut self, id: &ConnectionId) -> bool {
        self.set_protected(id, false)
    }

    fn set_protected(&mut self, id: &ConnectionId, protected: bool) -> bool {
        match self.connections.get_mut(id) {
            Some(conn) => {
                conn.protected = protected;
                true
            }
            None => false,
        }
    }

    /// Trim down toward the low watermark.
    ///
    /// Does nothing unless the count is above the high watermark. Otherwise
    /// removes grace-expired, unprotected connections in order of oldest
    /// activity until the count reaches the low watermark or no eligible
    /// connection is left.
    pub fn trim(&mut self, now: Timestamp) -> TrimOutcome {
        if !self.is_over_high_water() {
            return TrimOutcome::default();
        }

        let excess = self.count().saturating_sub(self.config.low_water);
        let mut candidates: Vec<&ConnectionInfo> = self
            .connections
            .values()
            .filter(|c| c.is_trimmable(now, self.config.grace))
            .collect();
        candidates.sort_by_key(|c| (c.last_active, c.opened_at, c.id));

        let victims: Vec<ConnectionId> = candidates.iter().take(excess).map(|c| c.id).collect();
        let closed: Vec<ConnectionInfo> = victims
            .iter()
            .filter_map(|id| self.connections.remove(id))
            .collect();

        TrimOutcome {
            starved: self.count() > self.config.low_water,
            closed,
        }
    }

    /// Get connection info
    pub fn get(&self, id: &ConnectionId) -> Option<&ConnectionInfo> {
        self.connections.get(id)
    }

    /// Check if a connection is tracked
    pub fn is_connected(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    /// Connections open to `peer`
    pub fn connections_of(&self, peer: &PeerId) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| &c.peer == peer)
            .map(|c| c.id)
            .collect();
        ids.sort();
        ids
    }

    /// Get statistics
    pub fn stats(&self) -> ConnectionStats {
        ConnectionStats {
            count: self.count(),
            protected: self.connections.values().filter(|c| c.protected).count(),
            low_water: self.config.low_water,
            high_water: self.config.high_water,
        }
    }
}
