//! Resource limit configuration.

use std::time::Duration;

/// Per-circuit caps. When absent, circuits are unlimited in time and data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitLimit {
    /// Maximum lifetime of a relayed circuit.
    pub duration: Duration,
    /// Maximum bytes relayed over one circuit.
    pub data: u64,
}

impl Default for CircuitLimit {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(120),
            data: 1 << 17, // 128 KiB
        }
    }
}

/// Numeric caps enforced by the resource ledger and circuit tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Concurrent reservations across all peers
    pub max_reservations: u64,
    /// Concurrent reservations held by one peer
    pub max_reservations_per_peer: u64,
    /// Concurrent reservations charged to one IP address
    pub max_reservations_per_ip: u64,
    /// Concurrent circuits held by one peer
    pub max_circuits: u64,
    /// Concurrent circuits across all peers
    pub max_circuits_total: u64,
    /// Relay buffer per circuit, in bytes
    pub buffer_size: u64,
    /// Per-circuit duration and data caps
    pub circuit_limit: Option<CircuitLimit>,
    /// How long a reservation stays valid
    pub reservation_ttl: Duration,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_reservations: 128,
            max_reservations_per_peer: 4,
            max_reservations_per_ip: 8,
            max_circuits: 16,
            max_circuits_total: 1024,
            buffer_size: 2048,
            circuit_limit: Some(CircuitLimit::default()),
            reservation_ttl: Duration::from_secs(3600),
        }
    }
}

impl ResourceLimits {
    /// Buffered bytes one peer may hold: a full buffer for each of its circuits.
    pub fn peer_bytes_cap(&self) -> u64 {
        self.max_circuits.saturating_mul(self.buffer_size)
    }

    /// Buffered bytes across the whole relay.
    pub fn global_bytes_cap(&self) -> u64 {
        self.max_circuits_total.saturating_mul(self.buffer_size)
    }

    /// Small limits for unit tests
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            max_reservations: 4,
            max_reservations_per_peer: 2,
            max_reservations_per_ip: 3,
            max_circuits: 2,
            max_circuits_total: 3,
            buffer_size: 100,
            circuit_limit: Some(CircuitLimit {
                duration: Duration::from_secs(10),
                data: 1_000,
            }),
            reservation_ttl: Duration::from_secs(60),
        }
    }
}
