//! Resource ledger types.

use crate::domain::{ResourceKind, Timestamp};

/// Counters for one peer, or the global aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub reservations: u64,
    pub circuits: u64,
    pub bytes: u64,
}

impl Usage {
    /// Counter for one resource kind.
    pub fn get(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Reservation => self.reservations,
            ResourceKind::Circuit => self.circuits,
            ResourceKind::Bytes => self.bytes,
        }
    }

    pub(crate) fn get_mut(&mut self, kind: ResourceKind) -> &mut u64 {
        match kind {
            ResourceKind::Reservation => &mut self.reservations,
            ResourceKind::Circuit => &mut self.circuits,
            ResourceKind::Bytes => &mut self.bytes,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Ledger entry for a single peer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PeerEntry {
    pub usage: Usage,
    pub last_active: Timestamp,
}

impl PeerEntry {
    pub fn new(now: Timestamp) -> Self {
        Self {
            usage: Usage::default(),
            last_active: now,
        }
    }
}

/// Ledger statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerStats {
    /// Global aggregate counters.
    pub totals: Usage,
    /// Peers with a ledger entry (including idle ones not yet collected).
    pub tracked_peers: usize,
    /// Tokens issued and not yet released.
    pub outstanding_tokens: usize,
}
