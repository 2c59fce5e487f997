//! Admission outcome counters and the observability snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{ConnectionStats, LedgerStats, RejectReason};

/// Read-only snapshot of the admission core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdmissionStats {
    pub ledger: LedgerStats,
    pub connections: ConnectionStats,
    /// Circuits under duration/data watch
    pub active_circuits: usize,
    /// Reservations under TTL watch
    pub active_reservations: usize,
    pub accepted: u64,
    pub rejected_acl: u64,
    pub rejected_resources: u64,
    pub rejected_overloaded: u64,
    pub rejected_invalid: u64,
    /// Grants revoked for running past their limits
    pub forced_teardowns: u64,
    /// Connections closed by trimming
    pub trimmed_connections: u64,
    /// Releases of tokens that were not outstanding
    pub double_releases: u64,
}

#[derive(Debug, Default)]
pub(crate) struct AdmissionCounters {
    accepted: AtomicU64,
    rejected_acl: AtomicU64,
    rejected_resources: AtomicU64,
    rejected_overloaded: AtomicU64,
    rejected_invalid: AtomicU64,
    forced_teardowns: AtomicU64,
    trimmed_connections: AtomicU64,
    double_releases: AtomicU64,
}

impl AdmissionCounters {
    pub fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self, reason: RejectReason) {
        let counter = match reason {
            RejectReason::AclDenied => &self.rejected_acl,
            RejectReason::ResourceExhausted(_) => &self.rejected_resources,
            RejectReason::Overloaded => &self.rejected_overloaded,
            RejectReason::InvalidRequest => &self.rejected_invalid,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_teardowns(&self, count: usize) {
        self.forced_teardowns
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_trimmed(&self, count: usize) {
        self.trimmed_connections
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_double_release(&self) {
        self.double_releases.fetch_add(1, Ordering::Relaxed);
    }

    /// Fill the counter fields of a snapshot.
    pub fn fill(&self, stats: &mut AdmissionStats) {
        stats.accepted = self.accepted.load(Ordering::Relaxed);
        stats.rejected_acl = self.rejected_acl.load(Ordering::Relaxed);
        stats.rejected_resources = self.rejected_resources.load(Ordering::Relaxed);
        stats.rejected_overloaded = self.rejected_overloaded.load(Ordering::Relaxed);
        stats.rejected_invalid = self.rejected_invalid.load(Ordering::Relaxed);
        stats.forced_teardowns = self.forced_teardowns.load(Ordering::Relaxed);
        stats.trimmed_connections = self.trimmed_connections.load(Ordering::Relaxed);
        stats.double_releases = self.double_releases.load(Ordering::Relaxed);
    }
}
