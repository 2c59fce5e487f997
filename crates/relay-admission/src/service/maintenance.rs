use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{AclEvaluator, ConnectionId, ResourceKind, TeardownReason};
use crate::service::RelayAdmissionService;

/// What one [`sweep`](RelayAdmissionService::sweep) pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Circuits torn down for running past their duration
    pub circuits_expired: usize,
    /// Reservations whose TTL ran out
    pub reservations_expired: usize,
    /// Idle ledger entries collected
    pub peers_collected: usize,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl RelayAdmissionService {
    /// Expire circuits and reservations, then collect idle ledger entries.
    ///
    /// Call from a timer task every [`sweep_interval`](Self::sweep_interval).
    /// Expired grants are released here; the transport is only told to tear
    /// them down.
    pub fn sweep(&self) -> SweepReport {
        let now = self.now();
        let (expired, peers_collected) = {
            let mut state = self.state.lock();
            let expired = state.circuits.sweep(now);
            for (token, _) in &expired {
                if let Err(err) = state.ledger.release(token, now) {
                    warn!(token = %token.id(), error = %err, "expired grant was not outstanding");
                }
            }
            let collected = state.ledger.gc_idle(now, self.peer_idle_timeout);
            (expired, collected)
        };

        let mut report = SweepReport {
            peers_collected,
            ..SweepReport::default()
        };
        for (token, reason) in &expired {
            match token.kind() {
                ResourceKind::Reservation => report.reservations_expired += 1,
                _ => report.circuits_expired += 1,
            }
            if *reason != TeardownReason::ReservationExpired {
                info!(peer = %token.peer(), token = %token.id(), %reason, "tearing down circuit");
            }
            self.transport.teardown(token, *reason);
        }
        self.counters.record_teardowns(expired.len());

        if !report.is_empty() {
            info!(
                circuits = report.circuits_expired,
                reservations = report.reservations_expired,
                peers = report.peers_collected,
                "sweep complete"
            );
        }
        report
    }

    /// Trim connections down toward the low watermark.
    ///
    /// Picks up trims that were deferred while connections were in their
    /// grace period. Returns the connections that were closed.
    pub fn trim(&self) -> Vec<ConnectionId> {
        let now = self.now();
        let outcome = self.connections.lock().trim(now);
        let closed = outcome.closed.iter().map(|conn| conn.id).collect();
        self.close_trimmed(outcome);
        closed
    }

    /// Swap the ACL in force. Requests already past the ACL check are not
    /// affected.
    pub fn replace_acl(&self, acl: AclEvaluator) {
        let peers = acl.peer_rule_count();
        let subnets = acl.subnet_rule_count();
        *self.acl.write() = Arc::new(acl);
        info!(peers, subnets, "ACL replaced");
    }
}
