use std::net::IpAddr;

use tracing::{debug, info, warn};

use crate::domain::{
    Decision, LedgerError, PeerId, RejectReason, ReserveError, ResourceKind,
    TeardownReason, Timestamp, Token, TransferOutcome, TrimOutcome,
};
use crate::ports::RelayAdmissionApi;
use crate::service::{AdmissionStats, RelayAdmissionService};

impl RelayAdmissionApi for RelayAdmissionService {
    fn admit(&self, peer: &PeerId, addr: IpAddr, kind: ResourceKind, amount: u64) -> Decision {
        if !self.acl().allow(peer, addr) {
            return self.reject(peer, kind, RejectReason::AclDenied);
        }

        let now = self.now();
        let (outcome, trimmed) = self.reserve_under_pressure(peer, addr, kind, amount, now);

        // Every lock is released by now
        self.close_trimmed(trimmed);

        match outcome {
            Ok(token) => {
                self.counters.record_accepted();
                debug!(
                    peer = %peer,
                    %kind,
                    amount,
                    token = %token.id(),
                    "admitted"
                );
                Decision::Accepted(token)
            }
            Err(reason) => self.reject(peer, kind, reason),
        }
    }

    fn release(&self, token: &Token) -> Result<(), LedgerError> {
        let now = self.now();
        let _peer_guard = self.peer_locks.acquire(token.peer());

        let mut state = self.state.lock();
        match state.ledger.release(token, now) {
            Ok(()) => {
                state.circuits.untrack(token.id());
                Ok(())
            }
            Err(err) => {
                drop(state);
                self.counters.record_double_release();
                warn!(
                    peer = %token.peer(),
                    token = %token.id(),
                    kind = %token.kind(),
                    "ignoring release of a token that is not outstanding"
                );
                Err(err)
            }
        }
    }

    fn record_transfer(&self, circuit: &Token, bytes: u64) -> Result<TransferOutcome, LedgerError> {
        let now = self.now();
        let outcome = {
            let mut state = self.state.lock();
            let outcome = state.circuits.record_transfer(circuit.id(), bytes)?;
            if matches!(outcome, TransferOutcome::LimitExceeded { .. }) {
                if let Err(err) = state.ledger.release(circuit, now) {
                    warn!(token = %circuit.id(), error = %err, "revoked circuit was not outstanding");
                }
            }
            outcome
        };

        if let TransferOutcome::LimitExceeded { relayed } = outcome {
            self.counters.record_teardowns(1);
            info!(
                peer = %circuit.peer(),
                token = %circuit.id(),
                relayed,
                "circuit exceeded its data limit"
            );
            self.transport
                .teardown(circuit, TeardownReason::DataExceeded);
        }
        Ok(outcome)
    }

    fn stats(&self) -> AdmissionStats {
        let mut stats = {
            let state = self.state.lock();
            AdmissionStats {
                ledger: state.ledger.stats(),
                active_circuits: state.circuits.active_circuits(),
                active_reservations: state.circuits.active_reservations(),
                ..AdmissionStats::default()
            }
        };
        stats.connections = self.connections.lock().stats();
        self.counters.fill(&mut stats);
        stats
    }
}

impl RelayAdmissionService {
    /// Reserve, then check connection pressure, holding the peer's lock
    /// across both steps.
    ///
    /// Returns connections the pressure check trimmed; the caller closes
    /// them once no lock is held.
    fn reserve_under_pressure(
        &self,
        peer: &PeerId,
        addr: IpAddr,
        kind: ResourceKind,
        amount: u64,
        now: Timestamp,
    ) -> (Result<Token, RejectReason>, TrimOutcome) {
        let _peer_guard = self.peer_locks.acquire(peer);

        let reserved = self
            .state
            .lock()
            .ledger
            .try_reserve_from(peer, Some(addr), kind, amount, now);
        let token = match reserved {
            Ok(token) => token,
            Err(ReserveError::Exhausted(scope)) => {
                return (
                    Err(RejectReason::ResourceExhausted(scope)),
                    TrimOutcome::default(),
                )
            }
            Err(ReserveError::ZeroAmount(_)) => {
                return (Err(RejectReason::InvalidRequest), TrimOutcome::default())
            }
        };

        let (trimmed, overloaded) = self.relieve_pressure(now);

        let mut state = self.state.lock();
        if overloaded {
            if let Err(err) = state.ledger.release(&token, now) {
                warn!(token = %token.id(), error = %err, "rollback of fresh token failed");
            }
            return (Err(RejectReason::Overloaded), trimmed);
        }
        state.circuits.track(&token, now);
        (Ok(token), trimmed)
    }

    /// Trim if above the high watermark. Reports whether the count is still
    /// above it afterwards.
    pub(crate) fn relieve_pressure(&self, now: Timestamp) -> (TrimOutcome, bool) {
        let mut connections = self.connections.lock();
        if !connections.is_over_high_water() {
            return (TrimOutcome::default(), false);
        }
        let outcome = connections.trim(now);
        let overloaded = connections.is_over_high_water();
        (outcome, overloaded)
    }

    fn reject(&self, peer: &PeerId, kind: ResourceKind, reason: RejectReason) -> Decision {
        self.counters.record_rejected(reason);
        debug!(peer = %peer, %kind, %reason, "rejected");
        Decision::Rejected(reason)
    }

    /// Ask the transport to close trimmed connections. Must be called with
    /// no internal lock held.
    pub(crate) fn close_trimmed(&self, outcome: TrimOutcome) {
        if outcome.starved {
            debug!("trim deferred: remaining connections are in grace or protected");
        }
        if outcome.closed.is_empty() {
            return;
        }

        self.counters.record_trimmed(outcome.closed.len());
        info!(closed = outcome.closed.len(), "trimmed connections");
        for conn in &outcome.closed {
            self.transport.close_connection(conn.id);
        }
    }
}
