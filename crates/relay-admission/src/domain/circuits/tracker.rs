//! Circuit tracker implementation.

use std::collections::HashMap;
use std::time::Duration;

use super::types::{TrackedGrant, TransferOutcome};
use crate::domain::{
    CircuitLimit, LedgerError, ResourceKind, TeardownReason, Timestamp, Token, TokenId,
};

/// Enforces per-circuit duration and data caps and reservation TTLs.
///
/// The tracker never touches ledger counters itself; it reports which grants
/// must be revoked and the caller releases them.
#[derive(Debug)]
pub struct CircuitTracker {
    limit: Option<CircuitLimit>,
    reservation_ttl: Duration,
    circuits: HashMap<TokenId, TrackedGrant>,
    reservations: HashMap<TokenId, TrackedGrant>,
}

impl CircuitTracker {
    pub fn new(limit: Option<CircuitLimit>, reservation_ttl: Duration) -> Self {
        Self {
            limit,
            reservation_ttl,
            circuits: HashMap::new(),
            reservations: HashMap::new(),
        }
    }

    /// Start tracking a granted circuit or reservation. Byte grants are not
    /// time-bound and are ignored.
    pub fn track(&mut self, token: &Token, now: Timestamp) {
        let grant = TrackedGrant::new(token.clone(), now);
        match token.kind() {
            ResourceKind::Circuit => {
                self.circuits.insert(token.id(), grant);
            }
            ResourceKind::Reservation => {
                self.reservations.insert(token.id(), grant);
            }
            ResourceKind::Bytes => {}
        }
    }

    /// Stop tracking a grant. Returns whether it was tracked.
    pub fn untrack(&mut self, id: TokenId) -> bool {
        self.circuits.remove(&id).is_some() || self.reservations.remove(&id).is_some()
    }

    /// Account `bytes` relayed over a circuit.
    ///
    /// Going past the data cap removes the circuit from tracking and returns
    /// [`TransferOutcome::LimitExceeded`]; the circuit must be torn down.
    pub fn record_transfer(
        &mut self,
        id: TokenId,
        bytes: u64,
    ) -> Result<TransferOutcome, LedgerError> {
        let circuit = self
            .circuits
            .get_mut(&id)
            .ok_or(LedgerError::UnknownCircuit(id))?;
        circuit.bytes_relayed = circuit.bytes_relayed.saturating_add(bytes);

        let Some(limit) = self.limit else {
            return Ok(TransferOutcome::Within { remaining: None });
        };
        if circuit.bytes_relayed > limit.data {
            let relayed = circuit.bytes_relayed;
            self.circuits.remove(&id);
            return Ok(TransferOutcome::LimitExceeded { relayed });
        }
        Ok(TransferOutcome::Within {
            remaining: Some(limit.data - circuit.bytes_relayed),
        })
    }

    /// Remove and return every grant whose time is up.
    pub fn sweep(&mut self, now: Timestamp) -> Vec<(Token, TeardownReason)> {
        let mut expired = Vec::new();

        if let Some(limit) = self.limit {
            self.circuits.retain(|_, circuit| {
                let keep = now.saturating_since(circuit.opened_at) < limit.duration;
                if !keep {
                    expired.push((circuit.token.clone(), TeardownReason::DurationExceeded));
                }
                keep
            });
        }

        let ttl = self.reservation_ttl;
        self.reservations.retain(|_, reservation| {
            let keep = now.saturating_since(reservation.opened_at) < ttl;
            if !keep {
                expired.push((reservation.token.clone(), TeardownReason::ReservationExpired));
            }
            keep
        });

        expired.sort_by_key(|(token, _)| token.id());
        expired
    }

    /// Bytes relayed so far over a circuit.
    pub fn bytes_relayed(&self, id: TokenId) -> Option<u64> {
        self.circuits.get(&id).map(|circuit| circuit.bytes_relayed)
    }

    pub fn active_circuits(&self) -> usize {
        self.circuits.len()
    }

    pub fn active_reservations(&self) -> usize {
        self.reservations.len()
    }
}
