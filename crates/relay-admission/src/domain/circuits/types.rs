//! Circuit tracker types.

use crate::domain::{Timestamp, Token};

/// A time-bound grant under watch.
#[derive(Debug, Clone)]
pub(crate) struct TrackedGrant {
    pub token: Token,
    pub opened_at: Timestamp,
    pub bytes_relayed: u64,
}

impl TrackedGrant {
    pub fn new(token: Token, now: Timestamp) -> Self {
        Self {
            token,
            opened_at: now,
            bytes_relayed: 0,
        }
    }
}

/// Result of accounting relayed data on a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Still under the data cap. `remaining` is `None` when uncapped.
    Within { remaining: Option<u64> },
    /// The data cap was passed; the circuit has been revoked.
    LimitExceeded { relayed: u64 },
}
