//! Domain errors for relay admission.

use thiserror::Error;

use super::entities::TokenId;
use super::value_objects::{LimitScope, ResourceKind};

/// A peer identifier string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePeerIdError {
    #[error("peer id is empty")]
    Empty,

    #[error("peer id is {len} characters long (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("invalid character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },
}

/// A subnet string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSubnetError {
    #[error("invalid IP address {0:?}")]
    InvalidAddress(String),

    #[error("invalid prefix length {0:?}")]
    InvalidPrefix(String),

    #[error("prefix length {prefix} exceeds {max}")]
    PrefixTooLong { prefix: u8, max: u8 },
}

/// A reservation attempt that did not succeed. Never has side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReserveError {
    #[error("limit reached: {0}")]
    Exhausted(LimitScope),

    #[error("zero-sized {0} request")]
    ZeroAmount(ResourceKind),
}

/// Ledger bookkeeping errors.
///
/// These report caller logic errors. The ledger state is left untouched and
/// the relay keeps serving other peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The token was already released (or was never issued here).
    #[error("{0} released twice")]
    DoubleRelease(TokenId),

    /// No tracked circuit exists for the token.
    #[error("no active circuit for {0}")]
    UnknownCircuit(TokenId),
}
