//! Core domain entities for relay admission.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use super::errors::ParsePeerIdError;
use super::value_objects::ResourceKind;

/// Maximum accepted length of a textual peer identifier.
pub const MAX_PEER_ID_LEN: usize = 128;

/// Opaque, immutable identifier of a remote peer.
///
/// The relay never interprets the identifier; it only compares it. Accepted
/// characters are ASCII alphanumerics, which covers the base58btc and base32
/// multibase encodings that peer identities are written in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(Arc<str>);

impl PeerId {
    /// Parse and validate a textual peer identifier.
    pub fn parse(value: &str) -> Result<Self, ParsePeerIdError> {
        if value.is_empty() {
            return Err(ParsePeerIdError::Empty);
        }
        if value.len() > MAX_PEER_ID_LEN {
            return Err(ParsePeerIdError::TooLong {
                len: value.len(),
                max: MAX_PEER_ID_LEN,
            });
        }
        if let Some((position, ch)) = value
            .char_indices()
            .find(|(_, c)| !c.is_ascii_alphanumeric())
        {
            return Err(ParsePeerIdError::InvalidCharacter { ch, position });
        }
        Ok(Self(Arc::from(value)))
    }

    /// The identifier as it was written.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PeerId {
    type Err = ParsePeerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier the transport assigns to a live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Identifier of a ledger grant. Circuits are addressed by their grant id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grant-{}", self.0)
    }
}

/// Monotonic timestamp in milliseconds.
///
/// Only differences between timestamps are meaningful; the origin is
/// whatever the [`TimeSource`](crate::ports::TimeSource) chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Milliseconds since the time source origin.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn saturating_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    /// This timestamp advanced by `duration`.
    pub fn saturating_add(&self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }
}

/// Proof of a successful ledger reservation.
///
/// Presented back to [`ResourceLedger::release`](crate::domain::ResourceLedger::release)
/// to return the capacity. Releasing the same token twice is a logic error
/// that the ledger detects and ignores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    id: TokenId,
    peer: PeerId,
    kind: ResourceKind,
    amount: u64,
    ip: Option<IpAddr>,
}

impl Token {
    pub(crate) fn new(
        id: TokenId,
        peer: PeerId,
        kind: ResourceKind,
        amount: u64,
        ip: Option<IpAddr>,
    ) -> Self {
        Self {
            id,
            peer,
            kind,
            amount,
            ip,
        }
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn peer(&self) -> &PeerId {
        &self.peer
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Address the reservation was charged against, if any.
    pub fn ip(&self) -> Option<IpAddr> {
        self.ip
    }
}
