//! Value objects for relay admission.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use super::entities::Token;
use super::errors::ParseSubnetError;

/// Kind of relay resource a request consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A slot that lets the peer be reached through the relay.
    Reservation,
    /// An active forwarding session between two peers.
    Circuit,
    /// Relay buffer bytes held in flight for a peer.
    Bytes,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reservation => write!(f, "reservation"),
            Self::Circuit => write!(f, "circuit"),
            Self::Bytes => write!(f, "bytes"),
        }
    }
}

/// Which configured limit turned a request away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitScope {
    PeerReservations,
    GlobalReservations,
    IpReservations,
    PeerCircuits,
    GlobalCircuits,
    /// A single byte request larger than one circuit buffer.
    CircuitBuffer,
    PeerBytes,
    GlobalBytes,
}

impl fmt::Display for LimitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeerReservations => write!(f, "per-peer reservations"),
            Self::GlobalReservations => write!(f, "global reservations"),
            Self::IpReservations => write!(f, "per-IP reservations"),
            Self::PeerCircuits => write!(f, "per-peer circuits"),
            Self::GlobalCircuits => write!(f, "global circuits"),
            Self::CircuitBuffer => write!(f, "circuit buffer size"),
            Self::PeerBytes => write!(f, "per-peer buffered bytes"),
            Self::GlobalBytes => write!(f, "global buffered bytes"),
        }
    }
}

/// Why an admission request was turned away.
///
/// These are ordinary outcomes reported to the caller, never failures of
/// the relay itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The peer or its address is not on the allow lists.
    AclDenied,
    /// A ledger limit would be exceeded.
    ResourceExhausted(LimitScope),
    /// Too many connections and trimming could not make room.
    Overloaded,
    /// The request asked for zero units.
    InvalidRequest,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AclDenied => write!(f, "denied by ACL"),
            Self::ResourceExhausted(scope) => write!(f, "resource exhausted: {scope}"),
            Self::Overloaded => write!(f, "relay overloaded"),
            Self::InvalidRequest => write!(f, "invalid request"),
        }
    }
}

/// Outcome of an admission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accepted(Token),
    Rejected(RejectReason),
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The granted token, if accepted.
    pub fn token(&self) -> Option<&Token> {
        match self {
            Self::Accepted(token) => Some(token),
            Self::Rejected(_) => None,
        }
    }

    /// The rejection reason, if rejected.
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Why the relay forcibly revoked a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeardownReason {
    /// Circuit outlived the configured maximum duration.
    DurationExceeded,
    /// Circuit relayed more than the configured data cap.
    DataExceeded,
    /// Reservation outlived its TTL.
    ReservationExpired,
}

impl fmt::Display for TeardownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DurationExceeded => write!(f, "circuit duration exceeded"),
            Self::DataExceeded => write!(f, "circuit data limit exceeded"),
            Self::ReservationExpired => write!(f, "reservation expired"),
        }
    }
}

/// A validated IP prefix.
///
/// Host bits beyond the prefix are cleared at construction, so
/// `10.1.2.3/8` and `10.0.0.0/8` are the same subnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    network: IpAddr,
    prefix_len: u8,
}

impl Subnet {
    /// Build a subnet, masking `addr` down to `prefix_len` bits.
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Self, ParseSubnetError> {
        let max = max_prefix(addr);
        if prefix_len > max {
            return Err(ParseSubnetError::PrefixTooLong {
                prefix: prefix_len,
                max,
            });
        }
        Ok(Self {
            network: mask(addr, prefix_len),
            prefix_len,
        })
    }

    /// Single-address subnet (`/32` or `/128`).
    pub fn host(addr: IpAddr) -> Self {
        Self {
            network: addr,
            prefix_len: max_prefix(addr),
        }
    }

    pub fn network(&self) -> IpAddr {
        self.network
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Whether `addr` falls inside this subnet.
    ///
    /// IPv4-mapped IPv6 addresses match IPv4 subnets and vice versa.
    pub fn contains(&self, addr: IpAddr) -> bool {
        match (self.network, addr) {
            (IpAddr::V4(_), IpAddr::V4(_)) | (IpAddr::V6(_), IpAddr::V6(_)) => {
                mask(addr, self.prefix_len) == self.network
            }
            (IpAddr::V4(_), IpAddr::V6(v6)) => v6
                .to_ipv4_mapped()
                .is_some_and(|v4| mask(IpAddr::V4(v4), self.prefix_len) == self.network),
            (IpAddr::V6(_), IpAddr::V4(v4)) => {
                mask(IpAddr::V6(v4.to_ipv6_mapped()), self.prefix_len) == self.network
            }
        }
    }
}

impl FromStr for Subnet {
    type Err = ParseSubnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('/') {
            Some((addr, prefix)) => {
                let addr: IpAddr = addr
                    .parse()
                    .map_err(|_| ParseSubnetError::InvalidAddress(addr.to_string()))?;
                let prefix: u8 = prefix
                    .parse()
                    .map_err(|_| ParseSubnetError::InvalidPrefix(prefix.to_string()))?;
                Self::new(addr, prefix)
            }
            None => s
                .parse::<IpAddr>()
                .map(Self::host)
                .map_err(|_| ParseSubnetError::InvalidAddress(s.to_string())),
        }
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

fn max_prefix(addr: IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn mask(addr: IpAddr, prefix_len: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let bits = u32::from(v4);
            let mask = u32::MAX.checked_shl(32 - u32::from(prefix_len)).unwrap_or(0);
            IpAddr::V4(Ipv4Addr::from(bits & mask))
        }
        IpAddr::V6(v6) => {
            let bits = u128::from(v6);
            let mask = u128::MAX.checked_shl(128 - u32::from(prefix_len)).unwrap_or(0);
            IpAddr::V6(Ipv6Addr::from(bits & mask))
        }
    }
}
