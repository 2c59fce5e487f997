//! # Relay Admission Core
//!
//! Configuration loading plus admission control, access control and resource
//! accounting for a peer-to-peer circuit relay.
//!
//! Every reservation or connect-through request passes four gates in order:
//!
//! 1. **ACL**: default-open allow lists of peers and subnets
//! 2. **Resource ledger**: per-peer, per-IP and global counters
//! 3. **Connection manager**: watermark trimming with a grace period
//! 4. **Commit or rollback**: no rejected request leaves a trace
//!
//! Granted circuits are then held to their duration and data caps, and
//! reservations to their TTL, by a periodic sweep.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** Pure admission logic, no locks and no clock
//! - **Ports Layer:** Admission API in, transport and time out
//! - **Service Layer:** Wires domain to ports and owns all locking
//! - **Adapters Layer:** System clock and simple transports
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use relay_admission::{
//!     load_config, Decision, NoOpTransport, PeerId, RelayAdmissionApi,
//!     RelayAdmissionService, ResourceKind, SystemTimeSource,
//! };
//!
//! let settings = load_config("").unwrap().relay_settings().unwrap();
//! let service = RelayAdmissionService::new(
//!     settings,
//!     Box::new(SystemTimeSource::new()),
//!     Arc::new(NoOpTransport),
//! );
//!
//! let peer = PeerId::parse("QmPeer").unwrap();
//! let addr = "203.0.113.9".parse().unwrap();
//! match service.admit(&peer, addr, ResourceKind::Reservation, 1) {
//!     Decision::Accepted(token) => service.release(&token).unwrap(),
//!     Decision::Rejected(reason) => panic!("rejected: {reason}"),
//! }
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// =============================================================================
// TEST UTILITIES (Requires `test-utils` feature)
// =============================================================================

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use adapters::{NoOpTransport, SystemTimeSource};
pub use config::{load_config, Config, ConfigError};
pub use domain::{
    AclEvaluator, CircuitLimit, ConnManagerConfig, ConnectionId, Decision, LedgerError,
    LimitScope, PeerId, RejectReason, ResourceKind, ResourceLimits, Subnet, TeardownReason,
    Timestamp, Token, TokenId, TransferOutcome, Usage,
};
pub use ports::{ConnectionEventHandler, RelayAdmissionApi, RelayTransport, TimeSource};
pub use service::{AdmissionStats, RelayAdmissionService, RelaySettings, SweepReport};

#[cfg(feature = "test-utils")]
pub use test_utils::{ManualTimeSource, RecordingTransport, TransportEvent};
