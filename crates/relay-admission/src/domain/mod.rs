//! Domain Layer - Pure admission logic with no I/O
//!
//! This module contains:
//! - Peer identifiers, subnets and grant tokens
//! - ACL evaluation (default-open allow lists)
//! - Resource ledger (per-peer and global counters)
//! - Circuit tracker (duration, data and TTL enforcement)
//! - Connection manager (watermark trimming with grace period)
//!
//! Nothing here locks or reads the clock; callers pass `now` explicitly.

pub mod acl;
pub mod circuits;
pub mod conn_manager;
pub mod ledger;
/// Core domain types (entities, values, errors)
pub mod types;

pub use acl::*;
pub use circuits::*;
pub use conn_manager::*;
pub use ledger::*;
pub use types::*;
