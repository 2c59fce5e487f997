//! # Resource Ledger
//!
//! Per-peer and global accounting of reservations, circuits and buffered
//! bytes.
//!
//! ## Invariants
//!
//! - No counter ever exceeds its configured limit.
//! - Per-peer counters sum exactly to the global aggregate.
//! - Counters never go negative; a token releases at most once.

mod config;
mod manager;
mod types;

pub use config::{CircuitLimit, ResourceLimits};
pub use manager::ResourceLedger;
pub use types::{LedgerStats, Usage};
