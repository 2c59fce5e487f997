//! # Circuit Tracker
//!
//! Companion to the resource ledger that bounds granted circuits in time and
//! data, and expires reservations after their TTL.
//!
//! Limits fail closed: a circuit past its cap is torn down, never throttled.

mod tracker;
mod types;

pub use tracker::CircuitTracker;
pub use types::TransferOutcome;
