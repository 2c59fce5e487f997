//! # Driven Ports (Outbound SPI)
//!
//! These are the interfaces the admission core **requires** the host
//! application to implement.

use crate::domain::{ConnectionId, TeardownReason, Timestamp, Token};

/// Abstract interface for the transport layer that owns the actual
/// connections and circuits.
///
/// The admission core calls these methods only after releasing its own
/// locks, so implementations may block.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: maintenance runs on a background
/// task while requests are admitted from connection handlers.
pub trait RelayTransport: Send + Sync {
    /// Close a connection selected by trimming.
    ///
    /// The connection is already removed from tracking; a later
    /// disconnect event for it is ignored.
    fn close_connection(&self, conn: ConnectionId);

    /// Revoke a circuit or reservation that ran past its limits.
    ///
    /// The grant's ledger capacity is already returned. The transport must
    /// not release the token again.
    fn teardown(&self, grant: &Token, reason: TeardownReason);
}

/// Abstract interface for monotonic time.
///
/// Allows deterministic testing of grace periods and circuit limits.
pub trait TimeSource: Send + Sync {
    /// Current monotonic time.
    fn now(&self) -> Timestamp;
}
