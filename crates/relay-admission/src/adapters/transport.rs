//! Transport adapter for hosts without their own connection layer.

use crate::domain::{ConnectionId, TeardownReason, Token};
use crate::ports::RelayTransport;

/// Ignores every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpTransport;

impl RelayTransport for NoOpTransport {
    fn close_connection(&self, _conn: ConnectionId) {}

    fn teardown(&self, _grant: &Token, _reason: TeardownReason) {}
}
