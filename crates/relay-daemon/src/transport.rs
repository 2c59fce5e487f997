//! Transport adapter for running the daemon without a connection layer
//! attached: every request is logged.

use relay_admission::{ConnectionId, RelayTransport, TeardownReason, Token};
use relay_telemetry::log_peer_event;
use tracing::info;

/// Logs close and teardown requests at INFO.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingTransport;

impl RelayTransport for LoggingTransport {
    fn close_connection(&self, conn: ConnectionId) {
        info!(component = "transport", %conn, "close connection");
    }

    fn teardown(&self, grant: &Token, reason: TeardownReason) {
        log_peer_event!(
            info,
            "transport",
            "teardown",
            grant.peer(),
            token = %grant.id(),
            kind = %grant.kind(),
            %reason
        );
    }
}
