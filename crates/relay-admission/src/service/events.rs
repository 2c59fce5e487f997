use tracing::{debug, trace};

use crate::domain::{ConnectionId, PeerId, TrimOutcome};
use crate::ports::ConnectionEventHandler;
use crate::service::RelayAdmissionService;

impl ConnectionEventHandler for RelayAdmissionService {
    fn on_connect(&self, conn: ConnectionId, peer: &PeerId) {
        let now = self.now();
        let trimmed = {
            let mut connections = self.connections.lock();
            if !connections.on_connect(conn, peer.clone(), now) {
                debug!(%conn, peer = %peer, "duplicate connect event ignored");
                return;
            }
            if connections.is_over_high_water() {
                connections.trim(now)
            } else {
                TrimOutcome::default()
            }
        };
        self.close_trimmed(trimmed);
    }

    fn on_disconnect(&self, conn: ConnectionId) {
        if self.connections.lock().on_disconnect(&conn).is_none() {
            // Already trimmed, or never reported
            trace!(%conn, "disconnect for untracked connection");
        }
    }

    fn on_activity(&self, conn: ConnectionId) {
        let now = self.now();
        self.connections.lock().touch(&conn, now);
    }
}

impl RelayAdmissionService {
    /// Exempt a connection from trimming. Returns false if it is not tracked.
    pub fn protect(&self, conn: ConnectionId) -> bool {
        self.connections.lock().protect(&conn)
    }

    /// Make a connection trimmable again. Returns false if it is not tracked.
    pub fn unprotect(&self, conn: ConnectionId) -> bool {
        self.connections.lock().unprotect(&conn)
    }

    /// Whether the connection manager is tracking `conn`.
    pub fn is_connected(&self, conn: ConnectionId) -> bool {
        self.connections.lock().is_connected(&conn)
    }
}
