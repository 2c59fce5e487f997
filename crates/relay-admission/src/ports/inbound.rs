//! # Driving Ports (Inbound API)
//!
//! These are the public APIs the admission core exposes to the relay
//! protocol handlers and the transport.

use std::net::IpAddr;

use crate::domain::{
    ConnectionId, Decision, LedgerError, PeerId, ResourceKind, Token, TransferOutcome,
};
use crate::service::AdmissionStats;

/// Primary API used by the relay protocol for every reservation and
/// connect-through request.
///
/// # Example
///
/// ```rust,ignore
/// use relay_admission::ports::RelayAdmissionApi;
///
/// fn handle_reserve<T: RelayAdmissionApi>(api: &T, peer: &PeerId, addr: IpAddr) {
///     match api.admit(peer, addr, ResourceKind::Reservation, 1) {
///         Decision::Accepted(token) => store(token),
///         Decision::Rejected(reason) => reply_error(reason),
///     }
/// }
/// ```
pub trait RelayAdmissionApi {
    /// Decide a request: ACL, then ledger, then connection pressure.
    ///
    /// Rejections have no lasting side effects. Never blocks waiting for
    /// capacity.
    fn admit(&self, peer: &PeerId, addr: IpAddr, kind: ResourceKind, amount: u64) -> Decision;

    /// Return the capacity held by a token.
    ///
    /// # Returns
    ///
    /// - `Ok(())` on the first release
    /// - `Err(DoubleRelease)` if already released (nothing changes)
    fn release(&self, token: &Token) -> Result<(), LedgerError>;

    /// Account bytes relayed over a circuit, revoking it past the data cap.
    fn record_transfer(&self, circuit: &Token, bytes: u64) -> Result<TransferOutcome, LedgerError>;

    /// Read-only snapshot for observability.
    fn stats(&self) -> AdmissionStats;
}

/// Connection lifecycle events reported by the transport.
pub trait ConnectionEventHandler {
    /// A connection opened. May trigger trimming above the high watermark.
    fn on_connect(&self, conn: ConnectionId, peer: &PeerId);

    /// A connection closed.
    fn on_disconnect(&self, conn: ConnectionId);

    /// Traffic was seen on a connection.
    fn on_activity(&self, conn: ConnectionId);
}
