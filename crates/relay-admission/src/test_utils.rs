//! Test utilities for relay admission.
//!
//! Controllable time and a transport that records what it was asked to do.
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use relay_admission::test_utils::ManualTimeSource;
//! use relay_admission::TimeSource;
//!
//! let time = ManualTimeSource::new(1_000);
//! time.advance(Duration::from_secs(2));
//! assert_eq!(time.now().as_millis(), 3_000);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::domain::{ConnectionId, TeardownReason, Timestamp, Token};
use crate::ports::outbound::{RelayTransport, TimeSource};

/// A time source that only moves when told to.
///
/// Clones share the same clock, so a test can keep one handle while the
/// service owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    millis: Arc<AtomicU64>,
}

impl ManualTimeSource {
    /// Create a clock reading `millis`.
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(millis)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }

    /// Set the clock to an absolute reading.
    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// A call made on [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Closed(ConnectionId),
    TornDown(Token, TeardownReason),
}

/// Transport that records every request instead of acting on it.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    events: Mutex<Vec<TransportEvent>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, in call order.
    pub fn events(&self) -> Vec<TransportEvent> {
        self.events.lock().clone()
    }

    /// Connections the core asked to close.
    pub fn closed(&self) -> Vec<ConnectionId> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                TransportEvent::Closed(conn) => Some(*conn),
                TransportEvent::TornDown(..) => None,
            })
            .collect()
    }

    /// Grants the core revoked, with the reason.
    pub fn torn_down(&self) -> Vec<(Token, TeardownReason)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                TransportEvent::TornDown(token, reason) => Some((token.clone(), *reason)),
                TransportEvent::Closed(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl RelayTransport for RecordingTransport {
    fn close_connection(&self, conn: ConnectionId) {
        self.events.lock().push(TransportEvent::Closed(conn));
    }

    fn teardown(&self, grant: &Token, reason: TeardownReason) {
        self.events
            .lock()
            .push(TransportEvent::TornDown(grant.clone(), reason));
    }
}
