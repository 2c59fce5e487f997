use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use super::locks::PeerLocks;
use super::settings::RelaySettings;
use super::stats::AdmissionCounters;
use crate::domain::{
    AclEvaluator, CircuitTracker, ConnectionManager, PeerId, ResourceLedger, ResourceLimits,
    Timestamp, Usage,
};
use crate::ports::{RelayTransport, TimeSource};

/// Relay admission service implementing the driving ports.
///
/// Composes the ACL, the resource ledger, the circuit tracker and the
/// connection manager behind one thread-safe handle. Share it with `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// use relay_admission::service::{RelayAdmissionService, RelaySettings};
/// use relay_admission::adapters::{NoOpTransport, SystemTimeSource};
/// use relay_admission::ports::RelayAdmissionApi;
///
/// let service = RelayAdmissionService::new(
///     RelaySettings::default(),
///     Box::new(SystemTimeSource::new()),
///     Arc::new(NoOpTransport),
/// );
/// let decision = service.admit(&peer, addr, ResourceKind::Reservation, 1);
/// ```
pub struct RelayAdmissionService {
    /// Current ACL; swapped whole on reload
    pub(crate) acl: RwLock<Arc<AclEvaluator>>,
    /// Ledger and circuit tracker share one lock so a release and its
    /// untrack are never observed apart
    pub(crate) state: Mutex<RelayState>,
    pub(crate) connections: Mutex<ConnectionManager>,
    pub(crate) peer_locks: PeerLocks,
    pub(crate) counters: AdmissionCounters,
    pub(crate) sweep_interval: Duration,
    pub(crate) peer_idle_timeout: Duration,
    pub(crate) time_source: Box<dyn TimeSource>,
    pub(crate) transport: Arc<dyn RelayTransport>,
}

pub(crate) struct RelayState {
    pub ledger: ResourceLedger,
    pub circuits: CircuitTracker,
}

impl RelayAdmissionService {
    /// Create a new admission service.
    ///
    /// # Arguments
    ///
    /// * `settings` - Validated relay settings
    /// * `time_source` - Provider for current time
    /// * `transport` - Receives close and teardown requests
    pub fn new(
        settings: RelaySettings,
        time_source: Box<dyn TimeSource>,
        transport: Arc<dyn RelayTransport>,
    ) -> Self {
        let circuits = CircuitTracker::new(
            settings.limits.circuit_limit,
            settings.limits.reservation_ttl,
        );
        Self {
            acl: RwLock::new(Arc::new(settings.acl)),
            state: Mutex::new(RelayState {
                ledger: ResourceLedger::new(settings.limits),
                circuits,
            }),
            connections: Mutex::new(ConnectionManager::new(settings.conn_manager)),
            peer_locks: PeerLocks::default(),
            counters: AdmissionCounters::default(),
            sweep_interval: settings.sweep_interval,
            peer_idle_timeout: settings.peer_idle_timeout,
            time_source,
            transport,
        }
    }

    /// Get the current timestamp from the time source.
    pub(crate) fn now(&self) -> Timestamp {
        self.time_source.now()
    }

    /// How often the host should call [`sweep`](Self::sweep) and
    /// [`trim`](Self::trim).
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// The ACL currently in force.
    pub fn acl(&self) -> Arc<AclEvaluator> {
        Arc::clone(&self.acl.read())
    }

    pub fn limits(&self) -> ResourceLimits {
        self.state.lock().ledger.limits().clone()
    }

    /// Ledger counters held by `peer`.
    pub fn peer_usage(&self, peer: &PeerId) -> Usage {
        self.state.lock().ledger.peer_usage(peer)
    }

    /// Whether ledger counters agree with each other and with the limits.
    pub fn is_consistent(&self) -> bool {
        self.state.lock().ledger.is_consistent()
    }

    /// Peers with a request currently in flight.
    pub fn peers_in_flight(&self) -> usize {
        self.peer_locks.len()
    }
}
