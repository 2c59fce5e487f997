//! Prometheus metrics for the relay.
//!
//! All metrics follow the naming convention: `relay_<area>_<metric>[_<unit>]`
//!
//! ## Metric Types
//!
//! - **Gauge**: current occupancy (reservations, circuits, connections)
//! - **Counter**: cumulative outcomes (admissions, teardowns, trims)
//!
//! Values are published from periodic snapshots of the admission core, so
//! counters are advanced by the difference to the previous snapshot.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // OCCUPANCY
    // =========================================================================

    /// Reservations currently held
    pub static ref RESERVATIONS_ACTIVE: IntGauge = IntGauge::new(
        "relay_reservations_active",
        "Relay reservations currently held"
    ).expect("metric creation failed");

    /// Circuits currently open
    pub static ref CIRCUITS_ACTIVE: IntGauge = IntGauge::new(
        "relay_circuits_active",
        "Relayed circuits currently open"
    ).expect("metric creation failed");

    /// Relay buffer bytes currently reserved
    pub static ref BUFFER_BYTES: IntGauge = IntGauge::new(
        "relay_buffer_bytes",
        "Relay buffer bytes currently reserved"
    ).expect("metric creation failed");

    /// Peers with a ledger entry
    pub static ref PEERS_TRACKED: IntGauge = IntGauge::new(
        "relay_peers_tracked",
        "Peers with a resource ledger entry"
    ).expect("metric creation failed");

    /// Open connections
    pub static ref CONNECTIONS_OPEN: IntGauge = IntGauge::new(
        "relay_connections_open",
        "Connections tracked by the connection manager"
    ).expect("metric creation failed");

    // =========================================================================
    // OUTCOMES
    // =========================================================================

    /// Admission decisions by outcome
    pub static ref ADMISSIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("relay_admissions_total", "Admission decisions"),
        &["outcome"]  // accepted, acl_denied, exhausted, overloaded, invalid
    ).expect("metric creation failed");

    /// Grants revoked for running past their limits
    pub static ref TEARDOWNS: IntCounter = IntCounter::new(
        "relay_teardowns_total",
        "Circuits and reservations revoked for exceeding their limits"
    ).expect("metric creation failed");

    /// Connections closed by trimming
    pub static ref CONNECTIONS_TRIMMED: IntCounter = IntCounter::new(
        "relay_connections_trimmed_total",
        "Connections closed by watermark trimming"
    ).expect("metric creation failed");
}

/// Point-in-time view of the relay, as published to the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelaySnapshot {
    pub reservations: u64,
    pub circuits: u64,
    pub buffer_bytes: u64,
    pub peers_tracked: u64,
    pub connections: u64,
    pub accepted: u64,
    pub rejected_acl: u64,
    pub rejected_resources: u64,
    pub rejected_overloaded: u64,
    pub rejected_invalid: u64,
    pub teardowns: u64,
    pub trimmed: u64,
}

/// Register all relay metrics with the global registry.
///
/// Calling it again is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Occupancy
        Box::new(RESERVATIONS_ACTIVE.clone()),
        Box::new(CIRCUITS_ACTIVE.clone()),
        Box::new(BUFFER_BYTES.clone()),
        Box::new(PEERS_TRACKED.clone()),
        Box::new(CONNECTIONS_OPEN.clone()),
        // Outcomes
        Box::new(ADMISSIONS.clone()),
        Box::new(TEARDOWNS.clone()),
        Box::new(CONNECTIONS_TRIMMED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Publish a snapshot to the registered metrics.
pub fn publish(snapshot: &RelaySnapshot) {
    RESERVATIONS_ACTIVE.set(saturating_i64(snapshot.reservations));
    CIRCUITS_ACTIVE.set(saturating_i64(snapshot.circuits));
    BUFFER_BYTES.set(saturating_i64(snapshot.buffer_bytes));
    PEERS_TRACKED.set(saturating_i64(snapshot.peers_tracked));
    CONNECTIONS_OPEN.set(saturating_i64(snapshot.connections));

    for (outcome, total) in [
        ("accepted", snapshot.accepted),
        ("acl_denied", snapshot.rejected_acl),
        ("exhausted", snapshot.rejected_resources),
        ("overloaded", snapshot.rejected_overloaded),
        ("invalid", snapshot.rejected_invalid),
    ] {
        advance_to(&ADMISSIONS.with_label_values(&[outcome]), total);
    }
    advance_to(&TEARDOWNS, snapshot.teardowns);
    advance_to(&CONNECTIONS_TRIMMED, snapshot.trimmed);
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Move a counter forward to a cumulative total. Counters never go back.
fn advance_to(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
