//! Admission stats to metrics.

use relay_admission::AdmissionStats;
use relay_telemetry::RelaySnapshot;

/// Flatten admission stats into the metrics snapshot.
pub fn snapshot(stats: &AdmissionStats) -> RelaySnapshot {
    let totals = stats.ledger.totals;
    RelaySnapshot {
        reservations: totals.reservations,
        circuits: totals.circuits,
        buffer_bytes: totals.bytes,
        peers_tracked: stats.ledger.tracked_peers as u64,
        connections: stats.connections.count as u64,
        accepted: stats.accepted,
        rejected_acl: stats.rejected_acl,
        rejected_resources: stats.rejected_resources,
        rejected_overloaded: stats.rejected_overloaded,
        rejected_invalid: stats.rejected_invalid,
        teardowns: stats.forced_teardowns,
        trimmed: stats.trimmed_connections,
    }
}

/// Publish the current stats of the admission core.
pub fn publish(stats: &AdmissionStats) {
    relay_telemetry::publish(&snapshot(stats));
}
