//! Configuration schema and defaults.
//!
//! Every struct carries `#[serde(default)]`, so a field missing from the file
//! keeps its default value no matter how deep it sits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Complete relay daemon configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Config {
    /// Listen and announce addresses.
    pub network: NetworkConfig,
    /// Connection manager thresholds.
    pub conn_mgr: ConnMgrConfig,
    /// Circuit relay v2 service.
    pub relay_v2: RelayV2Config,
    /// Who may use the relay.
    #[serde(rename = "ACL")]
    pub acl: AclConfig,
    /// Daemon process settings.
    pub daemon: DaemonConfig,
}

/// Listen and announce settings for the host.
///
/// Addresses are multiaddrs, handed to the transport untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NetworkConfig {
    pub listen_addrs: Vec<String>,
    pub announce_addrs: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_addrs: vec![
                "/ip4/0.0.0.0/udp/9095/quic-v1".into(),
                "/ip4/0.0.0.0/udp/9095/quic-v1/webtransport".into(),
                "/ip4/0.0.0.0/tcp/4001".into(),
                "/ip4/0.0.0.0/tcp/9096/ws".into(),
                "/ip4/127.0.0.1/udp/9095/quic-v1/webtransport".into(),
                "/ip4/127.0.0.1/udp/9095/quic-v1/webtransport/certhash/uEiAaP2zrOyYeIFmagpOQg0K_6R4eD6aPxrZBrXzRnsVNUQ/certhash/uEiA4yfEqqYgLIDMaoZFAOEUDjyFL6YYHj3Wc7tf9ll-atg/p2p/12D3KooWEbomrRWemnfMBfgNMHdQmduTYZGmmLzTUXydfwU1iohy".into(),
            ],
            announce_addrs: vec!["/ip4/127.0.0.1/udp/9095/quic-v1/webtransport".into()],
        }
    }
}

/// Connection manager watermarks and grace period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConnMgrConfig {
    pub conn_mgr_lo: usize,
    pub conn_mgr_hi: usize,
    #[serde(with = "super::duration")]
    pub conn_mgr_grace: Duration,
}

impl Default for ConnMgrConfig {
    fn default() -> Self {
        Self {
            conn_mgr_lo: 512,
            conn_mgr_hi: 768,
            conn_mgr_grace: Duration::from_secs(2 * 60),
        }
    }
}

/// Activation and resources of the relay v2 service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RelayV2Config {
    pub enabled: bool,
    pub resources: ResourcesConfig,
    /// Cadence of circuit expiry, trimming and idle collection
    #[serde(with = "super::duration")]
    pub sweep_interval: Duration,
    /// How long an empty per-peer ledger entry is kept
    #[serde(with = "super::duration")]
    pub peer_idle_timeout: Duration,
}

impl Default for RelayV2Config {
    fn default() -> Self {
        Self {
            enabled: true,
            resources: ResourcesConfig::default(),
            sweep_interval: Duration::from_secs(5),
            peer_idle_timeout: Duration::from_secs(10 * 60),
        }
    }
}

/// Relay resource limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ResourcesConfig {
    /// Per-circuit caps; `null` removes them.
    pub limit: Option<RelayLimitConfig>,
    #[serde(rename = "ReservationTTL", with = "super::duration")]
    pub reservation_ttl: Duration,
    pub max_reservations: u64,
    pub max_reservations_per_peer: u64,
    #[serde(rename = "MaxReservationsPerIP")]
    pub max_reservations_per_ip: u64,
    /// Circuits one peer may hold
    pub max_circuits: u64,
    /// Circuits across all peers
    pub max_circuits_total: u64,
    /// Relay buffer per circuit, in bytes
    pub buffer_size: u64,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            limit: Some(RelayLimitConfig::default()),
            reservation_ttl: Duration::from_secs(60 * 60),
            max_reservations: 128,
            max_reservations_per_peer: 4,
            max_reservations_per_ip: 8,
            max_circuits: 16,
            max_circuits_total: 1024,
            buffer_size: 2048,
        }
    }
}

/// Duration and data caps of a single relayed circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RelayLimitConfig {
    #[serde(with = "super::duration")]
    pub duration: Duration,
    /// Bytes
    pub data: u64,
}

impl Default for RelayLimitConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(2 * 60),
            data: 1 << 17, // 128 KiB
        }
    }
}

/// Allow lists. Both empty means every peer may use the relay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AclConfig {
    pub allow_peers: Vec<String>,
    /// CIDR subnets or bare addresses
    pub allow_subnets: Vec<String>,
}

/// Settings for the daemon process itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DaemonConfig {
    /// Profiling port; zero or negative disables it
    pub pprof_port: i32,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self { pprof_port: 6060 }
    }
}

impl DaemonConfig {
    /// The profiling port, if enabled.
    pub fn profiling_port(&self) -> Option<u16> {
        u16::try_from(self.pprof_port).ok().filter(|port| *port != 0)
    }
}
