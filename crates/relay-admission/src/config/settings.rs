//! Validation and compilation into [`RelaySettings`].

use super::error::ConfigError;
use super::schema::{AclConfig, Config};
use crate::domain::{
    AclEvaluator, CircuitLimit, ConnManagerConfig, PeerId, ResourceLimits, Subnet,
};
use crate::service::RelaySettings;

impl Config {
    /// Check everything the daemon relies on before it starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_addrs("ListenAddrs", &self.network.listen_addrs)?;
        check_addrs("AnnounceAddrs", &self.network.announce_addrs)?;
        self.relay_settings().map(|_| ())
    }

    /// Compile into the typed settings of the admission service.
    pub fn relay_settings(&self) -> Result<RelaySettings, ConfigError> {
        let conn_mgr = &self.conn_mgr;
        if conn_mgr.conn_mgr_lo > conn_mgr.conn_mgr_hi {
            return Err(ConfigError::InvalidWatermarks {
                low: conn_mgr.conn_mgr_lo,
                high: conn_mgr.conn_mgr_hi,
            });
        }

        let relay = &self.relay_v2;
        if relay.sweep_interval.is_zero() {
            return Err(ConfigError::InvalidInterval {
                field: "RelayV2.SweepInterval",
            });
        }

        let resources = &relay.resources;
        let limits = ResourceLimits {
            max_reservations: resources.max_reservations,
            max_reservations_per_peer: resources.max_reservations_per_peer,
            max_reservations_per_ip: resources.max_reservations_per_ip,
            max_circuits: resources.max_circuits,
            max_circuits_total: resources.max_circuits_total,
            buffer_size: resources.buffer_size,
            circuit_limit: resources.limit.map(|limit| CircuitLimit {
                duration: limit.duration,
                data: limit.data,
            }),
            reservation_ttl: resources.reservation_ttl,
        };

        Ok(RelaySettings {
            acl: self.acl.compile()?,
            limits,
            conn_manager: ConnManagerConfig {
                low_water: conn_mgr.conn_mgr_lo,
                high_water: conn_mgr.conn_mgr_hi,
                grace: conn_mgr.conn_mgr_grace,
            },
            sweep_interval: relay.sweep_interval,
            peer_idle_timeout: relay.peer_idle_timeout,
        })
    }
}

impl AclConfig {
    /// Parse the allow lists into typed rules.
    pub fn compile(&self) -> Result<AclEvaluator, ConfigError> {
        let peers = self
            .allow_peers
            .iter()
            .map(|entry| {
                PeerId::parse(entry.trim()).map_err(|source| ConfigError::InvalidPeerId {
                    entry: entry.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let subnets = self
            .allow_subnets
            .iter()
            .map(|entry| {
                entry
                    .trim()
                    .parse::<Subnet>()
                    .map_err(|source| ConfigError::InvalidSubnet {
                        entry: entry.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AclEvaluator::new(peers, subnets))
    }
}

/// Multiaddrs are opaque here; only reject what can never be one.
fn check_addrs(field: &'static str, addrs: &[String]) -> Result<(), ConfigError> {
    match addrs.iter().find(|addr| !addr.starts_with('/') || addr.len() < 2) {
        Some(bad) => Err(ConfigError::InvalidAddress {
            field,
            address: bad.clone(),
        }),
        None => Ok(()),
    }
}
