//! Validated runtime settings for the admission service.

use std::time::Duration;

use crate::domain::{AclEvaluator, ConnManagerConfig, ResourceLimits};

/// Everything the admission service needs, already parsed and validated.
///
/// Produced from the JSON configuration by
/// [`Config::relay_settings`](crate::config::Config::relay_settings).
#[derive(Debug, Clone, PartialEq)]
pub struct RelaySettings {
    pub acl: AclEvaluator,
    pub limits: ResourceLimits,
    pub conn_manager: ConnManagerConfig,
    /// Cadence of circuit expiry, trimming and idle collection
    pub sweep_interval: Duration,
    /// How long an empty ledger entry survives
    pub peer_idle_timeout: Duration,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            acl: AclEvaluator::open(),
            limits: ResourceLimits::default(),
            conn_manager: ConnManagerConfig::default(),
            sweep_interval: Duration::from_secs(5),
            peer_idle_timeout: Duration::from_secs(600),
        }
    }
}
