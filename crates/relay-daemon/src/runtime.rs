//! Daemon runtime: builds the admission service and drives its periodic
//! maintenance.

use std::sync::Arc;

use relay_admission::{
    Config, ConfigError, RelayAdmissionApi, RelayAdmissionService, RelayTransport, SweepReport,
    SystemTimeSource, TimeSource,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::telemetry;
use crate::transport::LoggingTransport;

/// The relay daemon runtime.
pub struct DaemonRuntime {
    /// Effective configuration
    config: Config,
    /// Admission core; absent when relay v2 is disabled
    relay: Option<Arc<RelayAdmissionService>>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
    /// Maintenance loop, once started
    maintenance: Option<JoinHandle<()>>,
}

impl DaemonRuntime {
    /// Create a runtime with the system clock and the logging transport.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::with_ports(config, Box::new(SystemTimeSource::new()), Arc::new(LoggingTransport))
    }

    /// Create a runtime with explicit time source and transport.
    pub fn with_ports(
        config: Config,
        time_source: Box<dyn TimeSource>,
        transport: Arc<dyn RelayTransport>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let relay = if config.relay_v2.enabled {
            let settings = config.relay_settings()?;
            Some(Arc::new(RelayAdmissionService::new(
                settings,
                time_source,
                transport,
            )))
        } else {
            None
        };
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            relay,
            shutdown_tx,
            shutdown_rx,
            maintenance: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The admission service, if relay v2 is enabled.
    pub fn relay(&self) -> Option<Arc<RelayAdmissionService>> {
        self.relay.clone()
    }

    /// Log the effective setup and start the maintenance loop.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        let network = &self.config.network;
        info!(
            listen = ?network.listen_addrs,
            announce = ?network.announce_addrs,
            "relay daemon starting"
        );
        if let Some(port) = self.config.daemon.profiling_port() {
            info!(port, "profiling endpoint is not served by this daemon");
        }

        let Some(relay) = self.relay.clone() else {
            info!("relay v2 disabled; nothing to admit");
            return;
        };
        let acl = relay.acl();
        info!(
            open = acl.is_open(),
            peers = acl.peer_rule_count(),
            subnets = acl.subnet_rule_count(),
            sweep_interval = ?relay.sweep_interval(),
            "relay v2 admission enabled"
        );

        let shutdown = self.shutdown_rx.clone();
        self.maintenance = Some(tokio::spawn(run_maintenance(relay, shutdown)));
    }

    /// Stop the maintenance loop and wait for it to finish.
    pub async fn shutdown(&mut self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
        if let Some(handle) = self.maintenance.take() {
            if let Err(e) = handle.await {
                error!("Maintenance task failed: {}", e);
            }
        }

        if let Some(relay) = &self.relay {
            telemetry::publish(&relay.stats());
        }
        info!("Shutdown complete");
    }
}

/// Sweep, trim and publish metrics every sweep interval until shutdown.
async fn run_maintenance(relay: Arc<RelayAdmissionService>, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(relay.sweep_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                maintenance_tick(&relay);
            }
            _ = shutdown.changed() => {
                debug!("maintenance loop stopping");
                break;
            }
        }
    }
}

/// One maintenance pass.
pub fn maintenance_tick(relay: &RelayAdmissionService) -> SweepReport {
    let report = relay.sweep();
    let closed = relay.trim();
    if !closed.is_empty() {
        debug!(closed = closed.len(), "periodic trim");
    }
    telemetry::publish(&relay.stats());
    report
}
