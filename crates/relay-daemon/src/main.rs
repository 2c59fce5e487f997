//! # Relay Daemon
//!
//! Entry point: telemetry, configuration, admission core, then wait for
//! Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use relay_admission::load_config;
use relay_daemon::{Args, DaemonRuntime};
use relay_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("failed to initialize telemetry")?;

    let path = args.config_path();
    let config = load_config(&path)
        .with_context(|| format!("failed to load configuration from {:?}", path))?;

    if args.print_config {
        println!("{}", config.to_json_pretty().context("failed to render configuration")?);
        return Ok(());
    }
    if args.check {
        info!("configuration is valid");
        return Ok(());
    }

    let mut runtime = DaemonRuntime::new(config).context("failed to build relay runtime")?;
    runtime.start();

    // Keep the daemon running
    info!("Relay daemon is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    runtime.shutdown().await;
    Ok(())
}
