//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Relay daemon: circuit relay with admission control
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "relay-daemon")]
#[command(about = "Peer-to-peer circuit relay with admission control")]
pub struct Args {
    /// Path to the JSON configuration file; defaults are used when absent
    #[arg(short, long, env = "RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,

    /// Validate the configuration and exit
    #[arg(long, conflicts_with = "print_config")]
    pub check: bool,
}

impl Args {
    /// The configuration path to load; empty means defaults.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_default()
    }
}
