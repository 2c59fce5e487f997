//! Configuration errors. All of them are fatal at startup.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{ParsePeerIdError, ParseSubnetError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid peer id {entry:?} in ACL.AllowPeers: {source}")]
    InvalidPeerId {
        entry: String,
        source: ParsePeerIdError,
    },

    #[error("invalid subnet {entry:?} in ACL.AllowSubnets: {source}")]
    InvalidSubnet {
        entry: String,
        source: ParseSubnetError,
    },

    #[error("invalid multiaddr {address:?} in Network.{field}")]
    InvalidAddress { field: &'static str, address: String },

    #[error("ConnMgrLo ({low}) is above ConnMgrHi ({high})")]
    InvalidWatermarks { low: usize, high: usize },

    #[error("{field} must be non-zero")]
    InvalidInterval { field: &'static str },
}
