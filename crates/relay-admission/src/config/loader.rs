//! Reading configuration files.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use super::compat::canonicalize;
use super::error::ConfigError;
use super::schema::Config;

/// Load and validate the relay daemon configuration.
///
/// An empty `path` yields [`Config::default`]. Otherwise the file is parsed
/// on top of the defaults and validated; any failure is fatal.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        debug!("no config file given, using defaults");
        return Ok(Config::default());
    }

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = Config::from_json(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;

    info!(path = %path.display(), "loaded configuration");
    Ok(config)
}

impl Config {
    /// Parse a JSON document over the defaults, without validating it.
    ///
    /// Trailing data after the document is an error.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let document: Value = serde_json::from_str(raw)?;
        let template = serde_json::to_value(Self::default())?;
        serde_json::from_value(canonicalize(document, &template))
    }

    /// Render as pretty JSON in the same format the loader reads.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
