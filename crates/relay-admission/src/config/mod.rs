//! # Relay Daemon Configuration
//!
//! JSON configuration for the relay daemon, compatible with files written for
//! the Go relay daemon: PascalCase keys, durations as integer nanoseconds.
//!
//! ## Load Contract
//!
//! - Defaults first; a file overrides only the fields it names, at any depth
//! - Keys match case-insensitively and `null` keeps the default, as in Go
//!   (`Limit: null` alone means "no circuit caps")
//! - An empty path yields pure defaults
//! - Unreadable or malformed files are fatal
//! - ACL entries are parsed into typed rules at load time

// Semantic submodules
mod compat;
mod duration;
mod error;
mod loader;
mod schema;
mod settings;

// Re-export public API
pub use error::ConfigError;
pub use loader::load_config;
pub use schema::{
    AclConfig, Config, ConnMgrConfig, DaemonConfig, NetworkConfig, RelayLimitConfig,
    RelayV2Config, ResourcesConfig,
};
