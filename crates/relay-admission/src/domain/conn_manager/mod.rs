//! # Connection Manager
//!
//! Watermark-based connection trimming with a grace period.
//!
//! ## Trimming
//!
//! When the connection count rises above the high watermark, connections
//! are closed one at a time, least recently active first, until the count is
//! back at the low watermark. Connections younger than the grace period (and
//! protected ones) are skipped; if nothing is eligible the pass ends early
//! and trimming resumes once grace periods run out.

// Semantic submodules
mod config;
mod manager;
mod security;
mod types;

// Re-export public API
pub use config::ConnManagerConfig;
pub use manager::ConnectionManager;
pub use security::ConnectionInfo;
pub use types::{ConnectionStats, TrimOutcome};
