//! # Relay Admission Service
//!
//! High-level service implementing the `RelayAdmissionApi` and
//! `ConnectionEventHandler` ports.
//!
//! The service wraps the domain components and owns their locking: requests
//! for the same peer are serialized through a per-peer lock table, the ledger
//! and circuit tracker share one mutex, and the connection manager has its
//! own. Transport calls are made only after every lock is released.

// Semantic submodules
mod api;
mod core;
mod events;
mod locks;
mod maintenance;
mod settings;
mod stats;

// Re-export public API
pub use self::core::RelayAdmissionService;
pub use maintenance::SweepReport;
pub use settings::RelaySettings;
pub use stats::AdmissionStats;
