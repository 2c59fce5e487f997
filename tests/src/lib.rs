//! # Relay Daemon Test Suite
//!
//! Unified test crate exercising the public surface of the workspace.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── admission_flows.rs   # Config file to admission decisions
//!     ├── config_loading.rs    # Loader against real files
//!     ├── concurrency.rs       # Many threads, one service
//!     └── daemon_runtime.rs    # Runtime wiring and maintenance
//!
//! tests/benches/
//! └── admission_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p relay-tests
//!
//! # By area
//! cargo test -p relay-tests integration::admission_flows
//!
//! # Benchmarks
//! cargo bench -p relay-tests
//! ```

#![allow(dead_code)]

pub mod integration;
