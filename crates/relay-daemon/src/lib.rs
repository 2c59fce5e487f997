//! # Relay Daemon
//!
//! Process-level wiring around the admission core.
//!
//! ## Modular Structure
//!
//! - `cli` - Command line arguments
//! - `runtime` - Service construction and the maintenance loop
//! - `telemetry` - Publishing admission stats as metrics
//! - `transport` - Transport adapter that logs close and teardown requests
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry from the environment
//! 2. Load and validate the configuration file
//! 3. Build the admission service (if relay v2 is enabled)
//! 4. Start the maintenance loop (sweep, trim, metrics)
//! 5. Wait for Ctrl-C, then stop the loop

pub mod cli;
pub mod runtime;
pub mod telemetry;
pub mod transport;

pub use cli::Args;
pub use runtime::{maintenance_tick, DaemonRuntime};
pub use transport::LoggingTransport;
