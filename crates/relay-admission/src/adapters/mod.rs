//! # Adapters
//!
//! Default implementations of the driven ports.
//!
//! - [`SystemTimeSource`]: monotonic clock anchored at construction
//! - [`NoOpTransport`]: discards close and teardown requests

pub mod time;
pub mod transport;

pub use time::SystemTimeSource;
pub use transport::NoOpTransport;
