//! # Ports Layer
//!
//! Trait definitions for the admission core's boundaries.
//!
//! - **Inbound (Driving):** APIs the relay protocol calls into
//! - **Outbound (Driven):** Dependencies the host must provide

pub mod inbound;
pub mod outbound;

pub use inbound::{ConnectionEventHandler, RelayAdmissionApi};
pub use outbound::{RelayTransport, TimeSource};
