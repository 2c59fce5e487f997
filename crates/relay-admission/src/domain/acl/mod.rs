//! # Access Control
//!
//! Decides whether a peer may use the relay at all, before any resource is
//! touched.
//!
//! ## Policy
//!
//! - Both allow lists empty: every peer is allowed (default-open).
//! - `AllowPeers` non-empty: the peer id must be listed.
//! - `AllowSubnets` non-empty: the remote address must fall in a listed subnet.
//! - Both non-empty: both conditions must hold.

mod evaluator;

pub use evaluator::AclEvaluator;
