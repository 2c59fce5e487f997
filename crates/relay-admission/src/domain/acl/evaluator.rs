//! ACL evaluator implementation.

use std::collections::HashSet;
use std::net::IpAddr;

use crate::domain::{PeerId, Subnet};

/// Typed allow lists, parsed once at configuration load.
///
/// Evaluation is a pure predicate and never blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AclEvaluator {
    allow_peers: HashSet<PeerId>,
    allow_subnets: Vec<Subnet>,
}

impl AclEvaluator {
    /// Build an evaluator from already-validated rules.
    pub fn new(
        peers: impl IntoIterator<Item = PeerId>,
        subnets: impl IntoIterator<Item = Subnet>,
    ) -> Self {
        let mut allow_subnets: Vec<Subnet> = Vec::new();
        for subnet in subnets {
            if !allow_subnets.contains(&subnet) {
                allow_subnets.push(subnet);
            }
        }
        Self {
            allow_peers: peers.into_iter().collect(),
            allow_subnets,
        }
    }

    /// An evaluator with no rules, which allows everyone.
    pub fn open() -> Self {
        Self::default()
    }

    /// Whether no rules are configured.
    pub fn is_open(&self) -> bool {
        self.allow_peers.is_empty() && self.allow_subnets.is_empty()
    }

    /// Decide whether `peer` connecting from `addr` may use the relay.
    pub fn allow(&self, peer: &PeerId, addr: IpAddr) -> bool {
        let peer_ok = self.allow_peers.is_empty() || self.allow_peers.contains(peer);
        let addr_ok = self.allow_subnets.is_empty()
            || self.allow_subnets.iter().any(|subnet| subnet.contains(addr));
        peer_ok && addr_ok
    }

    pub fn peer_rule_count(&self) -> usize {
        self.allow_peers.len()
    }

    pub fn subnet_rule_count(&self) -> usize {
        self.allow_subnets.len()
    }
}
