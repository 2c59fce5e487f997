//! Resource ledger implementation.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;

use tracing::warn;

use super::config::ResourceLimits;
use super::types::{LedgerStats, PeerEntry, Usage};
use crate::domain::{
    LedgerError, LimitScope, PeerId, ReserveError, ResourceKind, Timestamp, Token, TokenId,
};

/// Tracks relay consumption per peer and globally against [`ResourceLimits`].
///
/// Every mutation goes through [`try_reserve`](Self::try_reserve) or
/// [`release`](Self::release). A failed reservation leaves no trace.
#[derive(Debug)]
pub struct ResourceLedger {
    limits: ResourceLimits,
    peers: HashMap<PeerId, PeerEntry>,
    ip_reservations: HashMap<IpAddr, u64>,
    totals: Usage,
    outstanding: HashMap<TokenId, Token>,
    next_token: u64,
}

impl ResourceLedger {
    pub fn new(limits: ResourceLimits) -> Self {
        Self {
            limits,
            peers: HashMap::new(),
            ip_reservations: HashMap::new(),
            totals: Usage::default(),
            outstanding: HashMap::new(),
            next_token: 1,
        }
    }

    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Reserve `amount` units of `kind` for `peer`.
    pub fn try_reserve(
        &mut self,
        peer: &PeerId,
        kind: ResourceKind,
        amount: u64,
        now: Timestamp,
    ) -> Result<Token, ReserveError> {
        self.try_reserve_from(peer, None, kind, amount, now)
    }

    /// Reserve `amount` units of `kind` for `peer`, also charging
    /// reservations against the per-IP cap when `ip` is known.
    pub fn try_reserve_from(
        &mut self,
        peer: &PeerId,
        ip: Option<IpAddr>,
        kind: ResourceKind,
        amount: u64,
        now: Timestamp,
    ) -> Result<Token, ReserveError> {
        if amount == 0 {
            return Err(ReserveError::ZeroAmount(kind));
        }

        let peer_usage = self
            .peers
            .get(peer)
            .map(|entry| entry.usage)
            .unwrap_or_default();
        self.check_capacity(peer_usage, ip, kind, amount)
            .map_err(ReserveError::Exhausted)?;

        // Checks passed: commit to every counter
        let entry = self
            .peers
            .entry(peer.clone())
            .or_insert_with(|| PeerEntry::new(now));
        *entry.usage.get_mut(kind) += amount;
        entry.last_active = now;
        *self.totals.get_mut(kind) += amount;

        let charged_ip = match (kind, ip) {
            (ResourceKind::Reservation, Some(ip)) => {
                *self.ip_reservations.entry(ip).or_insert(0) += amount;
                Some(ip)
            }
            _ => None,
        };

        let id = TokenId(self.next_token);
        self.next_token += 1;
        let token = Token::new(id, peer.clone(), kind, amount, charged_ip);
        self.outstanding.insert(id, token.clone());
        Ok(token)
    }

    fn check_capacity(
        &self,
        peer_usage: Usage,
        ip: Option<IpAddr>,
        kind: ResourceKind,
        amount: u64,
    ) -> Result<(), LimitScope> {
        let limits = &self.limits;
        match kind {
            ResourceKind::Reservation => {
                if exceeds(peer_usage.reservations, amount, limits.max_reservations_per_peer) {
                    return Err(LimitScope::PeerReservations);
                }
                if exceeds(self.totals.reservations, amount, limits.max_reservations) {
                    return Err(LimitScope::GlobalReservations);
                }
                if let Some(ip) = ip {
                    let held = self.ip_reservations.get(&ip).copied().unwrap_or(0);
                    if exceeds(held, amount, limits.max_reservations_per_ip) {
                        return Err(LimitScope::IpReservations);
                    }
                }
            }
            ResourceKind::Circuit => {
                if exceeds(peer_usage.circuits, amount, limits.max_circuits) {
                    return Err(LimitScope::PeerCircuits);
                }
                if exceeds(self.totals.circuits, amount, limits.max_circuits_total) {
                    return Err(LimitScope::GlobalCircuits);
                }
            }
            ResourceKind::Bytes => {
                if amount > limits.buffer_size {
                    return Err(LimitScope::CircuitBuffer);
                }
                if exceeds(peer_usage.bytes, amount, limits.peer_bytes_cap()) {
                    return Err(LimitScope::PeerBytes);
                }
                if exceeds(self.totals.bytes, amount, limits.global_bytes_cap()) {
                    return Err(LimitScope::GlobalBytes);
                }
            }
        }
        Ok(())
    }

    /// Return the capacity held by `token`.
    ///
    /// Releasing a token that is not outstanding changes nothing and
    /// reports [`LedgerError::DoubleRelease`].
    pub fn release(&mut self, token: &Token, now: Timestamp) -> Result<(), LedgerError> {
        let Some(issued) = self.outstanding.remove(&token.id()) else {
            return Err(LedgerError::DoubleRelease(token.id()));
        };

        let kind = issued.kind();
        let amount = issued.amount();

        if let Some(entry) = self.peers.get_mut(issued.peer()) {
            let counter = entry.usage.get_mut(kind);
            debug_assert!(*counter >= amount, "peer counter underflow");
            *counter = counter.saturating_sub(amount);
            entry.last_active = now;
        } else {
            warn!(peer = %issued.peer(), token = %issued.id(), "released token for unknown peer");
        }

        let total = self.totals.get_mut(kind);
        debug_assert!(*total >= amount, "global counter underflow");
        *total = total.saturating_sub(amount);

        if let Some(ip) = issued.ip() {
            if let Some(held) = self.ip_reservations.get_mut(&ip) {
                *held = held.saturating_sub(amount);
                if *held == 0 {
                    self.ip_reservations.remove(&ip);
                }
            }
        }
        Ok(())
    }

    /// Whether `token` is still outstanding.
    pub fn is_outstanding(&self, token: &TokenId) -> bool {
        self.outstanding.contains_key(token)
    }

    /// Current counters for `peer` (zero if it has no entry).
    pub fn peer_usage(&self, peer: &PeerId) -> Usage {
        self.peers
            .get(peer)
            .map(|entry| entry.usage)
            .unwrap_or_default()
    }

    /// Reservations currently charged to `ip`.
    pub fn ip_reservations(&self, ip: IpAddr) -> u64 {
        self.ip_reservations.get(&ip).copied().unwrap_or(0)
    }

    pub fn totals(&self) -> Usage {
        self.totals
    }

    /// Drop entries of peers with all counters at zero that have been idle
    /// for at least `idle_timeout`.
    pub fn gc_idle(&mut self, now: Timestamp, idle_timeout: Duration) -> usize {
        let before = self.peers.len();
        self.peers.retain(|_, entry| {
            !(entry.usage.is_zero() && now.saturating_since(entry.last_active) >= idle_timeout)
        });
        before - self.peers.len()
    }

    /// Check that per-peer counters sum to the global aggregates and that no
    /// counter exceeds its limit.
    pub fn is_consistent(&self) -> bool {
        let mut sum = Usage::default();
        for entry in self.peers.values() {
            let usage = entry.usage;
            if usage.reservations > self.limits.max_reservations_per_peer
                || usage.circuits > self.limits.max_circuits
                || usage.bytes > self.limits.peer_bytes_cap()
            {
                return false;
            }
            sum.reservations += usage.reservations;
            sum.circuits += usage.circuits;
            sum.bytes += usage.bytes;
        }
        let ips_ok = self
            .ip_reservations
            .values()
            .all(|held| *held <= self.limits.max_reservations_per_ip);

        sum == self.totals
            && ips_ok
            && self.totals.reservations <= self.limits.max_reservations
            && self.totals.circuits <= self.limits.max_circuits_total
            && self.totals.bytes <= self.limits.global_bytes_cap()
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            totals: self.totals,
            tracked_peers: self.peers.len(),
            outstanding_tokens: self.outstanding.len(),
        }
    }
}

/// Whether adding `amount` to `current` would go past `limit`.
fn exceeds(current: u64, amount: u64, limit: u64) -> bool {
    current.checked_add(amount).map_or(true, |total| total > limit)
}
