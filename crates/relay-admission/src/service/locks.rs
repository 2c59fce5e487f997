//! Per-peer serialization of admission decisions.
//!
//! Entries are created on first use and dropped as soon as no request holds
//! or waits on them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{ArcMutexGuard, Mutex, RawMutex};

use crate::domain::PeerId;

#[derive(Debug, Default)]
pub(crate) struct PeerLocks {
    table: Mutex<HashMap<PeerId, Arc<Mutex<()>>>>,
}

impl PeerLocks {
    /// Block until no other request for `peer` is in flight.
    pub fn acquire(&self, peer: &PeerId) -> PeerGuard<'_> {
        let slot = {
            let mut table = self.table.lock();
            Arc::clone(table.entry(peer.clone()).or_default())
        };
        let guard = slot.lock_arc();
        PeerGuard {
            locks: self,
            peer: peer.clone(),
            guard: Some(guard),
        }
    }

    /// Number of peers with a live lock entry.
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }
}

/// Held while a request for one peer is between ledger check and commit.
pub(crate) struct PeerGuard<'a> {
    locks: &'a PeerLocks,
    peer: PeerId,
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
}

impl Drop for PeerGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so our own Arc no longer counts
        drop(self.guard.take());

        let mut table = self.locks.table.lock();
        if let Some(slot) = table.get(&self.peer) {
            if Arc::strong_count(slot) == 1 {
                table.remove(&self.peer);
            }
        }
    }
}
