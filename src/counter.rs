// Concurrent counter table.
//
// The only shared mutable state in the engine. Increments are per-key atomic
// fetch-and-adds behind a sharded map, so arbitrarily many capture workers
// can count concurrently without a whole-table lock. Readers get
// approximately-consistent snapshots; counting is observational, not
// transactional, so snapshot reads are not linearizable with increments.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::Serialize;

/// Aggregation key for one counted frame.
///
/// Fixed-size and cheap to hash; which variant gets produced is chosen by
/// the configured [`KeyDimension`](crate::config::KeyDimension).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKey {
    /// Process id of the context the frame was captured in.
    Pid(u32),
    /// Declared TCP payload length of the frame.
    PayloadLength(u16),
}

/// Mapping from [`CounterKey`] to a 64-bit count.
///
/// Created empty at session start; entries are only ever added and
/// incremented, and removed only by [`reset`](Self::reset).
#[derive(Debug, Default)]
pub struct CounterTable {
    counts: DashMap<CounterKey, AtomicU64>,
}

impl CounterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically adds 1 to the count for `key`, creating it at zero first
    /// if absent. The fast path takes only a shard read lock.
    pub fn increment(&self, key: CounterKey) {
        if let Some(counter) = self.counts.get(&key) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }
        self.counts
            .entry(key)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current count for `key` (0 if never incremented).
    pub fn get(&self, key: CounterKey) -> u64 {
        self.counts
            .get(&key)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Approximately-consistent snapshot of all counters.
    ///
    /// Safe to call while increments are in flight; each entry is read
    /// atomically but the set of entries is not a single point-in-time view.
    pub fn snapshot(&self) -> Vec<(CounterKey, u64)> {
        self.counts
            .iter()
            .map(|entry| (*entry.key(), entry.value().load(Ordering::Relaxed)))
            .collect()
    }

    /// Removes every entry. The only way entries are ever deleted.
    pub fn reset(&self) {
        self.counts.clear();
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
