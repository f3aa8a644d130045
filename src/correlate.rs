// Entry/return call correlation.
//
// A capture source that observes a kernel function at entry and return as two
// separate events needs to carry the entry argument over to the return event
// for the same thread. This map stores tid -> saved argument between the two
// events. Returns that never fire would leak entries in an unbounded map, so
// the map carries a hard capacity cap plus a TTL sweep; losing a stale entry
// only drops one correlation, it is never a correctness problem.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

/// Default capacity cap: one entry per in-flight thread is the expected
/// population, so a few thousand covers even busy hosts.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Default entry TTL for the sweep.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
struct SavedArg {
    value: u64,
    inserted_at: Instant,
    /// Insertion order; breaks Instant ties when picking the stalest entry.
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: FxHashMap<u64, SavedArg>,
    next_seq: u64,
}

/// Bounded tid -> saved-argument map with TTL eviction.
#[derive(Debug)]
pub struct CorrelationMap {
    inner: Mutex<Inner>,
    capacity: usize,
    ttl: Duration,
}

impl CorrelationMap {
    /// Creates a map holding at most `capacity` entries (minimum 1), with
    /// entries older than `ttl` eligible for [`sweep`](Self::sweep).
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// Saves `arg` for `tid` at function entry.
    ///
    /// At capacity, the stalest entry is evicted first; an existing entry for
    /// the same tid is overwritten (a new entry event for a tid supersedes an
    /// unmatched older one).
    pub fn record_entry(&self, tid: u64, arg: u64) {
        let mut inner = self.lock();
        if !inner.entries.contains_key(&tid) && inner.entries.len() >= self.capacity {
            let stalest = inner
                .entries
                .iter()
                .min_by_key(|(_, saved)| saved.seq)
                .map(|(&tid, _)| tid);
            if let Some(stalest) = stalest {
                inner.entries.remove(&stalest);
                log::debug!("correlation map full, evicted tid {stalest}");
            }
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(
            tid,
            SavedArg {
                value: arg,
                inserted_at: Instant::now(),
                seq,
            },
        );
    }

    /// Consumes and returns the saved argument for `tid` at function return.
    pub fn take(&self, tid: u64) -> Option<u64> {
        self.lock().entries.remove(&tid).map(|saved| saved.value)
    }

    /// Returns the saved argument without consuming it.
    pub fn peek(&self, tid: u64) -> Option<u64> {
        self.lock().entries.get(&tid).map(|saved| saved.value)
    }

    /// Drops entries older than the TTL and returns how many were evicted.
    ///
    /// Callable from any maintenance point (timer tick, reporting pass).
    pub fn sweep(&self) -> usize {
        let mut inner = self.lock();
        let before = inner.entries.len();
        let ttl = self.ttl;
        inner.entries.retain(|_, saved| saved.inserted_at.elapsed() < ttl);
        let evicted = before - inner.entries.len();
        if evicted > 0 {
            log::debug!("correlation sweep evicted {evicted} stale entries");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means another thread panicked mid-update;
        // the map contents are still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for CorrelationMap {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}
