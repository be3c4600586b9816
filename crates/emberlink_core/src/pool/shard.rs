//! Shard internals: idle-writer bags and the advisory load tracker.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::writer::NetWriter;

/// One independently guarded partition of the pool.
pub(crate) struct WriterShard {
    /// Idle writers. Unbounded; the pool grows but never shrinks.
    pub(crate) bag: Mutex<Vec<NetWriter>>,
    /// Last-observed idle count. May lag the bag; advisory only.
    available: AtomicUsize,
}

impl WriterShard {
    /// Creates a shard seeded with prewarmed writers.
    pub(crate) fn with_writers(writers: Vec<NetWriter>) -> Self {
        let available = AtomicUsize::new(writers.len());
        Self {
            bag: Mutex::new(writers),
            available,
        }
    }

    /// Publishes the idle count. Call while still holding the bag lock so
    /// the final store after a burst reflects the final bag length.
    pub(crate) fn record_available(&self, count: usize) {
        self.available.store(count, Ordering::Relaxed);
    }

    /// Last-observed idle count.
    pub(crate) fn available(&self) -> usize {
        self.available.load(Ordering::Relaxed)
    }
}

/// Tracks which shard was last seen holding the fewest idle writers.
///
/// Updated opportunistically on every take and return. Loads and stores are
/// `Relaxed` and unordered across shards; a stale winner only misroutes the
/// next return, it never loses one.
pub(crate) struct LoadTracker {
    best_shard: AtomicUsize,
    best_count: AtomicUsize,
}

impl LoadTracker {
    /// Starts the tracker pointed at shard 0 with its initial count.
    pub(crate) fn new(initial_count: usize) -> Self {
        Self {
            best_shard: AtomicUsize::new(0),
            best_count: AtomicUsize::new(initial_count),
        }
    }

    /// Feeds one shard's fresh idle count into the tracker.
    pub(crate) fn observe(&self, shard: usize, count: usize) {
        if self.best_shard.load(Ordering::Relaxed) == shard {
            // Keep the current winner's count honest even when it rises,
            // otherwise it wins forever on an outdated minimum.
            self.best_count.store(count, Ordering::Relaxed);
        } else if count < self.best_count.load(Ordering::Relaxed) {
            self.best_shard.store(shard, Ordering::Relaxed);
            self.best_count.store(count, Ordering::Relaxed);
        }
    }

    /// Shard that should receive the next returned writer.
    pub(crate) fn target(&self) -> usize {
        self.best_shard.load(Ordering::Relaxed)
    }
}
