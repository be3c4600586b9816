//! Load-balanced writer pool and its RAII checkout guard.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use serde::Deserialize;

use super::shard::{LoadTracker, WriterShard};
use crate::writer::NetWriter;
use crate::{DEFAULT_POOL_PREWARM, DEFAULT_SHARDS, DEFAULT_WRITER_CAPACITY};

/// Pool construction parameters.
///
/// Loaded once at startup (see the config layer in `emberlink_net`) and
/// never changed afterward.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of independent shards.
    pub shards: usize,
    /// Writers constructed up front, spread round-robin across shards.
    pub prewarm: usize,
    /// Initial byte capacity of each writer.
    pub writer_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            shards: DEFAULT_SHARDS,
            prewarm: DEFAULT_POOL_PREWARM,
            writer_capacity: DEFAULT_WRITER_CAPACITY,
        }
    }
}

impl PoolConfig {
    /// Validates the configuration.
    ///
    /// # Panics
    ///
    /// Panics on a zero shard count or zero writer capacity.
    /// Misconfiguring the pool is fatal at startup, not a recoverable
    /// runtime error.
    pub fn validate(&self) {
        assert!(self.shards > 0, "Pool must have at least one shard");
        assert!(
            self.writer_capacity > 0,
            "Writer capacity must be greater than zero"
        );
    }
}

/// Sharded pool of reusable writers.
///
/// Hand-out and return are bounded-time and never fail: the worst case on
/// acquisition is constructing a fresh writer. The pool retains no
/// ownership of a writer while it is checked out.
///
/// ## Usage
///
/// ```rust,ignore
/// let pool = WriterPool::new(PoolConfig::default());
///
/// let mut writer = pool.acquire();
/// writer.write_u16(0x0A0B);
/// transport.send_raw(conn, writer.as_slice(), channel);
/// // guard drops here; the writer rejoins the least-loaded shard
/// ```
pub struct WriterPool {
    /// The shards. Fixed at construction.
    shards: Box<[WriterShard]>,
    /// Advisory least-loaded-shard hint.
    tracker: LoadTracker,
    /// Writers constructed over the pool's lifetime (prewarm included).
    created: AtomicU64,
    /// Byte capacity for newly constructed writers.
    writer_capacity: usize,
}

impl WriterPool {
    /// Creates a pool and prewarms it.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails validation.
    #[must_use]
    pub fn new(config: PoolConfig) -> Arc<Self> {
        config.validate();

        let mut created = 0u64;
        let shards: Vec<WriterShard> = (0..config.shards)
            .map(|index| {
                let count = config.prewarm / config.shards
                    + usize::from(index < config.prewarm % config.shards);
                created += count as u64;
                let writers = (0..count)
                    .map(|_| NetWriter::with_capacity(config.writer_capacity))
                    .collect();
                WriterShard::with_writers(writers)
            })
            .collect();
        let initial = shards[0].available();

        tracing::debug!(
            shards = config.shards,
            prewarm = config.prewarm,
            writer_capacity = config.writer_capacity,
            "writer pool ready"
        );

        Arc::new(Self {
            shards: shards.into_boxed_slice(),
            tracker: LoadTracker::new(initial),
            created: AtomicU64::new(created),
            writer_capacity: config.writer_capacity,
        })
    }

    /// Checks a writer out of the pool.
    ///
    /// Never fails. The returned guard dereferences to a reset writer whose
    /// cursor is at zero regardless of its history.
    #[must_use]
    pub fn acquire(&self) -> PooledWriter<'_> {
        let writer = self.take_writer();
        PooledWriter {
            pool: self,
            writer: Some(writer),
            acquired_by: thread::current().id(),
        }
    }

    /// Takes an idle writer, or constructs one when every bag is empty.
    fn take_writer(&self) -> NetWriter {
        // Fast pass: skip shards that are contended or empty.
        for (index, shard) in self.shards.iter().enumerate() {
            if let Some(mut bag) = shard.bag.try_lock() {
                if let Some(writer) = self.pop_locked(index, shard, &mut bag) {
                    return writer;
                }
            }
        }
        // Slow pass: wait on each bag in turn before giving up on reuse.
        // A writer that exists somewhere cannot migrate between shards
        // while checked out, so this sweep finds it.
        for (index, shard) in self.shards.iter().enumerate() {
            let mut bag = shard.bag.lock();
            if let Some(writer) = self.pop_locked(index, shard, &mut bag) {
                return writer;
            }
        }
        // Every bag was empty: construct a fresh writer.
        self.created.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("writer pool empty, constructing a new writer");
        NetWriter::with_capacity(self.writer_capacity)
    }

    /// Pops from a locked bag, publishing the new count before unlock.
    fn pop_locked(
        &self,
        index: usize,
        shard: &WriterShard,
        bag: &mut Vec<NetWriter>,
    ) -> Option<NetWriter> {
        let mut writer = bag.pop()?;
        let remaining = bag.len();
        shard.record_available(remaining);
        self.tracker.observe(index, remaining);
        writer.reset();
        Some(writer)
    }

    /// Deposits a writer into the least-loaded shard.
    ///
    /// Cross-shard return is intentional: steering returns at the emptiest
    /// shard keeps all of them populated. The deposit locks a live shard
    /// unconditionally, so a return is never lost even when the hint moved
    /// mid-operation.
    fn release_writer(&self, writer: NetWriter) {
        let index = self.tracker.target().min(self.shards.len() - 1);
        let shard = &self.shards[index];
        let mut bag = shard.bag.lock();
        bag.push(writer);
        let count = bag.len();
        shard.record_available(count);
        self.tracker.observe(index, count);
    }

    /// Writers constructed over the pool's lifetime, prewarm included.
    #[must_use]
    pub fn writers_created(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    /// Sum of last-observed idle counts across shards.
    ///
    /// Exact when the pool is quiescent, approximate under churn.
    #[must_use]
    pub fn idle_writers(&self) -> usize {
        self.shards.iter().map(WriterShard::available).sum()
    }

    /// Number of shards.
    #[must_use]
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}

/// RAII checkout of a pooled writer.
///
/// Dereferences to [`NetWriter`]. Dropping the guard returns the writer to
/// the pool; because acquisition moves the writer out of its bag and the
/// guard is the only path back in, the same writer can never be held by two
/// callers or returned twice.
pub struct PooledWriter<'a> {
    pool: &'a WriterPool,
    writer: Option<NetWriter>,
    acquired_by: ThreadId,
}

impl PooledWriter<'_> {
    /// Thread that checked this writer out. Diagnostic metadata only; a
    /// writer may legally be released from any thread.
    #[must_use]
    pub fn acquired_by(&self) -> ThreadId {
        self.acquired_by
    }
}

impl Deref for PooledWriter<'_> {
    type Target = NetWriter;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.writer.as_ref().expect("writer present until drop")
    }
}

impl DerefMut for PooledWriter<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.writer.as_mut().expect("writer present until drop")
    }
}

impl Drop for PooledWriter<'_> {
    fn drop(&mut self) {
        if thread::current().id() != self.acquired_by {
            tracing::trace!("writer released on a different thread than it was acquired");
        }
        if let Some(writer) = self.writer.take() {
            self.pool.release_writer(writer);
        }
    }
}
