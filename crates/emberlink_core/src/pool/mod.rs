//! # Writer Pool
//!
//! Sharded, load-balanced pool of reusable [`crate::writer::NetWriter`]s.
//!
//! ## Design
//!
//! - N independent shards, each a guarded bag of idle writers
//! - Acquisition sweeps the shards without blocking first and only
//!   constructs a new writer when every bag is empty
//! - Returns steer toward the shard last seen with the fewest idle writers,
//!   which keeps every shard populated instead of letting one hoard
//! - Checked-out writers travel inside an RAII guard; dropping the guard is
//!   the only way back into the pool, so a writer can never be returned
//!   twice or end up reachable from two callers
//!
//! ## Threading
//!
//! Any number of threads may acquire and release concurrently. The
//! least-loaded-shard hint is advisory and intentionally racy; a stale hint
//! misroutes a return to a busier shard but never loses it.

mod shard;
mod sharded;

pub use sharded::{PoolConfig, PooledWriter, WriterPool};
