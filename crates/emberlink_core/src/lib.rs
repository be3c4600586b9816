//! # EMBERLINK Core
//!
//! Allocation-frugal building blocks for a real-time replication layer:
//!
//! - **Writers**: growable, cursor-based byte accumulators for outgoing
//!   messages ([`writer::NetWriter`])
//! - **Writer pool**: sharded, load-balanced reuse of writers so the send
//!   path stops paying for per-message heap churn ([`pool::WriterPool`])
//! - **Dirty tracking**: a dense, order-indifferent set of entities with
//!   pending state per connection ([`dirty::DirtySet`])
//!
//! ## Architecture Rules
//!
//! 1. **No steady-state allocations** - writers and dirty slots are reused,
//!    growth is rare and front-loaded
//! 2. **Contention is routed around** - the pool steers traffic across
//!    shards instead of serializing on one lock
//! 3. **Ownership is the safety net** - a checked-out writer is reachable
//!    only through its guard, so double-release cannot be expressed
//!
//! ## Example
//!
//! ```rust,ignore
//! use emberlink_core::{PoolConfig, WriterPool};
//!
//! let pool = WriterPool::new(PoolConfig::default());
//! let mut writer = pool.acquire();
//! writer.write_u32(0xDEAD_BEEF);
//! // writer returns to the pool here
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod dirty;
pub mod entity;
pub mod pool;
pub mod writer;

pub use dirty::DirtySet;
pub use entity::NetId;
pub use pool::{PoolConfig, PooledWriter, WriterPool};
pub use writer::NetWriter;

/// Default initial byte capacity of a writer.
///
/// Sized to one conservative-MTU packet so a typical message never grows
/// its backing storage.
pub const DEFAULT_WRITER_CAPACITY: usize = 1200;

/// Default number of independent pool shards.
pub const DEFAULT_SHARDS: usize = 3;

/// Writers constructed up front by a default pool.
///
/// 1000 writers * 1200 bytes is around 1.2 MB, paid once at startup so the
/// first ticks never allocate.
pub const DEFAULT_POOL_PREWARM: usize = 1000;

/// Fixed step the dirty set grows by once its dense array fills.
pub const DIRTY_GROWTH_STEP: usize = 1000;

/// Default dirty-set capacity for a new connection.
pub const DEFAULT_DIRTY_CAPACITY: usize = 10_000;
