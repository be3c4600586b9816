//! # EMBERLINK Net
//!
//! Connection-level replication bookkeeping for a real-time multiplayer
//! server. This crate decides *what* each connection must be told about;
//! the transport underneath and the game simulation above are boundary
//! contracts, not dependencies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        TICK LOOP                            │
//! │                                                             │
//! │  visibility pass ──► Connection::add_to_observing           │
//! │                      Connection::remove_from_observing      │
//! │                            │                                │
//! │                            ▼                                │
//! │                   DirtySet (per connection)                 │
//! │                            │                                │
//! │  serialization  ──► WriterPool::acquire ──► encode          │
//! │                            │                                │
//! │                            ▼                                │
//! │                   Transport::send_raw                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Threading
//!
//! The writer pool is freely shared across worker threads. Every
//! [`Connection`] belongs to exactly one tick loop; its structures carry no
//! locks and must not be mutated from two threads.
//!
//! ## Example
//!
//! ```rust,ignore
//! use emberlink_net::{Connection, ConnectionId, NetConfig};
//!
//! let config = NetConfig::default();
//! let mut conn = Connection::with_dirty_capacity(ConnectionId(1), config.dirty_capacity);
//! conn.add_to_observing(entity, &mut hooks)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod channel;
pub mod config;
pub mod connection;
pub mod error;
pub mod hooks;
pub mod send;

pub use channel::Channel;
pub use config::NetConfig;
pub use connection::{Connection, ConnectionId};
pub use error::{ConfigError, ConnectionError};
pub use hooks::{EntityLifecycle, Transport, VisibilityHooks};
pub use send::send_with_writer;

// Re-exports for convenience
pub use emberlink_core::{DirtySet, NetId, NetWriter, PoolConfig, PooledWriter, WriterPool};
