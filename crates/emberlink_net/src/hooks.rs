//! # Boundary Contracts
//!
//! The replication layer drives these traits; the game/server layer
//! implements them. Keeping them as seams means the bookkeeping in this
//! crate is testable without a running simulation or a live socket.

use emberlink_core::NetId;

use crate::channel::Channel;
use crate::connection::ConnectionId;

/// Visibility side effects driven by observer transitions.
///
/// [`crate::Connection`] guarantees one call per state transition.
/// Implementations should tolerate a redundant call rather than crash;
/// they must not assume the call count is exact across reconnects.
pub trait VisibilityHooks {
    /// Spawn or reveal `entity` for `connection`.
    fn show(&mut self, entity: NetId, connection: ConnectionId);

    /// Hide `entity` from `connection`. The entity still exists elsewhere;
    /// this is a per-connection visibility change only.
    fn hide(&mut self, entity: NetId, connection: ConnectionId);

    /// Drop `connection` from the entity's own observer bookkeeping.
    ///
    /// Invoked during bulk teardown instead of [`VisibilityHooks::hide`]:
    /// the connection is going away, so no per-connection despawn message
    /// is meaningful.
    fn forget_observer(&mut self, entity: NetId, connection: ConnectionId);
}

/// Authoritative entity destruction.
pub trait EntityLifecycle {
    /// Destroy `entity` globally. Invoked once per owned entity when its
    /// connection is torn down.
    fn destroy(&mut self, entity: NetId);
}

/// Finalized-bytes hand-off to the wire.
pub trait Transport {
    /// Send `payload` to `connection` on `channel`.
    ///
    /// `payload` is only valid for the duration of the call; transports
    /// that queue must copy.
    fn send_raw(&mut self, connection: ConnectionId, payload: &[u8], channel: Channel);
}
