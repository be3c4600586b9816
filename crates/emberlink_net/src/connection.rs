//! # Connection Replication State
//!
//! Per-connection bookkeeping: which entities the connection can see,
//! which it owns, and which have pending state to send this tick.
//!
//! ## Design
//!
//! Each (connection, entity) pair is in one of two states, `Unobserved` or
//! `Observed`. Transitions fire their side effects exactly once:
//!
//! - `Unobserved -> Observed`: track in the observing set, queue in the
//!   dirty set, then tell the game to show the entity
//! - `Observed -> Unobserved`: untrack, unqueue, then tell the game to
//!   hide it - unless the entity was destroyed globally, in which case a
//!   per-connection hide is meaningless and skipped
//!
//! ## Threading
//!
//! A `Connection` belongs to the tick loop that computes its visibility.
//! Nothing in here locks; mutating one connection from two threads is a
//! caller error and is not defended against.

use std::collections::HashSet;

use emberlink_core::{DirtySet, NetId};

use crate::error::ConnectionError;
use crate::hooks::{EntityLifecycle, VisibilityHooks};

/// Unique identifier for a client connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u32);

impl ConnectionId {
    /// Invalid/null connection ID.
    pub const NULL: Self = Self(u32::MAX);

    /// Returns true if this is a null/invalid ID.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::NULL
    }
}

/// Replication state for one client connection.
///
/// Created on transport-level connect, torn down with
/// [`Connection::tear_down`] on disconnect.
pub struct Connection {
    /// Connection ID.
    id: ConnectionId,
    /// Entities this connection can currently see.
    observing: HashSet<NetId>,
    /// Entities whose authority belongs to this connection.
    owned: HashSet<NetId>,
    /// Entities with pending state to send to this connection.
    dirty: DirtySet,
}

impl Connection {
    /// Creates connection state with the default dirty-set capacity.
    #[must_use]
    pub fn new(id: ConnectionId) -> Self {
        Self {
            id,
            observing: HashSet::new(),
            owned: HashSet::new(),
            dirty: DirtySet::new(),
        }
    }

    /// Creates connection state with an explicit dirty-set capacity.
    #[must_use]
    pub fn with_dirty_capacity(id: ConnectionId, dirty_capacity: usize) -> Self {
        Self {
            id,
            observing: HashSet::new(),
            owned: HashSet::new(),
            dirty: DirtySet::with_capacity(dirty_capacity),
        }
    }

    /// Connection ID.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Transitions an entity to `Observed`.
    ///
    /// Tracks it, queues it for serialization, then invokes the show hook.
    /// An entity that is already observed stays observed and fires nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::NullEntity`] for a null entity; a spawn
    /// directed at nothing is unrecoverable downstream.
    pub fn add_to_observing<H: VisibilityHooks>(
        &mut self,
        entity: NetId,
        hooks: &mut H,
    ) -> Result<(), ConnectionError> {
        ensure_entity(entity, "add_to_observing")?;
        if !self.observing.insert(entity) {
            // No transition, no effects
            return Ok(());
        }
        self.dirty.insert(entity);
        hooks.show(entity, self.id);
        tracing::trace!(
            connection = self.id.0,
            entity = entity.raw(),
            "entity now observed"
        );
        Ok(())
    }

    /// Transitions an entity to `Unobserved`.
    ///
    /// Untracks it and removes any queued state. The hide hook fires only
    /// when the entity still exists (`is_destroyed == false`); hiding a
    /// globally destroyed entity from one connection is meaningless.
    /// Removing an entity that was never observed is a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::NullEntity`] for a null entity.
    pub fn remove_from_observing<H: VisibilityHooks>(
        &mut self,
        entity: NetId,
        is_destroyed: bool,
        hooks: &mut H,
    ) -> Result<(), ConnectionError> {
        ensure_entity(entity, "remove_from_observing")?;
        if !self.observing.remove(&entity) {
            return Ok(());
        }
        self.dirty.remove(entity);
        if !is_destroyed {
            hooks.hide(entity, self.id);
        }
        tracing::trace!(
            connection = self.id.0,
            entity = entity.raw(),
            is_destroyed,
            "entity no longer observed"
        );
        Ok(())
    }

    /// Bulk-removes every observed entity.
    ///
    /// Each entity's own observer bookkeeping is notified and its queued
    /// state dropped; the observing set is then left empty. No hide hooks
    /// fire - this path runs when the connection itself is going away.
    pub fn remove_all_observing<H: VisibilityHooks>(&mut self, hooks: &mut H) {
        for entity in self.observing.drain() {
            hooks.forget_observer(entity, self.id);
            self.dirty.remove(entity);
        }
    }

    /// Returns true if the connection currently observes `entity`.
    #[inline]
    #[must_use]
    pub fn observes(&self, entity: NetId) -> bool {
        self.observing.contains(&entity)
    }

    /// Number of currently observed entities.
    #[inline]
    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.observing.len()
    }

    /// Queues an entity's state for serialization to this connection.
    ///
    /// Returns false if it was already queued; the dirty set never tracks
    /// an entity twice.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::NullEntity`] for a null entity.
    pub fn mark_dirty(&mut self, entity: NetId) -> Result<bool, ConnectionError> {
        ensure_entity(entity, "mark_dirty")?;
        Ok(self.dirty.insert(entity))
    }

    /// Drops an entity's queued state. No-op when nothing was queued.
    pub fn clear_dirty(&mut self, entity: NetId) -> bool {
        self.dirty.remove(entity)
    }

    /// The dirty set, for the serialization sweep.
    #[inline]
    #[must_use]
    pub const fn dirty(&self) -> &DirtySet {
        &self.dirty
    }

    /// Snapshot of the dirty set.
    ///
    /// For sweeps whose side effects mutate membership mid-walk.
    #[must_use]
    pub fn dirty_snapshot(&self) -> Vec<NetId> {
        self.dirty.iter().collect()
    }

    /// Grants this connection authority over an entity.
    ///
    /// Membership only; ownership implies nothing about observation.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::NullEntity`] for a null entity.
    pub fn add_owned_object(&mut self, entity: NetId) -> Result<(), ConnectionError> {
        ensure_entity(entity, "add_owned_object")?;
        self.owned.insert(entity);
        Ok(())
    }

    /// Revokes this connection's authority over an entity. Silent no-op
    /// when the entity was not owned.
    pub fn remove_owned_object(&mut self, entity: NetId) {
        self.owned.remove(&entity);
    }

    /// Returns true if this connection has authority over `entity`.
    #[inline]
    #[must_use]
    pub fn owns(&self, entity: NetId) -> bool {
        self.owned.contains(&entity)
    }

    /// Number of owned entities.
    #[inline]
    #[must_use]
    pub fn owned_count(&self) -> usize {
        self.owned.len()
    }

    /// Destroys every owned entity and empties the owned set.
    ///
    /// Walks a snapshot: destruction side effects are allowed to mutate
    /// the owned set (despawning a pet may release its mount, and so on).
    /// Each non-null member is destroyed exactly once.
    pub fn destroy_owned_objects<L: EntityLifecycle>(&mut self, lifecycle: &mut L) {
        let snapshot: Vec<NetId> = self.owned.iter().copied().collect();
        for entity in snapshot {
            if !entity.is_null() {
                lifecycle.destroy(entity);
            }
        }
        self.owned.clear();
    }

    /// Tears the connection down on disconnect.
    ///
    /// Owned entities are destroyed (an authoritative side effect), the
    /// observing set is bulk-removed, and queued state is dropped without
    /// notifying the now-gone entities.
    pub fn tear_down<H: VisibilityHooks, L: EntityLifecycle>(
        &mut self,
        hooks: &mut H,
        lifecycle: &mut L,
    ) {
        tracing::debug!(
            connection = self.id.0,
            observed = self.observing.len(),
            owned = self.owned.len(),
            "tearing down connection state"
        );
        self.destroy_owned_objects(lifecycle);
        self.remove_all_observing(hooks);
        self.dirty.clear();
    }
}

fn ensure_entity(entity: NetId, operation: &'static str) -> Result<(), ConnectionError> {
    if entity.is_null() {
        return Err(ConnectionError::NullEntity { operation });
    }
    Ok(())
}
