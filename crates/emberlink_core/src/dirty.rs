//! # Dirty Entity Set
//!
//! Per-connection set of entities with pending state to replicate.
//!
//! ## Design
//!
//! - A dense array keeps the per-tick sweep cache-friendly
//! - A slot map alongside it makes membership churn O(1) both ways
//! - Removal swaps the last entry into the hole: order is NOT preserved
//! - The dense array grows in fixed steps so a busy connection settles
//!   after a handful of growth events
//!
//! ## Threading
//!
//! One instance per connection, owned by the tick loop that computes that
//! connection's visibility. Nothing in here locks.

use std::collections::HashMap;

use crate::entity::NetId;
use crate::{DEFAULT_DIRTY_CAPACITY, DIRTY_GROWTH_STEP};

/// Dense, unordered set of entities queued for serialization.
///
/// All slots `[0, len)` are populated and mutually distinct. Iteration
/// order changes whenever a non-last member is removed; callers that need
/// to mutate while walking must snapshot first (the borrow checker enforces
/// this for in-place iteration).
pub struct DirtySet {
    /// Dense member storage.
    entries: Vec<NetId>,
    /// Entity -> index into `entries`.
    slots: HashMap<NetId, usize>,
    /// Times the dense array had to grow.
    growth_events: u32,
}

impl DirtySet {
    /// Creates a set with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_DIRTY_CAPACITY)
    }

    /// Creates a set with room for `capacity` members before growing.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            growth_events: 0,
        }
    }

    /// Inserts an entity. Returns false if it was already tracked.
    ///
    /// Double-tracking would replicate the same entity twice per tick, so a
    /// redundant insert is rejected here instead of trusting every caller.
    /// O(1) amortized; when the dense array is full it grows by
    /// [`DIRTY_GROWTH_STEP`] slots.
    pub fn insert(&mut self, id: NetId) -> bool {
        debug_assert!(!id.is_null(), "null entity in dirty set");
        if self.slots.contains_key(&id) {
            return false;
        }
        if self.entries.len() == self.entries.capacity() {
            self.entries.reserve_exact(DIRTY_GROWTH_STEP);
            self.growth_events += 1;
            tracing::debug!(
                members = self.entries.len(),
                step = DIRTY_GROWTH_STEP,
                "dirty set grew"
            );
        }
        self.slots.insert(id, self.entries.len());
        self.entries.push(id);
        true
    }

    /// Removes an entity. Returns false if it was not a member.
    ///
    /// The freed slot is filled by the last member, so removal never shifts
    /// the array. Removing a non-member (or from an empty set) is a no-op.
    pub fn remove(&mut self, id: NetId) -> bool {
        let Some(index) = self.slots.remove(&id) else {
            return false;
        };
        self.entries.swap_remove(index);
        // If anything moved into the hole, point its slot at the new index.
        if let Some(&moved) = self.entries.get(index) {
            self.slots.insert(moved, index);
        }
        true
    }

    /// Returns true if the entity is currently tracked.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NetId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Returns the number of tracked entities.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is tracked.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the dense array capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Returns how many times the dense array has grown.
    #[inline]
    #[must_use]
    pub const fn growth_events(&self) -> u32 {
        self.growth_events
    }

    /// Iterates over tracked entities in slot order.
    ///
    /// Restartable and lazy. Membership must not change while the iterator
    /// is alive; snapshot into a `Vec` first when the walk has side effects.
    pub fn iter(&self) -> impl Iterator<Item = NetId> + '_ {
        self.entries.iter().copied()
    }

    /// Empties the set, keeping its capacity.
    ///
    /// Used at connection teardown; members are not notified.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.slots.clear();
    }
}

impl Default for DirtySet {
    fn default() -> Self {
        Self::new()
    }
}
