//! # Network Identity
//!
//! Replicated objects are referred to by a stable numeric identity. The
//! replication layer only ever compares and hashes these; it never orders
//! them or dereferences them.

/// Stable identity of a replicated entity.
///
/// Assigned by the spawning side and never reused within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NetId(u64);

impl NetId {
    /// Null/invalid entity identity.
    pub const NULL: Self = Self(u64::MAX);

    /// Creates an identity from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identity value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns true if this is the null/invalid identity.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for NetId {
    fn default() -> Self {
        Self::NULL
    }
}
