//! # Entity Identity
//!
//! Entities are plain identifiers. All state lives in the registries.

/// Unique identifier for an entity.
///
/// Ids are handed out in increasing order, so comparing two ids tells which
/// entity was spawned first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Wraps a raw id value.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid entity ID.
    pub const NULL: Self = Self(u64::MAX);

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out entity ids.
///
/// One allocator per engine. Ids start at 1 and are never recycled, so two
/// engines fed the same inputs assign the same ids.
#[derive(Clone, Debug)]
pub struct EntityAllocator {
    next: u64,
}

impl EntityAllocator {
    /// Creates an allocator whose first id is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocates the next id.
    #[inline]
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    #[inline]
    #[must_use]
    pub const fn allocated(&self) -> u64 {
        self.next - 1
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_monotonic() {
        let mut ids = EntityAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_eq!(a.raw(), 1);
        assert!(b > a);
        assert_eq!(ids.allocated(), 2);
    }

    #[test]
    fn test_null_id() {
        assert!(EntityId::NULL.is_null());
        assert!(EntityId::default().is_null());
        assert!(!EntityId::from_raw(7).is_null());
    }
}
