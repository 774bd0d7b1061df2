//! # Entity Registry
//!
//! An ordered collection of live entities of one variant.
//!
//! The registry guarantees:
//! - Iteration in spawn order (ids are allocated monotonically)
//! - O(log n) insert and remove by id
//! - Removing an id that is not present is a no-op
//!
//! Passes that need to remove entities while scanning another registry
//! collect ids first and remove afterwards; the registry never hands out a
//! mutable iterator that can also delete.

use std::collections::BTreeMap;

use drylands_shared::{ChunkCoord, Vec3};

use super::entity::EntityId;

/// One live entity: identity, placement, owner and variant payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Record<T> {
    /// Entity id.
    pub id: EntityId,
    /// World position.
    pub position: Vec3,
    /// Chunk that spawned this entity. `None` for chunk-independent entities.
    pub owner: Option<ChunkCoord>,
    /// Variant-specific data.
    pub payload: T,
}

impl<T> Record<T> {
    /// Creates a new record.
    #[inline]
    #[must_use]
    pub const fn new(id: EntityId, position: Vec3, owner: Option<ChunkCoord>, payload: T) -> Self {
        Self {
            id,
            position,
            owner,
            payload,
        }
    }

    /// Returns true if this record was spawned by `coord`.
    #[inline]
    #[must_use]
    pub fn is_owned_by(&self, coord: ChunkCoord) -> bool {
        self.owner == Some(coord)
    }
}

/// Ordered storage for one entity variant.
///
/// # Example
///
/// ```rust,ignore
/// let mut resources: Registry<()> = Registry::new();
/// resources.insert(Record::new(id, position, Some(coord), ()));
/// assert!(resources.remove(id).is_some());
/// assert!(resources.remove(id).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct Registry<T> {
    records: BTreeMap<EntityId, Record<T>>,
}

impl<T> Registry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Inserts a record, replacing any record with the same id.
    ///
    /// Returns the replaced record, if any.
    pub fn insert(&mut self, record: Record<T>) -> Option<Record<T>> {
        self.records.insert(record.id, record)
    }

    /// Removes a record by id.
    pub fn remove(&mut self, id: EntityId) -> Option<Record<T>> {
        self.records.remove(&id)
    }

    /// Removes every record in `ids` that is present, returning them in
    /// the order of `ids`.
    pub fn remove_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a EntityId>) -> Vec<Record<T>> {
        ids.into_iter().filter_map(|id| self.records.remove(id)).collect()
    }

    /// Removes every record owned by `coord`.
    ///
    /// Linear in the registry size. Callers that track ownership themselves
    /// should prefer [`Registry::remove_all`].
    pub fn remove_owned_by(&mut self, coord: ChunkCoord) -> Vec<Record<T>> {
        self.drain_where(|record| record.is_owned_by(coord))
    }

    /// Removes and returns every record matching `predicate`, in spawn order.
    pub fn drain_where(&mut self, mut predicate: impl FnMut(&Record<T>) -> bool) -> Vec<Record<T>> {
        let ids: Vec<EntityId> = self
            .records
            .values()
            .filter(|&record| predicate(record))
            .map(|record| record.id)
            .collect();
        self.remove_all(&ids)
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Gets a record by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Record<T>> {
        self.records.get(&id)
    }

    /// Gets a mutable record by id.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Record<T>> {
        self.records.get_mut(&id)
    }

    /// Returns true if a record with this id is live.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.records.contains_key(&id)
    }

    /// Iterates records in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Record<T>> {
        self.records.values()
    }

    /// Iterates records mutably in spawn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Record<T>> {
        self.records.values_mut()
    }

    /// Ids of every record owned by `coord`, in spawn order.
    #[must_use]
    pub fn ids_owned_by(&self, coord: ChunkCoord) -> Vec<EntityId> {
        self.records
            .values()
            .filter(|record| record.is_owned_by(coord))
            .map(|record| record.id)
            .collect()
    }

    /// Number of live records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record is live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
