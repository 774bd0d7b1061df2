//! # Chunk Registry
//!
//! Owns the set of materialized chunks and binds entity lifetime to them.
//!
//! ## Load
//!
//! ```text
//! generate(coord) ──> stage (validate, resolve world positions)
//!                       │ error: nothing inserted, coord stays unloaded
//!                       ▼
//!                     commit (allocate ids, insert records, record chunk)
//!                       ▼
//!                     ChunkMaterialized event
//! ```
//!
//! ## Unload
//!
//! Removes every entity the chunk still owns, forgets the chunk, emits
//! `ChunkRemoved`. Entities already collected or killed are skipped.
//!
//! Both operations are idempotent: loading a loaded chunk or unloading an
//! unloaded one does nothing.

use std::collections::{BTreeMap, HashSet};

use drylands_core::EntityId;
use drylands_procedural::{ChunkContent, ChunkGenerator, ChunkSeed, SpawnKind};
use drylands_shared::{ChunkCoord, Vec3};
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::error::{ChunkError, ChunkResult};
use crate::events::{EventSender, GameEvent, SpawnedEntity};
use crate::world::entities::{
    EntityKind, EntityRef, EntityRegistries, Hill, ItemContents, Structure, StructureItem, Wanderer,
};

/// A materialized chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedChunk {
    /// Chunk coordinate.
    pub coord: ChunkCoord,
    /// Seed its content was drawn from.
    pub seed: ChunkSeed,
    /// Every entity it spawned, in spawn order.
    pub entities: Vec<EntityRef>,
    /// Load sequence number. Increases with every load in this session.
    pub load_sequence: u64,
}

/// Session statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChunkStats {
    /// Chunks generated this session.
    pub generated_total: u64,
    /// Chunks unloaded this session.
    pub unloaded_total: u64,
    /// Chunks rejected at staging.
    pub rejected_total: u64,
    /// Entities spawned by chunk loads.
    pub entities_spawned: u64,
}

/// One validated descriptor, ready to insert.
struct StagedSpawn {
    kind: SpawnKind,
    position: Vec3,
}

/// Registry of materialized chunks.
#[derive(Debug, Default)]
pub struct ChunkRegistry {
    generator: ChunkGenerator,
    loaded: BTreeMap<ChunkCoord, LoadedChunk>,
    stats: ChunkStats,
    /// Bumped by every load and unload.
    revision: u64,
    /// Coordinates whose generated content gets a dangling structure child.
    #[cfg(test)]
    malformed: HashSet<ChunkCoord>,
}

impl ChunkRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `coord` is materialized.
    #[inline]
    #[must_use]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.loaded.contains_key(&coord)
    }

    /// Gets a loaded chunk.
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<&LoadedChunk> {
        self.loaded.get(&coord)
    }

    /// Loaded coordinates, sorted.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.loaded.keys().copied()
    }

    /// Number of loaded chunks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Returns true if no chunk is loaded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    /// Session statistics.
    #[must_use]
    pub const fn stats(&self) -> ChunkStats {
        self.stats
    }

    /// Changes on every load and unload.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Loads `coord` if it is not loaded yet.
    ///
    /// Returns `Ok(true)` if the chunk was materialized by this call.
    ///
    /// # Errors
    ///
    /// Returns a [`ChunkError`] if the generated content is malformed. The
    /// coordinate stays unloaded and the call can be retried.
    pub fn ensure_loaded(
        &mut self,
        coord: ChunkCoord,
        entities: &mut EntityRegistries,
        events: &EventSender,
    ) -> ChunkResult<bool> {
        if self.is_loaded(coord) {
            return Ok(false);
        }
        let content = self.generate(coord);
        self.materialize(content, entities, events)?;
        Ok(true)
    }

    /// Loads every missing coordinate in `coords`.
    ///
    /// Generation of missing chunks runs on the rayon pool when at least
    /// `parallel_threshold` are missing. Commits happen on the calling thread
    /// in input order. Returns the coordinates loaded by this call.
    ///
    /// # Errors
    ///
    /// Stops at the first chunk whose content fails staging. Chunks committed
    /// before it stay loaded; it and everything after it stay unloaded.
    pub fn ensure_loaded_many(
        &mut self,
        coords: impl IntoIterator<Item = ChunkCoord>,
        parallel_threshold: usize,
        entities: &mut EntityRegistries,
        events: &EventSender,
    ) -> ChunkResult<Vec<ChunkCoord>> {
        let mut seen = HashSet::new();
        let missing: Vec<ChunkCoord> = coords
            .into_iter()
            .filter(|&coord| !self.is_loaded(coord) && seen.insert(coord))
            .collect();

        if missing.is_empty() {
            return Ok(missing);
        }

        let contents: Vec<ChunkContent> = if missing.len() >= parallel_threshold.max(1) {
            missing.par_iter().map(|&coord| self.generate(coord)).collect()
        } else {
            missing.iter().map(|&coord| self.generate(coord)).collect()
        };

        for content in contents {
            self.materialize(content, entities, events)?;
        }
        Ok(missing)
    }

    /// Validates and inserts pre-generated content.
    ///
    /// Returns `Ok(false)` without touching anything if the chunk is already
    /// loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::DanglingParent`] if a structure item or wanderer
    /// does not point at an earlier structure. Nothing is inserted.
    pub fn materialize(
        &mut self,
        content: ChunkContent,
        entities: &mut EntityRegistries,
        events: &EventSender,
    ) -> ChunkResult<bool> {
        let coord = content.coord;
        if self.is_loaded(coord) {
            return Ok(false);
        }

        let staged = match Self::stage(&content) {
            Ok(staged) => staged,
            Err(err) => {
                self.stats.rejected_total += 1;
                warn!(%coord, error = %err, "rejected chunk content");
                return Err(err);
            }
        };

        let spawns = Self::commit(coord, &staged, entities);
        let chunk = LoadedChunk {
            coord,
            seed: content.seed,
            entities: spawns.iter().map(|s| EntityRef { kind: s.kind, id: s.id }).collect(),
            load_sequence: self.stats.generated_total,
        };

        self.stats.generated_total += 1;
        self.stats.entities_spawned += spawns.len() as u64;
        self.revision += 1;
        self.loaded.insert(coord, chunk);

        debug!(%coord, entities = spawns.len(), "chunk materialized");
        events.send(GameEvent::ChunkMaterialized { coord, spawns });
        Ok(true)
    }

    /// Unloads `coord` and every entity it still owns.
    ///
    /// Returns the ids that were removed, or `None` if the chunk was not
    /// loaded.
    pub fn unload(
        &mut self,
        coord: ChunkCoord,
        entities: &mut EntityRegistries,
        events: &EventSender,
    ) -> Option<Vec<EntityId>> {
        let chunk = self.loaded.remove(&coord)?;

        let removed: Vec<EntityId> = chunk
            .entities
            .iter()
            .filter(|&&entity| entities.despawn(entity))
            .map(|entity| entity.id)
            .collect();

        self.stats.unloaded_total += 1;
        self.revision += 1;

        debug!(%coord, removed = removed.len(), "chunk unloaded");
        events.send(GameEvent::ChunkRemoved {
            coord,
            entities: removed.clone(),
        });
        Some(removed)
    }

    /// Generates the content of `coord`.
    fn generate(&self, coord: ChunkCoord) -> ChunkContent {
        #[cfg(test)]
        if self.malformed.contains(&coord) {
            let mut content = self.generator.generate(coord);
            let dangling = content.spawns.len() + 1;
            content.spawns.push(drylands_procedural::SpawnDescriptor::new(
                SpawnKind::Ammo {
                    structure: dangling,
                    amount: 1,
                },
                Vec3::ZERO,
            ));
            return content;
        }
        self.generator.generate(coord)
    }

    /// Makes generation of `coord` produce malformed content until
    /// [`Self::repair`] is called.
    #[cfg(test)]
    pub(crate) fn corrupt(&mut self, coord: ChunkCoord) {
        self.malformed.insert(coord);
    }

    /// Undoes [`Self::corrupt`].
    #[cfg(test)]
    pub(crate) fn repair(&mut self, coord: ChunkCoord) {
        self.malformed.remove(&coord);
    }

    /// Resolves every descriptor to a world position without side effects.
    fn stage(content: &ChunkContent) -> ChunkResult<Vec<StagedSpawn>> {
        content
            .spawns
            .iter()
            .enumerate()
            .map(|(index, descriptor)| {
                let position = content.world_position(index).ok_or_else(|| ChunkError::DanglingParent {
                    coord: content.coord,
                    index,
                    parent: descriptor.kind.parent().unwrap_or(index),
                })?;
                Ok(StagedSpawn {
                    kind: descriptor.kind,
                    position,
                })
            })
            .collect()
    }

    /// Inserts staged spawns. Cannot fail.
    fn commit(coord: ChunkCoord, staged: &[StagedSpawn], entities: &mut EntityRegistries) -> Vec<SpawnedEntity> {
        let owner = Some(coord);
        // Descriptor index -> entity id, for structure children.
        let mut ids: Vec<EntityId> = Vec::with_capacity(staged.len());
        let mut spawns = Vec::with_capacity(staged.len());

        for spawn in staged {
            let position = spawn.position;
            let (kind, id) = match spawn.kind {
                SpawnKind::Hill { radius, height } => (
                    EntityKind::Hill,
                    entities.spawn_hill(position, owner, Hill { radius, height }),
                ),
                SpawnKind::Resource => (EntityKind::Resource, entities.spawn_resource(position, owner)),
                SpawnKind::Hostile { health } => (
                    EntityKind::Hostile,
                    entities.spawn_hostile(position, owner, health),
                ),
                SpawnKind::Treasure => (EntityKind::Treasure, entities.spawn_treasure(position, owner)),
                SpawnKind::Structure { radius, height } => (
                    EntityKind::Structure,
                    entities.spawn_structure(position, owner, Structure { radius, height }),
                ),
                SpawnKind::Ammo { structure, amount } => (
                    EntityKind::AmmoCrate,
                    entities.spawn_item(
                        position,
                        owner,
                        StructureItem {
                            structure: ids[structure],
                            contents: ItemContents::Ammo(amount),
                        },
                    ),
                ),
                SpawnKind::Weapon { structure, kind } => (
                    EntityKind::WeaponCrate,
                    entities.spawn_item(
                        position,
                        owner,
                        StructureItem {
                            structure: ids[structure],
                            contents: ItemContents::Weapon(kind),
                        },
                    ),
                ),
                SpawnKind::Wanderer { heading, rng_seed, .. } => (
                    EntityKind::Wanderer,
                    entities.spawn_wanderer(position, owner, Wanderer::new(heading, rng_seed)),
                ),
            };
            trace!(%coord, %id, kind = kind.name(), "spawned");
            ids.push(id);
            spawns.push(SpawnedEntity { id, kind, position });
        }

        spawns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use drylands_procedural::SpawnDescriptor;

    fn setup() -> (ChunkRegistry, EntityRegistries, EventBus) {
        (ChunkRegistry::new(), EntityRegistries::new(), EventBus::new(4096))
    }

    /// First chunk near the origin (x-major scan) with a structure item
    /// or wanderer.
    fn chunk_with_structure_items() -> ChunkContent {
        let generator = ChunkGenerator::new();
        ChunkCoord::new(0, 0)
            .neighbourhood(60)
            .map(|coord| generator.generate(coord))
            .find(|content| content.spawns.iter().any(|s| s.kind.parent().is_some()))
            .expect("no structure item within 121x121 chunks")
    }

    #[test]
    fn test_ensure_loaded_is_idempotent() {
        let (mut chunks, mut entities, bus) = setup();
        let events = bus.sender();
        let coord = ChunkCoord::new(2, -3);

        assert!(chunks.ensure_loaded(coord, &mut entities, &events).unwrap());
        let count = entities.len();
        assert!(!chunks.ensure_loaded(coord, &mut entities, &events).unwrap());

        assert_eq!(entities.len(), count);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks.stats().generated_total, 1);
        assert_eq!(bus.receiver().pending_count(), 1);
    }

    #[test]
    fn test_unload_removes_owned_entities() {
        let (mut chunks, mut entities, bus) = setup();
        let events = bus.sender();
        for coord in ChunkCoord::new(0, 0).neighbourhood(2) {
            chunks.ensure_loaded(coord, &mut entities, &events).unwrap();
        }

        let target = ChunkCoord::new(1, 1);
        let owned = entities.count_owned_by(target);
        let removed = chunks.unload(target, &mut entities, &events).unwrap();

        assert_eq!(removed.len(), owned);
        assert_eq!(entities.count_owned_by(target), 0);
        assert!(!chunks.is_loaded(target));
        assert!(chunks.unload(target, &mut entities, &events).is_none());
        assert_eq!(chunks.stats().unloaded_total, 1);
    }

    #[test]
    fn test_unload_skips_already_collected() {
        let (mut chunks, mut entities, bus) = setup();
        let events = bus.sender();
        let content = chunk_with_structure_items();
        let coord = content.coord;
        chunks.materialize(content, &mut entities, &events).unwrap();

        let item = entities.items.iter().next().map(|r| r.id).unwrap();
        entities.items.remove(item);
        let live = entities.count_owned_by(coord);

        let removed = chunks.unload(coord, &mut entities, &events).unwrap();
        assert_eq!(removed.len(), live);
        assert!(!removed.contains(&item));
    }

    #[test]
    fn test_items_link_to_their_structure() {
        let (mut chunks, mut entities, bus) = setup();
        let content = chunk_with_structure_items();
        chunks.materialize(content, &mut entities, &bus.sender()).unwrap();

        for item in entities.items.iter() {
            let structure = entities.structures.get(item.payload.structure).unwrap();
            assert!(item.position.distance(structure.position) < 1.0);
        }
    }

    #[test]
    fn test_reload_reproduces_entity_set() {
        let (mut chunks, mut entities, bus) = setup();
        let events = bus.sender();
        let receiver = bus.receiver();
        let content = chunk_with_structure_items();
        let coord = content.coord;

        chunks.ensure_loaded(coord, &mut entities, &events).unwrap();
        chunks.unload(coord, &mut entities, &events).unwrap();
        chunks.ensure_loaded(coord, &mut entities, &events).unwrap();

        let spawn_lists: Vec<Vec<(EntityKind, Vec3)>> = receiver
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                GameEvent::ChunkMaterialized { spawns, .. } => {
                    Some(spawns.iter().map(|s| (s.kind, s.position)).collect())
                }
                _ => None,
            })
            .collect();

        assert_eq!(spawn_lists.len(), 2);
        assert_eq!(spawn_lists[0], spawn_lists[1]);
        assert_eq!(chunks.get(coord).unwrap().load_sequence, 1);
    }

    #[test]
    fn test_dangling_parent_leaves_no_trace() {
        let (mut chunks, mut entities, bus) = setup();
        let coord = ChunkCoord::new(9, 9);
        let mut content = ChunkContent::empty(coord);
        content
            .spawns
            .push(SpawnDescriptor::new(SpawnKind::Resource, Vec3::ground(1.0, 1.0)));
        content.spawns.push(SpawnDescriptor::new(
            SpawnKind::Ammo {
                structure: 0,
                amount: 25,
            },
            Vec3::ZERO,
        ));

        let err = chunks
            .materialize(content, &mut entities, &bus.sender())
            .unwrap_err();

        assert_eq!(
            err,
            ChunkError::DanglingParent {
                coord,
                index: 1,
                parent: 0
            }
        );
        assert!(!chunks.is_loaded(coord));
        assert!(entities.is_empty());
        assert_eq!(entities.allocated(), 0);
        assert_eq!(chunks.stats().rejected_total, 1);
        assert!(!bus.receiver().has_events());

        // A retry with good content succeeds.
        assert!(chunks.ensure_loaded(coord, &mut entities, &bus.sender()).unwrap());
    }

    #[test]
    fn test_ensure_loaded_many_stops_at_malformed_chunk() {
        let (mut chunks, mut entities, bus) = setup();
        let events = bus.sender();
        let coords = [ChunkCoord::new(0, 0), ChunkCoord::new(0, 1), ChunkCoord::new(0, 2)];
        chunks.corrupt(coords[1]);

        let err = chunks
            .ensure_loaded_many(coords, usize::MAX, &mut entities, &events)
            .unwrap_err();

        assert!(matches!(err, ChunkError::DanglingParent { coord, .. } if coord == coords[1]));
        assert!(chunks.is_loaded(coords[0]));
        assert!(!chunks.is_loaded(coords[1]));
        assert!(!chunks.is_loaded(coords[2]));
        assert_eq!(entities.len(), entities.count_owned_by(coords[0]));
        assert_eq!(chunks.stats().generated_total, 1);
        assert_eq!(chunks.stats().rejected_total, 1);

        chunks.repair(coords[1]);
        let loaded = chunks
            .ensure_loaded_many(coords, usize::MAX, &mut entities, &events)
            .unwrap();
        assert_eq!(loaded, coords[1..].to_vec());
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn test_malformed_first_chunk_changes_nothing() {
        let (mut chunks, mut entities, bus) = setup();
        let events = bus.sender();
        let coords: Vec<_> = ChunkCoord::new(4, 4).neighbourhood(1).collect();
        chunks.corrupt(coords[0]);
        let stats = chunks.stats();
        let revision = chunks.revision();

        for threshold in [1, usize::MAX] {
            assert!(chunks
                .ensure_loaded_many(coords.clone(), threshold, &mut entities, &events)
                .is_err());
            assert!(chunks.is_empty());
            assert!(entities.is_empty());
            assert_eq!(entities.allocated(), 0);
            assert_eq!(chunks.revision(), revision);
            assert_eq!(chunks.stats().generated_total, stats.generated_total);
            assert_eq!(chunks.stats().entities_spawned, stats.entities_spawned);
        }
        assert_eq!(chunks.stats().rejected_total, 2);
        assert!(!bus.receiver().has_events());
    }

    #[test]
    fn test_full_channel_drops_chunk_event_but_keeps_chunk() {
        let (mut chunks, mut entities, _) = setup();
        let bus = EventBus::new(1);
        let events = bus.sender();
        let first = ChunkCoord::new(0, 0);
        let second = ChunkCoord::new(0, 1);

        chunks.ensure_loaded(first, &mut entities, &events).unwrap();
        chunks.ensure_loaded(second, &mut entities, &events).unwrap();

        assert_eq!(events.dropped_count(), 1);
        let delivered = bus.receiver().drain();
        assert!(matches!(
            delivered.as_slice(),
            [GameEvent::ChunkMaterialized { coord, .. }] if *coord == first
        ));

        // The registry still has the lost chunk in full.
        let chunk = chunks.get(second).unwrap();
        assert_eq!(chunk.entities.len(), entities.count_owned_by(second));
        assert!(chunk.entities.iter().all(|&entity| entities.contains(entity)));
    }

    #[test]
    fn test_ensure_loaded_many_matches_sequential() {
        let coords: Vec<_> = ChunkCoord::new(-2, 5).neighbourhood(3).collect();

        let (mut seq_chunks, mut seq_entities, seq_bus) = setup();
        for &coord in &coords {
            seq_chunks.ensure_loaded(coord, &mut seq_entities, &seq_bus.sender()).unwrap();
        }

        let (mut par_chunks, mut par_entities, par_bus) = setup();
        let mut with_duplicates = coords.clone();
        with_duplicates.extend_from_slice(&coords[..5]);
        let loaded = par_chunks
            .ensure_loaded_many(with_duplicates, 1, &mut par_entities, &par_bus.sender())
            .unwrap();

        assert_eq!(loaded, coords);
        assert_eq!(seq_bus.receiver().drain(), par_bus.receiver().drain());
        assert_eq!(seq_entities.len(), par_entities.len());
    }
}
