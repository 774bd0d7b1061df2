//! # Chunk Content Generation
//!
//! World content is organized into fixed-size chunks for:
//! - Memory efficiency (only nearby chunks are materialized)
//! - Fast streaming (generate/discard on demand)
//! - Reproducibility (a chunk is a pure function of its coordinate)
//!
//! ## Content Format
//!
//! A chunk is described by a flat list of [`SpawnDescriptor`]s. Top-level
//! descriptors carry an offset from the chunk origin. Structure items and
//! wanderers name their parent structure by index and carry an offset from
//! that structure.
//!
//! ## Draw Layout
//!
//! Every feature category owns a block of seed offsets:
//!
//! | Category   | Offsets                  |
//! |------------|--------------------------|
//! | Hills      | `0`, `12345 * i + 0..4`  |
//! | Resources  | `100..`                  |
//! | Hostiles   | `200..`                  |
//! | Treasure   | `300`, `301`             |
//! | Structures | `400..`, `b + 2..b + 12` |
//!
//! **CRITICAL:** Reordering draws changes every world. Append new categories
//! at fresh offsets instead.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use drylands_shared::constants::{
    AMMO_CRATE_AMOUNT, AMMO_CRATE_CHANCE, BUILDING_SPAWN_CHANCE, CHUNK_SIZE, ENEMY_SPAWN_CHANCE,
    HOSTILE_HEALTH, MAX_BUILDING_SLOTS, MAX_ENEMY_SLOTS, MAX_HILLS, MAX_PEASANT_SLOTS,
    MAX_RESOURCE_SLOTS, PEASANT_SPAWN_CHANCE, RESOURCE_SPAWN_CHANCE, TREASURE_SPAWN_CHANCE,
    WANDERER_SPAWN_SPREAD, WEAPON_CRATE_CHANCE,
};
use drylands_shared::{ChunkCoord, Vec3, WeaponKind};

use crate::seed::ChunkSeed;

// =============================================================================
// SEED OFFSETS
// =============================================================================

const HILL_STRIDE: i64 = 12_345;
const RESOURCE_BASE: i64 = 100;
const HOSTILE_BASE: i64 = 200;
const TREASURE_BASE: i64 = 300;
const STRUCTURE_BASE: i64 = 400;

/// Height of a resource pickup above the ground.
const RESOURCE_HEIGHT: f32 = 0.3;

/// Height of the treasure above the ground.
const TREASURE_HEIGHT: f32 = 0.5;

/// Ammo crate placement inside its structure.
const AMMO_CRATE_OFFSET: Vec3 = Vec3::new(0.0, 0.3, -0.5);

/// Weapon crate placement inside its structure.
const WEAPON_CRATE_OFFSET: Vec3 = Vec3::new(-0.5, 0.4, 0.0);

// =============================================================================
// DESCRIPTORS
// =============================================================================

/// What a descriptor spawns, with its variant payload.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SpawnKind {
    /// Terrain decoration. Never interacted with.
    Hill {
        /// Base radius.
        radius: f32,
        /// Peak height.
        height: f32,
    },
    /// Food pickup.
    Resource,
    /// Hostile actor.
    Hostile {
        /// Starting health.
        health: f32,
    },
    /// Rare pickup that wins the game.
    Treasure,
    /// Hut that may contain items and attract wanderers.
    Structure {
        /// Wall radius.
        radius: f32,
        /// Wall height.
        height: f32,
    },
    /// Ammo crate inside a structure.
    Ammo {
        /// Index of the parent structure descriptor.
        structure: usize,
        /// Rounds granted on pickup.
        amount: u32,
    },
    /// Weapon crate inside a structure.
    Weapon {
        /// Index of the parent structure descriptor.
        structure: usize,
        /// Weapon equipped on pickup.
        kind: WeaponKind,
    },
    /// Civilian wandering near a structure.
    Wanderer {
        /// Index of the parent structure descriptor.
        structure: usize,
        /// Initial heading in radians.
        heading: f32,
        /// Seed of the wanderer's private RNG.
        rng_seed: u64,
    },
}

impl SpawnKind {
    /// Index of the parent structure, for structure-relative descriptors.
    #[inline]
    #[must_use]
    pub const fn parent(&self) -> Option<usize> {
        match *self {
            Self::Ammo { structure, .. }
            | Self::Weapon { structure, .. }
            | Self::Wanderer { structure, .. } => Some(structure),
            _ => None,
        }
    }

    /// Short lowercase name, for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Hill { .. } => "hill",
            Self::Resource => "resource",
            Self::Hostile { .. } => "hostile",
            Self::Treasure => "treasure",
            Self::Structure { .. } => "structure",
            Self::Ammo { .. } => "ammo",
            Self::Weapon { .. } => "weapon",
            Self::Wanderer { .. } => "wanderer",
        }
    }
}

/// One entity to spawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnDescriptor {
    /// Variant and payload.
    pub kind: SpawnKind,
    /// Offset from the chunk origin, or from the parent structure.
    pub offset: Vec3,
}

impl SpawnDescriptor {
    /// Creates a descriptor.
    #[inline]
    #[must_use]
    pub const fn new(kind: SpawnKind, offset: Vec3) -> Self {
        Self { kind, offset }
    }
}

/// Everything a chunk spawns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkContent {
    /// Chunk this content belongs to.
    pub coord: ChunkCoord,
    /// Seed the content was drawn from.
    pub seed: ChunkSeed,
    /// Descriptors in generation order.
    pub spawns: Vec<SpawnDescriptor>,
}

impl ChunkContent {
    /// Creates empty content for a chunk.
    #[must_use]
    pub fn empty(coord: ChunkCoord) -> Self {
        Self {
            coord,
            seed: ChunkSeed::for_coord(coord),
            spawns: Vec::new(),
        }
    }

    /// World position of the descriptor at `index`.
    ///
    /// Returns `None` if the index is out of range, or if a structure-relative
    /// descriptor does not point at an earlier structure.
    #[must_use]
    pub fn world_position(&self, index: usize) -> Option<Vec3> {
        let descriptor = self.spawns.get(index)?;
        let origin = self.coord.origin();
        match descriptor.kind.parent() {
            None => Some(origin + descriptor.offset),
            Some(parent) if parent < index => {
                let structure = self.spawns.get(parent)?;
                if !matches!(structure.kind, SpawnKind::Structure { .. }) {
                    return None;
                }
                Some(origin + structure.offset + descriptor.offset)
            }
            Some(_) => None,
        }
    }

    /// Number of descriptors matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&SpawnKind) -> bool) -> usize {
        self.spawns.iter().filter(|d| predicate(&d.kind)).count()
    }
}

// =============================================================================
// GENERATOR
// =============================================================================

/// Deterministic chunk content generator.
///
/// Stateless; one instance can serve any number of threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChunkGenerator;

impl ChunkGenerator {
    /// Creates a new chunk generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generates the content of the chunk at `coord`.
    #[must_use]
    pub fn generate(&self, coord: ChunkCoord) -> ChunkContent {
        let mut content = ChunkContent::empty(coord);
        let seed = content.seed;
        let spawns = &mut content.spawns;

        Self::generate_hills(seed, spawns);
        Self::generate_slots(seed, spawns, RESOURCE_BASE, MAX_RESOURCE_SLOTS, RESOURCE_SPAWN_CHANCE, |x, z| {
            SpawnDescriptor::new(SpawnKind::Resource, Vec3::new(x, RESOURCE_HEIGHT, z))
        });
        Self::generate_slots(seed, spawns, HOSTILE_BASE, MAX_ENEMY_SLOTS, ENEMY_SPAWN_CHANCE, |x, z| {
            SpawnDescriptor::new(
                SpawnKind::Hostile {
                    health: HOSTILE_HEALTH,
                },
                Vec3::ground(x, z),
            )
        });
        Self::generate_treasure(seed, spawns);
        Self::generate_structures(seed, spawns);

        content
    }

    /// Local offset along one axis from a unit draw.
    #[inline]
    fn local(draw: f64) -> f32 {
        (draw * f64::from(CHUNK_SIZE)) as f32
    }

    /// Count draw: `floor(r * max)`.
    #[inline]
    fn count(seed: ChunkSeed, offset: i64, max: u32) -> u32 {
        (seed.draw(offset) * f64::from(max)).floor() as u32
    }

    fn generate_hills(seed: ChunkSeed, spawns: &mut Vec<SpawnDescriptor>) {
        for i in 0..Self::count(seed, 0, MAX_HILLS) {
            let h = i64::from(i) * HILL_STRIDE;
            let x = Self::local(seed.draw(h));
            let z = Self::local(seed.draw(h + 1));
            let radius = (seed.draw(h + 2) * 3.0 + 2.0) as f32;
            let height = (seed.draw(h + 3) * 4.0 + 2.0) as f32;
            spawns.push(SpawnDescriptor::new(
                SpawnKind::Hill { radius, height },
                Vec3::ground(x, z),
            ));
        }
    }

    /// Bernoulli slots: the acceptance roll and the X draw share an offset.
    fn generate_slots(
        seed: ChunkSeed,
        spawns: &mut Vec<SpawnDescriptor>,
        base: i64,
        max: u32,
        chance: f64,
        make: impl Fn(f32, f32) -> SpawnDescriptor,
    ) {
        for i in 0..Self::count(seed, base, max) {
            let slot = base + i64::from(i);
            if seed.draw(slot) < chance {
                let x = Self::local(seed.draw(slot));
                let z = Self::local(seed.draw(slot + 1));
                spawns.push(make(x, z));
            }
        }
    }

    fn generate_treasure(seed: ChunkSeed, spawns: &mut Vec<SpawnDescriptor>) {
        if seed.draw(TREASURE_BASE) < TREASURE_SPAWN_CHANCE {
            let x = Self::local(seed.draw(TREASURE_BASE));
            let z = Self::local(seed.draw(TREASURE_BASE + 1));
            spawns.push(SpawnDescriptor::new(
                SpawnKind::Treasure,
                Vec3::new(x, TREASURE_HEIGHT, z),
            ));
        }
    }

    fn generate_structures(seed: ChunkSeed, spawns: &mut Vec<SpawnDescriptor>) {
        for i in 0..Self::count(seed, STRUCTURE_BASE, MAX_BUILDING_SLOTS) {
            let b = STRUCTURE_BASE + i64::from(i);
            if seed.draw(b) >= BUILDING_SPAWN_CHANCE {
                continue;
            }

            let structure = spawns.len();
            let x = Self::local(seed.draw(b));
            let z = Self::local(seed.draw(b + 1));
            let radius = (seed.draw(b + 2) * 1.5 + 2.0) as f32;
            let height = (seed.draw(b + 3) + 2.5) as f32;
            spawns.push(SpawnDescriptor::new(
                SpawnKind::Structure { radius, height },
                Vec3::ground(x, z),
            ));

            if seed.draw(b + 4) < AMMO_CRATE_CHANCE {
                spawns.push(SpawnDescriptor::new(
                    SpawnKind::Ammo {
                        structure,
                        amount: AMMO_CRATE_AMOUNT,
                    },
                    AMMO_CRATE_OFFSET,
                ));
            }

            if seed.draw(b + 5) < WEAPON_CRATE_CHANCE {
                spawns.push(SpawnDescriptor::new(
                    SpawnKind::Weapon {
                        structure,
                        kind: WeaponKind::from_unit(seed.draw(b + 6)),
                    },
                    WEAPON_CRATE_OFFSET,
                ));
            }

            for p in 0..Self::count(seed, b + 7, MAX_PEASANT_SLOTS) {
                let p = i64::from(p);
                if seed.draw(b + 11 + p) >= PEASANT_SPAWN_CHANCE {
                    continue;
                }
                let dx = (seed.draw(b + 8 + p) - 0.5) * WANDERER_SPAWN_SPREAD * 2.0;
                let dz = (seed.draw(b + 9 + p) - 0.5) * WANDERER_SPAWN_SPREAD * 2.0;
                let heading = (seed.draw(b + 10 + p) * TAU) as f32;
                spawns.push(SpawnDescriptor::new(
                    SpawnKind::Wanderer {
                        structure,
                        heading,
                        rng_seed: seed.derive(b * 16 + p),
                    },
                    Vec3::ground(dx as f32, dz as f32),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(radius: i32) -> impl Iterator<Item = ChunkContent> {
        let generator = ChunkGenerator::new();
        ChunkCoord::new(0, 0)
            .neighbourhood(radius)
            .map(move |coord| generator.generate(coord))
    }

    #[test]
    fn test_chunk_generation_determinism() {
        let gen1 = ChunkGenerator::new();
        let gen2 = ChunkGenerator::new();

        for coord in [
            ChunkCoord::new(0, 0),
            ChunkCoord::new(-17, 4),
            ChunkCoord::new(1_000_000, -1_000_000),
        ] {
            let a = gen1.generate(coord);
            let b = gen2.generate(coord);
            assert_eq!(a, b, "content differs at {coord}");
        }
    }

    #[test]
    fn test_generation_order_does_not_matter() {
        let generator = ChunkGenerator::new();
        let first = generator.generate(ChunkCoord::new(3, 3));
        for coord in ChunkCoord::new(0, 0).neighbourhood(4) {
            let _ = generator.generate(coord);
        }
        assert_eq!(first, generator.generate(ChunkCoord::new(3, 3)));
    }

    #[test]
    fn test_counts_are_bounded() {
        for content in scan(20) {
            assert!(content.count(|k| matches!(k, SpawnKind::Hill { .. })) < MAX_HILLS as usize);
            assert!(content.count(|k| matches!(k, SpawnKind::Resource)) < MAX_RESOURCE_SLOTS as usize);
            assert!(content.count(|k| matches!(k, SpawnKind::Hostile { .. })) < MAX_ENEMY_SLOTS as usize);
            assert!(content.count(|k| matches!(k, SpawnKind::Treasure)) <= 1);
            assert!(content.count(|k| matches!(k, SpawnKind::Structure { .. })) < MAX_BUILDING_SLOTS as usize);
        }
    }

    #[test]
    fn test_top_level_offsets_stay_inside_chunk() {
        for content in scan(15) {
            for spawn in content.spawns.iter().filter(|d| d.kind.parent().is_none()) {
                assert!((0.0..CHUNK_SIZE).contains(&spawn.offset.x));
                assert!((0.0..CHUNK_SIZE).contains(&spawn.offset.z));
            }
        }
    }

    #[test]
    fn test_children_follow_their_structure() {
        let mut structures = 0;
        let mut children = 0;
        for content in scan(40) {
            for (index, spawn) in content.spawns.iter().enumerate() {
                if let Some(parent) = spawn.kind.parent() {
                    children += 1;
                    assert!(parent < index);
                    assert!(matches!(
                        content.spawns[parent].kind,
                        SpawnKind::Structure { .. }
                    ));
                    assert!(content.world_position(index).is_some());
                }
                if matches!(spawn.kind, SpawnKind::Structure { .. }) {
                    structures += 1;
                }
            }
        }
        assert!(structures > 0, "no structure in 81x81 chunks");
        assert!(children > 0, "no structure item in 81x81 chunks");
    }

    #[test]
    fn test_payload_ranges() {
        for content in scan(40) {
            for spawn in &content.spawns {
                match spawn.kind {
                    SpawnKind::Hill { radius, height } => {
                        assert!((2.0..=5.0).contains(&radius));
                        assert!((2.0..=6.0).contains(&height));
                    }
                    SpawnKind::Structure { radius, height } => {
                        assert!((2.0..=3.5).contains(&radius));
                        assert!((2.5..=3.5).contains(&height));
                    }
                    SpawnKind::Hostile { health } => assert_eq!(health, HOSTILE_HEALTH),
                    SpawnKind::Ammo { amount, .. } => assert_eq!(amount, AMMO_CRATE_AMOUNT),
                    SpawnKind::Wanderer { heading, .. } => {
                        assert!((0.0..=std::f32::consts::TAU).contains(&heading));
                        assert!(spawn.offset.x.abs() <= 4.0 && spawn.offset.z.abs() <= 4.0);
                    }
                    SpawnKind::Resource | SpawnKind::Treasure | SpawnKind::Weapon { .. } => {}
                }
            }
        }
    }

    #[test]
    fn test_world_position_rejects_dangling_parent() {
        let mut content = ChunkContent::empty(ChunkCoord::new(1, 1));
        content.spawns.push(SpawnDescriptor::new(SpawnKind::Resource, Vec3::ground(1.0, 2.0)));
        content.spawns.push(SpawnDescriptor::new(
            SpawnKind::Ammo {
                structure: 0,
                amount: 5,
            },
            Vec3::ZERO,
        ));
        content.spawns.push(SpawnDescriptor::new(
            SpawnKind::Ammo {
                structure: 7,
                amount: 5,
            },
            Vec3::ZERO,
        ));

        assert_eq!(content.world_position(0), Some(Vec3::ground(51.0, 52.0)));
        assert_eq!(content.world_position(1), None);
        assert_eq!(content.world_position(2), None);
        assert_eq!(content.world_position(3), None);
    }

    #[test]
    fn test_item_position_is_structure_relative() {
        let mut content = ChunkContent::empty(ChunkCoord::new(-1, 0));
        content.spawns.push(SpawnDescriptor::new(
            SpawnKind::Structure {
                radius: 2.0,
                height: 3.0,
            },
            Vec3::ground(10.0, 20.0),
        ));
        content.spawns.push(SpawnDescriptor::new(
            SpawnKind::Ammo {
                structure: 0,
                amount: AMMO_CRATE_AMOUNT,
            },
            AMMO_CRATE_OFFSET,
        ));

        assert_eq!(content.world_position(1), Some(Vec3::new(-40.0, 0.3, 19.5)));
    }
}
