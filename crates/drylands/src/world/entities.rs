//! # Entity Registries
//!
//! One ordered [`Registry`] per entity variant, all fed by one id allocator.
//!
//! ```text
//! ┌──────────────────────── EntityRegistries ────────────────────────┐
//! │  ids ──> hills  resources  treasures  hostiles  structures       │
//! │          items  wanderers  (chunk-owned)                         │
//! │          projectiles       (owner = None)                        │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Chunk-owned records carry the coordinate that spawned them. Projectiles
//! are chunk-independent and only die by age, range or hit.

use drylands_core::{EntityAllocator, EntityId, Record, Registry};
use drylands_shared::{ChunkCoord, Vec3, WeaponKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

// ============================================================================
// VARIANT TAGS
// ============================================================================

/// Every entity variant the engine tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Terrain decoration.
    Hill,
    /// Food pickup.
    Resource,
    /// Victory pickup.
    Treasure,
    /// Hostile actor.
    Hostile,
    /// Hut.
    Structure,
    /// Ammo crate inside a structure.
    AmmoCrate,
    /// Weapon crate inside a structure.
    WeaponCrate,
    /// Civilian near a structure.
    Wanderer,
    /// Player projectile.
    Projectile,
}

impl EntityKind {
    /// Returns the display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hill => "Hill",
            Self::Resource => "Resource",
            Self::Treasure => "Treasure",
            Self::Hostile => "Hostile",
            Self::Structure => "Structure",
            Self::AmmoCrate => "Ammo Crate",
            Self::WeaponCrate => "Weapon Crate",
            Self::Wanderer => "Wanderer",
            Self::Projectile => "Projectile",
        }
    }
}

// ============================================================================
// PAYLOADS
// ============================================================================

/// Hill payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hill {
    /// Base radius.
    pub radius: f32,
    /// Peak height.
    pub height: f32,
}

/// Resource payload. Resources carry no data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resource;

/// Treasure payload. Treasure carries no data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Treasure;

/// Hostile payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hostile {
    /// Remaining health. Projectiles kill outright; kept for presentation.
    pub health: f32,
}

/// Structure payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Structure {
    /// Wall radius.
    pub radius: f32,
    /// Wall height.
    pub height: f32,
}

/// What a structure item gives on pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemContents {
    /// Rounds added to the player's ammo.
    Ammo(u32),
    /// Weapon equipped, ammo reset to its magazine.
    Weapon(WeaponKind),
}

/// Structure item payload. The record position is already in world space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StructureItem {
    /// Structure the item sits in.
    pub structure: EntityId,
    /// What the item gives.
    pub contents: ItemContents,
}

impl StructureItem {
    /// Variant tag for this item.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self.contents {
            ItemContents::Ammo(_) => EntityKind::AmmoCrate,
            ItemContents::Weapon(_) => EntityKind::WeaponCrate,
        }
    }
}

/// Projectile payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    /// Travel per tick.
    pub velocity: Vec3,
    /// Ticks alive.
    pub age: u32,
    /// Damage multiplier of the weapon that fired it.
    pub damage: f32,
}

/// Wanderer payload.
#[derive(Clone, Debug)]
pub struct Wanderer {
    /// Heading in radians. 0 walks towards +Z.
    pub heading: f32,
    /// Ticks until the next heading change.
    pub timer: u32,
    /// Private RNG, seeded at generation time.
    pub(crate) rng: ChaCha8Rng,
}

impl Wanderer {
    /// Creates a wanderer whose first tick re-rolls its heading.
    #[must_use]
    pub fn new(heading: f32, rng_seed: u64) -> Self {
        Self {
            heading,
            timer: 0,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
        }
    }

    /// Uniform draw in `[low, high)` from the wanderer's RNG.
    pub(crate) fn roll(&mut self, low: f32, high: f32) -> f32 {
        self.rng.gen_range(low..high)
    }

    /// Uniform integer draw in `[low, high)` from the wanderer's RNG.
    pub(crate) fn roll_ticks(&mut self, low: u32, high: u32) -> u32 {
        self.rng.gen_range(low..high)
    }
}

impl PartialEq for Wanderer {
    fn eq(&self, other: &Self) -> bool {
        self.heading == other.heading && self.timer == other.timer && self.rng == other.rng
    }
}

// ============================================================================
// REGISTRIES
// ============================================================================

/// One entity reference with its variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityRef {
    /// Variant.
    pub kind: EntityKind,
    /// Id.
    pub id: EntityId,
}

/// All live entities, one registry per variant.
#[derive(Clone, Debug, Default)]
pub struct EntityRegistries {
    ids: EntityAllocator,
    /// Terrain decoration.
    pub hills: Registry<Hill>,
    /// Food pickups.
    pub resources: Registry<Resource>,
    /// Victory pickups.
    pub treasures: Registry<Treasure>,
    /// Hostile actors.
    pub hostiles: Registry<Hostile>,
    /// Huts.
    pub structures: Registry<Structure>,
    /// Ammo and weapon crates.
    pub items: Registry<StructureItem>,
    /// Civilians.
    pub wanderers: Registry<Wanderer>,
    /// Player projectiles.
    pub projectiles: Registry<Projectile>,
}

impl EntityRegistries {
    /// Creates empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub const fn allocated(&self) -> u64 {
        self.ids.allocated()
    }

    /// Spawns a hill.
    pub fn spawn_hill(&mut self, position: Vec3, owner: Option<ChunkCoord>, hill: Hill) -> EntityId {
        let id = self.ids.allocate();
        self.hills.insert(Record::new(id, position, owner, hill));
        id
    }

    /// Spawns a resource.
    pub fn spawn_resource(&mut self, position: Vec3, owner: Option<ChunkCoord>) -> EntityId {
        let id = self.ids.allocate();
        self.resources.insert(Record::new(id, position, owner, Resource));
        id
    }

    /// Spawns a treasure.
    pub fn spawn_treasure(&mut self, position: Vec3, owner: Option<ChunkCoord>) -> EntityId {
        let id = self.ids.allocate();
        self.treasures.insert(Record::new(id, position, owner, Treasure));
        id
    }

    /// Spawns a hostile.
    pub fn spawn_hostile(&mut self, position: Vec3, owner: Option<ChunkCoord>, health: f32) -> EntityId {
        let id = self.ids.allocate();
        self.hostiles.insert(Record::new(id, position, owner, Hostile { health }));
        id
    }

    /// Spawns a structure.
    pub fn spawn_structure(
        &mut self,
        position: Vec3,
        owner: Option<ChunkCoord>,
        structure: Structure,
    ) -> EntityId {
        let id = self.ids.allocate();
        self.structures.insert(Record::new(id, position, owner, structure));
        id
    }

    /// Spawns an ammo or weapon crate at a world position.
    pub fn spawn_item(&mut self, position: Vec3, owner: Option<ChunkCoord>, item: StructureItem) -> EntityId {
        let id = self.ids.allocate();
        self.items.insert(Record::new(id, position, owner, item));
        id
    }

    /// Spawns a wanderer.
    pub fn spawn_wanderer(&mut self, position: Vec3, owner: Option<ChunkCoord>, wanderer: Wanderer) -> EntityId {
        let id = self.ids.allocate();
        self.wanderers.insert(Record::new(id, position, owner, wanderer));
        id
    }

    /// Spawns a chunk-independent projectile.
    pub fn spawn_projectile(&mut self, position: Vec3, projectile: Projectile) -> EntityId {
        let id = self.ids.allocate();
        self.projectiles.insert(Record::new(id, position, None, projectile));
        id
    }

    /// Removes one entity from the registry of its variant.
    ///
    /// Returns false if it was already gone.
    pub fn despawn(&mut self, entity: EntityRef) -> bool {
        let id = entity.id;
        match entity.kind {
            EntityKind::Hill => self.hills.remove(id).is_some(),
            EntityKind::Resource => self.resources.remove(id).is_some(),
            EntityKind::Treasure => self.treasures.remove(id).is_some(),
            EntityKind::Hostile => self.hostiles.remove(id).is_some(),
            EntityKind::Structure => self.structures.remove(id).is_some(),
            EntityKind::AmmoCrate | EntityKind::WeaponCrate => self.items.remove(id).is_some(),
            EntityKind::Wanderer => self.wanderers.remove(id).is_some(),
            EntityKind::Projectile => self.projectiles.remove(id).is_some(),
        }
    }

    /// Returns true if the entity is live.
    #[must_use]
    pub fn contains(&self, entity: EntityRef) -> bool {
        let id = entity.id;
        match entity.kind {
            EntityKind::Hill => self.hills.contains(id),
            EntityKind::Resource => self.resources.contains(id),
            EntityKind::Treasure => self.treasures.contains(id),
            EntityKind::Hostile => self.hostiles.contains(id),
            EntityKind::Structure => self.structures.contains(id),
            EntityKind::AmmoCrate | EntityKind::WeaponCrate => self.items.contains(id),
            EntityKind::Wanderer => self.wanderers.contains(id),
            EntityKind::Projectile => self.projectiles.contains(id),
        }
    }

    /// Number of live entities owned by `coord`, across every registry.
    #[must_use]
    pub fn count_owned_by(&self, coord: ChunkCoord) -> usize {
        self.hills.ids_owned_by(coord).len()
            + self.resources.ids_owned_by(coord).len()
            + self.treasures.ids_owned_by(coord).len()
            + self.hostiles.ids_owned_by(coord).len()
            + self.structures.ids_owned_by(coord).len()
            + self.items.ids_owned_by(coord).len()
            + self.wanderers.ids_owned_by(coord).len()
            + self.projectiles.ids_owned_by(coord).len()
    }

    /// Every owner tag in use, with repeats.
    pub fn owners(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.hills
            .iter()
            .map(|r| r.owner)
            .chain(self.resources.iter().map(|r| r.owner))
            .chain(self.treasures.iter().map(|r| r.owner))
            .chain(self.hostiles.iter().map(|r| r.owner))
            .chain(self.structures.iter().map(|r| r.owner))
            .chain(self.items.iter().map(|r| r.owner))
            .chain(self.wanderers.iter().map(|r| r.owner))
            .chain(self.projectiles.iter().map(|r| r.owner))
            .flatten()
    }

    /// Total live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hills.len()
            + self.resources.len()
            + self.treasures.len()
            + self.hostiles.len()
            + self.structures.len()
            + self.items.len()
            + self.wanderers.len()
            + self.projectiles.len()
    }

    /// Returns true if no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
