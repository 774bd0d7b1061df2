//! # World Tunables
//!
//! Every fixed number the streamer and the gameplay passes depend on.
//!
//! **CRITICAL:** The spawn chances and count ranges feed the generator.
//! Changing them changes the content of every chunk in every world.

// =============================================================================
// WORLD LAYOUT
// =============================================================================

/// Side length of a chunk in world units.
pub const CHUNK_SIZE: f32 = 50.0;

/// Radius of the playable disc around the origin.
pub const WORLD_BORDER: f32 = 250.0;

/// Chebyshev radius, in chunks, kept loaded around the player.
pub const RENDER_DISTANCE: i32 = 3;

/// Extra ring of chunks kept loaded beyond [`RENDER_DISTANCE`] before eviction.
pub const HYSTERESIS_BAND: i32 = 1;

// =============================================================================
// SPAWN CHANCES (per candidate slot)
// =============================================================================

/// Acceptance chance for a resource slot.
pub const RESOURCE_SPAWN_CHANCE: f64 = 0.15;

/// Acceptance chance for a hostile slot.
pub const ENEMY_SPAWN_CHANCE: f64 = 0.08;

/// Acceptance chance for a structure slot.
pub const BUILDING_SPAWN_CHANCE: f64 = 0.05;

/// Acceptance chance for a wanderer slot next to a structure.
pub const PEASANT_SPAWN_CHANCE: f64 = 0.10;

/// Chance that a chunk holds the treasure.
pub const TREASURE_SPAWN_CHANCE: f64 = 0.02;

/// Chance that a structure holds an ammo crate.
pub const AMMO_CRATE_CHANCE: f64 = 0.6;

/// Chance that a structure holds a weapon crate.
pub const WEAPON_CRATE_CHANCE: f64 = 0.3;

// =============================================================================
// CANDIDATE COUNTS (exclusive upper bounds of the count draw)
// =============================================================================

/// Hills per chunk are drawn from `0..MAX_HILLS`.
pub const MAX_HILLS: u32 = 5;

/// Resource slots per chunk are drawn from `0..MAX_RESOURCE_SLOTS`.
pub const MAX_RESOURCE_SLOTS: u32 = 8;

/// Hostile slots per chunk are drawn from `0..MAX_ENEMY_SLOTS`.
pub const MAX_ENEMY_SLOTS: u32 = 6;

/// Structure slots per chunk are drawn from `0..MAX_BUILDING_SLOTS`.
pub const MAX_BUILDING_SLOTS: u32 = 3;

/// Wanderer slots per structure are drawn from `0..MAX_PEASANT_SLOTS`.
pub const MAX_PEASANT_SLOTS: u32 = 2;

// =============================================================================
// INTERACTION RADII
// =============================================================================

/// Pickup radius for resources, treasure and structure items.
pub const PICKUP_RADIUS: f32 = 2.0;

/// Radius inside which a hostile damages the player.
pub const MELEE_RADIUS: f32 = 1.5;

/// Radius inside which a projectile hits a hostile.
pub const PROJECTILE_HIT_RADIUS: f32 = 1.0;

// =============================================================================
// PLAYER
// =============================================================================

/// Player movement per tick at full intent.
pub const PLAYER_SPEED: f32 = 0.3;

/// Upper bound for health and hunger.
pub const VITAL_MAX: f32 = 100.0;

/// Hunger lost every tick.
pub const HUNGER_DECAY_IDLE: f32 = 0.005;

/// Additional hunger lost on ticks where the player moved.
pub const HUNGER_DECAY_MOVING: f32 = 0.01;

/// Health lost per tick while hunger is exhausted.
pub const STARVATION_DAMAGE: f32 = 0.5;

/// Hunger restored by one resource.
pub const RESOURCE_HUNGER_RESTORE: f32 = 15.0;

/// Health lost per tick per hostile in melee range.
pub const MELEE_DAMAGE: f32 = 0.2;

/// Rounds the player starts with.
pub const STARTING_AMMO: u32 = 30;

// =============================================================================
// ENTITIES
// =============================================================================

/// Health of a freshly spawned hostile.
pub const HOSTILE_HEALTH: f32 = 50.0;

/// Rounds inside an ammo crate.
pub const AMMO_CRATE_AMOUNT: u32 = 25;

/// Rounds awarded per hostile killed.
pub const KILL_AMMO_BONUS: u32 = 2;

/// Projectile travel per tick.
pub const PROJECTILE_SPEED: f32 = 1.0;

/// Projectiles older than this many ticks are despawned.
pub const PROJECTILE_MAX_AGE: u32 = 500;

/// Wanderer travel per tick.
pub const WANDERER_SPEED: f32 = 0.05;

/// Minimum ticks between wanderer heading changes.
pub const WANDER_TIMER_MIN: u32 = 50;

/// Exclusive maximum ticks between wanderer heading changes.
pub const WANDER_TIMER_MAX: u32 = 150;

/// Largest heading change, in radians, either way.
pub const WANDER_HEADING_JITTER: f32 = 0.25;

/// Half-width of the square around a structure where wanderers spawn.
pub const WANDERER_SPAWN_SPREAD: f64 = 4.0;
