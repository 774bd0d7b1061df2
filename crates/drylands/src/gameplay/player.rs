//! # Player State
//!
//! The single chunk-independent actor. Health and hunger are only reachable
//! through clamping accessors, so no sequence of ticks can push them outside
//! `[0, VITAL_MAX]`.

use drylands_shared::constants::{STARTING_AMMO, VITAL_MAX};
use drylands_shared::{Vec3, WeaponKind};
use serde::{Deserialize, Serialize};

/// Overall game state.
///
/// ```text
/// Running ──treasure──> Victory
///    │
///    └──health <= 0──> Defeat
/// ```
///
/// Both terminal states are final.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// World mutation happens every tick.
    #[default]
    Running,
    /// Treasure found.
    Victory,
    /// Player died.
    Defeat,
}

impl GameState {
    /// Returns true for Victory and Defeat.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Victory => "Victory",
            Self::Defeat => "Defeat",
        }
    }
}

/// Player state, mutated by the tick passes and read by the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    /// World position.
    pub position: Vec3,
    /// Yaw in radians.
    pub facing: f32,
    /// Rounds available.
    pub ammo: u32,
    /// Equipped weapon.
    pub weapon: Option<WeaponKind>,
    /// Resources picked up this game.
    pub resources_collected: u32,
    /// Treasures picked up this game.
    pub treasures_found: u32,
    /// Timestamp of the last accepted shot.
    pub last_shot_ms: Option<u64>,
    health: f32,
    hunger: f32,
}

impl PlayerState {
    /// Creates a player at the origin with full vitals and no weapon.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            facing: 0.0,
            ammo: STARTING_AMMO,
            weapon: None,
            resources_collected: 0,
            treasures_found: 0,
            last_shot_ms: None,
            health: VITAL_MAX,
            hunger: VITAL_MAX,
        }
    }

    /// Health in `[0, 100]`.
    #[inline]
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Hunger in `[0, 100]`. 100 is fed, 0 is starving.
    #[inline]
    #[must_use]
    pub const fn hunger(&self) -> f32 {
        self.hunger
    }

    /// Sets health, clamped.
    pub fn set_health(&mut self, health: f32) {
        self.health = clamp_vital(health);
    }

    /// Sets hunger, clamped.
    pub fn set_hunger(&mut self, hunger: f32) {
        self.hunger = clamp_vital(hunger);
    }

    /// Removes health, stopping at 0.
    pub fn damage(&mut self, amount: f32) {
        self.set_health(self.health - amount);
    }

    /// Restores hunger, stopping at 100.
    pub fn feed(&mut self, amount: f32) {
        self.set_hunger(self.hunger + amount);
    }

    /// Removes hunger, stopping at 0.
    pub fn drain_hunger(&mut self, amount: f32) {
        self.set_hunger(self.hunger - amount);
    }

    /// Returns true once hunger is exhausted.
    #[inline]
    #[must_use]
    pub fn is_starving(&self) -> bool {
        self.hunger <= 0.0
    }

    /// Returns true once health is exhausted.
    #[inline]
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Equips `kind` and loads a full magazine. The previous count is lost.
    pub fn equip(&mut self, kind: WeaponKind) {
        self.weapon = Some(kind);
        self.ammo = kind.spec().magazine;
    }

    /// Adds rounds.
    pub fn add_ammo(&mut self, rounds: u32) {
        self.ammo = self.ammo.saturating_add(rounds);
    }

    /// Turns to face the horizontal part of `look`. Near-vertical looks keep
    /// the current facing.
    pub fn face(&mut self, look: Vec3) {
        let flat = Vec3::ground(look.x, look.z);
        if flat.length_squared() > 1e-4 {
            self.facing = flat.x.atan2(flat.z) + std::f32::consts::PI;
        }
    }

    /// HUD name of the equipped weapon.
    #[must_use]
    pub fn weapon_name(&self) -> Option<&'static str> {
        self.weapon.map(WeaponKind::name)
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_vital(value: f32) -> f32 {
    // NaN collapses to 0 so it can never leak into the HUD.
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, VITAL_MAX)
    }
}
