//! # Weapon Catalog
//!
//! The fixed set of weapons that can be found in structures.

use serde::{Deserialize, Serialize};

/// Static description of a weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponSpec {
    /// Name shown on the HUD.
    pub name: &'static str,
    /// Minimum milliseconds between two shots.
    pub fire_interval_ms: u64,
    /// Rounds loaded when the weapon is equipped.
    pub magazine: u32,
    /// Damage multiplier applied to projectiles.
    pub damage: f32,
}

/// Weapons that can be found in structures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Balanced rifle.
    Ak47,
    /// Fast-firing, weaker.
    Mp40,
    /// Slow, small magazine, hits hardest.
    M1Carbine,
}

const AK47: WeaponSpec = WeaponSpec {
    name: "AK-47",
    fire_interval_ms: 80,
    magazine: 30,
    damage: 1.0,
};

const MP40: WeaponSpec = WeaponSpec {
    name: "MP40",
    fire_interval_ms: 50,
    magazine: 32,
    damage: 0.8,
};

const M1_CARBINE: WeaponSpec = WeaponSpec {
    name: "M1 Carbine",
    fire_interval_ms: 120,
    magazine: 15,
    damage: 1.2,
};

impl WeaponKind {
    /// Every kind, in the order the generator indexes into.
    pub const ALL: [Self; 3] = [Self::Ak47, Self::Mp40, Self::M1Carbine];

    /// Returns the static spec for this kind.
    #[inline]
    #[must_use]
    pub const fn spec(self) -> &'static WeaponSpec {
        match self {
            Self::Ak47 => &AK47,
            Self::Mp40 => &MP40,
            Self::M1Carbine => &M1_CARBINE,
        }
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.spec().name
    }

    /// Picks a kind from a uniform draw in `[0, 1)`.
    ///
    /// Out-of-range draws are clamped to the first/last kind.
    #[must_use]
    pub fn from_unit(draw: f64) -> Self {
        let len = Self::ALL.len();
        let index = (draw * len as f64).floor().max(0.0) as usize;
        Self::ALL[index.min(len - 1)]
    }
}
