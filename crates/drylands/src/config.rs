//! # Engine Configuration
//!
//! Runtime-facing tunables, loaded once at startup.
//!
//! Generation constants (spawn chances, counts, seed layout) are NOT here.
//! They live in `drylands_shared::constants` so world content cannot drift
//! between two configs.
//!
//! ## Format
//!
//! ```toml
//! render_distance = 3
//! hysteresis = 1
//! event_capacity = 4096
//! pickup_radius = 2.0
//! ```
//!
//! Missing keys take their default.

use std::path::Path;

use drylands_shared::constants::{
    HYSTERESIS_BAND, MELEE_DAMAGE, MELEE_RADIUS, PICKUP_RADIUS, PLAYER_SPEED,
    PROJECTILE_HIT_RADIUS, RENDER_DISTANCE, WORLD_BORDER,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default event channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 4096;

/// Default number of missing chunks above which generation goes parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4;

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Chebyshev radius, in chunks, loaded around the player.
    pub render_distance: i32,
    /// Extra ring kept loaded beyond `render_distance` before eviction.
    pub hysteresis: i32,
    /// Capacity of the outbound event channel.
    pub event_capacity: usize,
    /// Pickup radius for resources, treasure and structure items.
    pub pickup_radius: f32,
    /// Radius inside which hostiles damage the player.
    pub melee_radius: f32,
    /// Health lost per hostile in range per tick.
    pub melee_damage: f32,
    /// Radius inside which a projectile hits a hostile.
    pub hit_radius: f32,
    /// Player movement per tick.
    pub player_speed: f32,
    /// Radius of the playable disc.
    pub world_border: f32,
    /// Generate in parallel when at least this many chunks are missing.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_distance: RENDER_DISTANCE,
            hysteresis: HYSTERESIS_BAND,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            pickup_radius: PICKUP_RADIUS,
            melee_radius: MELEE_RADIUS,
            melee_damage: MELEE_DAMAGE,
            hit_radius: PROJECTILE_HIT_RADIUS,
            player_speed: PLAYER_SPEED,
            world_border: WORLD_BORDER,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`EngineConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        fn positive(field: &'static str, value: f32) -> ConfigResult<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive and finite",
                })
            }
        }

        if self.render_distance < 0 {
            return Err(ConfigError::Invalid {
                field: "render_distance",
                reason: "must not be negative",
            });
        }
        if self.hysteresis < 0 {
            return Err(ConfigError::Invalid {
                field: "hysteresis",
                reason: "must not be negative",
            });
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "event_capacity",
                reason: "must be at least 1",
            });
        }
        positive("pickup_radius", self.pickup_radius)?;
        positive("melee_radius", self.melee_radius)?;
        positive("hit_radius", self.hit_radius)?;
        positive("player_speed", self.player_speed)?;
        positive("world_border", self.world_border)?;
        if !(self.melee_damage.is_finite() && self.melee_damage >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "melee_damage",
                reason: "must not be negative",
            });
        }
        Ok(())
    }

    /// Chebyshev distance beyond which loaded chunks are evicted.
    #[inline]
    #[must_use]
    pub const fn unload_distance(&self) -> i32 {
        self.render_distance + self.hysteresis
    }
}
