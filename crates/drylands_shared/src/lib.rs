//! # Drylands Shared
//!
//! Common types used by the generator and the engine.
//!
//! ## CRITICAL RULE
//!
//! Every constant that influences generated content lives in [`constants`].
//! Changing one of them changes every world, so they are not runtime
//! configurable.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod coord;
pub mod math;
pub mod weapon;

pub use constants::{CHUNK_SIZE, RENDER_DISTANCE, WORLD_BORDER};
pub use coord::ChunkCoord;
pub use math::Vec3;
pub use weapon::{WeaponKind, WeaponSpec};
