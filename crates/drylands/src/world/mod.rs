//! # World State
//!
//! - [`entities`]: per-variant registries and the shared id allocator
//! - [`chunks`]: which coordinates are loaded and what they own
//! - [`streaming`]: keeps the window around the player loaded

pub mod chunks;
pub mod entities;
pub mod streaming;

pub use chunks::{ChunkRegistry, ChunkStats, LoadedChunk};
pub use entities::{
    EntityKind, EntityRef, EntityRegistries, Hill, Hostile, ItemContents, Projectile, Resource,
    Structure, StructureItem, Treasure, Wanderer,
};
pub use streaming::{StreamingController, StreamingReport};
