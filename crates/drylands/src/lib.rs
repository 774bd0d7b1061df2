//! # DRYLANDS
//!
//! The engine crate: an infinite, chunk-streamed survival world around a
//! single player.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              ENGINE                                     │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐   │
//! │  │   Streaming     │────>│   Chunk         │────>│   Entity        │   │
//! │  │   Controller    │     │   Registry      │     │   Registries    │   │
//! │  │                 │     │                 │     │                 │   │
//! │  │  • Window       │     │  • Generator    │     │  • Per variant  │   │
//! │  │  • Hysteresis   │     │  • Staged load  │     │  • Owner tags   │   │
//! │  └─────────────────┘     └────────┬────────┘     └────────┬────────┘   │
//! │                                   │                       │            │
//! │                                   ▼                       ▼            │
//! │                          ┌─────────────────┐     ┌─────────────────┐   │
//! │                          │   Event Bus     │<────│   Gameplay      │   │
//! │                          │                 │     │                 │   │
//! │                          │  • Bounded      │     │  • Pickups      │   │
//! │                          │  • Lock-free    │     │  • Combat       │   │
//! │                          └─────────────────┘     └─────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `engine`: the context value and the tick order
//! - `world`: chunks, entities, streaming
//! - `gameplay`: player, pickups, melee, combat, wanderers
//! - `events`: outbound event channel
//! - `game_loop`: headless frame driver and statistics
//! - `config`, `error`: runtime tunables and error types

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod game_loop;
pub mod gameplay;
pub mod world;

// Re-export the lower layers
pub use drylands_core as core;
pub use drylands_procedural as procedural;
pub use drylands_shared as shared;

// Re-export commonly used types
pub use config::EngineConfig;
pub use engine::{Engine, FrameInput, HudSnapshot, TickReport};
pub use error::{ChunkError, ConfigError, EngineError, EngineResult};
pub use events::{DespawnCause, EventBus, EventReceiver, EventSender, GameEvent, SpawnedEntity};
pub use game_loop::{FrameCommand, FrameStats, FrameStatsAccumulator, GameLoop, GameLoopConfig};
pub use gameplay::{FireOutcome, GameState, PlayerState};
