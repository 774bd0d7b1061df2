//! # Drylands Procedural Generation
//!
//! Deterministic chunk content for an infinite, reproducible world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: a chunk's content is a pure function of its coordinate
//! 2. **Chunked**: content is generated one chunk at a time
//! 3. **Streamable**: chunks can be generated and discarded independently,
//!    from any thread
//!
//! ## Core Components
//!
//! - `ChunkSeed`: coordinate mixing and the stateless `[0, 1)` draw
//! - `ChunkGenerator`: produces a flat list of spawn descriptors
//!
//! ## Example
//!
//! ```rust,ignore
//! use drylands_procedural::ChunkGenerator;
//! use drylands_shared::ChunkCoord;
//!
//! let content = ChunkGenerator::new().generate(ChunkCoord::new(0, 0));
//! assert_eq!(content, ChunkGenerator::new().generate(ChunkCoord::new(0, 0)));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod seed;

pub use chunk::{ChunkContent, ChunkGenerator, SpawnDescriptor, SpawnKind};
pub use seed::{seeded_random, ChunkSeed};
