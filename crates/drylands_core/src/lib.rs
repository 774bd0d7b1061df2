//! # Drylands Core
//!
//! Entity bookkeeping shared by every registry in the engine.
//!
//! ## Architecture Rules
//!
//! 1. **Ids are never reused** - a despawned id can never alias a new entity
//! 2. **Ownership is a plain tag** - a record names the chunk that spawned it,
//!    nothing points into a scene graph
//! 3. **Iteration order is insertion order** - passes that resolve
//!    "first hit wins" stay deterministic
//!
//! ## Example
//!
//! ```rust,ignore
//! use drylands_core::{EntityAllocator, Record, Registry};
//!
//! let mut ids = EntityAllocator::new();
//! let mut hostiles: Registry<f32> = Registry::new();
//! hostiles.insert(Record::new(ids.allocate(), position, Some(coord), 50.0));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;

pub use ecs::{EntityAllocator, EntityId, Record, Registry};
