//! # Entity Bookkeeping
//!
//! - Entity IDs are monotonically allocated `u64`s
//! - Each entity variant lives in its own [`Registry`]
//! - A [`Record`] carries identity, position and owning chunk next to the
//!   variant payload

mod entity;
mod registry;

pub use entity::{EntityAllocator, EntityId};
pub use registry::{Record, Registry};
