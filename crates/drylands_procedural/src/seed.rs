//! # Chunk Seeds
//!
//! Every draw a chunk makes comes from one integer seed mixed from its
//! coordinate. Sub-streams are carved out by adding small fixed offsets to
//! the seed before each draw; there is no generator state to advance.
//!
//! ## Determinism Guarantee
//!
//! Given the same coordinate, every draw produces **exactly** the same value
//! on the same platform, regardless of what was generated before.

use drylands_shared::ChunkCoord;
use serde::{Deserialize, Serialize};

/// First mixing prime (applied to the chunk X coordinate).
const MIX_PRIME_X: i32 = 73_856_093;

/// Second mixing prime (applied to the chunk Z coordinate).
const MIX_PRIME_Z: i32 = 19_349_663;

/// Stateless pseudo-random draw in `[0, 1)`.
///
/// `frac(sin(seed) * 10000)`. Cheap, seed-pure and good enough for
/// placement rolls.
#[inline]
#[must_use]
pub fn seeded_random(seed: f64) -> f64 {
    let x = seed.sin() * 10_000.0;
    x - x.floor()
}

/// Seed of one chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkSeed(i32);

impl ChunkSeed {
    /// Mixes a chunk coordinate into its seed.
    ///
    /// Products wrap in 32 bits before the XOR.
    #[inline]
    #[must_use]
    pub const fn for_coord(coord: ChunkCoord) -> Self {
        Self(coord.x.wrapping_mul(MIX_PRIME_X) ^ coord.z.wrapping_mul(MIX_PRIME_Z))
    }

    /// Wraps a raw seed value.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Draw at `seed + offset`. The addition does not wrap.
    #[inline]
    #[must_use]
    pub fn draw(self, offset: i64) -> f64 {
        seeded_random((i64::from(self.0) + offset) as f64)
    }

    /// Derives a 64-bit sub-seed, e.g. to seed a per-entity RNG.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: i64) -> u64 {
        // Offset by purpose, multiply by an odd 64-bit constant, fold the high half down.
        let mut hash = (self.0 as i64).wrapping_add(purpose) as u64;
        hash ^= purpose as u64;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        hash
    }
}
