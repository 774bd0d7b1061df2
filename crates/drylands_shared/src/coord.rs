//! # Chunk Addressing
//!
//! The world is tiled into `CHUNK_SIZE` x `CHUNK_SIZE` squares on the XZ
//! plane. A chunk is identified by the floor-divided world position of any
//! point inside it.

use serde::{Deserialize, Serialize};

use crate::constants::CHUNK_SIZE;
use crate::math::Vec3;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not world units).
    pub x: i32,
    /// Z coordinate (in chunks, not world units).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing the world point `(world_x, world_z)`.
    #[inline]
    #[must_use]
    pub fn from_world(world_x: f32, world_z: f32) -> Self {
        Self {
            x: (world_x / CHUNK_SIZE).floor() as i32,
            z: (world_z / CHUNK_SIZE).floor() as i32,
        }
    }

    /// Chunk containing a world position. Height is ignored.
    #[inline]
    #[must_use]
    pub fn containing(position: Vec3) -> Self {
        Self::from_world(position.x, position.z)
    }

    /// World position of the chunk's minimum corner, on the ground plane.
    #[inline]
    #[must_use]
    pub fn origin(self) -> Vec3 {
        Vec3::ground(self.x as f32 * CHUNK_SIZE, self.z as f32 * CHUNK_SIZE)
    }

    /// Chebyshev (king-move) distance in chunks.
    #[inline]
    #[must_use]
    pub const fn chebyshev_distance(self, other: Self) -> i32 {
        let dx = (self.x - other.x).abs();
        let dz = (self.z - other.z).abs();
        if dx > dz {
            dx
        } else {
            dz
        }
    }

    /// Every coordinate within Chebyshev `radius`, x-major.
    pub fn neighbourhood(self, radius: i32) -> impl Iterator<Item = Self> {
        let radius = radius.max(0);
        (self.x - radius..=self.x + radius)
            .flat_map(move |x| (self.z - radius..=self.z + radius).map(move |z| Self::new(x, z)))
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_coord_from_world() {
        assert_eq!(ChunkCoord::from_world(0.0, 0.0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world(49.9, 49.9), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world(50.0, 50.0), ChunkCoord::new(1, 1));
        assert_eq!(ChunkCoord::from_world(-0.1, -0.1), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_world(-50.0, -50.0), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_world(-50.1, 120.0), ChunkCoord::new(-2, 2));
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = ChunkCoord::new(0, 0);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(3, -1)), 3);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(-2, 4)), 4);
        assert_eq!(a.chebyshev_distance(a), 0);
    }

    #[test]
    fn test_neighbourhood_size_and_order() {
        let around: Vec<_> = ChunkCoord::new(5, -5).neighbourhood(1).collect();
        assert_eq!(around.len(), 9);
        assert_eq!(around[0], ChunkCoord::new(4, -6));
        assert_eq!(around[1], ChunkCoord::new(4, -5));
        assert_eq!(around[8], ChunkCoord::new(6, -4));
        assert_eq!(ChunkCoord::new(0, 0).neighbourhood(3).count(), 49);
    }

    #[test]
    fn test_origin() {
        assert_eq!(ChunkCoord::new(-1, 2).origin(), Vec3::ground(-50.0, 100.0));
    }
}
