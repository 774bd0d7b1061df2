//! Vector math shared by the generator and the engine.
//!
//! World space is Y-up. The ground plane is XZ, which is also the plane
//! chunks tile.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Position, velocity or direction in world space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// East-west.
    pub x: f32,
    /// Height above the ground plane.
    pub y: f32,
    /// North-south.
    pub z: f32,
}

impl Vec3 {
    /// The origin, and the "no movement" intent.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a vector.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Point or direction on the ground plane.
    #[must_use]
    pub const fn ground(x: f32, z: f32) -> Self {
        Self::new(x, 0.0, z)
    }

    /// Squared length, for comparisons that skip the root.
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Euclidean length, height included. Pickup, melee and projectile
    /// ranges are all measured with this.
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Length of the XZ projection. Distance from the world's vertical axis.
    #[must_use]
    pub fn horizontal_length(self) -> f32 {
        self.x.hypot(self.z)
    }

    /// Distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction. Anything shorter than
    /// `f32::EPSILON` maps to zero, so a zero aim fires a still projectile.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            return Self::ZERO;
        }
        self * len.recip()
    }

    /// True for an exact zero vector, i.e. an idle movement intent.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_distance_includes_height() {
        let player = Vec3::ground(1.0, 2.0);
        let pickup = Vec3::new(1.0, 0.5, 2.0);
        assert_eq!(player.distance(pickup), 0.5);
        assert_eq!((pickup - player).horizontal_length(), 0.0);
    }

    #[test]
    fn test_normalized_zero_stays_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
        let n = Vec3::ground(3.0, 4.0).normalized();
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!(Vec3::ZERO.is_zero());
        assert!(!Vec3::new(0.0, -0.0001, 0.0).is_zero());
    }

    #[test]
    fn test_horizontal_length_ignores_height() {
        assert_eq!(Vec3::new(3.0, 100.0, 4.0).horizontal_length(), 5.0);
    }

    #[test]
    fn test_vec3_is_plain_old_data() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 12);
        assert_eq!(*bytemuck::from_bytes::<Vec3>(bytes), v);
    }
}
