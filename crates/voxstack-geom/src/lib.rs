//! Minimal geometry and addressing types shared by the voxstack crates.
#![forbid(unsafe_code)]

pub mod morton;

pub use morton::MortonKey;

use core::ops::{Add, AddAssign, Mul, Neg};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Lifts a decoded grid coordinate into space, `scale` units per cell.
    #[inline]
    pub fn from_grid((x, y, z): (u32, u32, u32), scale: f32) -> Self {
        Self::new(x as f32 * scale, y as f32 * scale, z as f32 * scale)
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Integer-valued lattice points survive add/neg exactly
        #[test]
        fn add_neg_cancels(x in -1000i32..1000, y in -1000i32..1000, z in -1000i32..1000) {
            let v = Vec3::new(x as f32, y as f32, z as f32);
            prop_assert_eq!(v + -v, Vec3::ZERO);
        }
    }

    #[test]
    fn from_grid_scales_each_axis() {
        assert_eq!(Vec3::from_grid((1, 2, 3), 0.25), Vec3::new(0.25, 0.5, 0.75));
    }

    #[test]
    fn basis_cross_is_right_handed() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
        assert_eq!(Vec3::X.dot(Vec3::Y), 0.0);
    }
}
