//! Math utilities and helpers.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Linear RGBA color, laid out for direct upload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from a packed `0xAABBGGRR` value.
    #[must_use]
    pub fn from_abgr(packed: u32) -> Self {
        let channel = |shift: u32| ((packed >> shift) & 0xff) as f32 / 255.0;
        Self::rgba(channel(0), channel(8), channel(16), channel(24))
    }

    /// Pack to `0xAABBGGRR`.
    #[must_use]
    pub fn to_abgr(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        channel(self.r) | (channel(self.g) << 8) | (channel(self.b) << 16) | (channel(self.a) << 24)
    }

    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Color> for Vec4 {
    fn from(c: Color) -> Self {
        Self::new(c.r, c.g, c.b, c.a)
    }
}

/// Column-major array form of a matrix, as uploaded to uniform buffers.
#[inline]
#[must_use]
pub fn mat4_cols(m: Mat4) -> [[f32; 4]; 4] {
    m.to_cols_array_2d()
}

/// Rotation that maps `+Y` onto `direction`.
///
/// Degenerate (zero-length) directions yield the identity.
#[must_use]
pub fn rotation_from_y(direction: Vec3) -> glam::Quat {
    let len = direction.length();
    if len <= f32::EPSILON {
        return glam::Quat::IDENTITY;
    }
    glam::Quat::from_rotation_arc(Vec3::Y, direction / len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn abgr_round_trip() {
        let packed = 0xff00_ffff;
        let color = Color::from_abgr(packed);
        assert_relative_eq!(color.r, 1.0);
        assert_relative_eq!(color.g, 1.0);
        assert_relative_eq!(color.b, 0.0);
        assert_relative_eq!(color.a, 1.0);
        assert_eq!(color.to_abgr(), packed);
    }

    #[test]
    fn rotation_from_y_maps_axis() {
        let dir = Vec3::new(1.0, 0.0, 0.0);
        let rotated = rotation_from_y(dir) * Vec3::Y;
        assert_relative_eq!(rotated.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(rotated.y, 0.0, epsilon = 1e-5);
        assert_eq!(rotation_from_y(Vec3::ZERO), glam::Quat::IDENTITY);
    }
}
