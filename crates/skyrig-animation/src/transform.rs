use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Joint transform relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn to_matrix(self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Component-wise interpolation; rotations take the shortest arc.
    #[must_use]
    pub fn interpolate(self, other: Self, t: f32) -> Self {
        Self {
            translation: self.translation.lerp(other.translation, t),
            rotation: self.rotation.slerp(other.rotation, t),
            scale: self.scale.lerp(other.scale, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn halfway_interpolation() {
        let a = Transform::IDENTITY;
        let b = Transform::from_translation(Vec3::new(2.0, 0.0, 0.0))
            .with_rotation(Quat::from_rotation_z(FRAC_PI_2));
        let mid = a.interpolate(b, 0.5);
        assert_relative_eq!(mid.translation.x, 1.0);
        let (axis, angle) = mid.rotation.to_axis_angle();
        assert_relative_eq!(axis.z, 1.0, epsilon = 1e-5);
        assert_relative_eq!(angle, FRAC_PI_2 / 2.0, epsilon = 1e-5);
    }
}
