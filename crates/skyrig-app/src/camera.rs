//! Camera and a fly-through controller.

use glam::{Mat4, Vec2, Vec3};

/// Perspective camera with a reverse-Z infinite projection.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_2,
            aspect: 16.0 / 9.0,
            near: 0.1,
        }
    }
}

impl Camera {
    /// Create a camera at `position` looking at `target`.
    #[must_use]
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            direction: (target - position).normalize_or(Vec3::NEG_Z),
            ..Self::default()
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.direction, self.up)
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_infinite_reverse_rh(self.fov, self.aspect, self.near)
    }

    /// Get the view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// View-projection with the translation removed, for sky rendering.
    #[must_use]
    pub fn sky_view_projection_matrix(&self) -> Mat4 {
        let view = Mat4::look_to_rh(Vec3::ZERO, self.direction, self.up);
        self.projection_matrix() * view
    }
}

/// First-person controller driven by device-neutral axes.
#[derive(Debug, Clone)]
pub struct CameraController {
    yaw: f32,
    pitch: f32,
    /// Units per second.
    pub move_speed: f32,
    /// Radians per second at full look input.
    pub look_speed: f32,
    home: (Vec3, Vec3),
}

const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

impl CameraController {
    /// Start from the camera's current pose, which `reset` returns to.
    #[must_use]
    pub fn new(camera: &Camera) -> Self {
        let (yaw, pitch) = Self::angles(camera.direction);
        Self {
            yaw,
            pitch,
            move_speed: 4.0,
            look_speed: 2.0,
            home: (camera.position, camera.direction),
        }
    }

    fn angles(direction: Vec3) -> (f32, f32) {
        let dir = direction.normalize_or(Vec3::NEG_Z);
        (dir.x.atan2(dir.z), (-dir.y).asin())
    }

    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    #[must_use]
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Apply one frame of input.
    ///
    /// `movement` is (right, up, forward) and `look` is (yaw, pitch), both in
    /// the -1..1 range per axis.
    pub fn update(&mut self, camera: &mut Camera, movement: Vec3, look: Vec2, dt: f32) {
        self.yaw -= look.x * self.look_speed * dt;
        self.pitch = (self.pitch + look.y * self.look_speed * dt).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let direction = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            -self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        )
        .normalize();
        camera.direction = direction;

        let forward = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let step = right * movement.x + Vec3::Y * movement.y + forward * movement.z;
        if step != Vec3::ZERO {
            camera.position += step.clamp_length_max(1.0) * self.move_speed * dt;
        }
    }

    /// Return the camera to where the controller was created.
    pub fn reset(&mut self, camera: &mut Camera) {
        let (position, direction) = self.home;
        camera.position = position;
        camera.direction = direction;
        (self.yaw, self.pitch) = Self::angles(direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn forward_moves_along_view() {
        let mut camera = Camera::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut controller = CameraController::new(&camera);
        controller.update(&mut camera, Vec3::Z, Vec2::ZERO, 0.5);
        assert_relative_eq!(camera.position.z, -2.0, epsilon = 1e-5);
        assert_relative_eq!(camera.position.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn pitch_is_clamped_and_reset_restores() {
        let mut camera = Camera::default();
        let mut controller = CameraController::new(&camera);
        controller.update(&mut camera, Vec3::X, Vec2::new(0.3, 10.0), 1.0);
        assert!(controller.pitch() <= PITCH_LIMIT);
        assert!(camera.position != Vec3::new(0.0, 0.0, 5.0));

        controller.reset(&mut camera);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 5.0));
        assert_relative_eq!(camera.direction.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn reverse_z_maps_near_plane_to_one() {
        let camera = Camera::default();
        let clip = camera.projection_matrix() * glam::Vec4::new(0.0, 0.0, -camera.near, 1.0);
        assert_relative_eq!(clip.z / clip.w, 1.0, epsilon = 1e-5);
    }
}
