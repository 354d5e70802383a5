//! Gamepad state.
//!
//! winit has no gamepad support; the host feeds axis and button changes in
//! through [`InputEvent`](crate::InputEvent).

use glam::Vec2;

use crate::button::ButtonSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    South,
    East,
    West,
    North,
    LeftShoulder,
    RightShoulder,
    Start,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadAxis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
}

#[derive(Debug)]
pub struct GamepadState {
    left: Vec2,
    right: Vec2,
    buttons: ButtonSet<GamepadButton>,
    dead_zone: f32,
}

impl Default for GamepadState {
    fn default() -> Self {
        Self {
            left: Vec2::ZERO,
            right: Vec2::ZERO,
            buttons: ButtonSet::default(),
            dead_zone: Self::DEFAULT_DEAD_ZONE,
        }
    }
}

impl GamepadState {
    pub const DEFAULT_DEAD_ZONE: f32 = 0.15;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_dead_zone(&mut self, dead_zone: f32) {
        self.dead_zone = dead_zone.clamp(0.0, 0.95);
    }

    pub fn set_axis(&mut self, axis: GamepadAxis, value: f32) {
        let value = value.clamp(-1.0, 1.0);
        match axis {
            GamepadAxis::LeftStickX => self.left.x = value,
            GamepadAxis::LeftStickY => self.left.y = value,
            GamepadAxis::RightStickX => self.right.x = value,
            GamepadAxis::RightStickY => self.right.y = value,
        }
    }

    pub fn set_button(&mut self, button: GamepadButton, pressed: bool) {
        self.buttons.set(button, pressed);
    }

    #[must_use]
    pub fn left_stick(&self) -> Vec2 {
        self.filtered(self.left)
    }

    #[must_use]
    pub fn right_stick(&self) -> Vec2 {
        self.filtered(self.right)
    }

    #[must_use]
    pub fn buttons(&self) -> &ButtonSet<GamepadButton> {
        &self.buttons
    }

    /// Radial dead zone, rescaled so output starts at zero on its edge.
    fn filtered(&self, stick: Vec2) -> Vec2 {
        let length = stick.length();
        if length <= self.dead_zone {
            return Vec2::ZERO;
        }
        let scaled = ((length - self.dead_zone) / (1.0 - self.dead_zone)).min(1.0);
        stick / length * scaled
    }

    pub fn end_frame(&mut self) {
        self.buttons.end_frame();
    }

    pub fn clear(&mut self) {
        self.left = Vec2::ZERO;
        self.right = Vec2::ZERO;
        self.buttons.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dead_zone_swallows_drift() {
        let mut pad = GamepadState::new();
        pad.set_axis(GamepadAxis::LeftStickX, 0.1);
        assert_eq!(pad.left_stick(), Vec2::ZERO);
    }

    #[test]
    fn full_deflection_stays_unit() {
        let mut pad = GamepadState::new();
        pad.set_axis(GamepadAxis::RightStickY, 2.0);
        assert_relative_eq!(pad.right_stick().y, 1.0);
        pad.set_axis(GamepadAxis::RightStickY, -0.575);
        assert_relative_eq!(pad.right_stick().y, -0.5, epsilon = 1e-5);
    }

    #[test]
    fn buttons_track_edges() {
        let mut pad = GamepadState::new();
        pad.set_button(GamepadButton::Start, true);
        assert!(pad.buttons().is_just_pressed(GamepadButton::Start));
        pad.end_frame();
        assert!(pad.buttons().is_pressed(GamepadButton::Start));
        pad.clear();
        assert!(!pad.buttons().is_pressed(GamepadButton::Start));
    }
}
