//! On-screen twin-stick control for touch screens.
//!
//! A touch that starts on the left half of the screen drives the move
//! stick, one on the right half drives the look stick. Each stick is
//! centered where its touch began.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Stick {
    touch_id: u64,
    origin: Vec2,
    current: Vec2,
}

#[derive(Debug, Clone)]
pub struct VirtualJoystick {
    /// Touch travel in pixels for full deflection.
    radius: f32,
    screen_width: f32,
    left: Option<Stick>,
    right: Option<Stick>,
}

impl VirtualJoystick {
    pub const DEFAULT_RADIUS: f32 = 100.0;

    #[must_use]
    pub fn new(screen_width: f32) -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            screen_width,
            left: None,
            right: None,
        }
    }

    pub fn set_screen_width(&mut self, width: f32) {
        self.screen_width = width;
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(1.0);
    }

    pub fn touch(&mut self, id: u64, phase: TouchPhase, position: Vec2) {
        match phase {
            TouchPhase::Started => {
                let slot = if position.x < self.screen_width * 0.5 {
                    &mut self.left
                } else {
                    &mut self.right
                };
                if slot.is_none() {
                    *slot = Some(Stick {
                        touch_id: id,
                        origin: position,
                        current: position,
                    });
                }
            }
            TouchPhase::Moved => {
                for stick in [&mut self.left, &mut self.right].into_iter().flatten() {
                    if stick.touch_id == id {
                        stick.current = position;
                    }
                }
            }
            TouchPhase::Ended => {
                for slot in [&mut self.left, &mut self.right] {
                    if slot.is_some_and(|s| s.touch_id == id) {
                        *slot = None;
                    }
                }
            }
        }
    }

    /// Deflection in [-1, 1] per axis, y up.
    #[must_use]
    pub fn stick(&self, side: StickSide) -> Vec2 {
        let stick = match side {
            StickSide::Left => self.left,
            StickSide::Right => self.right,
        };
        stick.map_or(Vec2::ZERO, |s| {
            let offset = (s.current - s.origin) / self.radius;
            Vec2::new(offset.x, -offset.y).clamp_length_max(1.0)
        })
    }

    #[must_use]
    pub const fn is_active(&self, side: StickSide) -> bool {
        match side {
            StickSide::Left => self.left.is_some(),
            StickSide::Right => self.right.is_some(),
        }
    }

    pub fn clear(&mut self) {
        self.left = None;
        self.right = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn touch_side_picks_stick() {
        let mut joystick = VirtualJoystick::new(800.0);
        joystick.touch(1, TouchPhase::Started, Vec2::new(100.0, 300.0));
        joystick.touch(2, TouchPhase::Started, Vec2::new(700.0, 300.0));
        joystick.touch(1, TouchPhase::Moved, Vec2::new(150.0, 300.0));
        joystick.touch(2, TouchPhase::Moved, Vec2::new(700.0, 250.0));

        assert_relative_eq!(joystick.stick(StickSide::Left).x, 0.5);
        // Screen y grows downward, stick y grows upward.
        assert_relative_eq!(joystick.stick(StickSide::Right).y, 0.5);
    }

    #[test]
    fn deflection_is_clamped() {
        let mut joystick = VirtualJoystick::new(800.0);
        joystick.touch(7, TouchPhase::Started, Vec2::new(10.0, 10.0));
        joystick.touch(7, TouchPhase::Moved, Vec2::new(410.0, 10.0));
        assert_relative_eq!(joystick.stick(StickSide::Left).length(), 1.0);
    }

    #[test]
    fn ending_touch_recenters() {
        let mut joystick = VirtualJoystick::new(800.0);
        joystick.touch(3, TouchPhase::Started, Vec2::new(10.0, 10.0));
        joystick.touch(3, TouchPhase::Moved, Vec2::new(60.0, 10.0));
        joystick.touch(3, TouchPhase::Ended, Vec2::new(60.0, 10.0));
        assert!(!joystick.is_active(StickSide::Left));
        assert_eq!(joystick.stick(StickSide::Left), Vec2::ZERO);
    }

    #[test]
    fn second_touch_on_busy_side_is_ignored() {
        let mut joystick = VirtualJoystick::new(800.0);
        joystick.touch(1, TouchPhase::Started, Vec2::new(10.0, 10.0));
        joystick.touch(2, TouchPhase::Started, Vec2::new(20.0, 10.0));
        joystick.touch(2, TouchPhase::Moved, Vec2::new(120.0, 10.0));
        assert_eq!(joystick.stick(StickSide::Left), Vec2::ZERO);
    }
}
