//! Mouse state.

use glam::Vec2;
use winit::event::MouseButton as WinitMouseButton;

use crate::button::ButtonState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    const COUNT: usize = 3;

    /// Map a winit button; extra buttons are not tracked.
    #[must_use]
    pub const fn from_winit(button: WinitMouseButton) -> Option<Self> {
        match button {
            WinitMouseButton::Left => Some(Self::Left),
            WinitMouseButton::Right => Some(Self::Right),
            WinitMouseButton::Middle => Some(Self::Middle),
            _ => None,
        }
    }
}

/// Cursor position, motion and buttons.
///
/// `delta` follows the cursor inside the window, `raw_delta` accumulates
/// device motion and keeps working when the cursor is grabbed.
#[derive(Debug, Default)]
pub struct MouseState {
    position: Option<Vec2>,
    delta: Vec2,
    raw_delta: Vec2,
    scroll: Vec2,
    buttons: [ButtonState; MouseButton::COUNT],
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_position(&mut self, position: Vec2) {
        if let Some(previous) = self.position {
            self.delta += position - previous;
        }
        self.position = Some(position);
    }

    pub fn add_raw_motion(&mut self, delta: Vec2) {
        self.raw_delta += delta;
    }

    pub fn add_scroll(&mut self, lines: Vec2) {
        self.scroll += lines;
    }

    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        let state = &mut self.buttons[button as usize];
        if pressed {
            state.press();
        } else {
            state.release();
        }
    }

    /// Last known cursor position, `None` before the first move.
    #[must_use]
    pub const fn position(&self) -> Option<Vec2> {
        self.position
    }

    #[must_use]
    pub const fn delta(&self) -> Vec2 {
        self.delta
    }

    #[must_use]
    pub const fn raw_delta(&self) -> Vec2 {
        self.raw_delta
    }

    #[must_use]
    pub const fn scroll(&self) -> Vec2 {
        self.scroll
    }

    #[must_use]
    pub const fn button(&self, button: MouseButton) -> ButtonState {
        self.buttons[button as usize]
    }

    #[must_use]
    pub const fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button as usize].is_pressed()
    }

    pub fn end_frame(&mut self) {
        for button in &mut self.buttons {
            button.end_frame();
        }
        self.delta = Vec2::ZERO;
        self.raw_delta = Vec2::ZERO;
        self.scroll = Vec2::ZERO;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_move_has_no_delta() {
        let mut mouse = MouseState::new();
        mouse.set_position(Vec2::new(100.0, 200.0));
        assert_eq!(mouse.delta(), Vec2::ZERO);
        mouse.set_position(Vec2::new(150.0, 220.0));
        mouse.set_position(Vec2::new(160.0, 220.0));
        assert_eq!(mouse.delta(), Vec2::new(60.0, 20.0));
        mouse.end_frame();
        assert_eq!(mouse.delta(), Vec2::ZERO);
        assert_eq!(mouse.position(), Some(Vec2::new(160.0, 220.0)));
    }

    #[test]
    fn buttons_and_scroll() {
        let mut mouse = MouseState::new();
        mouse.set_button(MouseButton::Right, true);
        mouse.add_scroll(Vec2::new(0.0, 1.5));
        assert!(mouse.button(MouseButton::Right).is_just_pressed());
        assert_eq!(mouse.scroll().y, 1.5);

        mouse.end_frame();
        assert!(mouse.is_pressed(MouseButton::Right));
        assert_eq!(mouse.scroll(), Vec2::ZERO);
    }

    #[test]
    fn extra_buttons_are_ignored() {
        assert_eq!(MouseButton::from_winit(WinitMouseButton::Back), None);
        assert_eq!(
            MouseButton::from_winit(WinitMouseButton::Middle),
            Some(MouseButton::Middle)
        );
    }
}
