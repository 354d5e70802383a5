//! Per-frame button state.

use std::hash::Hash;

use hashbrown::HashMap;

/// State of a key or button within the current frame.
///
/// ```text
/// Released --press--> JustPressed --end_frame--> Pressed
///     ^                                             |
///     |                                          release
///     |                                             v
///     +-------------end_frame------------- JustReleased
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    JustPressed,
    Pressed,
    JustReleased,
    #[default]
    Released,
}

impl ButtonState {
    #[inline]
    #[must_use]
    pub const fn is_pressed(self) -> bool {
        matches!(self, Self::JustPressed | Self::Pressed)
    }

    #[inline]
    #[must_use]
    pub const fn is_just_pressed(self) -> bool {
        matches!(self, Self::JustPressed)
    }

    #[inline]
    #[must_use]
    pub const fn is_just_released(self) -> bool {
        matches!(self, Self::JustReleased)
    }

    /// Repeated presses while held are ignored.
    #[inline]
    pub fn press(&mut self) {
        if !self.is_pressed() {
            *self = Self::JustPressed;
        }
    }

    #[inline]
    pub fn release(&mut self) {
        if self.is_pressed() {
            *self = Self::JustReleased;
        }
    }

    #[inline]
    pub fn end_frame(&mut self) {
        match *self {
            Self::JustPressed => *self = Self::Pressed,
            Self::JustReleased => *self = Self::Released,
            _ => {}
        }
    }
}

/// Button states for an open-ended set of buttons.
#[derive(Debug, Clone)]
pub struct ButtonSet<K> {
    states: HashMap<K, ButtonState>,
}

impl<K> Default for ButtonSet<K> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> ButtonSet<K> {
    pub fn set(&mut self, button: K, pressed: bool) {
        let state = self.states.entry(button).or_default();
        if pressed {
            state.press();
        } else {
            state.release();
        }
    }

    #[must_use]
    pub fn state(&self, button: K) -> ButtonState {
        self.states.get(&button).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_pressed(&self, button: K) -> bool {
        self.state(button).is_pressed()
    }

    #[must_use]
    pub fn is_just_pressed(&self, button: K) -> bool {
        self.state(button).is_just_pressed()
    }

    #[must_use]
    pub fn is_just_released(&self, button: K) -> bool {
        self.state(button).is_just_released()
    }

    pub fn end_frame(&mut self) {
        for state in self.states.values_mut() {
            state.end_frame();
        }
        self.states.retain(|_, s| *s != ButtonState::Released);
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_press_cycle() {
        let mut state = ButtonState::Released;
        state.press();
        assert!(state.is_just_pressed());
        state.end_frame();
        assert_eq!(state, ButtonState::Pressed);
        state.release();
        assert!(state.is_just_released());
        assert!(!state.is_pressed());
        state.end_frame();
        assert_eq!(state, ButtonState::Released);
    }

    #[test]
    fn held_button_ignores_repeat_press() {
        let mut state = ButtonState::Pressed;
        state.press();
        assert_eq!(state, ButtonState::Pressed);

        let mut released = ButtonState::Released;
        released.release();
        assert_eq!(released, ButtonState::Released);
    }

    #[test]
    fn set_forgets_released_buttons() {
        let mut set = ButtonSet::default();
        set.set('a', true);
        assert!(set.is_just_pressed('a'));
        set.end_frame();
        set.set('a', false);
        assert!(set.is_just_released('a'));
        set.end_frame();
        assert_eq!(set.state('a'), ButtonState::Released);
        assert!(set.states.is_empty());
    }
}
