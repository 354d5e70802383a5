//! Keyboard state.

use bitflags::bitflags;
use winit::keyboard::{KeyCode, ModifiersState};

use crate::button::ButtonSet;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        /// Windows/Command key.
        const SUPER = 1 << 3;
    }
}

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        let mut modifiers = Self::empty();
        modifiers.set(Self::SHIFT, state.shift_key());
        modifiers.set(Self::CTRL, state.control_key());
        modifiers.set(Self::ALT, state.alt_key());
        modifiers.set(Self::SUPER, state.super_key());
        modifiers
    }
}

#[derive(Debug, Default)]
pub struct KeyboardState {
    keys: ButtonSet<KeyCode>,
    modifiers: Modifiers,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        self.keys.set(key, pressed);
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    #[must_use]
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.keys.is_pressed(key)
    }

    #[must_use]
    pub fn is_just_pressed(&self, key: KeyCode) -> bool {
        self.keys.is_just_pressed(key)
    }

    #[must_use]
    pub fn is_just_released(&self, key: KeyCode) -> bool {
        self.keys.is_just_released(key)
    }

    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// -1, 0 or 1 depending on which of two opposing keys are held.
    #[must_use]
    pub fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        f32::from(u8::from(self.is_pressed(positive))) - f32::from(u8::from(self.is_pressed(negative)))
    }

    pub fn end_frame(&mut self) {
        self.keys.end_frame();
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.modifiers = Modifiers::empty();
    }
}
