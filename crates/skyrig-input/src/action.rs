//! Named actions bound to device inputs.

use hashbrown::HashMap;
use winit::keyboard::KeyCode;

use crate::button::ButtonState;
use crate::gamepad::{GamepadButton, GamepadState};
use crate::keyboard::{KeyboardState, Modifiers};
use crate::mouse::{MouseButton, MouseState};

/// Application-level actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Exit,
    ResetCamera,
    ToggleUi,
    ToggleFullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    Key(KeyCode),
    KeyWithModifiers(KeyCode, Modifiers),
    Mouse(MouseButton),
    Gamepad(GamepadButton),
}

impl From<KeyCode> for InputBinding {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

impl From<MouseButton> for InputBinding {
    fn from(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

impl From<GamepadButton> for InputBinding {
    fn from(button: GamepadButton) -> Self {
        Self::Gamepad(button)
    }
}

/// Borrowed device states an action map is evaluated against.
#[derive(Clone, Copy)]
pub struct DeviceStates<'a> {
    pub keyboard: &'a KeyboardState,
    pub mouse: &'a MouseState,
    pub gamepad: &'a GamepadState,
}

impl DeviceStates<'_> {
    fn binding_state(&self, binding: InputBinding) -> ButtonState {
        match binding {
            InputBinding::Key(key) => key_state(self.keyboard, key),
            InputBinding::KeyWithModifiers(key, modifiers) => {
                if self.keyboard.modifiers().contains(modifiers) {
                    key_state(self.keyboard, key)
                } else {
                    ButtonState::Released
                }
            }
            InputBinding::Mouse(button) => self.mouse.button(button),
            InputBinding::Gamepad(button) => self.gamepad.buttons().state(button),
        }
    }
}

fn key_state(keyboard: &KeyboardState, key: KeyCode) -> ButtonState {
    if keyboard.is_just_pressed(key) {
        ButtonState::JustPressed
    } else if keyboard.is_pressed(key) {
        ButtonState::Pressed
    } else if keyboard.is_just_released(key) {
        ButtonState::JustReleased
    } else {
        ButtonState::Released
    }
}

#[derive(Debug, Default)]
struct ActionEntry {
    bindings: Vec<InputBinding>,
    state: ButtonState,
}

/// Maps actions to any number of bindings.
#[derive(Debug, Default)]
pub struct ActionMap {
    actions: HashMap<Action, ActionEntry>,
}

impl ActionMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default bindings for desktop and gamepad play.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        map.bind(Action::Exit, KeyCode::Escape);
        map.bind(Action::Exit, GamepadButton::Select);
        map.bind(Action::ResetCamera, KeyCode::Space);
        map.bind(Action::ResetCamera, GamepadButton::North);
        map.bind(Action::ToggleUi, KeyCode::F1);
        map.bind(Action::ToggleUi, GamepadButton::Start);
        map.bind(
            Action::ToggleFullscreen,
            InputBinding::KeyWithModifiers(KeyCode::Enter, Modifiers::ALT),
        );
        map
    }

    pub fn bind(&mut self, action: Action, binding: impl Into<InputBinding>) {
        let binding = binding.into();
        let entry = self.actions.entry(action).or_default();
        if !entry.bindings.contains(&binding) {
            entry.bindings.push(binding);
        }
    }

    pub fn unbind(&mut self, action: Action, binding: InputBinding) {
        if let Some(entry) = self.actions.get_mut(&action) {
            entry.bindings.retain(|b| *b != binding);
        }
    }

    #[must_use]
    pub fn bindings(&self, action: Action) -> &[InputBinding] {
        self.actions
            .get(&action)
            .map_or(&[], |entry| entry.bindings.as_slice())
    }

    /// Recompute every action from the current device states.
    pub fn update(&mut self, devices: DeviceStates<'_>) {
        for entry in self.actions.values_mut() {
            let states: Vec<ButtonState> = entry
                .bindings
                .iter()
                .map(|b| devices.binding_state(*b))
                .collect();
            let pressed = states.iter().any(|s| s.is_pressed());
            let just_pressed = states.iter().any(|s| s.is_just_pressed());
            let just_released = !pressed && states.iter().any(|s| s.is_just_released());

            if just_pressed && !entry.state.is_pressed() {
                entry.state = ButtonState::JustPressed;
            } else if just_released && entry.state.is_pressed() {
                entry.state = ButtonState::JustReleased;
            } else if !pressed && !just_released {
                entry.state = ButtonState::Released;
            }
        }
    }

    #[must_use]
    pub fn state(&self, action: Action) -> ButtonState {
        self.actions
            .get(&action)
            .map(|entry| entry.state)
            .unwrap_or_default()
    }

    pub fn end_frame(&mut self) {
        for entry in self.actions.values_mut() {
            entry.state.end_frame();
        }
    }

    /// Drop per-frame state, keeping bindings.
    pub fn reset(&mut self) {
        for entry in self.actions.values_mut() {
            entry.state = ButtonState::Released;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_binding_triggers_action() {
        let mut map = ActionMap::with_defaults();
        let keyboard = KeyboardState::new();
        let mouse = MouseState::new();
        let mut gamepad = GamepadState::new();
        gamepad.set_button(GamepadButton::North, true);

        map.update(DeviceStates {
            keyboard: &keyboard,
            mouse: &mouse,
            gamepad: &gamepad,
        });
        assert!(map.state(Action::ResetCamera).is_just_pressed());
        assert!(!map.state(Action::Exit).is_pressed());
    }

    #[test]
    fn modifier_binding_needs_modifier() {
        let mut map = ActionMap::with_defaults();
        let mut keyboard = KeyboardState::new();
        let mouse = MouseState::new();
        let gamepad = GamepadState::new();
        keyboard.set_key(KeyCode::Enter, true);

        map.update(DeviceStates {
            keyboard: &keyboard,
            mouse: &mouse,
            gamepad: &gamepad,
        });
        assert!(!map.state(Action::ToggleFullscreen).is_pressed());

        keyboard.set_modifiers(Modifiers::ALT);
        map.update(DeviceStates {
            keyboard: &keyboard,
            mouse: &mouse,
            gamepad: &gamepad,
        });
        assert!(map.state(Action::ToggleFullscreen).is_just_pressed());
    }

    #[test]
    fn unbind_removes_single_binding() {
        let mut map = ActionMap::with_defaults();
        map.unbind(Action::Exit, InputBinding::Key(KeyCode::Escape));
        assert_eq!(
            map.bindings(Action::Exit),
            &[InputBinding::Gamepad(GamepadButton::Select)]
        );
    }
}
