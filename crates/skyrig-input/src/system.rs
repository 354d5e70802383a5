//! The hot-swappable input system.

use std::fmt;
use std::str::FromStr;

use glam::{Vec2, Vec3};
use tracing::{debug, info, warn};
use winit::event::{DeviceEvent, ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::action::{Action, ActionMap, DeviceStates};
use crate::button::ButtonState;
use crate::gamepad::{GamepadAxis, GamepadButton, GamepadState};
use crate::joystick::{StickSide, TouchPhase, VirtualJoystick};
use crate::keyboard::{KeyboardState, Modifiers};
use crate::mouse::{MouseButton, MouseState};

/// The device that drives camera and actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InputDevice {
    #[default]
    KeyboardMouse,
    Gamepad,
    VirtualJoystick,
}

impl InputDevice {
    pub const ALL: [Self; 3] = [Self::KeyboardMouse, Self::Gamepad, Self::VirtualJoystick];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KeyboardMouse => "keyboard",
            Self::Gamepad => "gamepad",
            Self::VirtualJoystick => "touch",
        }
    }
}

impl fmt::Display for InputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputDevice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keyboard" | "kbm" | "mouse" => Ok(Self::KeyboardMouse),
            "gamepad" | "controller" => Ok(Self::Gamepad),
            "touch" | "joystick" | "virtual-joystick" => Ok(Self::VirtualJoystick),
            other => Err(format!("unknown input device '{other}'")),
        }
    }
}

/// Host-independent input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { key: KeyCode, pressed: bool },
    Modifiers(Modifiers),
    CursorMoved(Vec2),
    MouseMotion(Vec2),
    MouseButton { button: MouseButton, pressed: bool },
    Scroll(Vec2),
    GamepadAxis { axis: GamepadAxis, value: f32 },
    GamepadButton { button: GamepadButton, pressed: bool },
    Touch { id: u64, phase: TouchPhase, position: Vec2 },
}

impl InputEvent {
    /// Convert a winit window event, if it carries input.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return None;
                };
                Some(Self::Key {
                    key,
                    pressed: event.state == ElementState::Pressed,
                })
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                Some(Self::Modifiers(Modifiers::from(modifiers.state())))
            }
            WindowEvent::CursorMoved { position, .. } => Some(Self::CursorMoved(Vec2::new(
                position.x as f32,
                position.y as f32,
            ))),
            WindowEvent::MouseInput { button, state, .. } => {
                MouseButton::from_winit(*button).map(|button| Self::MouseButton {
                    button,
                    pressed: *state == ElementState::Pressed,
                })
            }
            WindowEvent::MouseWheel { delta, .. } => Some(Self::Scroll(match delta {
                MouseScrollDelta::LineDelta(x, y) => Vec2::new(*x, *y),
                // Roughly one line per 100 pixels.
                MouseScrollDelta::PixelDelta(pos) => {
                    Vec2::new(pos.x as f32, pos.y as f32) / 100.0
                }
            })),
            WindowEvent::Touch(touch) => {
                let phase = match touch.phase {
                    winit::event::TouchPhase::Started => TouchPhase::Started,
                    winit::event::TouchPhase::Moved => TouchPhase::Moved,
                    winit::event::TouchPhase::Ended | winit::event::TouchPhase::Cancelled => {
                        TouchPhase::Ended
                    }
                };
                Some(Self::Touch {
                    id: touch.id,
                    phase,
                    position: Vec2::new(touch.location.x as f32, touch.location.y as f32),
                })
            }
            _ => None,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn from_device_event(event: &DeviceEvent) -> Option<Self> {
        match event {
            DeviceEvent::MouseMotion { delta } => {
                Some(Self::MouseMotion(Vec2::new(delta.0 as f32, delta.1 as f32)))
            }
            _ => None,
        }
    }

    /// The device this event belongs to.
    #[must_use]
    pub const fn device(&self) -> InputDevice {
        match self {
            Self::Key { .. }
            | Self::Modifiers(_)
            | Self::CursorMoved(_)
            | Self::MouseMotion(_)
            | Self::MouseButton { .. }
            | Self::Scroll(_) => InputDevice::KeyboardMouse,
            Self::GamepadAxis { .. } | Self::GamepadButton { .. } => InputDevice::Gamepad,
            Self::Touch { .. } => InputDevice::VirtualJoystick,
        }
    }
}

/// Input for one active device at a time.
///
/// The system is bound to a device with [`init`](Self::init) and unbound
/// with [`exit`](Self::exit); swapping devices is `exit` followed by `init`
/// and resets all per-device state. Events from devices other than the
/// active one are ignored, except that the UI pointer (cursor position and
/// left button) is tracked for every device.
#[derive(Debug)]
pub struct InputSystem {
    device: Option<InputDevice>,
    keyboard: KeyboardState,
    mouse: MouseState,
    gamepad: GamepadState,
    joystick: VirtualJoystick,
    actions: ActionMap,
    mouse_sensitivity: f32,
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSystem {
    /// Mouse pixels per frame that count as one unit of look input.
    pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 0.1;

    #[must_use]
    pub fn new() -> Self {
        Self {
            device: None,
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            gamepad: GamepadState::new(),
            joystick: VirtualJoystick::new(0.0),
            actions: ActionMap::with_defaults(),
            mouse_sensitivity: Self::DEFAULT_MOUSE_SENSITIVITY,
        }
    }

    /// Bind to `device`.
    pub fn init(&mut self, device: InputDevice) {
        if let Some(previous) = self.device {
            warn!("Input system re-initialized without exit (was {previous})");
            self.reset_devices();
        }
        self.device = Some(device);
        info!("Input initialized for {device}");
    }

    /// Unbind and forget all device state.
    pub fn exit(&mut self) {
        if let Some(device) = self.device.take() {
            self.reset_devices();
            info!("Input released {device}");
        }
    }

    #[must_use]
    pub const fn device(&self) -> Option<InputDevice> {
        self.device
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.device.is_some()
    }

    fn reset_devices(&mut self) {
        self.keyboard.clear();
        self.mouse.clear();
        self.gamepad.clear();
        self.joystick.clear();
        self.actions.reset();
    }

    pub fn set_screen_width(&mut self, width: f32) {
        self.joystick.set_screen_width(width);
    }

    pub fn set_mouse_sensitivity(&mut self, sensitivity: f32) {
        self.mouse_sensitivity = sensitivity;
    }

    pub fn actions_mut(&mut self) -> &mut ActionMap {
        &mut self.actions
    }

    /// Feed one event. Returns `true` if it was consumed.
    pub fn process_event(&mut self, event: &InputEvent) -> bool {
        let Some(active) = self.device else {
            return false;
        };

        // The UI pointer works regardless of the camera device.
        match *event {
            InputEvent::CursorMoved(position) => {
                self.mouse.set_position(position);
                return active == InputDevice::KeyboardMouse;
            }
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed,
            } => {
                self.mouse.set_button(MouseButton::Left, pressed);
                return active == InputDevice::KeyboardMouse;
            }
            _ => {}
        }

        if event.device() != active {
            debug!("Ignoring {:?} input while {active} is active", event.device());
            return false;
        }

        match *event {
            InputEvent::Key { key, pressed } => self.keyboard.set_key(key, pressed),
            InputEvent::Modifiers(modifiers) => self.keyboard.set_modifiers(modifiers),
            InputEvent::MouseMotion(delta) => self.mouse.add_raw_motion(delta),
            InputEvent::MouseButton { button, pressed } => self.mouse.set_button(button, pressed),
            InputEvent::Scroll(lines) => self.mouse.add_scroll(lines),
            InputEvent::GamepadAxis { axis, value } => self.gamepad.set_axis(axis, value),
            InputEvent::GamepadButton { button, pressed } => {
                self.gamepad.set_button(button, pressed);
            }
            InputEvent::Touch {
                id,
                phase,
                position,
            } => self.joystick.touch(id, phase, position),
            InputEvent::CursorMoved(_) => {}
        }
        true
    }

    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        InputEvent::from_window_event(event).is_some_and(|e| self.process_event(&e))
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) -> bool {
        InputEvent::from_device_event(event).is_some_and(|e| self.process_event(&e))
    }

    /// Evaluate actions for the frame about to be updated.
    pub fn begin_frame(&mut self) {
        self.actions.update(DeviceStates {
            keyboard: &self.keyboard,
            mouse: &self.mouse,
            gamepad: &self.gamepad,
        });
    }

    /// Consume per-frame edges and deltas.
    pub fn end_frame(&mut self) {
        self.keyboard.end_frame();
        self.mouse.end_frame();
        self.gamepad.end_frame();
        self.actions.end_frame();
    }

    /// Camera translation input: x right, y up, z forward, each in [-1, 1].
    #[must_use]
    pub fn move_axis(&self) -> Vec3 {
        match self.device {
            Some(InputDevice::KeyboardMouse) => Vec3::new(
                self.keyboard.axis(KeyCode::KeyA, KeyCode::KeyD),
                self.keyboard.axis(KeyCode::KeyQ, KeyCode::KeyE),
                self.keyboard.axis(KeyCode::KeyS, KeyCode::KeyW),
            ),
            Some(InputDevice::Gamepad) => {
                let stick = self.gamepad.left_stick();
                let buttons = self.gamepad.buttons();
                let vertical = f32::from(u8::from(buttons.is_pressed(GamepadButton::RightShoulder)))
                    - f32::from(u8::from(buttons.is_pressed(GamepadButton::LeftShoulder)));
                Vec3::new(stick.x, vertical, stick.y)
            }
            Some(InputDevice::VirtualJoystick) => {
                let stick = self.joystick.stick(StickSide::Left);
                Vec3::new(stick.x, 0.0, stick.y)
            }
            None => Vec3::ZERO,
        }
    }

    /// Camera rotation input: x yaw right, y pitch up.
    ///
    /// Sticks report deflection; the mouse reports its motion while the
    /// right button is held, scaled by the mouse sensitivity.
    #[must_use]
    pub fn look_axis(&self) -> Vec2 {
        match self.device {
            Some(InputDevice::KeyboardMouse) => {
                if self.mouse.is_pressed(MouseButton::Right) {
                    let delta = self.mouse.raw_delta();
                    Vec2::new(delta.x, -delta.y) * self.mouse_sensitivity
                } else {
                    Vec2::ZERO
                }
            }
            Some(InputDevice::Gamepad) => self.gamepad.right_stick(),
            Some(InputDevice::VirtualJoystick) => self.joystick.stick(StickSide::Right),
            None => Vec2::ZERO,
        }
    }

    #[must_use]
    pub fn action(&self, action: Action) -> ButtonState {
        self.actions.state(action)
    }

    #[must_use]
    pub fn is_action_just_pressed(&self, action: Action) -> bool {
        self.actions.state(action).is_just_pressed()
    }

    /// Pointer position for UI hit testing.
    #[must_use]
    pub const fn pointer(&self) -> Option<Vec2> {
        self.mouse.position()
    }

    #[must_use]
    pub const fn pointer_button(&self) -> ButtonState {
        self.mouse.button(MouseButton::Left)
    }

    #[must_use]
    pub const fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    #[must_use]
    pub const fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    #[must_use]
    pub const fn gamepad(&self) -> &GamepadState {
        &self.gamepad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn key(key: KeyCode, pressed: bool) -> InputEvent {
        InputEvent::Key { key, pressed }
    }

    #[test]
    fn uninitialized_system_ignores_input() {
        let mut input = InputSystem::new();
        assert!(!input.process_event(&key(KeyCode::KeyW, true)));
        assert_eq!(input.move_axis(), Vec3::ZERO);
    }

    #[test]
    fn keyboard_drives_move_axis() {
        let mut input = InputSystem::new();
        input.init(InputDevice::KeyboardMouse);
        input.process_event(&key(KeyCode::KeyW, true));
        input.process_event(&key(KeyCode::KeyD, true));
        assert_eq!(input.move_axis(), Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn inactive_device_is_ignored() {
        let mut input = InputSystem::new();
        input.init(InputDevice::Gamepad);
        assert!(!input.process_event(&key(KeyCode::KeyW, true)));
        assert!(input.process_event(&InputEvent::GamepadAxis {
            axis: GamepadAxis::LeftStickY,
            value: 1.0,
        }));
        assert_relative_eq!(input.move_axis().z, 1.0);
    }

    #[test]
    fn swap_resets_device_state() {
        let mut input = InputSystem::new();
        input.init(InputDevice::KeyboardMouse);
        input.process_event(&key(KeyCode::KeyW, true));

        input.exit();
        assert_eq!(input.device(), None);
        input.init(InputDevice::KeyboardMouse);
        assert_eq!(input.move_axis(), Vec3::ZERO);
    }

    #[test]
    fn mouse_look_needs_right_button() {
        let mut input = InputSystem::new();
        input.init(InputDevice::KeyboardMouse);
        input.process_event(&InputEvent::MouseMotion(Vec2::new(10.0, 5.0)));
        assert_eq!(input.look_axis(), Vec2::ZERO);

        input.process_event(&InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
        });
        let look = input.look_axis();
        assert_relative_eq!(look.x, 1.0);
        assert_relative_eq!(look.y, -0.5);

        input.end_frame();
        assert_eq!(input.look_axis(), Vec2::ZERO);
    }

    #[test]
    fn pointer_tracked_for_touch_device() {
        let mut input = InputSystem::new();
        input.init(InputDevice::VirtualJoystick);
        input.process_event(&InputEvent::CursorMoved(Vec2::new(3.0, 4.0)));
        assert_eq!(input.pointer(), Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn actions_follow_frames() {
        let mut input = InputSystem::new();
        input.init(InputDevice::KeyboardMouse);
        input.process_event(&key(KeyCode::Escape, true));
        input.begin_frame();
        assert!(input.is_action_just_pressed(Action::Exit));
        input.end_frame();
        input.begin_frame();
        assert!(!input.is_action_just_pressed(Action::Exit));
        assert!(input.action(Action::Exit).is_pressed());
    }

    #[test]
    fn device_names_parse() {
        for device in InputDevice::ALL {
            assert_eq!(device.as_str().parse::<InputDevice>(), Ok(device));
        }
        assert!("wheel".parse::<InputDevice>().is_err());
    }
}
