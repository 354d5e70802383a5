//! Input handling for skyrig.
//!
//! [`InputSystem`] is bound to one [`InputDevice`] at a time: keyboard and
//! mouse, a gamepad, or an on-screen virtual joystick. The application reads
//! device-neutral camera axes ([`InputSystem::move_axis`],
//! [`InputSystem::look_axis`]) and [`Action`]s, so the device can be swapped
//! at runtime without touching anything else.
//!
//! ```ignore
//! let mut input = InputSystem::new();
//! input.init(InputDevice::KeyboardMouse);
//!
//! // event loop
//! input.process_window_event(&event);
//!
//! // frame
//! input.begin_frame();
//! camera.update(input.move_axis(), input.look_axis(), dt);
//! input.end_frame();
//!
//! // hot swap
//! input.exit();
//! input.init(InputDevice::Gamepad);
//! ```

mod action;
mod button;
mod gamepad;
mod joystick;
mod keyboard;
mod mouse;
mod system;

pub use action::{Action, ActionMap, DeviceStates, InputBinding};
pub use button::{ButtonSet, ButtonState};
pub use gamepad::{GamepadAxis, GamepadButton, GamepadState};
pub use joystick::{StickSide, TouchPhase, VirtualJoystick};
pub use keyboard::{KeyboardState, Modifiers};
pub use mouse::{MouseButton, MouseState};
pub use system::{InputDevice, InputEvent, InputSystem};

pub use winit::event::{DeviceEvent, WindowEvent};
pub use winit::keyboard::KeyCode;
