//! Platform abstraction for skyrig.
//!
//! The application only sees the [`Window`] trait. On desktop the window is
//! a winit window wrapped in [`WinitWindow`]; tests and the headless runner
//! use [`HeadlessWindow`].

mod headless;
mod platform;
mod window;
mod winit_window;

use thiserror::Error;

pub use headless::HeadlessWindow;
pub use platform::Platform;
pub use window::{MonitorDesc, Resolution, Window, WindowConfig};
pub use winit_window::WinitWindow;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Window creation failed: {0}")]
    WindowCreation(String),
    #[error("Event loop error: {0}")]
    EventLoop(String),
    #[error("No native window handle: {0}")]
    Handle(String),
}

pub type Result<T> = std::result::Result<T, PlatformError>;
