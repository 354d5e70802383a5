//! The windowing collaborator interface.

use raw_window_handle::RawWindowHandle;
use skyrig_core::Settings;

/// A display mode size in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A connected display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorDesc {
    pub name: String,
    /// Supported resolutions, ascending and deduplicated.
    pub resolutions: Vec<Resolution>,
    pub primary: bool,
}

/// Window creation options.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            title: "skyrig".to_string(),
            width: settings.width,
            height: settings.height,
            fullscreen: settings.fullscreen,
            resizable: true,
        }
    }
}

/// The platform window an application renders into.
pub trait Window {
    fn title(&self) -> &str;

    /// Client area size in physical pixels.
    fn size(&self) -> Resolution;

    /// Request a new client area size. The platform may clamp it.
    fn set_size(&mut self, size: Resolution);

    fn is_fullscreen(&self) -> bool;

    fn set_fullscreen(&mut self, fullscreen: bool);

    fn monitors(&self) -> Vec<MonitorDesc>;

    /// Native handle for swap chain creation; `None` for offscreen windows.
    fn raw_window_handle(&self) -> Option<RawWindowHandle>;

    fn request_redraw(&self) {}
}
