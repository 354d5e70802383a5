//! Host configuration.

use std::path::PathBuf;
use std::time::Duration;

use skyrig_core::{DeviceConfig, ResourcePaths, Settings};
use skyrig_input::InputDevice;
use skyrig_platform::WindowConfig;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Window title.
    pub title: String,
    /// Initial window size and mode.
    pub settings: Settings,
    /// Initial device configuration.
    pub device: DeviceConfig,
    /// Target frames per second (None for unlimited).
    pub target_fps: Option<u32>,
    /// Input device bound at init.
    pub input_device: InputDevice,
    /// Resource root. Defaults to the program directory.
    pub resource_root: Option<PathBuf>,
    /// Command-line arguments passed through to the app.
    pub args: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "skyrig".to_string(),
            settings: Settings::default(),
            device: DeviceConfig::default(),
            target_fps: None,
            input_device: InputDevice::default(),
            resource_root: None,
            args: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Create a new config with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the window dimensions.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.settings.width = width;
        self.settings.height = height;
        self
    }

    #[must_use]
    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.settings.fullscreen = fullscreen;
        self
    }

    #[must_use]
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }

    /// Set the target FPS.
    #[must_use]
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = Some(fps);
        self
    }

    #[must_use]
    pub fn with_input_device(mut self, device: InputDevice) -> Self {
        self.input_device = device;
        self
    }

    #[must_use]
    pub fn with_resource_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.resource_root = Some(root.into());
        self
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Frame budget implied by `target_fps`.
    #[must_use]
    pub fn target_frame_time(&self) -> Option<Duration> {
        self.target_fps
            .filter(|&fps| fps > 0)
            .map(|fps| Duration::from_nanos(1_000_000_000 / u64::from(fps)))
    }

    #[must_use]
    pub fn resource_paths(&self) -> ResourcePaths {
        self.resource_root
            .as_ref()
            .map_or_else(ResourcePaths::from_program_directory, ResourcePaths::with_root)
    }

    #[must_use]
    pub fn window_config(&self) -> WindowConfig {
        WindowConfig {
            title: self.title.clone(),
            width: self.settings.width,
            height: self.settings.height,
            fullscreen: self.settings.fullscreen,
            resizable: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyrig_core::ResourceDirectory;

    #[test]
    fn builder_and_derived_values() {
        let config = AppConfig::new("Test")
            .with_size(800, 600)
            .with_target_fps(50)
            .with_resource_root("/data");
        assert_eq!(config.settings, Settings::new(800, 600));
        assert_eq!(config.target_frame_time(), Some(Duration::from_millis(20)));
        assert_eq!(
            config.resource_paths().directory(ResourceDirectory::Textures),
            PathBuf::from("/data/Assets/Textures")
        );
        assert_eq!(config.window_config().title, "Test");
    }

    #[test]
    fn zero_fps_means_unlimited() {
        assert_eq!(AppConfig::default().with_target_fps(0).target_frame_time(), None);
    }
}
