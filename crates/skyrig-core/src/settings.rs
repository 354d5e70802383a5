//! Display settings and device/quality configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_IMAGE_COUNT, MAX_IMAGE_COUNT};
use crate::error::{CoreError, Result};

/// Window/display settings held by the application.
///
/// Only changed through a resolution or device change, never during a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Whether fullscreen mode has been requested
    pub fullscreen: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

impl Settings {
    /// Create windowed settings with the given size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fullscreen: false,
        }
    }

    /// Width / height. Returns 1.0 for a degenerate size.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    /// True when either dimension is zero (minimised window).
    #[must_use]
    pub const fn is_minimized(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Graphics API backend a device is created for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backend {
    Vulkan,
    Direct3D12,
    Metal,
    /// Headless backend that only tracks resources and commands.
    Null,
}

impl Backend {
    /// Backend chosen for the build target.
    #[must_use]
    pub const fn preferred() -> Self {
        if cfg!(target_os = "windows") {
            Self::Direct3D12
        } else if cfg!(any(target_os = "macos", target_os = "ios")) {
            Self::Metal
        } else {
            Self::Vulkan
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vulkan => "vulkan",
            Self::Direct3D12 => "d3d12",
            Self::Metal => "metal",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "vulkan" | "vk" => Ok(Self::Vulkan),
            "d3d12" | "dx12" | "direct3d12" => Ok(Self::Direct3D12),
            "metal" => Ok(Self::Metal),
            "null" | "headless" => Ok(Self::Null),
            other => Err(CoreError::InvalidSettings(format!(
                "unknown backend '{other}'"
            ))),
        }
    }
}

/// Multisample count for render targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleCount {
    #[default]
    X1,
    X2,
    X4,
    X8,
}

impl SampleCount {
    /// Number of samples per pixel.
    #[must_use]
    pub const fn count(self) -> u32 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
            Self::X8 => 8,
        }
    }
}

impl TryFrom<u32> for SampleCount {
    type Error = CoreError;

    fn try_from(samples: u32) -> Result<Self> {
        match samples {
            1 => Ok(Self::X1),
            2 => Ok(Self::X2),
            4 => Ok(Self::X4),
            8 => Ok(Self::X8),
            other => Err(CoreError::InvalidSettings(format!(
                "unsupported sample count {other}"
            ))),
        }
    }
}

/// Device and quality settings.
///
/// Any change to this configuration requires tearing down and rebuilding
/// every device-dependent resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Graphics API backend.
    pub backend: Backend,
    /// MSAA sample count used for the scene render targets.
    pub sample_count: SampleCount,
    /// Present with vertical sync.
    pub vsync: bool,
    /// Number of swap chain images, also the number of frames in flight.
    pub image_count: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            backend: Backend::preferred(),
            sample_count: SampleCount::X1,
            vsync: false,
            image_count: DEFAULT_IMAGE_COUNT,
        }
    }
}

impl DeviceConfig {
    #[must_use]
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub fn with_sample_count(mut self, sample_count: SampleCount) -> Self {
        self.sample_count = sample_count;
        self
    }

    #[must_use]
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    #[must_use]
    pub fn with_image_count(mut self, image_count: u32) -> Self {
        self.image_count = image_count;
        self
    }

    /// Check that the configuration can be used to create a device.
    pub fn validate(&self) -> Result<()> {
        if self.image_count == 0 || self.image_count > MAX_IMAGE_COUNT {
            return Err(CoreError::InvalidSettings(format!(
                "image count must be in 1..={MAX_IMAGE_COUNT}, got {}",
                self.image_count
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_handles_zero_height() {
        assert_eq!(Settings::new(800, 0).aspect_ratio(), 1.0);
        approx::assert_relative_eq!(Settings::new(1280, 720).aspect_ratio(), 16.0 / 9.0);
    }

    #[test]
    fn minimized_detection() {
        assert!(Settings::new(0, 720).is_minimized());
        assert!(!Settings::default().is_minimized());
    }

    #[test]
    fn backend_parsing() {
        assert_eq!("Vulkan".parse::<Backend>().unwrap(), Backend::Vulkan);
        assert_eq!("dx12".parse::<Backend>().unwrap(), Backend::Direct3D12);
        assert_eq!("headless".parse::<Backend>().unwrap(), Backend::Null);
        assert!("opengl".parse::<Backend>().is_err());
    }

    #[test]
    fn sample_count_conversion() {
        assert_eq!(SampleCount::try_from(4).unwrap(), SampleCount::X4);
        assert_eq!(SampleCount::X8.count(), 8);
        assert!(SampleCount::try_from(3).is_err());
    }

    #[test]
    fn device_config_validation() {
        assert!(DeviceConfig::default().validate().is_ok());
        assert!(DeviceConfig::default().with_image_count(0).validate().is_err());
        assert!(DeviceConfig::default().with_image_count(9).validate().is_err());
    }
}
