use raw_window_handle::RawWindowHandle;
use tracing::debug;

use crate::window::{MonitorDesc, Resolution, Window, WindowConfig};

/// Window with no native surface.
///
/// Reports a single virtual monitor and accepts any size request.
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    title: String,
    size: Resolution,
    fullscreen: bool,
    resize_requests: usize,
}

impl HeadlessWindow {
    /// Resolutions offered by the virtual monitor.
    pub const RESOLUTIONS: [Resolution; 4] = [
        Resolution::new(1280, 720),
        Resolution::new(1600, 900),
        Resolution::new(1920, 1080),
        Resolution::new(2560, 1440),
    ];

    #[must_use]
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            title: config.title.clone(),
            size: Resolution::new(config.width, config.height),
            fullscreen: config.fullscreen,
            resize_requests: 0,
        }
    }

    /// Number of `set_size` calls so far.
    #[must_use]
    pub const fn resize_requests(&self) -> usize {
        self.resize_requests
    }
}

impl Default for HeadlessWindow {
    fn default() -> Self {
        Self::new(&WindowConfig::default())
    }
}

impl Window for HeadlessWindow {
    fn title(&self) -> &str {
        &self.title
    }

    fn size(&self) -> Resolution {
        self.size
    }

    fn set_size(&mut self, size: Resolution) {
        debug!("Headless window resized to {}x{}", size.width, size.height);
        self.size = size;
        self.resize_requests += 1;
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    fn monitors(&self) -> Vec<MonitorDesc> {
        vec![MonitorDesc {
            name: "Headless".to_string(),
            resolutions: Self::RESOLUTIONS.to_vec(),
            primary: true,
        }]
    }

    fn raw_window_handle(&self) -> Option<RawWindowHandle> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_size_from_config() {
        let window = HeadlessWindow::new(&WindowConfig {
            width: 640,
            height: 480,
            ..WindowConfig::default()
        });
        assert_eq!(window.size(), Resolution::new(640, 480));
        assert!(window.raw_window_handle().is_none());
    }

    #[test]
    fn records_resizes() {
        let mut window = HeadlessWindow::default();
        window.set_size(Resolution::new(1920, 1080));
        window.set_fullscreen(true);
        assert_eq!(window.size(), Resolution::new(1920, 1080));
        assert!(window.is_fullscreen());
        assert_eq!(window.resize_requests(), 1);
    }

    #[test]
    fn single_primary_monitor() {
        let monitors = HeadlessWindow::default().monitors();
        assert_eq!(monitors.len(), 1);
        assert!(monitors[0].primary);
        assert!(monitors[0].resolutions.windows(2).all(|w| w[0] < w[1]));
    }
}
