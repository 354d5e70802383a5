//! [`Window`] backed by winit.

use std::sync::Arc;

use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use tracing::{info, warn};
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::monitor::MonitorHandle;
use winit::window::Fullscreen;

use crate::window::{MonitorDesc, Resolution, Window, WindowConfig};
use crate::{PlatformError, Result};

pub struct WinitWindow {
    window: Arc<winit::window::Window>,
    title: String,
}

impl WinitWindow {
    /// Create a window on a running event loop.
    pub fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self> {
        let mut attrs = winit::window::Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(config.resizable);
        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;
        info!(
            "Created window '{}' ({}x{})",
            config.title, config.width, config.height
        );
        Ok(Self {
            window: Arc::new(window),
            title: config.title.clone(),
        })
    }

    /// The underlying winit window.
    #[must_use]
    pub fn inner(&self) -> &Arc<winit::window::Window> {
        &self.window
    }

    fn describe(monitor: &MonitorHandle, primary: Option<&MonitorHandle>) -> MonitorDesc {
        let mut resolutions: Vec<Resolution> = monitor
            .video_modes()
            .map(|mode| Resolution::new(mode.size().width, mode.size().height))
            .collect();
        resolutions.sort_unstable();
        resolutions.dedup();
        MonitorDesc {
            name: monitor.name().unwrap_or_else(|| "Unknown".to_string()),
            resolutions,
            primary: primary.is_some_and(|p| p == monitor),
        }
    }
}

impl Window for WinitWindow {
    fn title(&self) -> &str {
        &self.title
    }

    fn size(&self) -> Resolution {
        let size = self.window.inner_size();
        Resolution::new(size.width, size.height)
    }

    fn set_size(&mut self, size: Resolution) {
        // `None` means the resize is applied asynchronously and reported
        // through a later `Resized` event.
        let _ = self
            .window
            .request_inner_size(PhysicalSize::new(size.width, size.height));
    }

    fn is_fullscreen(&self) -> bool {
        self.window.fullscreen().is_some()
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.window
            .set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
    }

    fn monitors(&self) -> Vec<MonitorDesc> {
        let primary = self.window.primary_monitor();
        self.window
            .available_monitors()
            .map(|m| Self::describe(&m, primary.as_ref()))
            .collect()
    }

    fn raw_window_handle(&self) -> Option<RawWindowHandle> {
        match self.window.window_handle() {
            Ok(handle) => Some(handle.as_raw()),
            Err(e) => {
                warn!("Window handle unavailable: {e}");
                None
            }
        }
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
