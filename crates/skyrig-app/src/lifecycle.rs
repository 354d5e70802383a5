//! The application lifecycle controller.
//!
//! [`Lifecycle`] owns an [`App`] and everything the app is driven with (the
//! device factory, the window, the input system, settings), and enforces the
//! phase machine:
//!
//! ```text
//! Uninitialized --init--> Initialized --load--> Loaded
//!                         Initialized <-unload- Loaded
//!                         Initialized --exit--> Exited
//! ```
//!
//! Device and resolution changes are built from the same transitions, so an
//! app never sees a call sequence it could not see from a host calling the
//! primitives by hand.

use std::fmt;
use std::sync::Arc;

use skyrig_core::{AssetStore, CoreError, DeviceConfig, ResourcePaths, Settings};
use skyrig_gpu::DeviceFactory;
use skyrig_input::{Action, InputDevice, InputEvent, InputSystem};
use skyrig_platform::{Resolution, Window};
use tracing::{debug, error, info, trace_span, warn};

use crate::app::{App, DrawContext, InitContext, LoadContext, UpdateContext};
use crate::config::AppConfig;
use crate::error::{LifecycleError, Result};

/// Where an app is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Uninitialized,
    Initialized,
    Loaded,
    /// Terminal.
    Exited,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Loaded => "loaded",
            Self::Exited => "exited",
        })
    }
}

/// Requests an app raised through input during the last update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostRequests {
    pub exit: bool,
    pub toggle_fullscreen: bool,
}

/// Collaborators the lifecycle drives the app with.
pub struct Host {
    pub factory: Box<dyn DeviceFactory>,
    pub window: Box<dyn Window>,
    pub assets: Arc<dyn AssetStore>,
    pub paths: ResourcePaths,
    pub args: Vec<String>,
}

/// Drives an [`App`] through its phases.
pub struct Lifecycle<A: App> {
    app: A,
    phase: Phase,
    settings: Settings,
    device: DeviceConfig,
    host: Host,
    input: InputSystem,
    input_device: InputDevice,
    frame: u64,
    frame_updated: bool,
    requests: HostRequests,
}

impl<A: App> Lifecycle<A> {
    pub fn new(app: A, host: Host, config: &AppConfig) -> Self {
        let mut input = InputSystem::new();
        #[allow(clippy::cast_precision_loss)]
        input.set_screen_width(config.settings.width as f32);
        Self {
            app,
            phase: Phase::Uninitialized,
            settings: config.settings,
            device: config.device,
            host,
            input,
            input_device: config.input_device,
            frame: 0,
            frame_updated: false,
            requests: HostRequests::default(),
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn app(&self) -> &A {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub const fn device_config(&self) -> &DeviceConfig {
        &self.device
    }

    #[must_use]
    pub const fn input(&self) -> &InputSystem {
        &self.input
    }

    #[must_use]
    pub fn window(&self) -> &dyn Window {
        self.host.window.as_ref()
    }

    /// Frames drawn so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Requests raised during the last update, cleared on read.
    pub fn take_requests(&mut self) -> HostRequests {
        std::mem::take(&mut self.requests)
    }

    fn expect_phase(&self, op: &'static str, allowed: &[Phase]) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition {
                op,
                phase: self.phase,
            })
        }
    }

    /// Bind input and run [`App::init`].
    ///
    /// Fails without touching input or the app if the settings have a zero
    /// width or height.
    pub fn init(&mut self) -> Result<()> {
        let _span = trace_span!("lifecycle.init").entered();
        self.expect_phase("init", &[Phase::Uninitialized])?;
        if self.settings.is_minimized() {
            return Err(CoreError::InvalidSettings(format!(
                "window size {}x{} must be non-zero",
                self.settings.width, self.settings.height
            ))
            .into());
        }
        info!("Initializing {}", self.app.name());

        self.input.init(self.input_device);
        let Host {
            factory,
            window,
            assets,
            paths,
            args,
        } = &mut self.host;
        let mut ctx = InitContext {
            settings: &self.settings,
            device: &self.device,
            factory: factory.as_mut(),
            window: window.as_ref(),
            args,
            paths,
            assets,
        };
        if let Err(e) = self.app.init(&mut ctx) {
            error!("{} failed to initialize: {e}", self.app.name());
            self.input.exit();
            return Err(LifecycleError::Init(e));
        }

        self.phase = Phase::Initialized;
        Ok(())
    }

    /// Run [`App::exit`] and release input. Terminal.
    pub fn exit(&mut self) -> Result<()> {
        self.expect_phase("exit", &[Phase::Initialized])?;
        self.exit_app();
        self.phase = Phase::Exited;
        info!("{} exited", self.app.name());
        Ok(())
    }

    fn exit_app(&mut self) {
        let _span = trace_span!("lifecycle.exit").entered();
        self.app.exit();
        self.input.exit();
        self.phase = Phase::Uninitialized;
    }

    /// Create device-dependent state with [`App::load`].
    pub fn load(&mut self) -> Result<()> {
        let _span = trace_span!("lifecycle.load").entered();
        self.expect_phase("load", &[Phase::Initialized])?;
        let ctx = LoadContext {
            settings: &self.settings,
            device: &self.device,
            window_handle: self.host.window.raw_window_handle(),
        };
        if let Err(e) = self.app.load(&ctx) {
            error!("{} failed to load: {e}", self.app.name());
            return Err(LifecycleError::Load(e));
        }

        self.phase = Phase::Loaded;
        self.frame_updated = false;
        info!(
            "Loaded {} at {}x{} ({}, {}x MSAA)",
            self.app.name(),
            self.settings.width,
            self.settings.height,
            self.device.backend,
            self.device.sample_count.count()
        );
        Ok(())
    }

    /// Release device-dependent state with [`App::unload`].
    pub fn unload(&mut self) -> Result<()> {
        let _span = trace_span!("lifecycle.unload").entered();
        self.expect_phase("unload", &[Phase::Loaded])?;
        self.app.unload();
        self.phase = Phase::Initialized;
        self.frame_updated = false;
        debug!("Unloaded {}", self.app.name());
        Ok(())
    }

    /// Advance the app by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        let _span = trace_span!("lifecycle.update").entered();
        self.expect_phase("update", &[Phase::Loaded])?;
        self.input.begin_frame();
        let ctx = UpdateContext {
            input: &self.input,
            settings: &self.settings,
            frame: self.frame,
        };
        self.app.update(&ctx, dt);

        if self.input.is_action_just_pressed(Action::Exit) {
            self.requests.exit = true;
        }
        if self.input.is_action_just_pressed(Action::ToggleFullscreen) {
            self.requests.toggle_fullscreen = true;
        }
        self.input.end_frame();
        self.frame_updated = true;
        Ok(())
    }

    /// Draw the frame prepared by the last [`Lifecycle::update`].
    pub fn draw(&mut self) -> Result<()> {
        let _span = trace_span!("lifecycle.draw").entered();
        if self.phase != Phase::Loaded || !self.frame_updated {
            return Err(LifecycleError::InvalidTransition {
                op: "draw",
                phase: self.phase,
            });
        }
        let ctx = DrawContext { frame: self.frame };
        self.app.draw(&ctx).map_err(|e| {
            error!("{} failed to draw frame {}: {e}", self.app.name(), self.frame);
            LifecycleError::Frame(e)
        })?;
        self.frame += 1;
        self.frame_updated = false;
        Ok(())
    }

    /// Unload and exit as needed, ending in [`Phase::Exited`].
    pub fn shutdown(&mut self) -> Result<()> {
        let _span = trace_span!("lifecycle.shutdown").entered();
        self.expect_phase(
            "shut down",
            &[Phase::Uninitialized, Phase::Initialized, Phase::Loaded],
        )?;
        if self.phase == Phase::Loaded {
            self.unload()?;
        }
        if self.phase == Phase::Initialized {
            self.exit_app();
        }
        self.phase = Phase::Exited;
        info!("{} shut down after {} frames", self.app.name(), self.frame);
        Ok(())
    }

    /// Rebuild the app against a new device configuration.
    ///
    /// Runs unload (if loaded), exit, init and load (if it was loaded). On
    /// failure the app stays in the phase the failing step started from.
    pub fn change_device(&mut self, config: DeviceConfig) -> Result<()> {
        let _span = trace_span!("lifecycle.change_device").entered();
        self.expect_phase(
            "change device",
            &[Phase::Uninitialized, Phase::Initialized, Phase::Loaded],
        )?;
        config.validate()?;
        info!(
            "Changing device: {} -> {}, {}x -> {}x MSAA",
            self.device.backend,
            config.backend,
            self.device.sample_count.count(),
            config.sample_count.count()
        );

        let was_loaded = self.phase == Phase::Loaded;
        if self.phase == Phase::Uninitialized {
            self.device = config;
            return Ok(());
        }
        if was_loaded {
            self.unload()?;
        }
        self.exit_app();
        self.device = config;
        self.init()?;
        if was_loaded {
            self.load()?;
        }
        Ok(())
    }

    /// Resize (and optionally switch fullscreen), reloading device-dependent
    /// state around the change.
    ///
    /// Zero-sized requests are ignored, as are requests matching the current
    /// settings.
    pub fn change_resolution(&mut self, width: u32, height: u32, fullscreen: bool) -> Result<()> {
        let _span = trace_span!("lifecycle.change_resolution").entered();
        self.expect_phase(
            "change resolution",
            &[Phase::Uninitialized, Phase::Initialized, Phase::Loaded],
        )?;
        if width == 0 || height == 0 {
            debug!("Ignoring {width}x{height} resolution request");
            return Ok(());
        }
        let requested = Settings {
            width,
            height,
            fullscreen,
        };
        if requested == self.settings {
            return Ok(());
        }

        let was_loaded = self.phase == Phase::Loaded;
        if was_loaded {
            self.unload()?;
        }
        self.settings = requested;
        let window = self.host.window.as_mut();
        if window.size() != Resolution::new(width, height) {
            window.set_size(Resolution::new(width, height));
        }
        if window.is_fullscreen() != fullscreen {
            window.set_fullscreen(fullscreen);
        }
        #[allow(clippy::cast_precision_loss)]
        self.input.set_screen_width(width as f32);
        info!(
            "Resolution changed to {width}x{height}{}",
            if fullscreen { " fullscreen" } else { "" }
        );
        if was_loaded {
            self.load()?;
        }
        Ok(())
    }

    /// Rebind input to `device`. Nothing else is touched.
    pub fn swap_input_device(&mut self, device: InputDevice) -> Result<()> {
        self.expect_phase(
            "swap input device",
            &[Phase::Uninitialized, Phase::Initialized, Phase::Loaded],
        )?;
        self.input_device = device;
        if self.input.is_initialized() {
            self.input.exit();
            self.input.init(device);
        }
        Ok(())
    }

    /// Forward an input event. Returns `true` if it was consumed.
    pub fn process_event(&mut self, event: &InputEvent) -> bool {
        self.input.process_event(event)
    }
}

impl<A: App> Drop for Lifecycle<A> {
    fn drop(&mut self) {
        if self.phase != Phase::Exited {
            warn!("{} dropped while {}, shutting down", self.app.name(), self.phase);
            let _ = self.shutdown();
        }
    }
}
