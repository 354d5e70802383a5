//! Host loops: a winit event loop and a fixed-step headless loop.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use skyrig_core::AssetStore;
use skyrig_gpu::DeviceFactory;
use skyrig_input::InputEvent;
use skyrig_platform::{HeadlessWindow, Platform, WinitWindow};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::app::App;
use crate::config::AppConfig;
use crate::error::LifecycleError;
use crate::frame::{FrameClock, FrameStats};
use crate::lifecycle::{Host, Lifecycle};

/// Fixed step used by [`run_headless`] when no target FPS is configured.
pub const HEADLESS_STEP: f32 = 1.0 / 60.0;

/// Install the `tracing` subscriber, honoring `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls do nothing.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// Run `app` in a window until it is closed or asks to exit.
pub fn run<A: App + 'static>(
    config: AppConfig,
    app: A,
    factory: Box<dyn DeviceFactory>,
    assets: Arc<dyn AssetStore>,
) -> anyhow::Result<()> {
    info!("{} starting on {}...", config.title, Platform::current());

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runner = AppRunner {
        clock: FrameClock::new(config.target_frame_time()),
        config,
        pending: Some((app, factory, assets)),
        lifecycle: None,
        stats: FrameStats::default(),
        error: None,
    };
    event_loop
        .run_app(&mut runner)
        .context("Event loop error")?;

    runner.stats.log_summary();
    runner.error.map_or(Ok(()), Err)
}

/// Run `app` offscreen for `frames` frames with a fixed time step.
///
/// `between_frames` runs before every frame and may drive the lifecycle
/// (device changes, input swaps). Returns the frame statistics.
pub fn run_headless<A: App>(
    config: &AppConfig,
    app: A,
    factory: Box<dyn DeviceFactory>,
    assets: Arc<dyn AssetStore>,
    frames: u64,
    mut between_frames: impl FnMut(u64, &mut Lifecycle<A>) -> Result<(), LifecycleError>,
) -> anyhow::Result<FrameStats> {
    let host = Host {
        factory,
        window: Box::new(HeadlessWindow::new(&config.window_config())),
        assets,
        paths: config.resource_paths(),
        args: config.args.clone(),
    };
    let mut lifecycle = Lifecycle::new(app, host, config);
    lifecycle.init()?;
    lifecycle.load()?;

    let dt = config
        .target_frame_time()
        .map_or(HEADLESS_STEP, |t| t.as_secs_f32());
    let mut stats = FrameStats::default();
    for frame in 0..frames {
        between_frames(frame, &mut lifecycle)?;
        lifecycle.update(dt)?;
        lifecycle.draw()?;
        stats.record(dt);
        if lifecycle.take_requests().exit {
            info!("Exit requested after {} frames", frame + 1);
            break;
        }
    }

    lifecycle.shutdown()?;
    stats.log_summary();
    Ok(stats)
}

struct AppRunner<A: App> {
    config: AppConfig,
    pending: Option<(A, Box<dyn DeviceFactory>, Arc<dyn AssetStore>)>,
    lifecycle: Option<Lifecycle<A>>,
    clock: FrameClock,
    stats: FrameStats,
    error: Option<anyhow::Error>,
}

impl<A: App + 'static> ApplicationHandler for AppRunner<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some((app, factory, assets)) = self.pending.take() else {
            return;
        };

        info!("Creating application state...");
        match self.start(event_loop, app, factory, assets) {
            Ok(lifecycle) => {
                self.lifecycle = Some(lifecycle);
                info!("Application ready!");
            }
            Err(e) => {
                error!("Failed to initialize application: {e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(lifecycle) = &mut self.lifecycle else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested");
                self.stop(event_loop);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.frame(event_loop) {
                    self.fail(event_loop, e);
                }
            }
            WindowEvent::Resized(size) => {
                let fullscreen = lifecycle.settings().fullscreen;
                if let Err(e) = lifecycle.change_resolution(size.width, size.height, fullscreen) {
                    self.fail(event_loop, e);
                }
            }
            other => {
                if let Some(input) = InputEvent::from_window_event(&other) {
                    lifecycle.process_event(&input);
                }
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let (Some(lifecycle), Some(input)) =
            (&mut self.lifecycle, InputEvent::from_device_event(&event))
        {
            lifecycle.process_event(&input);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(lifecycle) = &self.lifecycle {
            lifecycle.window().request_redraw();
        }
    }
}

impl<A: App + 'static> AppRunner<A> {
    fn start(
        &self,
        event_loop: &ActiveEventLoop,
        app: A,
        factory: Box<dyn DeviceFactory>,
        assets: Arc<dyn AssetStore>,
    ) -> anyhow::Result<Lifecycle<A>> {
        let window = WinitWindow::create(event_loop, &self.config.window_config())?;
        let host = Host {
            factory,
            window: Box::new(window),
            assets,
            paths: self.config.resource_paths(),
            args: self.config.args.clone(),
        };
        let mut lifecycle = Lifecycle::new(app, host, &self.config);
        lifecycle.init()?;
        lifecycle.load()?;
        Ok(lifecycle)
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) -> Result<(), LifecycleError> {
        let Some(lifecycle) = &mut self.lifecycle else {
            return Ok(());
        };
        let frame_start = Instant::now();
        let dt = self.clock.tick();

        lifecycle.update(dt)?;
        lifecycle.draw()?;
        self.stats.record(dt);

        let requests = lifecycle.take_requests();
        if requests.toggle_fullscreen {
            let settings = *lifecycle.settings();
            lifecycle.change_resolution(settings.width, settings.height, !settings.fullscreen)?;
        }
        if requests.exit {
            info!("Exit requested");
            self.stop(event_loop);
            return Ok(());
        }

        self.clock.pace(frame_start);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: LifecycleError) {
        if e.is_fatal() {
            error!("Stopping: {e}");
            self.error = Some(e.into());
            self.stop(event_loop);
        } else {
            warn!("{e}");
        }
    }

    fn stop(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut lifecycle) = self.lifecycle.take() {
            if let Err(e) = lifecycle.shutdown() {
                warn!("Shutdown: {e}");
            }
        }
        event_loop.exit();
    }
}
