//! Application framework for skyrig.
//!
//! This crate provides the lifecycle controller that drives an [`App`]:
//! - Phase enforcement (`init`, `load`, `update`, `draw`, `unload`, `exit`)
//! - Device changes, resolution changes and input device hot-swaps
//! - A winit host loop with FPS statistics and frame pacing
//! - A fixed-step headless loop for tests and CI
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use skyrig_app::{run_headless, App, AppConfig, AppError, DrawContext, InitContext,
//!     LoadContext, UpdateContext};
//! use skyrig_core::MemoryAssets;
//! use skyrig_gpu::NullDeviceFactory;
//!
//! struct MyApp;
//!
//! impl App for MyApp {
//!     fn name(&self) -> &str { "my app" }
//!     fn init(&mut self, _ctx: &mut InitContext<'_>) -> Result<(), AppError> { Ok(()) }
//!     fn exit(&mut self) {}
//!     fn load(&mut self, _ctx: &LoadContext<'_>) -> Result<(), AppError> { Ok(()) }
//!     fn unload(&mut self) {}
//!     fn update(&mut self, _ctx: &UpdateContext<'_>, _dt: f32) {}
//!     fn draw(&mut self, _ctx: &DrawContext) -> Result<(), AppError> { Ok(()) }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     run_headless(
//!         &AppConfig::new("my app"),
//!         MyApp,
//!         Box::new(NullDeviceFactory::new()),
//!         Arc::new(MemoryAssets::new()),
//!         10,
//!         |_, _| Ok(()),
//!     )?;
//!     Ok(())
//! }
//! ```

mod app;
mod camera;
mod config;
mod error;
mod frame;
mod lifecycle;
mod runner;

pub use app::{App, DrawContext, InitContext, LoadContext, UpdateContext};
pub use camera::{Camera, CameraController};
pub use config::AppConfig;
pub use error::{AppError, LifecycleError, Result};
pub use frame::{FrameClock, FrameStats};
pub use lifecycle::{Host, HostRequests, Lifecycle, Phase};
pub use runner::{init_logging, run, run_headless, HEADLESS_STEP};
