//! The `App` trait and the contexts handed to it.

use std::sync::Arc;

use raw_window_handle::RawWindowHandle;
use skyrig_core::{AssetStore, DeviceConfig, ResourcePaths, Settings};
use skyrig_gpu::DeviceFactory;
use skyrig_input::InputSystem;
use skyrig_platform::Window;

use crate::error::AppError;

/// An application driven by a [`Lifecycle`](crate::Lifecycle).
///
/// The callbacks split state by what it depends on:
///
/// - `init`/`exit` own everything that survives a device-dependent reload:
///   the renderer binding, CPU-side assets, UI widgets.
/// - `load`/`unload` own everything tied to the current device configuration
///   and window size: shaders, textures, render targets, buffers, pipelines.
///   A failed `load` must leave nothing behind.
/// - `update` touches CPU state only; `draw` records and submits GPU work.
///
/// Teardown cannot fail. A `draw` error ends the session.
pub trait App {
    fn name(&self) -> &str;

    fn init(&mut self, ctx: &mut InitContext<'_>) -> Result<(), AppError>;

    fn exit(&mut self);

    fn load(&mut self, ctx: &LoadContext<'_>) -> Result<(), AppError>;

    fn unload(&mut self);

    fn update(&mut self, ctx: &UpdateContext<'_>, dt: f32);

    fn draw(&mut self, ctx: &DrawContext) -> Result<(), AppError>;
}

/// What an app can use during [`App::init`].
pub struct InitContext<'a> {
    pub settings: &'a Settings,
    pub device: &'a DeviceConfig,
    /// Creates the renderer the app binds to.
    pub factory: &'a mut dyn DeviceFactory,
    pub window: &'a dyn Window,
    /// Command-line arguments, program name excluded.
    pub args: &'a [String],
    pub paths: &'a ResourcePaths,
    pub assets: &'a Arc<dyn AssetStore>,
}

/// What an app can use during [`App::load`].
#[derive(Clone, Copy, Debug)]
pub struct LoadContext<'a> {
    pub settings: &'a Settings,
    pub device: &'a DeviceConfig,
    /// Surface to present into. `None` when running headless.
    pub window_handle: Option<RawWindowHandle>,
}

/// What an app can use during [`App::update`].
#[derive(Clone, Copy, Debug)]
pub struct UpdateContext<'a> {
    pub input: &'a InputSystem,
    pub settings: &'a Settings,
    /// Number of frames drawn so far.
    pub frame: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawContext {
    pub frame: u64,
}
