//! The sample application: an animated skeleton under a skybox, with a
//! settings panel.

use skyrig_animation::{Clip, Rig};
use skyrig_app::{App, AppError, DrawContext, InitContext, LoadContext, UpdateContext};
use skyrig_core::{ResourceDirectory, ResourcePaths};
use skyrig_ui::AppUi;
use tracing::{info, warn};

use crate::assets;
use crate::gpu::{Binding, SceneGpu};
use crate::scene::Scene;

/// Application state, split by lifetime.
///
/// `scene` is CPU state created at init. `binding` is the renderer and
/// its reload-independent objects. `gpu` holds whatever the current
/// settings size or format and only exists while loaded.
#[derive(Default)]
pub struct SampleApp {
    ui: AppUi,
    scene: Option<Scene>,
    binding: Option<Binding>,
    gpu: Option<SceneGpu>,
    paths: Option<ResourcePaths>,
}

impl SampleApp {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    #[must_use]
    pub const fn ui(&self) -> &AppUi {
        &self.ui
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.gpu.is_some()
    }

    /// Objects created at init, 0 before init.
    #[must_use]
    pub fn init_resources(&self) -> usize {
        self.binding.as_ref().map_or(0, Binding::resource_count)
    }

    /// Objects created at load, 0 while unloaded.
    #[must_use]
    pub fn load_resources(&self) -> usize {
        self.gpu.as_ref().map_or(0, SceneGpu::resource_count)
    }

    /// Uploads still queued in the loader, 0 before init.
    #[must_use]
    pub fn pending_uploads(&self) -> usize {
        self.binding.as_ref().map_or(0, Binding::pending_uploads)
    }

    fn load_scene(&mut self, ctx: &InitContext<'_>) -> Result<Scene, AppError> {
        let read = |dir: ResourceDirectory, name: &str| ctx.assets.read(&ctx.paths.resolve(dir, name));
        let rig = Rig::from_bytes(&read(ResourceDirectory::Animations, assets::RIG)?)?;
        let clip = Clip::from_bytes(&read(ResourceDirectory::Animations, assets::CLIP)?)?;
        let font = read(ResourceDirectory::Fonts, assets::FONT)?;

        self.ui.init(assets::FONT, &font)?;
        Scene::new(rig, clip, &mut self.ui).inspect_err(|_| self.ui.exit())
    }
}

impl App for SampleApp {
    fn name(&self) -> &str {
        "skyrig sample"
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) -> Result<(), AppError> {
        let scene = self.load_scene(ctx)?;
        let binding = match Binding::new(self.name(), ctx) {
            Ok(binding) => binding,
            Err(e) => {
                self.ui.exit();
                return Err(e);
            }
        };
        info!(
            "Initialized with {} joints on {}",
            scene.animation().local_pose().len(),
            ctx.device.backend
        );
        self.scene = Some(scene);
        self.binding = Some(binding);
        self.paths = Some(ctx.paths.clone());
        Ok(())
    }

    fn exit(&mut self) {
        if self.gpu.is_some() {
            warn!("Exit while loaded, unloading first");
            self.unload();
        }
        if let Some(binding) = self.binding.take() {
            binding.release();
        }
        self.ui.exit();
        self.scene = None;
        self.paths = None;
    }

    fn load(&mut self, ctx: &LoadContext<'_>) -> Result<(), AppError> {
        let (Some(binding), Some(scene), Some(paths)) =
            (self.binding.as_mut(), self.scene.as_ref(), self.paths.as_ref())
        else {
            return Err(AppError::InvalidState("load before init".into()));
        };
        if self.gpu.is_some() {
            return Err(AppError::InvalidState("already loaded".into()));
        }
        let gpu = SceneGpu::load(binding, &mut self.ui, scene.meshes(), paths, ctx)
            .inspect_err(|_| self.ui.unload())?;
        self.gpu = Some(gpu);
        Ok(())
    }

    fn unload(&mut self) {
        self.ui.unload();
        if let (Some(binding), Some(gpu)) = (self.binding.as_mut(), self.gpu.take()) {
            gpu.release(binding);
        }
    }

    fn update(&mut self, ctx: &UpdateContext<'_>, dt: f32) {
        if let Some(scene) = self.scene.as_mut() {
            scene.update(ctx, &mut self.ui, dt);
        }
    }

    fn draw(&mut self, _ctx: &DrawContext) -> Result<(), AppError> {
        let (Some(scene), Some(binding), Some(gpu)) =
            (self.scene.as_ref(), self.binding.as_mut(), self.gpu.as_ref())
        else {
            return Err(AppError::InvalidState("draw while not loaded".into()));
        };
        gpu.draw(binding, &self.ui, scene.frame())
    }
}

impl Drop for SampleApp {
    fn drop(&mut self) {
        if self.binding.is_some() {
            warn!("SampleApp dropped while holding device objects");
            self.exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyrig_app::{AppConfig, Lifecycle, Phase};
    use skyrig_core::{DeviceConfig, SampleCount};
    use skyrig_gpu::{Command, NullDeviceProbe, ResourceKind};
    use skyrig_test::{AssetPackBuilder, TestHost};

    fn config() -> AppConfig {
        AppConfig::new("sample")
            .with_size(640, 360)
            .with_device(DeviceConfig::default().with_image_count(2))
    }

    fn start(config: &AppConfig) -> (Lifecycle<SampleApp>, NullDeviceProbe) {
        let paths = ResourcePaths::with_root("/sample");
        let pack = assets::builtin(&paths).unwrap();
        TestHost::new()
            .with_assets(paths, pack)
            .lifecycle(SampleApp::new(), config)
    }

    fn markers(commands: &[Command]) -> Vec<String> {
        commands
            .iter()
            .filter_map(|c| match c {
                Command::BeginMarker(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn full_session_draws_every_pass_and_leaks_nothing() {
        let config = config();
        let (mut lifecycle, probe) = start(&config);
        lifecycle.init().unwrap();
        let after_init = probe.live_count();
        assert_eq!(after_init, lifecycle.app().init_resources());

        lifecycle.load().unwrap();
        assert_eq!(probe.live_count_of(ResourceKind::Texture), 7);
        assert_eq!(probe.live_count_of(ResourceKind::DescriptorSet), 4);
        assert_eq!(probe.live_count_of(ResourceKind::Pipeline), 4);

        lifecycle.update(0.016).unwrap();
        lifecycle.draw().unwrap();
        let submission = probe.last_submission();
        assert_eq!(
            markers(&submission),
            vec!["Draw Skybox", "Draw Plane", "Draw Skeleton", "Draw UI"]
        );
        assert!(submission.iter().any(|c| matches!(
            c,
            Command::DrawInstanced {
                instance_count: 17,
                ..
            }
        )));

        lifecycle.unload().unwrap();
        assert_eq!(probe.live_count(), after_init);
        lifecycle.exit().unwrap();
        assert_eq!(probe.live_count(), 0);
        assert_eq!(lifecycle.phase(), Phase::Exited);
    }

    #[test]
    fn draw_reads_scene_state_without_changing_it() {
        let config = config();
        let (mut lifecycle, device) = start(&config);
        lifecycle.init().unwrap();
        lifecycle.load().unwrap();
        lifecycle.update(0.2).unwrap();

        let scene = lifecycle.app().scene().unwrap();
        let frame = scene.frame().clone();
        let controller = scene.animation().controller().clone();
        let view = scene.camera().view_matrix();
        let text: Vec<String> = lifecycle.app().ui().queued_text().map(String::from).collect();
        let submits = device.stats().submits;

        lifecycle.draw().unwrap();
        assert_eq!(device.stats().submits, submits + 1);

        let scene = lifecycle.app().scene().unwrap();
        assert_eq!(scene.frame(), &frame);
        assert_eq!(scene.animation().controller(), &controller);
        assert_eq!(scene.camera().view_matrix(), view);
        assert!(lifecycle.app().ui().queued_text().eq(text.iter().map(String::as_str)));
        lifecycle.shutdown().unwrap();
    }

    #[test]
    fn update_leaves_device_objects_alone() {
        let config = config();
        let (mut lifecycle, device) = start(&config);
        lifecycle.init().unwrap();
        lifecycle.load().unwrap();

        let records = device.live_records();
        let stats = device.stats();
        let writes = device.write_order();
        lifecycle.update(0.016).unwrap();

        assert_eq!(device.live_records(), records);
        assert_eq!(device.stats(), stats);
        assert_eq!(device.write_order(), writes);
        lifecycle.shutdown().unwrap();
    }

    #[test]
    fn panel_settings_change_what_is_drawn() {
        let config = config();
        let (mut lifecycle, probe) = start(&config);
        lifecycle.init().unwrap();
        lifecycle.load().unwrap();

        let scene = lifecycle.app_mut().scene_mut().unwrap();
        let w = *scene.widgets();
        scene.apply(&skyrig_ui::UiEvent::Toggled {
            id: w.draw_plane,
            value: false,
        });
        scene.apply(&skyrig_ui::UiEvent::Toggled {
            id: w.draw_bones,
            value: true,
        });
        lifecycle.update(0.016).unwrap();
        lifecycle.draw().unwrap();

        let submission = probe.last_submission();
        assert!(!markers(&submission).contains(&"Draw Plane".to_string()));
        let instanced = submission
            .iter()
            .filter(|c| matches!(c, Command::DrawInstanced { .. }))
            .count();
        assert_eq!(instanced, 2);
        lifecycle.shutdown().unwrap();
        assert_eq!(probe.live_count(), 0);
    }

    #[test]
    fn device_change_rebuilds_like_a_cold_start() {
        let config = config();
        let (mut lifecycle, probe) = start(&config);
        lifecycle.init().unwrap();
        lifecycle.load().unwrap();
        lifecycle.update(0.016).unwrap();
        lifecycle.draw().unwrap();

        let msaa = config.device.with_sample_count(SampleCount::X4);
        lifecycle.change_device(msaa).unwrap();
        assert_eq!(lifecycle.phase(), Phase::Loaded);
        let changed = probe.live_records();
        lifecycle.shutdown().unwrap();

        let cold_config = config.clone().with_device(msaa);
        let (mut cold, cold_probe) = start(&cold_config);
        cold.init().unwrap();
        cold.load().unwrap();
        assert_eq!(changed, cold_probe.live_records());
        cold.shutdown().unwrap();
    }

    #[test]
    fn failed_load_releases_partial_objects() {
        let config = config();
        let (mut lifecycle, probe) = start(&config);
        lifecycle.init().unwrap();
        let after_init = probe.live_count();

        probe.fail_allocation(ResourceKind::Pipeline, 2);
        assert!(lifecycle.load().is_err());
        assert_eq!(lifecycle.phase(), Phase::Initialized);
        assert_eq!(probe.live_count(), after_init);
        assert!(!lifecycle.app().ui().is_loaded());

        lifecycle.load().unwrap();
        assert!(lifecycle.app().is_loaded());
        lifecycle.shutdown().unwrap();
    }

    #[test]
    fn failed_load_discards_queued_uploads() {
        let config = config();
        let (mut lifecycle, device) = start(&config);
        lifecycle.init().unwrap();
        let after_init = device.live_count();

        // Sky faces are queued before the first vertex buffer is created.
        device.fail_allocation(ResourceKind::Buffer, 0);
        assert!(lifecycle.load().is_err());
        assert_eq!(device.live_count(), after_init);
        assert_eq!(lifecycle.app().pending_uploads(), 0);

        lifecycle.load().unwrap();
        assert_eq!(lifecycle.app().pending_uploads(), 0);
        lifecycle.shutdown().unwrap();
        assert_eq!(device.live_count(), 0);
    }

    #[test]
    fn missing_rig_fails_init_without_device_objects() {
        let paths = ResourcePaths::with_root("/empty");
        let pack = AssetPackBuilder::new(paths.clone()).font(assets::FONT).into_shared();
        let config = config();
        let (mut lifecycle, probe) = TestHost::new()
            .with_assets(paths, pack)
            .lifecycle(SampleApp::new(), &config);

        assert!(lifecycle.init().is_err());
        assert_eq!(lifecycle.phase(), Phase::Uninitialized);
        assert_eq!(probe.live_count(), 0);
        assert!(!lifecycle.app().ui().is_initialized());
    }

    #[test]
    fn resolution_change_resizes_swap_chain_and_depth() {
        let config = config();
        let (mut lifecycle, probe) = start(&config);
        lifecycle.init().unwrap();
        lifecycle.load().unwrap();

        lifecycle.change_resolution(800, 600, false).unwrap();
        let depth = probe
            .live_records()
            .into_iter()
            .find(|r| r.label == "depth")
            .unwrap();
        assert!(depth.detail.starts_with("800x600"));
        lifecycle.shutdown().unwrap();
        assert_eq!(probe.live_count(), 0);
    }
}
