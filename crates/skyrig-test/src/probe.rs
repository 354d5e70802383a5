//! An instrumented app that logs every lifecycle call.

use std::sync::Arc;

use parking_lot::Mutex;
use skyrig_app::{App, AppError, DrawContext, InitContext, LoadContext, UpdateContext};
use skyrig_gpu::{
    Buffer, BufferDesc, ClearValue, Cmd, CmdPool, Command, CullMode, FrameSyncSet,
    GraphicsPipelineDesc, ImageFormat, LoadAction, Pipeline, PresentDesc,
    PrimitiveTopology, Queue, QueueDesc, RenderTarget, RenderTargetDesc, Renderer, ResourceSet,
    ResourceState, RootSignatureDesc, ShaderLoadDesc, SubmitDesc, SwapChain, SwapChainDesc,
    TextureCreationFlags, VertexFormat, VertexLayout,
};

/// Shared, ordered record of calls.
#[derive(Clone, Debug, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Return and clear the log.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock())
    }
}

/// Knobs for [`ProbeApp`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Fail `init` before touching the device.
    pub fail_init: bool,
    /// Fail every `load` after creating its resources.
    pub fail_load: bool,
    /// Fail `draw` from this frame on.
    pub fail_draw_at: Option<u64>,
}

/// Objects created at init and kept across reloads.
struct Binding {
    renderer: Box<dyn Renderer>,
    set: ResourceSet,
    queue: Queue,
    cmds: Vec<Cmd>,
    sync: FrameSyncSet,
}

/// Objects created at load.
struct Loaded {
    set: ResourceSet,
    swap_chain: SwapChain,
    depth: RenderTarget,
    pipeline: Pipeline,
    vertices: Buffer,
    uniforms: Vec<Buffer>,
}

/// CPU-side state. `update` writes it and `draw` only reads it.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Simulation {
    updates: u64,
    elapsed: f32,
}

const TRIANGLE: [[f32; 3]; 3] = [[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]];

/// Minimal renderer-backed app that records what the lifecycle asks of it.
pub struct ProbeApp {
    log: CallLog,
    options: ProbeOptions,
    binding: Option<Binding>,
    loaded: Option<Loaded>,
    simulation: Simulation,
    /// Number of resources owned by the binding, for leak checks.
    init_resources: usize,
}

impl ProbeApp {
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self::with_options(log, ProbeOptions::default())
    }

    #[must_use]
    pub fn with_options(log: CallLog, options: ProbeOptions) -> Self {
        Self {
            log,
            options,
            binding: None,
            loaded: None,
            simulation: Simulation::default(),
            init_resources: 0,
        }
    }

    pub fn set_options(&mut self, options: ProbeOptions) {
        self.options = options;
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Resources created at init.
    #[must_use]
    pub const fn init_resources(&self) -> usize {
        self.init_resources
    }

    /// Resources created at load, 0 while unloaded.
    #[must_use]
    pub fn load_resources(&self) -> usize {
        self.loaded.as_ref().map_or(0, |l| l.set.len())
    }

    #[must_use]
    pub const fn updates(&self) -> u64 {
        self.simulation.updates
    }

    /// Simulated time accumulated by `update`.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.simulation.elapsed
    }

    fn bind(ctx: &mut InitContext<'_>) -> Result<Binding, AppError> {
        let mut renderer = ctx.factory.create("probe", ctx.device)?;
        let built = ResourceSet::build(renderer.as_mut(), |r, set| {
            let queue = set.track(r.add_queue(&QueueDesc::default())?);
            let pool: CmdPool = set.track(r.add_cmd_pool(queue)?);
            let cmds = set.track_all(r.add_cmds(pool, ctx.device.image_count)?);
            let sync = FrameSyncSet::new(r, set, ctx.device.image_count)?;
            Ok::<_, AppError>((queue, cmds, sync))
        });
        let (set, (queue, cmds, sync)) = built?;
        Ok(Binding {
            renderer,
            set,
            queue,
            cmds,
            sync,
        })
    }
}

impl App for ProbeApp {
    fn name(&self) -> &str {
        "probe"
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) -> Result<(), AppError> {
        self.log.push(format!(
            "init {} x{}",
            ctx.device.backend,
            ctx.device.sample_count.count()
        ));
        if self.options.fail_init {
            return Err(AppError::InvalidState("init failure requested".into()));
        }
        let binding = Self::bind(ctx)?;
        self.init_resources = binding.set.len();
        self.binding = Some(binding);
        self.simulation = Simulation::default();
        Ok(())
    }

    fn exit(&mut self) {
        self.log.push("exit");
        if let Some(mut binding) = self.binding.take() {
            if let Err(e) = binding.renderer.wait_queue_idle(binding.queue) {
                tracing::warn!("Queue idle wait failed: {e}");
            }
            binding.set.release(binding.renderer.as_mut());
        }
        self.init_resources = 0;
    }

    fn load(&mut self, ctx: &LoadContext<'_>) -> Result<(), AppError> {
        self.log.push(format!(
            "load {}x{}",
            ctx.settings.width, ctx.settings.height
        ));
        let binding = self
            .binding
            .as_mut()
            .ok_or_else(|| AppError::InvalidState("load before init".into()))?;
        let fail = self.options.fail_load;
        let image_count = ctx.device.image_count;
        let sample_count = ctx.device.sample_count;

        let (set, loaded) = ResourceSet::build(binding.renderer.as_mut(), |r, set| {
            let color_format = r.recommended_swap_chain_format(false, false);
            let swap_chain = set.track(r.add_swap_chain(&SwapChainDesc {
                window: ctx.window_handle,
                present_queue: binding.queue,
                width: ctx.settings.width,
                height: ctx.settings.height,
                image_count,
                color_format,
                clear_value: ClearValue::Color([0.0, 0.0, 0.0, 1.0]),
                vsync: ctx.device.vsync,
            })?);
            let depth = set.track(r.add_render_target(&RenderTargetDesc {
                label: "depth".into(),
                width: ctx.settings.width,
                height: ctx.settings.height,
                format: ImageFormat::D32Float,
                sample_count,
                clear_value: ClearValue::DepthStencil {
                    depth: 0.0,
                    stencil: 0,
                },
                flags: TextureCreationFlags::ON_TILE,
            })?);
            let shader = set.track(r.add_shader(&ShaderLoadDesc::graphics(
                "probe",
                "probe.vert",
                "probe.frag",
            ))?);
            let root_signature = set.track(r.add_root_signature(&RootSignatureDesc {
                shaders: vec![shader],
                static_samplers: Vec::new(),
            })?);
            let vertex_bytes: Vec<u8> = TRIANGLE
                .iter()
                .flatten()
                .flat_map(|f| f.to_ne_bytes())
                .collect();
            let vertices = set.track(r.add_buffer(&BufferDesc::vertex(
                "probe vertices",
                vertex_bytes.len() as u64,
            ))?);
            r.write_buffer(vertices, 0, &vertex_bytes)?;
            let mut uniforms = Vec::with_capacity(image_count as usize);
            for i in 0..image_count {
                uniforms.push(set.track(r.add_buffer(&BufferDesc::uniform(
                    format!("probe uniforms {i}"),
                    16,
                ))?));
            }
            let pipeline = set.track(r.add_pipeline(&GraphicsPipelineDesc {
                label: "probe".into(),
                shader,
                root_signature,
                vertex_layout: VertexLayout::packed(&[VertexFormat::Float3]),
                topology: PrimitiveTopology::TriangleList,
                depth_state: None,
                cull_mode: CullMode::None,
                color_formats: vec![color_format],
                depth_format: Some(ImageFormat::D32Float),
                sample_count,
                alpha_blend: false,
            })?);
            if fail {
                return Err(AppError::InvalidState("load failure requested".into()));
            }
            Ok((swap_chain, depth, pipeline, vertices, uniforms))
        })?;
        let (swap_chain, depth, pipeline, vertices, uniforms) = loaded;
        binding.sync.reset();
        self.loaded = Some(Loaded {
            set,
            swap_chain,
            depth,
            pipeline,
            vertices,
            uniforms,
        });
        Ok(())
    }

    fn unload(&mut self) {
        self.log.push("unload");
        if let (Some(binding), Some(mut loaded)) = (self.binding.as_mut(), self.loaded.take()) {
            if let Err(e) = binding.renderer.wait_queue_idle(binding.queue) {
                tracing::warn!("Queue idle wait failed: {e}");
            }
            loaded.set.release(binding.renderer.as_mut());
        }
    }

    fn update(&mut self, _ctx: &UpdateContext<'_>, dt: f32) {
        self.log.push("update");
        self.simulation.updates += 1;
        self.simulation.elapsed += dt;
    }

    fn draw(&mut self, ctx: &DrawContext) -> Result<(), AppError> {
        self.log.push(format!("draw {}", ctx.frame));
        if self.options.fail_draw_at.is_some_and(|at| ctx.frame >= at) {
            return Err(AppError::InvalidState("draw failure requested".into()));
        }
        let (Some(binding), Some(loaded)) = (self.binding.as_mut(), self.loaded.as_ref()) else {
            return Err(AppError::InvalidState("draw while not loaded".into()));
        };
        let r = binding.renderer.as_mut();

        binding.sync.wait_current(r)?;
        let frame = binding.sync.current();
        let image_index = r.acquire_next_image(loaded.swap_chain, binding.sync.image_acquired())?;
        let target = r.swap_chain_image(loaded.swap_chain, image_index)?;
        let slot = binding.sync.current_index();
        let cmd = binding.cmds[slot];

        let elapsed = self.simulation.elapsed.to_ne_bytes();
        r.write_buffer(loaded.uniforms[slot], 0, &elapsed)?;

        r.begin_cmd(cmd)?;
        r.record(
            cmd,
            Command::RenderTargetBarrier {
                target,
                from: ResourceState::Present,
                to: ResourceState::RenderTarget,
            },
        )?;
        r.record(
            cmd,
            Command::BindRenderTargets {
                colors: vec![target],
                depth: Some(loaded.depth),
                load: LoadAction::Clear,
            },
        )?;
        r.record(cmd, Command::BindPipeline(loaded.pipeline))?;
        r.record(
            cmd,
            Command::BindVertexBuffers {
                buffers: vec![loaded.vertices],
                strides: vec![12],
            },
        )?;
        r.record(
            cmd,
            Command::Draw {
                vertex_count: 3,
                first_vertex: 0,
            },
        )?;
        r.record(cmd, Command::UnbindRenderTargets)?;
        r.record(
            cmd,
            Command::RenderTargetBarrier {
                target,
                from: ResourceState::RenderTarget,
                to: ResourceState::Present,
            },
        )?;
        r.end_cmd(cmd)?;

        r.queue_submit(
            binding.queue,
            &SubmitDesc {
                cmds: vec![cmd],
                wait_semaphores: vec![binding.sync.image_acquired()],
                signal_semaphores: vec![frame.render_complete_semaphore],
                signal_fence: Some(frame.render_complete_fence),
            },
        )?;
        r.queue_present(
            binding.queue,
            &PresentDesc {
                swap_chain: loaded.swap_chain,
                image_index,
                wait_semaphores: vec![frame.render_complete_semaphore],
            },
        )?;
        binding.sync.advance();

        Ok(())
    }
}

impl Drop for ProbeApp {
    fn drop(&mut self) {
        if self.loaded.is_some() || self.binding.is_some() {
            tracing::warn!("ProbeApp dropped while holding device objects");
            self.unload();
            self.exit();
        }
    }
}
