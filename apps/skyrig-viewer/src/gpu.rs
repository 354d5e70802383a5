//! Device objects and frame recording.
//!
//! [`Binding`] lives from init to exit and holds the renderer, the queue,
//! command buffers, frame sync and the resource loader. [`SceneGpu`] lives
//! from load to unload and holds everything sized or formatted by the
//! current settings.

use std::sync::Arc;

use skyrig_app::{AppError, InitContext, LoadContext};
use skyrig_core::{ResourceDirectory, ResourcePaths};
use skyrig_gpu::{
    Buffer, BufferDesc, BufferLoadDesc, ClearValue, Cmd, CmdPool, Command, CullMode,
    DepthState, DescriptorData, DescriptorSet, DescriptorSetDesc, DescriptorUpdateFrequency,
    FrameSyncSet, GraphicsPipelineDesc, ImageFormat, LoadAction, LoadPriority, Pipeline,
    PresentDesc, PresentStatus, PrimitiveTopology, Queue, QueueDesc, QueuedLoader, RenderTarget,
    RenderTargetDesc, Renderer, ResourceLoader, ResourceSet, ResourceState, RootSignature,
    RootSignatureDesc, SamplerDesc, Shader, ShaderLoadDesc, SubmitDesc, SwapChain, SwapChainDesc,
    TextureCreationFlags, TextureLoadDesc, VertexFormat, VertexLayout,
};
use skyrig_ui::{AppUi, UiLoadDesc};
use tracing::{debug, info, warn};

use crate::assets::{PLANE_SHADER, SKELETON_SHADER, SKYBOX_SHADER, UI_SHADER};
use crate::scene::{FrameData, Meshes};
use crate::skybox::FACE_TEXTURES;
use crate::uniforms::{block_size, PlaneBlock, SkeletonBlock, SkyboxBlock};

const DEPTH_FORMAT: ImageFormat = ImageFormat::D32Float;
const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const SKELETON_VERTEX_STRIDE: u32 = 24;

/// Renderer and the objects that survive reloads.
pub struct Binding {
    renderer: Box<dyn Renderer>,
    set: ResourceSet,
    queue: Queue,
    cmds: Vec<Cmd>,
    sync: FrameSyncSet,
    loader: QueuedLoader,
}

impl Binding {
    /// Create a renderer for the context's device configuration.
    pub fn new(app_name: &str, ctx: &mut InitContext<'_>) -> Result<Self, AppError> {
        let mut renderer = ctx.factory.create(app_name, ctx.device)?;
        let image_count = ctx.device.image_count;
        let (set, (queue, cmds, sync)) = ResourceSet::build(renderer.as_mut(), |r, set| {
            let queue = set.track(r.add_queue(&QueueDesc::default())?);
            let pool: CmdPool = set.track(r.add_cmd_pool(queue)?);
            let cmds = set.track_all(r.add_cmds(pool, image_count)?);
            let sync = FrameSyncSet::new(r, set, image_count)?;
            Ok::<_, AppError>((queue, cmds, sync))
        })?;
        info!("Bound to {} ({} frames in flight)", renderer.name(), image_count);
        Ok(Self {
            renderer,
            set,
            queue,
            cmds,
            sync,
            loader: QueuedLoader::new(Arc::clone(ctx.assets)),
        })
    }

    /// Objects owned by the binding itself.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.set.len()
    }

    /// Uploads queued in the loader and not yet written.
    #[must_use]
    pub fn pending_uploads(&self) -> usize {
        self.loader.pending()
    }

    fn wait_idle(&mut self) {
        if let Err(e) = self.renderer.wait_queue_idle(self.queue) {
            warn!("Queue idle wait failed: {e}");
        }
    }

    /// Release everything and destroy the renderer.
    pub fn release(mut self) {
        self.wait_idle();
        self.set.release(self.renderer.as_mut());
        debug!("Released device binding");
    }
}

/// Per-image uniform buffers.
#[derive(Debug, Clone, Copy)]
struct FrameBuffers {
    skybox: Buffer,
    plane: Buffer,
    joints: Buffer,
    bones: Buffer,
}

#[derive(Debug, Clone, Copy)]
struct Pipelines {
    skybox: Pipeline,
    plane: Pipeline,
    skeleton: Pipeline,
}

#[derive(Debug, Clone, Copy)]
struct DescriptorSets {
    /// Sky faces, updated once.
    textures: DescriptorSet,
    /// Two slots per image: sky then plane.
    uniforms: DescriptorSet,
    /// Two slots per image: joints then bones.
    skeleton: DescriptorSet,
}

#[derive(Debug, Clone, Copy)]
struct VertexBuffers {
    skybox: (Buffer, u32),
    plane: (Buffer, u32),
    joint: (Buffer, u32),
    bone: (Buffer, u32),
}

/// Objects that depend on the device configuration and window size.
pub struct SceneGpu {
    set: ResourceSet,
    swap_chain: SwapChain,
    depth: RenderTarget,
    width: u32,
    height: u32,
    pipelines: Pipelines,
    descriptors: DescriptorSets,
    vertices: VertexBuffers,
    frames: Vec<FrameBuffers>,
}

/// Queue an upload of `data` into a new vertex buffer. Returns the buffer and
/// its vertex count.
fn upload<T: bytemuck::Pod>(
    loader: &mut QueuedLoader,
    r: &mut dyn Renderer,
    set: &mut ResourceSet,
    label: &str,
    data: &[T],
) -> Result<(Buffer, u32), AppError> {
    let bytes: &[u8] = bytemuck::cast_slice(data);
    let buffer = set.track(loader.load_buffer(
        r,
        &BufferLoadDesc {
            desc: BufferDesc::vertex(label, bytes.len() as u64),
            data: Some(bytes),
        },
        LoadPriority::Normal,
    )?);
    let count = u32::try_from(data.len())
        .map_err(|_| AppError::InvalidState(format!("{label}: too many vertices")))?;
    Ok((buffer, count))
}

fn shader(
    r: &mut dyn Renderer,
    set: &mut ResourceSet,
    paths: &ResourcePaths,
    name: &str,
    (vert, frag): (&str, &str),
) -> Result<Shader, AppError> {
    Ok(set.track(r.add_shader(&ShaderLoadDesc::graphics(
        name,
        paths.resolve(ResourceDirectory::Shaders, vert),
        paths.resolve(ResourceDirectory::Shaders, frag),
    ))?))
}

fn draw_vertices(
    r: &mut dyn Renderer,
    cmd: Cmd,
    (buffer, count): (Buffer, u32),
    stride: u32,
) -> skyrig_gpu::Result<()> {
    r.record(
        cmd,
        Command::BindVertexBuffers {
            buffers: vec![buffer],
            strides: vec![stride],
        },
    )?;
    r.record(
        cmd,
        Command::Draw {
            vertex_count: count,
            first_vertex: 0,
        },
    )
}

/// Instanced draw of a skeleton mesh (position + normal vertices).
fn draw_instances(
    r: &mut dyn Renderer,
    cmd: Cmd,
    (buffer, count): (Buffer, u32),
    instances: u32,
) -> skyrig_gpu::Result<()> {
    r.record(
        cmd,
        Command::BindVertexBuffers {
            buffers: vec![buffer],
            strides: vec![SKELETON_VERTEX_STRIDE],
        },
    )?;
    r.record(
        cmd,
        Command::DrawInstanced {
            vertex_count: count,
            first_vertex: 0,
            instance_count: instances,
            first_instance: 0,
        },
    )
}

impl SceneGpu {
    /// Build every load-time object, all or nothing.
    ///
    /// The UI batch is loaded last and tracked in the same set.
    pub fn load(
        binding: &mut Binding,
        ui: &mut AppUi,
        meshes: &Meshes,
        paths: &ResourcePaths,
        ctx: &LoadContext<'_>,
    ) -> Result<Self, AppError> {
        let Binding {
            renderer,
            queue,
            sync,
            loader,
            ..
        } = binding;
        let queue = *queue;
        let (width, height) = (ctx.settings.width, ctx.settings.height);
        let image_count = ctx.device.image_count;
        let sample_count = ctx.device.sample_count;

        let built = ResourceSet::build(renderer.as_mut(), |r, set| {
            let color_format = r.recommended_swap_chain_format(true, false);
            let swap_chain = set.track(r.add_swap_chain(&SwapChainDesc {
                window: ctx.window_handle,
                present_queue: queue,
                width,
                height,
                image_count,
                color_format,
                clear_value: ClearValue::Color(CLEAR_COLOR),
                vsync: ctx.device.vsync,
            })?);
            let depth = set.track(r.add_render_target(&RenderTargetDesc {
                label: "depth".into(),
                width,
                height,
                format: DEPTH_FORMAT,
                sample_count,
                clear_value: ClearValue::DepthStencil {
                    depth: 0.0,
                    stencil: 0,
                },
                flags: TextureCreationFlags::ON_TILE,
            })?);

            let skybox_shader = shader(r, set, paths, "skybox", SKYBOX_SHADER)?;
            let skeleton_shader = shader(r, set, paths, "skeleton", SKELETON_SHADER)?;
            let plane_shader = shader(r, set, paths, "plane", PLANE_SHADER)?;
            let default_sampler = set.track(r.add_sampler(&SamplerDesc::LINEAR_REPEAT)?);
            let skybox_sampler = set.track(r.add_sampler(&SamplerDesc::LINEAR_CLAMP)?);
            let root_signature: RootSignature =
                set.track(r.add_root_signature(&RootSignatureDesc {
                    shaders: vec![skybox_shader, skeleton_shader, plane_shader],
                    static_samplers: vec![
                        ("defaultSampler".into(), default_sampler),
                        ("skyboxSampler".into(), skybox_sampler),
                    ],
                })?);

            let mut descriptor_set = |update_frequency, max_sets| {
                r.add_descriptor_set(&DescriptorSetDesc {
                    root_signature,
                    update_frequency,
                    max_sets,
                })
                .map(|s| set.track(s))
            };
            let descriptors = DescriptorSets {
                textures: descriptor_set(DescriptorUpdateFrequency::None, 1)?,
                uniforms: descriptor_set(DescriptorUpdateFrequency::PerFrame, image_count * 2)?,
                skeleton: descriptor_set(DescriptorUpdateFrequency::PerDraw, image_count * 2)?,
            };

            let mut faces = Vec::with_capacity(FACE_TEXTURES.len());
            for (binding_name, file) in FACE_TEXTURES {
                let texture = set.track(loader.load_texture(
                    r,
                    &TextureLoadDesc::new(paths.resolve(ResourceDirectory::Textures, file)),
                    LoadPriority::Normal,
                )?);
                faces.push(DescriptorData::texture(binding_name, texture));
            }
            let vertices = VertexBuffers {
                skybox: upload(loader, r, set, "skybox vertices", &meshes.skybox)?,
                plane: upload(loader, r, set, "plane vertices", &meshes.plane)?,
                joint: upload(loader, r, set, "joint vertices", &meshes.joint)?,
                bone: upload(loader, r, set, "bone vertices", &meshes.bone)?,
            };
            loader.wait_for_all(r)?;

            let mut frames = Vec::with_capacity(image_count as usize);
            for i in 0..image_count {
                let mut uniform = |label: &str, size| {
                    r.add_buffer(&BufferDesc::uniform(format!("{label} uniforms {i}"), size))
                        .map(|b| set.track(b))
                };
                frames.push(FrameBuffers {
                    skybox: uniform("skybox", block_size::<SkyboxBlock>())?,
                    plane: uniform("plane", block_size::<PlaneBlock>())?,
                    joints: uniform("joint", block_size::<SkeletonBlock>())?,
                    bones: uniform("bone", block_size::<SkeletonBlock>())?,
                });
            }

            r.update_descriptor_set(descriptors.textures, 0, &faces)?;
            let uniform = |buffer| [DescriptorData::buffer("uniformBlock", buffer)];
            for (i, frame) in (0u32..).zip(&frames) {
                let (first, second) = (i * 2, i * 2 + 1);
                r.update_descriptor_set(descriptors.uniforms, first, &uniform(frame.skybox))?;
                r.update_descriptor_set(descriptors.uniforms, second, &uniform(frame.plane))?;
                r.update_descriptor_set(descriptors.skeleton, first, &uniform(frame.joints))?;
                r.update_descriptor_set(descriptors.skeleton, second, &uniform(frame.bones))?;
            }

            let mut pipeline = |label: &str,
                                shader,
                                formats: &[VertexFormat],
                                depth_state,
                                cull_mode| {
                r.add_pipeline(&GraphicsPipelineDesc {
                    label: label.into(),
                    shader,
                    root_signature,
                    vertex_layout: VertexLayout::packed(formats),
                    topology: PrimitiveTopology::TriangleList,
                    depth_state,
                    cull_mode,
                    color_formats: vec![color_format],
                    depth_format: Some(DEPTH_FORMAT),
                    sample_count,
                    alpha_blend: false,
                })
                .map(|p| set.track(p))
            };
            let pipelines = Pipelines {
                skybox: pipeline(
                    "skybox",
                    skybox_shader,
                    &[VertexFormat::Float4],
                    None,
                    CullMode::None,
                )?,
                plane: pipeline(
                    "plane",
                    plane_shader,
                    &[VertexFormat::Float4, VertexFormat::Float2],
                    Some(DepthState::REVERSE_Z),
                    CullMode::None,
                )?,
                skeleton: pipeline(
                    "skeleton",
                    skeleton_shader,
                    &[VertexFormat::Float3, VertexFormat::Float3],
                    Some(DepthState::REVERSE_Z),
                    CullMode::Back,
                )?,
            };

            ui.load(
                r,
                set,
                &UiLoadDesc {
                    color_format,
                    sample_count,
                    image_count,
                    width,
                    height,
                    vertex_shader: paths.resolve(ResourceDirectory::Shaders, UI_SHADER.0),
                    fragment_shader: paths.resolve(ResourceDirectory::Shaders, UI_SHADER.1),
                },
            )?;

            Ok::<_, AppError>((swap_chain, depth, pipelines, descriptors, vertices, frames))
        });
        // Uploads queued before the failure target objects that were just removed.
        let (set, (swap_chain, depth, pipelines, descriptors, vertices, frames)) =
            built.inspect_err(|_| {
                loader.clear();
            })?;

        sync.reset();
        debug!("Loaded {} scene objects at {width}x{height}", set.len());
        Ok(Self {
            set,
            swap_chain,
            depth,
            width,
            height,
            pipelines,
            descriptors,
            vertices,
            frames,
        })
    }

    /// Objects owned by this load, UI included.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.set.len()
    }

    /// Wait for the GPU and release everything, newest first.
    pub fn release(mut self, binding: &mut Binding) {
        binding.wait_idle();
        self.set.release(binding.renderer.as_mut());
    }

    /// Record and present one frame from `frame`'s staged data.
    pub fn draw(
        &self,
        binding: &mut Binding,
        ui: &AppUi,
        frame: &FrameData,
    ) -> Result<(), AppError> {
        let r = binding.renderer.as_mut();
        binding.sync.wait_current(r)?;
        let sync = binding.sync.current();
        let image_index = r.acquire_next_image(self.swap_chain, binding.sync.image_acquired())?;
        let target = r.swap_chain_image(self.swap_chain, image_index)?;
        let slot = binding.sync.current_index();
        let slot_index = u32::try_from(slot)
            .map_err(|_| AppError::InvalidState(format!("frame slot {slot} out of range")))?;
        let cmd = binding.cmds[slot];
        let buffers = self.frames[slot];

        r.write_buffer(buffers.skybox, 0, bytemuck::bytes_of(&frame.skybox))?;
        r.write_buffer(buffers.plane, 0, bytemuck::bytes_of(&frame.plane))?;
        r.write_buffer(buffers.joints, 0, bytemuck::bytes_of(frame.joints.as_ref()))?;
        r.write_buffer(buffers.bones, 0, bytemuck::bytes_of(frame.bones.as_ref()))?;

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
                depth: Some(self.depth),
                load: LoadAction::Clear,
            },
        )?;
        r.record(cmd, Command::viewport(self.width, self.height))?;
        r.record(cmd, Command::scissor(self.width, self.height))?;

        r.record(cmd, Command::BeginMarker("Draw Skybox".into()))?;
        r.record(cmd, Command::BindPipeline(self.pipelines.skybox))?;
        r.record(
            cmd,
            Command::BindDescriptorSet {
                index: 0,
                set: self.descriptors.textures,
            },
        )?;
        r.record(
            cmd,
            Command::BindDescriptorSet {
                index: slot_index * 2,
                set: self.descriptors.uniforms,
            },
        )?;
        draw_vertices(r, cmd, self.vertices.skybox, 16)?;
        r.record(cmd, Command::EndMarker)?;

        if frame.draw_plane {
            r.record(cmd, Command::BeginMarker("Draw Plane".into()))?;
            r.record(cmd, Command::BindPipeline(self.pipelines.plane))?;
            r.record(
                cmd,
                Command::BindDescriptorSet {
                    index: slot_index * 2 + 1,
                    set: self.descriptors.uniforms,
                },
            )?;
            draw_vertices(r, cmd, self.vertices.plane, 24)?;
            r.record(cmd, Command::EndMarker)?;
        }

        r.record(cmd, Command::BeginMarker("Draw Skeleton".into()))?;
        r.record(cmd, Command::BindPipeline(self.pipelines.skeleton))?;
        if frame.joint_count > 0 {
            r.record(
                cmd,
                Command::BindDescriptorSet {
                    index: slot_index * 2,
                    set: self.descriptors.skeleton,
                },
            )?;
            draw_instances(r, cmd, self.vertices.joint, frame.joint_count)?;
        }
        if frame.bone_count > 0 {
            r.record(
                cmd,
                Command::BindDescriptorSet {
                    index: slot_index * 2 + 1,
                    set: self.descriptors.skeleton,
                },
            )?;
            draw_instances(r, cmd, self.vertices.bone, frame.bone_count)?;
        }
        r.record(cmd, Command::EndMarker)?;

        r.record(
            cmd,
            Command::BindRenderTargets {
                colors: vec![target],
                depth: None,
                load: LoadAction::Load,
            },
        )?;
        ui.draw(r, cmd, slot)?;
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
                signal_semaphores: vec![sync.render_complete_semaphore],
                signal_fence: Some(sync.render_complete_fence),
            },
        )?;
        let status = r.queue_present(
            binding.queue,
            &PresentDesc {
                swap_chain: self.swap_chain,
                image_index,
                wait_semaphores: vec![sync.render_complete_semaphore],
            },
        )?;
        binding.sync.advance();

        match status {
            PresentStatus::Success => Ok(()),
            PresentStatus::OutOfDate => {
                warn!("Swap chain out of date, waiting for a resize");
                Ok(())
            }
            PresentStatus::DeviceLost => Err(skyrig_gpu::GpuError::DeviceLost.into()),
        }
    }
}
