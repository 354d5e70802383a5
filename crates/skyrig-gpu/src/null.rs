//! Headless renderer.
//!
//! [`NullRenderer`] implements the full [`Renderer`] contract without a GPU:
//! it validates handles, tracks every live object with a short description,
//! keeps the commands recorded into each command buffer, and counts
//! submissions and presents. State lives behind a shared lock so a
//! [`NullDeviceProbe`] can inspect it while an application owns the
//! renderer.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::Mutex;
use skyrig_core::{Backend, DeviceConfig};
use tracing::{debug, info, warn};

use crate::command::{Command, FenceStatus, PresentDesc, PresentStatus, SubmitDesc};
use crate::desc::{
    BufferDesc, DescriptorData, DescriptorSetDesc, GraphicsPipelineDesc, ImageFormat, QueueDesc,
    RenderTargetDesc, RootSignatureDesc, SamplerDesc, ShaderLoadDesc, SwapChainDesc, TextureDesc,
};
use crate::error::{GpuError, Result};
use crate::handle::{
    Buffer, Cmd, CmdPool, DescriptorSet, Fence, Handle, Pipeline, Queue, RenderTarget, ResourceId,
    ResourceKind, RootSignature, Sampler, Semaphore, Shader, SwapChain, Texture,
};
use crate::renderer::{DeviceFactory, Renderer};

/// Description of a live object.
///
/// `detail` only holds configuration values (sizes, formats, counts), never
/// handle ids, so two objects created from the same configuration compare
/// equal across device rebuilds.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceRecord {
    pub kind: ResourceKind,
    pub label: String,
    pub detail: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NullDeviceStats {
    pub devices_created: u64,
    pub devices_destroyed: u64,
    pub resources_created: u64,
    pub resources_removed: u64,
    pub descriptor_updates: u64,
    pub submits: u64,
    pub presents: u64,
}

#[derive(Debug)]
struct SwapChainState {
    images: Vec<RenderTarget>,
    next_image: u32,
}

#[derive(Debug, Default)]
struct CmdState {
    recording: bool,
    commands: Vec<Command>,
}

#[derive(Debug)]
struct FailPlan {
    kind: ResourceKind,
    skip: usize,
}

#[derive(Debug, Default)]
struct NullDeviceState {
    next_index: u64,
    live: HashMap<ResourceId, ResourceRecord>,
    buffer_sizes: HashMap<ResourceId, u64>,
    texture_sizes: HashMap<ResourceId, u64>,
    swap_chains: HashMap<ResourceId, SwapChainState>,
    cmds: HashMap<ResourceId, CmdState>,
    fences: HashMap<ResourceId, FenceStatus>,
    last_submission: Vec<Command>,
    write_order: Vec<ResourceId>,
    fail_plan: Option<FailPlan>,
    fail_device_creation: bool,
    stats: NullDeviceStats,
}

impl NullDeviceState {
    fn allocate<H: Handle>(&mut self, label: &str, detail: String) -> Result<H> {
        if let Some(plan) = &mut self.fail_plan {
            if plan.kind == H::KIND {
                if plan.skip == 0 {
                    self.fail_plan = None;
                    return Err(GpuError::AllocationFailed {
                        kind: H::KIND,
                        label: label.to_string(),
                    });
                }
                plan.skip -= 1;
            }
        }

        let id = ResourceId::new(H::KIND, self.next_index);
        self.next_index += 1;
        self.live.insert(
            id,
            ResourceRecord {
                kind: H::KIND,
                label: label.to_string(),
                detail,
            },
        );
        self.stats.resources_created += 1;
        Ok(H::from_id(id))
    }

    fn expect_live<H: Handle>(&self, handle: H) -> Result<()> {
        if self.live.contains_key(&handle.id()) {
            Ok(())
        } else {
            Err(GpuError::InvalidHandle(handle.id()))
        }
    }

    fn remove(&mut self, id: ResourceId) {
        if self.live.remove(&id).is_none() {
            warn!("Removing unknown or already removed {id:?}");
            return;
        }
        self.stats.resources_removed += 1;
        self.buffer_sizes.remove(&id);
        self.texture_sizes.remove(&id);
        self.cmds.remove(&id);
        self.fences.remove(&id);
        if let Some(swap_chain) = self.swap_chains.remove(&id) {
            for image in swap_chain.images {
                self.remove(image.id());
            }
        }
    }
}

/// Creates [`NullRenderer`]s that share one inspectable state.
#[derive(Debug, Default)]
pub struct NullDeviceFactory {
    state: Arc<Mutex<NullDeviceState>>,
}

impl NullDeviceFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for inspecting device state from outside the renderer.
    #[must_use]
    pub fn probe(&self) -> NullDeviceProbe {
        NullDeviceProbe {
            state: Arc::clone(&self.state),
        }
    }
}

impl DeviceFactory for NullDeviceFactory {
    fn create(&mut self, app_name: &str, config: &DeviceConfig) -> Result<Box<dyn Renderer>> {
        config.validate().map_err(|e| GpuError::DeviceCreation(e.to_string()))?;

        let mut state = self.state.lock();
        if std::mem::take(&mut state.fail_device_creation) {
            return Err(GpuError::DeviceCreation(format!(
                "{} device unavailable",
                config.backend
            )));
        }
        state.stats.devices_created += 1;
        drop(state);

        info!(
            "Created headless {} device for {app_name} ({}x MSAA, {} images)",
            config.backend,
            config.sample_count.count(),
            config.image_count
        );
        Ok(Box::new(NullRenderer {
            name: format!("Null ({})", config.backend),
            backend: config.backend,
            state: Arc::clone(&self.state),
        }))
    }
}

/// Read access to a null device's state, plus failure injection.
#[derive(Debug, Clone)]
pub struct NullDeviceProbe {
    state: Arc<Mutex<NullDeviceState>>,
}

impl NullDeviceProbe {
    /// Number of live objects across all devices from this factory.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.state.lock().live.len()
    }

    #[must_use]
    pub fn live_count_of(&self, kind: ResourceKind) -> usize {
        self.state
            .lock()
            .live
            .values()
            .filter(|r| r.kind == kind)
            .count()
    }

    /// Sorted descriptions of every live object.
    #[must_use]
    pub fn live_records(&self) -> Vec<ResourceRecord> {
        let mut records: Vec<_> = self.state.lock().live.values().cloned().collect();
        records.sort();
        records
    }

    #[must_use]
    pub fn record(&self, id: ResourceId) -> Option<ResourceRecord> {
        self.state.lock().live.get(&id).cloned()
    }

    #[must_use]
    pub fn stats(&self) -> NullDeviceStats {
        self.state.lock().stats
    }

    /// Commands of the most recent queue submission, in order.
    #[must_use]
    pub fn last_submission(&self) -> Vec<Command> {
        self.state.lock().last_submission.clone()
    }

    /// Targets of every texture/buffer write, in order.
    #[must_use]
    pub fn write_order(&self) -> Vec<ResourceId> {
        self.state.lock().write_order.clone()
    }

    /// Make the allocation of a `kind` object fail after `skip` successes.
    pub fn fail_allocation(&self, kind: ResourceKind, skip: usize) {
        self.state.lock().fail_plan = Some(FailPlan { kind, skip });
    }

    /// Make the next device creation fail.
    pub fn fail_next_device(&self) {
        self.state.lock().fail_device_creation = true;
    }
}

/// A renderer with no GPU behind it.
pub struct NullRenderer {
    name: String,
    backend: Backend,
    state: Arc<Mutex<NullDeviceState>>,
}

impl NullRenderer {
    fn allocate<H: Handle>(&self, label: &str, detail: String) -> Result<H> {
        let handle = self.state.lock().allocate::<H>(label, detail)?;
        debug!("Created {:?} '{label}'", handle.id());
        Ok(handle)
    }

    fn require<H: Handle>(&self, handle: H) -> Result<()> {
        self.state.lock().expect_live(handle)
    }
}

impl Renderer for NullRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> Backend {
        self.backend
    }

    fn add_queue(&mut self, desc: &QueueDesc) -> Result<Queue> {
        self.allocate(
            "queue",
            format!("{:?} {:?}", desc.queue_type, desc.flags),
        )
    }

    fn add_cmd_pool(&mut self, queue: Queue) -> Result<CmdPool> {
        self.require(queue)?;
        self.allocate("cmd pool", String::new())
    }

    fn add_cmds(&mut self, pool: CmdPool, count: u32) -> Result<Vec<Cmd>> {
        self.require(pool)?;
        let mut state = self.state.lock();
        let mut cmds = Vec::with_capacity(count as usize);
        for _ in 0..count {
            match state.allocate::<Cmd>("cmd", String::new()) {
                Ok(cmd) => {
                    state.cmds.insert(cmd.id(), CmdState::default());
                    cmds.push(cmd);
                }
                Err(e) => {
                    for cmd in cmds {
                        state.remove(cmd.id());
                    }
                    return Err(e);
                }
            }
        }
        Ok(cmds)
    }

    fn add_fence(&mut self) -> Result<Fence> {
        let fence: Fence = self.allocate("fence", String::new())?;
        self.state
            .lock()
            .fences
            .insert(fence.id(), FenceStatus::NotSubmitted);
        Ok(fence)
    }

    fn add_semaphore(&mut self) -> Result<Semaphore> {
        self.allocate("semaphore", String::new())
    }

    fn add_shader(&mut self, desc: &ShaderLoadDesc) -> Result<Shader> {
        let stages: Vec<String> = desc
            .stages
            .iter()
            .map(|s| format!("{:?}:{}", s.stage, s.path.display()))
            .collect();
        self.allocate(&desc.name, stages.join(" "))
    }

    fn add_sampler(&mut self, desc: &SamplerDesc) -> Result<Sampler> {
        self.allocate(
            "sampler",
            format!(
                "{:?}/{:?} {:?} {:?}",
                desc.min_filter, desc.mag_filter, desc.mipmap_mode, desc.address_u
            ),
        )
    }

    fn add_root_signature(&mut self, desc: &RootSignatureDesc) -> Result<RootSignature> {
        for shader in &desc.shaders {
            self.require(*shader)?;
        }
        for (_, sampler) in &desc.static_samplers {
            self.require(*sampler)?;
        }
        let samplers: Vec<&str> = desc
            .static_samplers
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        self.allocate(
            "root signature",
            format!("{} shaders [{}]", desc.shaders.len(), samplers.join(",")),
        )
    }

    fn add_descriptor_set(&mut self, desc: &DescriptorSetDesc) -> Result<DescriptorSet> {
        self.require(desc.root_signature)?;
        self.allocate(
            "descriptor set",
            format!("{:?} x{}", desc.update_frequency, desc.max_sets),
        )
    }

    fn update_descriptor_set(
        &mut self,
        set: DescriptorSet,
        _index: u32,
        params: &[DescriptorData],
    ) -> Result<()> {
        let mut state = self.state.lock();
        state.expect_live(set)?;
        for param in params {
            let ids: Vec<ResourceId> = match &param.resource {
                crate::desc::DescriptorResource::Textures(t) => t.iter().map(|h| h.id()).collect(),
                crate::desc::DescriptorResource::Buffers(b) => b.iter().map(|h| h.id()).collect(),
                crate::desc::DescriptorResource::Samplers(s) => s.iter().map(|h| h.id()).collect(),
            };
            if let Some(dead) = ids.into_iter().find(|id| !state.live.contains_key(id)) {
                return Err(GpuError::InvalidHandle(dead));
            }
        }
        state.stats.descriptor_updates += 1;
        Ok(())
    }

    fn add_pipeline(&mut self, desc: &GraphicsPipelineDesc) -> Result<Pipeline> {
        self.require(desc.shader)?;
        self.require(desc.root_signature)?;
        self.allocate(
            &desc.label,
            format!(
                "{:?} stride {} {:?} {:?} x{}",
                desc.topology,
                desc.vertex_layout.stride,
                desc.color_formats,
                desc.depth_format,
                desc.sample_count.count()
            ),
        )
    }

    fn add_texture(&mut self, desc: &TextureDesc) -> Result<Texture> {
        let texture: Texture = self.allocate(
            &desc.label,
            format!("{}x{} {:?}", desc.width, desc.height, desc.format),
        )?;
        self.state
            .lock()
            .texture_sizes
            .insert(texture.id(), desc.byte_size());
        Ok(texture)
    }

    fn write_texture(&mut self, texture: Texture, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        let size = *state
            .texture_sizes
            .get(&texture.id())
            .ok_or(GpuError::InvalidHandle(texture.id()))?;
        if data.len() as u64 != size {
            return Err(GpuError::InvalidState(format!(
                "texture write of {} bytes into {size}-byte texture",
                data.len()
            )));
        }
        state.write_order.push(texture.id());
        Ok(())
    }

    fn add_buffer(&mut self, desc: &BufferDesc) -> Result<Buffer> {
        let buffer: Buffer = self.allocate(
            &desc.label,
            format!("{} bytes {:?} {:?}", desc.size, desc.descriptors, desc.memory_usage),
        )?;
        self.state.lock().buffer_sizes.insert(buffer.id(), desc.size);
        Ok(buffer)
    }

    fn write_buffer(&mut self, buffer: Buffer, offset: u64, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        let size = *state
            .buffer_sizes
            .get(&buffer.id())
            .ok_or(GpuError::InvalidHandle(buffer.id()))?;
        if offset + data.len() as u64 > size {
            return Err(GpuError::InvalidState(format!(
                "buffer write [{offset}, {}) out of bounds for {size}-byte buffer",
                offset + data.len() as u64
            )));
        }
        state.write_order.push(buffer.id());
        Ok(())
    }

    fn add_render_target(&mut self, desc: &RenderTargetDesc) -> Result<RenderTarget> {
        self.allocate(
            &desc.label,
            format!(
                "{}x{} {:?} x{}",
                desc.width,
                desc.height,
                desc.format,
                desc.sample_count.count()
            ),
        )
    }

    fn add_swap_chain(&mut self, desc: &SwapChainDesc) -> Result<SwapChain> {
        self.require(desc.present_queue)?;
        if desc.image_count == 0 || desc.width == 0 || desc.height == 0 {
            return Err(GpuError::InvalidState(format!(
                "degenerate swap chain {}x{} with {} images",
                desc.width, desc.height, desc.image_count
            )));
        }

        let mut state = self.state.lock();
        let swap_chain: SwapChain = state.allocate(
            "swap chain",
            format!(
                "{}x{} {:?} {} images vsync={}",
                desc.width, desc.height, desc.color_format, desc.image_count, desc.vsync
            ),
        )?;
        let mut images = Vec::with_capacity(desc.image_count as usize);
        for i in 0..desc.image_count {
            match state.allocate::<RenderTarget>(
                &format!("swap chain image {i}"),
                format!("{}x{} {:?} x1", desc.width, desc.height, desc.color_format),
            ) {
                Ok(image) => images.push(image),
                Err(e) => {
                    for image in images {
                        state.remove(image.id());
                    }
                    state.remove(swap_chain.id());
                    return Err(e);
                }
            }
        }
        state.swap_chains.insert(
            swap_chain.id(),
            SwapChainState {
                images,
                next_image: 0,
            },
        );
        Ok(swap_chain)
    }

    fn swap_chain_image(&self, swap_chain: SwapChain, index: u32) -> Result<RenderTarget> {
        let state = self.state.lock();
        let chain = state
            .swap_chains
            .get(&swap_chain.id())
            .ok_or(GpuError::InvalidHandle(swap_chain.id()))?;
        chain
            .images
            .get(index as usize)
            .copied()
            .ok_or_else(|| GpuError::InvalidState(format!("swap chain image {index} out of range")))
    }

    fn recommended_swap_chain_format(&self, _hdr: bool, srgb: bool) -> ImageFormat {
        if srgb {
            ImageFormat::Bgra8Srgb
        } else {
            ImageFormat::Bgra8Unorm
        }
    }

    fn remove(&mut self, id: ResourceId) {
        self.state.lock().remove(id);
    }

    fn is_alive(&self, id: ResourceId) -> bool {
        self.state.lock().live.contains_key(&id)
    }

    fn live_resources(&self) -> usize {
        self.state.lock().live.len()
    }

    fn acquire_next_image(&mut self, swap_chain: SwapChain, signal: Semaphore) -> Result<u32> {
        let mut state = self.state.lock();
        state.expect_live(signal)?;
        let chain = state
            .swap_chains
            .get_mut(&swap_chain.id())
            .ok_or(GpuError::InvalidHandle(swap_chain.id()))?;
        let index = chain.next_image;
        chain.next_image = (chain.next_image + 1) % chain.images.len() as u32;
        Ok(index)
    }

    fn fence_status(&self, fence: Fence) -> Result<FenceStatus> {
        self.state
            .lock()
            .fences
            .get(&fence.id())
            .copied()
            .ok_or(GpuError::InvalidHandle(fence.id()))
    }

    fn wait_for_fences(&mut self, fences: &[Fence]) -> Result<()> {
        let mut state = self.state.lock();
        for fence in fences {
            let status = state
                .fences
                .get_mut(&fence.id())
                .ok_or(GpuError::InvalidHandle(fence.id()))?;
            // Work completes instantly on the null device.
            if *status == FenceStatus::Incomplete {
                *status = FenceStatus::Complete;
            }
        }
        Ok(())
    }

    fn begin_cmd(&mut self, cmd: Cmd) -> Result<()> {
        let mut state = self.state.lock();
        let cmd_state = state
            .cmds
            .get_mut(&cmd.id())
            .ok_or(GpuError::InvalidHandle(cmd.id()))?;
        if cmd_state.recording {
            return Err(GpuError::InvalidState(format!("{:?} already recording", cmd.id())));
        }
        cmd_state.recording = true;
        cmd_state.commands.clear();
        Ok(())
    }

    fn record(&mut self, cmd: Cmd, command: Command) -> Result<()> {
        let mut state = self.state.lock();
        let referenced: Vec<ResourceId> = match &command {
            Command::BindRenderTargets { colors, depth, .. } => colors
                .iter()
                .map(|rt| rt.id())
                .chain(depth.iter().map(|rt| rt.id()))
                .collect(),
            Command::RenderTargetBarrier { target, .. } => vec![target.id()],
            Command::BindPipeline(pipeline) => vec![pipeline.id()],
            Command::BindDescriptorSet { set, .. } => vec![set.id()],
            Command::BindVertexBuffers { buffers, .. } => buffers.iter().map(|b| b.id()).collect(),
            _ => Vec::new(),
        };
        if let Some(dead) = referenced.into_iter().find(|id| !state.live.contains_key(id)) {
            return Err(GpuError::InvalidHandle(dead));
        }

        let cmd_state = state
            .cmds
            .get_mut(&cmd.id())
            .ok_or(GpuError::InvalidHandle(cmd.id()))?;
        if !cmd_state.recording {
            return Err(GpuError::InvalidState(format!("{:?} is not recording", cmd.id())));
        }
        cmd_state.commands.push(command);
        Ok(())
    }

    fn end_cmd(&mut self, cmd: Cmd) -> Result<()> {
        let mut state = self.state.lock();
        let cmd_state = state
            .cmds
            .get_mut(&cmd.id())
            .ok_or(GpuError::InvalidHandle(cmd.id()))?;
        if !cmd_state.recording {
            return Err(GpuError::InvalidState(format!("{:?} is not recording", cmd.id())));
        }
        cmd_state.recording = false;
        Ok(())
    }

    fn queue_submit(&mut self, queue: Queue, desc: &SubmitDesc) -> Result<()> {
        let mut state = self.state.lock();
        state.expect_live(queue)?;

        let mut submitted = Vec::new();
        for cmd in &desc.cmds {
            let cmd_state = state
                .cmds
                .get(&cmd.id())
                .ok_or(GpuError::InvalidHandle(cmd.id()))?;
            if cmd_state.recording {
                return Err(GpuError::InvalidState(format!(
                    "{:?} submitted while recording",
                    cmd.id()
                )));
            }
            submitted.extend(cmd_state.commands.iter().cloned());
        }
        if let Some(fence) = desc.signal_fence {
            let status = state
                .fences
                .get_mut(&fence.id())
                .ok_or(GpuError::InvalidHandle(fence.id()))?;
            *status = FenceStatus::Incomplete;
        }
        state.last_submission = submitted;
        state.stats.submits += 1;
        Ok(())
    }

    fn queue_present(&mut self, queue: Queue, desc: &PresentDesc) -> Result<PresentStatus> {
        let mut state = self.state.lock();
        state.expect_live(queue)?;
        state.expect_live(desc.swap_chain)?;
        state.stats.presents += 1;
        Ok(PresentStatus::Success)
    }

    fn wait_queue_idle(&mut self, queue: Queue) -> Result<()> {
        let mut state = self.state.lock();
        state.expect_live(queue)?;
        for status in state.fences.values_mut() {
            if *status == FenceStatus::Incomplete {
                *status = FenceStatus::Complete;
            }
        }
        Ok(())
    }
}

impl Drop for NullRenderer {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.stats.devices_destroyed += 1;
        if !state.live.is_empty() {
            warn!(
                "{} destroyed with {} live objects",
                self.name,
                state.live.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desc::{ClearValue, QueueType};
    use skyrig_core::SampleCount;

    fn device() -> (Box<dyn Renderer>, NullDeviceProbe) {
        let mut factory = NullDeviceFactory::new();
        let probe = factory.probe();
        let renderer = factory
            .create("null-test", &DeviceConfig::default().with_backend(Backend::Null))
            .unwrap();
        (renderer, probe)
    }

    #[test]
    fn tracks_and_releases_objects() {
        let (mut renderer, probe) = device();
        let queue = renderer.add_queue(&QueueDesc::default()).unwrap();
        let pool = renderer.add_cmd_pool(queue).unwrap();
        let cmds = renderer.add_cmds(pool, 3).unwrap();
        assert_eq!(probe.live_count(), 5);
        assert_eq!(probe.live_count_of(ResourceKind::Cmd), 3);

        for cmd in cmds {
            renderer.remove(cmd.id());
        }
        renderer.remove(pool.id());
        renderer.remove(queue.id());
        assert_eq!(probe.live_count(), 0);
        assert_eq!(probe.stats().resources_removed, 5);
    }

    #[test]
    fn swap_chain_owns_its_images() {
        let (mut renderer, probe) = device();
        let queue = renderer
            .add_queue(&QueueDesc {
                queue_type: QueueType::Graphics,
                ..QueueDesc::default()
            })
            .unwrap();
        let swap_chain = renderer
            .add_swap_chain(&SwapChainDesc {
                window: None,
                present_queue: queue,
                width: 64,
                height: 32,
                image_count: 3,
                color_format: ImageFormat::Bgra8Srgb,
                clear_value: ClearValue::Color([0.0; 4]),
                vsync: false,
            })
            .unwrap();
        assert_eq!(probe.live_count_of(ResourceKind::RenderTarget), 3);
        assert!(renderer.swap_chain_image(swap_chain, 2).is_ok());
        assert!(renderer.swap_chain_image(swap_chain, 3).is_err());

        renderer.remove(swap_chain.id());
        assert_eq!(probe.live_count_of(ResourceKind::RenderTarget), 0);
        renderer.remove(queue.id());
    }

    #[test]
    fn injected_failure_hits_requested_allocation() {
        let (mut renderer, probe) = device();
        probe.fail_allocation(ResourceKind::Fence, 1);

        let first = renderer.add_fence().unwrap();
        let second = renderer.add_fence();
        assert!(matches!(
            second,
            Err(GpuError::AllocationFailed {
                kind: ResourceKind::Fence,
                ..
            })
        ));
        // The plan is consumed by the failure.
        let third = renderer.add_fence().unwrap();
        renderer.remove(first.id());
        renderer.remove(third.id());
    }

    #[test]
    fn recording_rules_are_enforced() {
        let (mut renderer, probe) = device();
        let queue = renderer.add_queue(&QueueDesc::default()).unwrap();
        let pool = renderer.add_cmd_pool(queue).unwrap();
        let cmd = renderer.add_cmds(pool, 1).unwrap()[0];
        let fence = renderer.add_fence().unwrap();

        assert!(renderer.record(cmd, Command::EndMarker).is_err());
        renderer.begin_cmd(cmd).unwrap();
        renderer.record(cmd, Command::viewport(4, 4)).unwrap();
        renderer
            .record(cmd, Command::Draw { vertex_count: 3, first_vertex: 0 })
            .unwrap();
        assert!(renderer
            .queue_submit(queue, &SubmitDesc { cmds: vec![cmd], ..SubmitDesc::default() })
            .is_err());
        renderer.end_cmd(cmd).unwrap();
        renderer
            .queue_submit(
                queue,
                &SubmitDesc {
                    cmds: vec![cmd],
                    signal_fence: Some(fence),
                    ..SubmitDesc::default()
                },
            )
            .unwrap();

        assert_eq!(probe.last_submission().len(), 2);
        assert_eq!(renderer.fence_status(fence).unwrap(), FenceStatus::Incomplete);
        renderer.wait_for_fences(&[fence]).unwrap();
        assert_eq!(renderer.fence_status(fence).unwrap(), FenceStatus::Complete);
    }

    #[test]
    fn render_target_detail_is_configuration_only() {
        let (mut renderer, probe) = device();
        let desc = RenderTargetDesc {
            label: "depth".into(),
            width: 8,
            height: 8,
            format: ImageFormat::D32Float,
            sample_count: SampleCount::X4,
            clear_value: ClearValue::DepthStencil { depth: 0.0, stencil: 0 },
            flags: crate::desc::TextureCreationFlags::ON_TILE,
        };
        let a = renderer.add_render_target(&desc).unwrap();
        let b = renderer.add_render_target(&desc).unwrap();
        assert_eq!(probe.record(a.id()), probe.record(b.id()));
        assert_eq!(probe.record(a.id()).unwrap().detail, "8x8 D32Float x4");
        renderer.remove(a.id());
        renderer.remove(b.id());
    }

    #[test]
    fn device_creation_failure_is_reported() {
        let mut factory = NullDeviceFactory::new();
        factory.probe().fail_next_device();
        assert!(factory.create("x", &DeviceConfig::default()).is_err());
        assert!(factory.create("x", &DeviceConfig::default()).is_ok());
    }
}
