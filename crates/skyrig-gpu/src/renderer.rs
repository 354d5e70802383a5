//! The renderer collaborator interface.

use skyrig_core::{Backend, DeviceConfig};

use crate::command::{Command, FenceStatus, PresentDesc, PresentStatus, SubmitDesc};
use crate::desc::{
    BufferDesc, DescriptorData, DescriptorSetDesc, GraphicsPipelineDesc, ImageFormat, QueueDesc,
    RenderTargetDesc, RootSignatureDesc, SamplerDesc, ShaderLoadDesc, SwapChainDesc, TextureDesc,
};
use crate::error::Result;
use crate::handle::{
    Buffer, Cmd, CmdPool, DescriptorSet, Fence, Pipeline, Queue, RenderTarget, ResourceId,
    RootSignature, Sampler, Semaphore, Shader, SwapChain, Texture,
};

/// A bound rendering device.
///
/// Every `add_*` call creates an object the caller owns until it passes the
/// id to [`Renderer::remove`]. Dropping the renderer destroys the device;
/// all objects must have been removed by then.
pub trait Renderer {
    /// Human-readable device name.
    fn name(&self) -> &str;

    fn backend(&self) -> Backend;

    // ===== Queues, command buffers, synchronization =====

    fn add_queue(&mut self, desc: &QueueDesc) -> Result<Queue>;

    fn add_cmd_pool(&mut self, queue: Queue) -> Result<CmdPool>;

    /// Allocate `count` command buffers from a pool.
    fn add_cmds(&mut self, pool: CmdPool, count: u32) -> Result<Vec<Cmd>>;

    fn add_fence(&mut self) -> Result<Fence>;

    fn add_semaphore(&mut self) -> Result<Semaphore>;

    // ===== Pipeline objects =====

    fn add_shader(&mut self, desc: &ShaderLoadDesc) -> Result<Shader>;

    fn add_sampler(&mut self, desc: &SamplerDesc) -> Result<Sampler>;

    fn add_root_signature(&mut self, desc: &RootSignatureDesc) -> Result<RootSignature>;

    fn add_descriptor_set(&mut self, desc: &DescriptorSetDesc) -> Result<DescriptorSet>;

    /// Write bindings into slot `index` of a descriptor set.
    fn update_descriptor_set(
        &mut self,
        set: DescriptorSet,
        index: u32,
        params: &[DescriptorData],
    ) -> Result<()>;

    fn add_pipeline(&mut self, desc: &GraphicsPipelineDesc) -> Result<Pipeline>;

    // ===== Memory-backed resources =====

    fn add_texture(&mut self, desc: &TextureDesc) -> Result<Texture>;

    fn write_texture(&mut self, texture: Texture, data: &[u8]) -> Result<()>;

    fn add_buffer(&mut self, desc: &BufferDesc) -> Result<Buffer>;

    /// Copy `data` into a buffer starting at `offset`.
    fn write_buffer(&mut self, buffer: Buffer, offset: u64, data: &[u8]) -> Result<()>;

    fn add_render_target(&mut self, desc: &RenderTargetDesc) -> Result<RenderTarget>;

    /// Create a swap chain. Its per-image render targets are owned by the
    /// swap chain and released with it.
    fn add_swap_chain(&mut self, desc: &SwapChainDesc) -> Result<SwapChain>;

    fn swap_chain_image(&self, swap_chain: SwapChain, index: u32) -> Result<RenderTarget>;

    /// Color format to use for swap chains on this device.
    fn recommended_swap_chain_format(&self, hdr: bool, srgb: bool) -> ImageFormat;

    /// Release any object created by this renderer.
    fn remove(&mut self, id: ResourceId);

    /// Returns `true` if the id refers to a live object.
    fn is_alive(&self, id: ResourceId) -> bool;

    /// Number of live objects, for leak checks.
    fn live_resources(&self) -> usize;

    // ===== Frame operations =====

    /// Acquire the next presentable image, signalling `signal` when ready.
    fn acquire_next_image(&mut self, swap_chain: SwapChain, signal: Semaphore) -> Result<u32>;

    fn fence_status(&self, fence: Fence) -> Result<FenceStatus>;

    /// Block until every fence has completed.
    fn wait_for_fences(&mut self, fences: &[Fence]) -> Result<()>;

    fn begin_cmd(&mut self, cmd: Cmd) -> Result<()>;

    fn record(&mut self, cmd: Cmd, command: Command) -> Result<()>;

    fn end_cmd(&mut self, cmd: Cmd) -> Result<()>;

    fn queue_submit(&mut self, queue: Queue, desc: &SubmitDesc) -> Result<()>;

    fn queue_present(&mut self, queue: Queue, desc: &PresentDesc) -> Result<PresentStatus>;

    fn wait_queue_idle(&mut self, queue: Queue) -> Result<()>;
}

/// Creates renderers bound to a device configuration.
pub trait DeviceFactory {
    fn create(&mut self, app_name: &str, config: &DeviceConfig) -> Result<Box<dyn Renderer>>;
}
