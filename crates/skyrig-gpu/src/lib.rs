//! Renderer-facing interfaces for skyrig.
//!
//! This crate provides:
//! - The [`Renderer`] trait: device, queues, command buffers, sync primitives,
//!   pipeline objects, textures, buffers, render targets and swap chains
//! - [`DeviceFactory`] for binding a renderer to a [`DeviceConfig`](skyrig_core::DeviceConfig)
//! - [`ResourceSet`], an ordered allocation scope with all-or-nothing builds
//! - The [`ResourceLoader`] trait and a priority-queued implementation
//! - [`NullRenderer`], a headless device that tracks every allocation and
//!   every recorded command

pub mod command;
pub mod desc;
pub mod error;
pub mod handle;
pub mod loader;
pub mod null;
pub mod renderer;
pub mod resource_set;
pub mod sync;

pub use command::{
    Command, FenceStatus, LoadAction, PresentDesc, PresentStatus, ResourceState, SubmitDesc,
};
pub use desc::*;
pub use error::{GpuError, Result};
pub use handle::{
    Buffer, Cmd, CmdPool, DescriptorSet, Fence, Handle, Pipeline, Queue, RenderTarget,
    ResourceId, ResourceKind, RootSignature, Sampler, Semaphore, Shader, SwapChain, Texture,
};
pub use loader::{BufferLoadDesc, LoadPriority, QueuedLoader, ResourceLoader, TextureLoadDesc};
pub use null::{NullDeviceFactory, NullDeviceProbe, NullDeviceStats, NullRenderer, ResourceRecord};
pub use renderer::{DeviceFactory, Renderer};
pub use resource_set::ResourceSet;
pub use sync::{FrameSync, FrameSyncSet};
