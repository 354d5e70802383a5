//! Command recording and submission types.

use crate::handle::{Buffer, Cmd, DescriptorSet, Fence, Pipeline, RenderTarget, Semaphore, SwapChain};

/// What happens to an attachment's contents when it is bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadAction {
    DontCare,
    Load,
    Clear,
}

/// Usage state of a render target for barriers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceState {
    Present,
    RenderTarget,
    DepthWrite,
    ShaderResource,
}

/// A single recorded GPU command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    BindRenderTargets {
        colors: Vec<RenderTarget>,
        depth: Option<RenderTarget>,
        load: LoadAction,
    },
    /// Unbind all render targets.
    UnbindRenderTargets,
    SetViewport {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        min_depth: f32,
        max_depth: f32,
    },
    SetScissor {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    RenderTargetBarrier {
        target: RenderTarget,
        from: ResourceState,
        to: ResourceState,
    },
    BindPipeline(Pipeline),
    BindDescriptorSet {
        index: u32,
        set: DescriptorSet,
    },
    BindVertexBuffers {
        buffers: Vec<Buffer>,
        strides: Vec<u32>,
    },
    Draw {
        vertex_count: u32,
        first_vertex: u32,
    },
    DrawInstanced {
        vertex_count: u32,
        first_vertex: u32,
        instance_count: u32,
        first_instance: u32,
    },
    BeginMarker(String),
    EndMarker,
}

impl Command {
    /// Full-surface viewport with the standard depth range.
    #[must_use]
    pub fn viewport(width: u32, height: u32) -> Self {
        Self::SetViewport {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }

    /// Full-surface scissor.
    #[must_use]
    pub const fn scissor(width: u32, height: u32) -> Self {
        Self::SetScissor {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Returns `true` for draw calls.
    #[must_use]
    pub const fn is_draw(&self) -> bool {
        matches!(self, Self::Draw { .. } | Self::DrawInstanced { .. })
    }
}

/// Queue submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmitDesc {
    pub cmds: Vec<Cmd>,
    pub wait_semaphores: Vec<Semaphore>,
    pub signal_semaphores: Vec<Semaphore>,
    pub signal_fence: Option<Fence>,
}

/// Swap chain presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentDesc {
    pub swap_chain: SwapChain,
    pub image_index: u32,
    pub wait_semaphores: Vec<Semaphore>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentStatus {
    Success,
    /// The swap chain must be recreated before the next present.
    OutOfDate,
    DeviceLost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FenceStatus {
    Complete,
    Incomplete,
    /// Never submitted; waiting on it returns immediately.
    NotSubmitted,
}
