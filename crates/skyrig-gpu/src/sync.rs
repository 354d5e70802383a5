//! Frame synchronization.

use tracing::trace;

use crate::command::FenceStatus;
use crate::error::Result;
use crate::handle::{Fence, Semaphore};
use crate::renderer::Renderer;
use crate::resource_set::ResourceSet;

/// Synchronization objects for one frame in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSync {
    /// Signalled when the frame's submission finishes on the GPU.
    pub render_complete_fence: Fence,
    /// Signalled when rendering is done, waited on by present.
    pub render_complete_semaphore: Semaphore,
}

/// Ring of per-frame sync objects plus the image-acquired semaphore.
#[derive(Debug)]
pub struct FrameSyncSet {
    frames: Vec<FrameSync>,
    image_acquired: Semaphore,
    current: usize,
}

impl FrameSyncSet {
    /// Create sync objects for `frames_in_flight` frames, tracked in `set`.
    pub fn new(
        renderer: &mut dyn Renderer,
        set: &mut ResourceSet,
        frames_in_flight: u32,
    ) -> Result<Self> {
        let mut frames = Vec::with_capacity(frames_in_flight as usize);
        for _ in 0..frames_in_flight {
            frames.push(FrameSync {
                render_complete_fence: set.track(renderer.add_fence()?),
                render_complete_semaphore: set.track(renderer.add_semaphore()?),
            });
        }
        let image_acquired = set.track(renderer.add_semaphore()?);
        Ok(Self {
            frames,
            image_acquired,
            current: 0,
        })
    }

    #[must_use]
    pub fn current(&self) -> FrameSync {
        self.frames[self.current]
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn frames_in_flight(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub const fn image_acquired(&self) -> Semaphore {
        self.image_acquired
    }

    /// Block until the current frame's previous submission has finished.
    pub fn wait_current(&self, renderer: &mut dyn Renderer) -> Result<()> {
        let fence = self.current().render_complete_fence;
        if renderer.fence_status(fence)? == FenceStatus::Incomplete {
            trace!("Waiting on frame {} fence", self.current);
            renderer.wait_for_fences(&[fence])?;
        }
        Ok(())
    }

    /// Move to the next frame slot.
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.frames.len();
    }

    /// Restart the ring, e.g. after the swap chain was rebuilt.
    pub fn reset(&mut self) {
        self.current = 0;
    }
}
