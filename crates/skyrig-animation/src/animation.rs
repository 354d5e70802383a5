//! A clip bound to a rig and a controller.

use tracing::debug;

use crate::clip::Clip;
use crate::controller::ClipController;
use crate::error::{AnimationError, Result};
use crate::rig::Rig;
use crate::transform::Transform;

#[derive(Debug, Clone)]
pub struct Animation {
    clip: Clip,
    controller: ClipController,
    locals: Vec<Transform>,
}

impl Animation {
    pub fn new(rig: &Rig, clip: Clip, controller: ClipController) -> Result<Self> {
        if clip.num_tracks() != rig.num_joints() {
            return Err(AnimationError::JointCountMismatch {
                clip: clip.name().to_string(),
                tracks: clip.num_tracks(),
                joints: rig.num_joints(),
            });
        }
        let mut locals = rig.bind_pose().to_vec();
        clip.sample(controller.time_ratio(), &mut locals);
        debug!(
            "Bound clip '{}' ({:.2}s) to {} joints",
            clip.name(),
            clip.duration(),
            locals.len()
        );
        Ok(Self {
            clip,
            controller,
            locals,
        })
    }

    /// Advance playback and resample the local pose.
    pub fn update(&mut self, dt: f32) {
        self.controller.update(self.clip.duration(), dt);
        self.sample();
    }

    /// Resample at the controller's current ratio without advancing.
    pub fn sample(&mut self) {
        self.clip
            .sample(self.controller.time_ratio(), &mut self.locals);
    }

    /// Joint transforms relative to their parents.
    #[must_use]
    pub fn local_pose(&self) -> &[Transform] {
        &self.locals
    }

    #[must_use]
    pub const fn clip(&self) -> &Clip {
        &self.clip
    }

    #[must_use]
    pub const fn controller(&self) -> &ClipController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ClipController {
        &mut self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_clip() {
        let rig = Rig::stick_figure();
        let clip = Clip::new("short", 1.0, vec![]).unwrap();
        assert!(matches!(
            Animation::new(&rig, clip, ClipController::new()),
            Err(AnimationError::JointCountMismatch { tracks: 0, joints: 17, .. })
        ));
    }

    #[test]
    fn update_changes_pose() {
        let rig = Rig::stick_figure();
        let mut animation =
            Animation::new(&rig, Clip::dance(&rig), ClipController::new()).unwrap();
        let before = animation.local_pose().to_vec();
        animation.update(0.25);
        assert_ne!(animation.local_pose(), before.as_slice());
        assert!(animation.controller().time_ratio() > 0.0);
    }
}
