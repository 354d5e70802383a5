//! Model-space poses for an animated rig instance.

use glam::{Mat4, Vec3};

use crate::animation::Animation;
use crate::rig::Rig;
use crate::transform::Transform;

/// One instance of a rig in the world.
#[derive(Debug, Clone)]
pub struct AnimatedObject {
    root_transform: Mat4,
    model_pose: Vec<Mat4>,
    bind_model_pose: Vec<Mat4>,
    inverse_bind: Vec<Mat4>,
    show_bind_pose: bool,
}

impl AnimatedObject {
    #[must_use]
    pub fn new(rig: &Rig) -> Self {
        let bind_model_pose = local_to_model(rig, rig.bind_pose());
        let inverse_bind = bind_model_pose.iter().map(Mat4::inverse).collect();
        Self {
            root_transform: Mat4::IDENTITY,
            model_pose: bind_model_pose.clone(),
            bind_model_pose,
            inverse_bind,
            show_bind_pose: false,
        }
    }

    /// Recompute the model-space pose from the animation's local pose.
    pub fn update(&mut self, rig: &Rig, animation: &Animation) {
        if self.show_bind_pose {
            self.model_pose.clone_from(&self.bind_model_pose);
        } else {
            self.model_pose = local_to_model(rig, animation.local_pose());
        }
    }

    pub fn set_root_transform(&mut self, root: Mat4) {
        self.root_transform = root;
    }

    #[must_use]
    pub const fn root_transform(&self) -> Mat4 {
        self.root_transform
    }

    pub fn set_show_bind_pose(&mut self, show: bool) {
        self.show_bind_pose = show;
    }

    #[must_use]
    pub const fn shows_bind_pose(&self) -> bool {
        self.show_bind_pose
    }

    /// Joint matrices relative to the rig root.
    #[must_use]
    pub fn model_pose(&self) -> &[Mat4] {
        &self.model_pose
    }

    /// Inverse bind matrices, for skinning.
    #[must_use]
    pub fn inverse_bind(&self) -> &[Mat4] {
        &self.inverse_bind
    }

    /// Joint position in world space.
    #[must_use]
    pub fn joint_position(&self, joint: usize) -> Option<Vec3> {
        self.model_pose
            .get(joint)
            .map(|m| self.root_transform.transform_point3(m.w_axis.truncate()))
    }

    /// Joint matrix in world space.
    #[must_use]
    pub fn joint_world(&self, joint: usize) -> Option<Mat4> {
        self.model_pose.get(joint).map(|m| self.root_transform * *m)
    }
}

fn local_to_model(rig: &Rig, locals: &[Transform]) -> Vec<Mat4> {
    let mut model: Vec<Mat4> = Vec::with_capacity(locals.len());
    for (index, local) in locals.iter().enumerate() {
        let matrix = local.to_matrix();
        // Parents precede children, so the parent is already resolved.
        let world = match rig.parent(index).and_then(|p| model.get(p)) {
            Some(parent) => *parent * matrix,
            None => matrix,
        };
        model.push(world);
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::Clip;
    use crate::controller::ClipController;
    use approx::assert_relative_eq;

    #[test]
    fn bind_pose_chains_offsets() {
        let rig = Rig::stick_figure();
        let object = AnimatedObject::new(&rig);
        let head = object.joint_position(rig.find("head").unwrap()).unwrap();
        // pelvis 1.0 + spine 0.2 + chest 0.25 + neck 0.15 + head 0.15
        assert_relative_eq!(head.y, 1.75, epsilon = 1e-5);

        let identity = object.model_pose()[4] * object.inverse_bind()[4];
        assert!(identity.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn bind_pose_toggle_ignores_animation() {
        let rig = Rig::stick_figure();
        let mut animation =
            Animation::new(&rig, Clip::dance(&rig), ClipController::new()).unwrap();
        animation.update(0.3);

        let mut object = AnimatedObject::new(&rig);
        let bind = object.model_pose().to_vec();
        object.update(&rig, &animation);
        assert_ne!(object.model_pose(), bind.as_slice());

        object.set_show_bind_pose(true);
        object.update(&rig, &animation);
        assert_eq!(object.model_pose(), bind.as_slice());
    }

    #[test]
    fn root_transform_moves_world_positions() {
        let rig = Rig::stick_figure();
        let mut object = AnimatedObject::new(&rig);
        object.set_root_transform(Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        assert_relative_eq!(object.joint_position(0).unwrap().x, 5.0);
        assert!(object.joint_position(99).is_none());
    }
}
