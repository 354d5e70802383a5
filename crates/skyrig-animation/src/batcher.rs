//! Instance data for drawing skeletons as joint spheres and bones.

use glam::{Mat4, Quat, Vec3};
use skyrig_core::math::rotation_from_y;
use skyrig_core::Color;
use tracing::warn;

use crate::object::AnimatedObject;
use crate::rig::Rig;

/// One joint sphere or bone to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkeletonInstance {
    pub transform: Mat4,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkeletonBatcherDesc {
    /// Instance capacity per batch.
    pub max_instances: usize,
    pub joint_radius: f32,
    pub joint_color: Color,
    pub bone_color: Color,
    pub draw_bones: bool,
}

impl Default for SkeletonBatcherDesc {
    fn default() -> Self {
        Self {
            max_instances: 256,
            joint_radius: crate::mesh::BONE_WIDTH_RATIO * 0.5,
            joint_color: Color::rgba(0.9, 0.9, 0.9, 1.0),
            bone_color: Color::rgba(0.9, 0.6, 0.1, 1.0),
            draw_bones: false,
        }
    }
}

/// Instances gathered for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkeletonBatch {
    pub joints: Vec<SkeletonInstance>,
    pub bones: Vec<SkeletonInstance>,
}

impl SkeletonBatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty() && self.bones.is_empty()
    }
}

/// Collects skeleton instances from animated objects.
#[derive(Debug, Clone)]
pub struct SkeletonBatcher {
    desc: SkeletonBatcherDesc,
    batch: SkeletonBatch,
}

impl SkeletonBatcher {
    #[must_use]
    pub fn new(desc: SkeletonBatcherDesc) -> Self {
        Self {
            desc,
            batch: SkeletonBatch::default(),
        }
    }

    #[must_use]
    pub const fn desc(&self) -> &SkeletonBatcherDesc {
        &self.desc
    }

    pub fn set_draw_bones(&mut self, draw_bones: bool) {
        self.desc.draw_bones = draw_bones;
    }

    /// Rebuild the batch from `objects`.
    ///
    /// Instances beyond `max_instances` are dropped with a warning.
    pub fn update(&mut self, rig: &Rig, objects: &[&AnimatedObject]) {
        self.batch.joints.clear();
        self.batch.bones.clear();

        let joint_scale = Vec3::splat(self.desc.joint_radius);
        let mut dropped = 0usize;
        for object in objects {
            for joint in 0..rig.num_joints() {
                let Some(world) = object.joint_world(joint) else {
                    continue;
                };
                let (_, rotation, translation) = world.to_scale_rotation_translation();
                dropped += usize::from(!push_capped(
                    &mut self.batch.joints,
                    self.desc.max_instances,
                    SkeletonInstance {
                        transform: Mat4::from_scale_rotation_translation(
                            joint_scale,
                            rotation,
                            translation,
                        ),
                        color: self.desc.joint_color,
                    },
                ));

                if !self.desc.draw_bones {
                    continue;
                }
                let Some(parent) = rig.parent(joint) else {
                    continue;
                };
                let (Some(from), Some(to)) =
                    (object.joint_position(parent), object.joint_position(joint))
                else {
                    continue;
                };
                dropped += usize::from(!push_capped(
                    &mut self.batch.bones,
                    self.desc.max_instances,
                    SkeletonInstance {
                        transform: bone_transform(from, to),
                        color: self.desc.bone_color,
                    },
                ));
            }
        }
        if dropped > 0 {
            warn!(
                "Skeleton batch full at {} instances, dropped {dropped}",
                self.desc.max_instances
            );
        }
    }

    #[must_use]
    pub const fn batch(&self) -> &SkeletonBatch {
        &self.batch
    }
}

/// Push unless full; returns `false` when the instance was dropped.
fn push_capped(instances: &mut Vec<SkeletonInstance>, max: usize, instance: SkeletonInstance) -> bool {
    if instances.len() < max {
        instances.push(instance);
        true
    } else {
        false
    }
}

/// Maps the unit bone mesh (pointing along +Y, length 1) onto `from -> to`.
#[must_use]
pub fn bone_transform(from: Vec3, to: Vec3) -> Mat4 {
    let offset = to - from;
    let length = offset.length();
    let rotation = if length > f32::EPSILON {
        rotation_from_y(offset)
    } else {
        Quat::IDENTITY
    };
    Mat4::from_scale_rotation_translation(Vec3::splat(length), rotation, from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn joints_only_by_default() {
        let rig = Rig::stick_figure();
        let object = AnimatedObject::new(&rig);
        let mut batcher = SkeletonBatcher::new(SkeletonBatcherDesc::default());
        batcher.update(&rig, &[&object]);
        assert_eq!(batcher.batch().joints.len(), 17);
        assert!(batcher.batch().bones.is_empty());
    }

    #[test]
    fn one_bone_per_parented_joint() {
        let rig = Rig::stick_figure();
        let object = AnimatedObject::new(&rig);
        let mut batcher = SkeletonBatcher::new(SkeletonBatcherDesc::default());
        batcher.set_draw_bones(true);
        batcher.update(&rig, &[&object]);
        assert_eq!(batcher.batch().bones.len(), 16);
    }

    #[test]
    fn capacity_is_respected() {
        let rig = Rig::stick_figure();
        let object = AnimatedObject::new(&rig);
        let mut batcher = SkeletonBatcher::new(SkeletonBatcherDesc {
            max_instances: 20,
            ..SkeletonBatcherDesc::default()
        });
        batcher.update(&rig, &[&object, &object]);
        assert_eq!(batcher.batch().joints.len(), 20);
    }

    #[test]
    fn bone_spans_joints() {
        let from = Vec3::new(1.0, 0.0, 0.0);
        let to = Vec3::new(1.0, 0.0, 2.0);
        let m = bone_transform(from, to);
        let tip = m.transform_point3(Vec3::Y);
        assert_relative_eq!(tip.x, to.x, epsilon = 1e-5);
        assert_relative_eq!(tip.z, to.z, epsilon = 1e-5);
    }
}
