//! Joint hierarchies.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};
use crate::transform::Transform;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub name: String,
    /// Index of the parent joint; always lower than this joint's index.
    pub parent: Option<usize>,
}

/// A skeleton: joints in parent-first order plus their bind pose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rig {
    joints: Vec<Joint>,
    bind_pose: Vec<Transform>,
}

impl Rig {
    pub fn new(joints: Vec<Joint>, bind_pose: Vec<Transform>) -> Result<Self> {
        let rig = Self { joints, bind_pose };
        rig.validate()?;
        Ok(rig)
    }

    /// Decode a bincode-serialized rig.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let rig: Self = bincode::deserialize(bytes).map_err(|e| AnimationError::Decode {
            what: "rig",
            reason: e.to_string(),
        })?;
        rig.validate()?;
        Ok(rig)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| AnimationError::Encode {
            what: "rig",
            reason: e.to_string(),
        })
    }

    fn validate(&self) -> Result<()> {
        if self.joints.is_empty() {
            return Err(AnimationError::InvalidRig("no joints".into()));
        }
        if self.joints.len() != self.bind_pose.len() {
            return Err(AnimationError::InvalidRig(format!(
                "{} joints but {} bind transforms",
                self.joints.len(),
                self.bind_pose.len()
            )));
        }
        for (index, joint) in self.joints.iter().enumerate() {
            if let Some(parent) = joint.parent {
                if parent >= index {
                    return Err(AnimationError::InvalidRig(format!(
                        "joint '{}' ({index}) has parent {parent} that does not precede it",
                        joint.name
                    )));
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn num_joints(&self) -> usize {
        self.joints.len()
    }

    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    #[must_use]
    pub fn parent(&self, joint: usize) -> Option<usize> {
        self.joints.get(joint).and_then(|j| j.parent)
    }

    #[must_use]
    pub fn bind_pose(&self) -> &[Transform] {
        &self.bind_pose
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }

    /// A 17-joint humanoid about 1.8 units tall, standing on the origin.
    #[must_use]
    pub fn stick_figure() -> Self {
        let layout: [(&str, Option<usize>, Vec3); 17] = [
            ("pelvis", None, Vec3::new(0.0, 1.0, 0.0)),
            ("spine", Some(0), Vec3::new(0.0, 0.2, 0.0)),
            ("chest", Some(1), Vec3::new(0.0, 0.25, 0.0)),
            ("neck", Some(2), Vec3::new(0.0, 0.15, 0.0)),
            ("head", Some(3), Vec3::new(0.0, 0.15, 0.0)),
            ("shoulder_l", Some(2), Vec3::new(0.2, 0.1, 0.0)),
            ("elbow_l", Some(5), Vec3::new(0.3, 0.0, 0.0)),
            ("hand_l", Some(6), Vec3::new(0.25, 0.0, 0.0)),
            ("shoulder_r", Some(2), Vec3::new(-0.2, 0.1, 0.0)),
            ("elbow_r", Some(8), Vec3::new(-0.3, 0.0, 0.0)),
            ("hand_r", Some(9), Vec3::new(-0.25, 0.0, 0.0)),
            ("hip_l", Some(0), Vec3::new(0.1, -0.05, 0.0)),
            ("knee_l", Some(11), Vec3::new(0.0, -0.45, 0.0)),
            ("foot_l", Some(12), Vec3::new(0.0, -0.45, 0.05)),
            ("hip_r", Some(0), Vec3::new(-0.1, -0.05, 0.0)),
            ("knee_r", Some(14), Vec3::new(0.0, -0.45, 0.0)),
            ("foot_r", Some(15), Vec3::new(0.0, -0.45, 0.05)),
        ];

        let joints = layout
            .iter()
            .map(|(name, parent, _)| Joint {
                name: (*name).to_string(),
                parent: *parent,
            })
            .collect();
        let bind_pose = layout
            .iter()
            .map(|(_, _, offset)| Transform::from_translation(*offset))
            .collect();
        Self { joints, bind_pose }
    }
}
