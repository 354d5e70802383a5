//! Skeletal animation for skyrig.
//!
//! A [`Rig`] describes the joint hierarchy, a [`Clip`] holds keyframed
//! joint tracks, and an [`Animation`] plays a clip through a
//! [`ClipController`]. [`AnimatedObject`] turns the sampled local pose into
//! model space, and [`SkeletonBatcher`] turns that into joint-sphere and bone
//! instances for drawing.
//!
//! Rigs and clips are stored as bincode.

mod animation;
mod batcher;
mod clip;
mod controller;
mod error;
pub mod mesh;
mod object;
mod rig;
mod transform;

pub use animation::Animation;
pub use batcher::{bone_transform, SkeletonBatch, SkeletonBatcher, SkeletonBatcherDesc, SkeletonInstance};
pub use clip::{Clip, Keyframe, Track};
pub use controller::ClipController;
pub use error::{AnimationError, Result};
pub use object::AnimatedObject;
pub use rig::{Joint, Rig};
pub use transform::Transform;
