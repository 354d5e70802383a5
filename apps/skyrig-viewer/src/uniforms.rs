//! GPU uniform blocks.
//!
//! Every block is `#[repr(C)]` and `Pod` so it can be written into a uniform
//! buffer with [`bytemuck::bytes_of`].

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use skyrig_animation::SkeletonInstance;

/// Instances one skeleton draw can carry.
pub const MAX_INSTANCES: usize = 256;

/// Sky pass: view-projection without translation.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SkyboxBlock {
    pub proj_view: Mat4,
}

/// Ground plane pass.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PlaneBlock {
    pub proj_view: Mat4,
    pub to_world: Mat4,
}

/// One instanced skeleton draw: joint spheres or bones.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SkeletonBlock {
    pub proj_view: Mat4,
    pub light_position: Vec4,
    pub light_color: Vec4,
    pub colors: [Vec4; MAX_INSTANCES],
    pub to_world: [Mat4; MAX_INSTANCES],
}

impl Default for SkeletonBlock {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl SkeletonBlock {
    /// Fill the per-instance arrays from `instances`, returning how many fit.
    pub fn fill(
        &mut self,
        proj_view: Mat4,
        light_position: Vec4,
        light_color: Vec4,
        instances: &[SkeletonInstance],
    ) -> u32 {
        self.proj_view = proj_view;
        self.light_position = light_position;
        self.light_color = light_color;
        let count = instances.len().min(MAX_INSTANCES);
        for (i, instance) in instances.iter().take(count).enumerate() {
            self.colors[i] = Vec4::from_array(instance.color.to_array());
            self.to_world[i] = instance.transform;
        }
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

/// Byte size of a block, for buffer creation.
#[must_use]
pub const fn block_size<T: Pod>() -> u64 {
    std::mem::size_of::<T>() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyrig_core::Color;

    #[test]
    fn block_sizes_have_no_padding() {
        assert_eq!(block_size::<SkyboxBlock>(), 64);
        assert_eq!(block_size::<PlaneBlock>(), 128);
        assert_eq!(
            block_size::<SkeletonBlock>(),
            64 + 16 + 16 + 16 * MAX_INSTANCES as u64 + 64 * MAX_INSTANCES as u64
        );
    }

    #[test]
    fn fill_caps_at_capacity() {
        let instance = SkeletonInstance {
            transform: Mat4::from_translation(glam::Vec3::X),
            color: Color::rgba(1.0, 0.0, 0.0, 1.0),
        };
        let mut block = SkeletonBlock::default();
        let count = block.fill(
            Mat4::IDENTITY,
            Vec4::ZERO,
            Vec4::ONE,
            &vec![instance; MAX_INSTANCES + 10],
        );
        assert_eq!(count as usize, MAX_INSTANCES);
        assert_eq!(block.colors[MAX_INSTANCES - 1], Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(block.to_world[0], instance.transform);
    }
}
