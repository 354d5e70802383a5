//! Vertex format of the UI batch.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use skyrig_gpu::{VertexFormat, VertexLayout};

/// One UI vertex in normalized device coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct UiVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    /// Packed ABGR color.
    pub color: u32,
}

impl UiVertex {
    #[must_use]
    pub fn layout() -> VertexLayout {
        VertexLayout::packed(&[
            VertexFormat::Float2,
            VertexFormat::Float2,
            VertexFormat::UByte4Norm,
        ])
    }
}

/// Accumulates quads in pixel space and emits NDC vertices.
#[derive(Debug)]
pub(crate) struct QuadBuilder {
    screen: Vec2,
    pub(crate) vertices: Vec<UiVertex>,
}

impl QuadBuilder {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let screen = Vec2::new(width.max(1) as f32, height.max(1) as f32);
        Self {
            screen,
            vertices: Vec::new(),
        }
    }

    fn ndc(&self, p: Vec2) -> [f32; 2] {
        let n = p / self.screen * 2.0 - Vec2::ONE;
        [n.x, -n.y]
    }

    /// Two triangles covering `[min, max]` sampling `[uv_min, uv_max]`.
    pub(crate) fn quad(&mut self, min: Vec2, max: Vec2, uv_min: Vec2, uv_max: Vec2, color: u32) {
        let corner = |p: Vec2, uv: Vec2| UiVertex {
            position: self.ndc(p),
            uv: uv.to_array(),
            color,
        };
        let tl = corner(min, uv_min);
        let tr = corner(Vec2::new(max.x, min.y), Vec2::new(uv_max.x, uv_min.y));
        let bl = corner(Vec2::new(min.x, max.y), Vec2::new(uv_min.x, uv_max.y));
        let br = corner(max, uv_max);
        self.vertices.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_struct() {
        assert_eq!(UiVertex::layout().stride as usize, std::mem::size_of::<UiVertex>());
    }

    #[test]
    fn full_screen_quad_spans_ndc() {
        let mut builder = QuadBuilder::new(100, 50);
        builder.quad(Vec2::ZERO, Vec2::new(100.0, 50.0), Vec2::ZERO, Vec2::ONE, 0);
        assert_eq!(builder.vertices.len(), 6);
        assert_eq!(builder.vertices[0].position, [-1.0, 1.0]);
        assert_eq!(builder.vertices[5].position, [1.0, -1.0]);
    }
}
