//! Debug meshes for skeleton drawing.
//!
//! Vertices are triangle lists of interleaved position and normal
//! (`[px, py, pz, nx, ny, nz]`).

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Latitude/longitude subdivisions of the joint sphere.
pub const SPHERE_RESOLUTION: u32 = 30;
/// Fraction along a bone where it is widest.
pub const BONE_WIDTH_RATIO: f32 = 0.2;

pub type MeshVertex = [f32; 6];

fn vertex(position: Vec3, normal: Vec3) -> MeshVertex {
    [
        position.x, position.y, position.z, normal.x, normal.y, normal.z,
    ]
}

/// Unit sphere with smooth normals.
#[must_use]
pub fn sphere(resolution: u32) -> Vec<MeshVertex> {
    let resolution = resolution.max(3);
    #[allow(clippy::cast_precision_loss)]
    let point = |lat: u32, lon: u32| {
        let theta = lat as f32 / resolution as f32 * PI;
        let phi = lon as f32 / resolution as f32 * TAU;
        Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin())
    };

    let mut vertices = Vec::with_capacity((resolution * resolution * 6) as usize);
    for lat in 0..resolution {
        for lon in 0..resolution {
            let a = point(lat, lon);
            let b = point(lat + 1, lon);
            let c = point(lat + 1, lon + 1);
            let d = point(lat, lon + 1);
            for p in [a, b, c, a, c, d] {
                vertices.push(vertex(p, p));
            }
        }
    }
    vertices
}

/// Unit-length bone along +Y: a double pyramid, widest at `width_ratio`.
#[must_use]
pub fn bone(width_ratio: f32) -> Vec<MeshVertex> {
    let base = Vec3::ZERO;
    let tip = Vec3::Y;
    let half_width = width_ratio * 0.5;
    let ring = [
        Vec3::new(half_width, width_ratio, 0.0),
        Vec3::new(0.0, width_ratio, half_width),
        Vec3::new(-half_width, width_ratio, 0.0),
        Vec3::new(0.0, width_ratio, -half_width),
    ];

    let mut vertices = Vec::with_capacity(24);
    for i in 0..ring.len() {
        let r0 = ring[i];
        let r1 = ring[(i + 1) % ring.len()];
        for (a, b, c) in [(base, r0, r1), (tip, r1, r0)] {
            let normal = (b - a).cross(c - a).normalize_or_zero();
            vertices.extend([vertex(a, normal), vertex(b, normal), vertex(c, normal)]);
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_vertex_count_and_radius() {
        let mesh = sphere(SPHERE_RESOLUTION);
        assert_eq!(mesh.len(), 30 * 30 * 6);
        for v in mesh.iter().step_by(97) {
            assert_relative_eq!(Vec3::new(v[0], v[1], v[2]).length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn bone_has_eight_faces_pointing_out() {
        let mesh = bone(BONE_WIDTH_RATIO);
        assert_eq!(mesh.len(), 24);
        for tri in mesh.chunks(3) {
            let centroid = tri
                .iter()
                .map(|v| Vec3::new(v[0], v[1], v[2]))
                .sum::<Vec3>()
                / 3.0;
            let normal = Vec3::new(tri[0][3], tri[0][4], tri[0][5]);
            let axis_point = Vec3::new(0.0, centroid.y, 0.0);
            assert!(normal.dot(centroid - axis_point) > 0.0);
        }
    }
}
