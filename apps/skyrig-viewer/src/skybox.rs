//! Skybox and ground-plane geometry.

/// Cube face textures, in the order the sky shader binds them.
pub const FACE_TEXTURES: [(&str, &str); 6] = [
    ("RightText", "skybox/right.png"),
    ("LeftText", "skybox/left.png"),
    ("TopText", "skybox/top.png"),
    ("BotText", "skybox/bottom.png"),
    ("FrontText", "skybox/front.png"),
    ("BackText", "skybox/back.png"),
];

const EXTENT: f32 = 10.0;

/// Cube face as (face id, four corners in draw order).
///
/// The face id is stored in `w` and picks the texture in the shader:
/// 1 = +x, 2 = -x, 3 = +y, 4 = -y, 5 = +z, 6 = -z.
const FACES: [(f32, [[f32; 3]; 4]); 6] = [
    (6.0, [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]]),
    (2.0, [[-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0]]),
    (1.0, [[1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]]),
    (5.0, [[-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]]),
    (3.0, [[-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
    (4.0, [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0]]),
];

/// Vertices of the sky cube: 36 points of `[x, y, z, face]`.
#[must_use]
pub fn cube_vertices() -> Vec<[f32; 4]> {
    FACES
        .iter()
        .flat_map(|(face, [a, b, c, d])| {
            [a, b, c, c, d, a].map(|p| [p[0] * EXTENT, p[1] * EXTENT, p[2] * EXTENT, *face])
        })
        .collect()
}

/// Ground plane: two triangles of `[x, y, z, w, u, v]` on y = 0.
#[must_use]
pub fn plane_vertices() -> Vec<[f32; 6]> {
    let corner = |x: f32, z: f32| [x * EXTENT, 0.0, z * EXTENT, 1.0, (x + 1.0) * 0.5, (z + 1.0) * 0.5];
    let (a, b, c, d) = (
        corner(-1.0, -1.0),
        corner(-1.0, 1.0),
        corner(1.0, 1.0),
        corner(1.0, -1.0),
    );
    vec![a, b, c, c, d, a]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_six_faces_of_six_vertices() {
        let vertices = cube_vertices();
        assert_eq!(vertices.len(), 36);
        for (i, face) in vertices.chunks(6).enumerate() {
            let id = face[0][3];
            assert!(face.iter().all(|v| v[3] == id), "face {i} mixes ids");
            assert!(face
                .iter()
                .all(|v| v[..3].iter().all(|c| c.abs() == EXTENT)));
        }
        let mut ids: Vec<u32> = vertices.iter().step_by(6).map(|v| v[3] as u32).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn face_vertices_share_the_face_axis() {
        for face in cube_vertices().chunks(6) {
            let fixed_axes = (0..3)
                .filter(|&axis| face.iter().all(|v| v[axis] == face[0][axis]))
                .count();
            assert_eq!(fixed_axes, 1);
        }
    }

    #[test]
    fn plane_is_flat_and_spans_uv() {
        let plane = plane_vertices();
        assert_eq!(plane.len(), 6);
        assert!(plane.iter().all(|v| v[1] == 0.0));
        assert!(plane.iter().any(|v| v[4] == 0.0 && v[5] == 0.0));
        assert!(plane.iter().any(|v| v[4] == 1.0 && v[5] == 1.0));
    }
}
