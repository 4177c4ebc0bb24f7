//! Test meshes shared by the unit tests.

use glam::Vec3;

pub(crate) type MeshData = (Vec<Vec3>, Vec<[u32; 3]>);

pub(crate) fn single_triangle() -> MeshData {
    (
        vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        vec![[0, 1, 2]],
    )
}

/// Unit square split along the 0-2 diagonal
pub(crate) fn quad() -> MeshData {
    (
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    )
}

/// Unit cube, 8 vertices and 12 outward-facing triangles
pub(crate) fn cube() -> MeshData {
    (
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ],
        vec![
            // z = 0
            [0, 2, 1],
            [0, 3, 2],
            // z = 1
            [4, 5, 6],
            [4, 6, 7],
            // y = 0
            [0, 1, 5],
            [0, 5, 4],
            // y = 1
            [3, 7, 6],
            [3, 6, 2],
            // x = 0
            [0, 4, 7],
            [0, 7, 3],
            // x = 1
            [1, 2, 6],
            [1, 6, 5],
        ],
    )
}

/// Regular icosahedron: 12 vertices, 20 triangles, 30 edges
pub(crate) fn icosahedron() -> MeshData {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    (
        vec![
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ],
        vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ],
    )
}

/// Flat strip of `quads` unit squares in the z = 0 plane, one triangle thick.
///
/// Bottom row is vertices `0..=quads` along y = 0, top row follows along
/// y = 1. Every vertex lies on the open boundary.
pub(crate) fn strip(quads: u32) -> MeshData {
    let mut positions = Vec::new();
    for row in 0..2 {
        for i in 0..=quads {
            positions.push(Vec3::new(i as f32, row as f32, 0.0));
        }
    }
    let top = quads + 1;
    let mut triangles = Vec::new();
    for i in 0..quads {
        let (b0, b1, t0, t1) = (i, i + 1, top + i, top + i + 1);
        triangles.push([b0, b1, t1]);
        triangles.push([b0, t1, t0]);
    }
    (positions, triangles)
}

/// Two triangles glued along all three edges: the smallest fin
pub(crate) fn pillow() -> MeshData {
    (
        vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        vec![[0, 1, 2], [1, 0, 2]],
    )
}

/// Icosahedron with its first face `[0, 11, 5]` split around a new valence-3
/// vertex 12 raised slightly above the face centroid.
///
/// The three split triangles come first, so slot 0 is `0 -> 11`.
pub(crate) fn poked_icosahedron() -> MeshData {
    let (mut positions, triangles) = icosahedron();
    let centroid = (positions[0] + positions[11] + positions[5]) / 3.0;
    positions.push(centroid * 1.1);

    let mut poked = vec![[0, 11, 12], [11, 5, 12], [5, 0, 12]];
    poked.extend_from_slice(&triangles[1..]);
    (positions, poked)
}

/// Open tube of `rows` x `segments` quads around the z axis, unit radius.
///
/// Ring `r` holds vertices `r * segments..(r + 1) * segments` at
/// z = `r * height / rows`; the first and last rings are open boundaries.
pub(crate) fn open_cylinder(rows: u32, segments: u32, height: f32) -> MeshData {
    let mut positions = Vec::new();
    for r in 0..=rows {
        let z = r as f32 * height / rows as f32;
        for s in 0..segments {
            let angle = std::f32::consts::TAU * s as f32 / segments as f32;
            positions.push(Vec3::new(angle.cos(), angle.sin(), z));
        }
    }
    let mut triangles = Vec::new();
    for r in 0..rows {
        for s in 0..segments {
            let next = (s + 1) % segments;
            let (b0, b1) = (r * segments + s, r * segments + next);
            let (t0, t1) = (b0 + segments, b1 + segments);
            triangles.push([b0, b1, t1]);
            triangles.push([b0, t1, t0]);
        }
    }
    (positions, triangles)
}
