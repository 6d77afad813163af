use super::MeshData;
use crate::types::Vertex;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
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
];

fn icosahedron_corners() -> [Vec3; 12] {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    [
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
    ]
}

fn sphere_vertex(direction: Vec3, radius: f32) -> Vertex {
    let n = direction.normalize();
    Vertex {
        position: (n * radius).to_array(),
        normal: n.to_array(),
        uv: [
            n.z.atan2(-n.x) / TAU + 0.5,
            n.y.clamp(-1.0, 1.0).asin() / PI + 0.5,
        ],
    }
}

/// Sphere built from a subdivided icosahedron
///
/// Every face edge is split into `detail + 1` segments, so a face yields
/// `(detail + 1)^2` triangles. Normals are the normalized positions.
pub fn icosphere(radius: f32, detail: u32) -> MeshData {
    let n = detail as usize + 1;
    let corners = icosahedron_corners();
    let per_face = (n + 1) * (n + 2) / 2;

    let mut vertices = Vec::with_capacity(20 * per_face);
    let mut indices = Vec::with_capacity(20 * n * n * 3);

    // row i starts after rows 0..i, row t holds n - t + 1 vertices
    let row_start = |i: usize| i * (n + 1) - i * (i.saturating_sub(1)) / 2;

    for [a, b, c] in ICOSAHEDRON_FACES {
        let (a, b, c) = (corners[a], corners[b], corners[c]);
        let base = vertices.len() as u32;

        for i in 0..=n {
            let aj = a.lerp(c, i as f32 / n as f32);
            let bj = b.lerp(c, i as f32 / n as f32);
            let rows = n - i;
            for j in 0..=rows {
                let p = if rows == 0 {
                    aj
                } else {
                    aj.lerp(bj, j as f32 / rows as f32)
                };
                vertices.push(sphere_vertex(p, radius));
            }
        }

        let at = |i: usize, j: usize| base + (row_start(i) + j) as u32;
        for i in 0..n {
            for j in 0..(2 * (n - i) - 1) {
                let k = j / 2;
                if j % 2 == 0 {
                    indices.extend_from_slice(&[at(i, k + 1), at(i + 1, k), at(i, k)]);
                } else {
                    indices.extend_from_slice(&[at(i, k + 1), at(i + 1, k + 1), at(i + 1, k)]);
                }
            }
        }
    }

    MeshData { vertices, indices }
}
