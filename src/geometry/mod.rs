//! Procedural meshes for the demo scene
//!
//! Layouts follow the common three.js conventions so the scene reads the same
//! as the classic WebGL version: a torus with `(radial + 1) * (tubular + 1)`
//! vertices and an icosphere built by splitting every icosahedron face.

mod icosphere;
mod torus;

pub use icosphere::icosphere;
pub use torus::torus;

use crate::types::Vertex;
use glam::Vec3;

/// CPU-side indexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Smallest and largest vertex position on every axis
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| {
                let p = Vec3::from_array(v.position);
                (min.min(p), max.max(p))
            },
        )
    }
}
