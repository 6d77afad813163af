use super::MeshData;
use crate::types::Vertex;
use glam::Vec3;
use std::f32::consts::TAU;

/// Torus around the Z axis
///
/// `radius` is the distance from the center to the middle of the tube,
/// `tube` the tube radius. Rings run along `tubular_segments`, each ring has
/// `radial_segments` quads around the tube.
pub fn torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
    arc: f32,
) -> MeshData {
    let radial_segments = radial_segments.max(2);
    let tubular_segments = tubular_segments.max(3);

    let vertices = (0..=radial_segments)
        .flat_map(|j| {
            (0..=tubular_segments).map(move |i| {
                let u = i as f32 / tubular_segments as f32 * arc;
                let v = j as f32 / radial_segments as f32 * TAU;

                let position = Vec3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);

                Vertex {
                    position: position.to_array(),
                    normal: (position - center).normalize_or_zero().to_array(),
                    uv: [
                        i as f32 / tubular_segments as f32,
                        j as f32 / radial_segments as f32,
                    ],
                }
            })
        })
        .collect();

    let row = tubular_segments + 1;
    let indices = (1..=radial_segments)
        .flat_map(|j| {
            (1..=tubular_segments).flat_map(move |i| {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;
                [a, b, d, b, c, d]
            })
        })
        .collect();

    MeshData { vertices, indices }
}
