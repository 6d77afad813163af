use crate::config::SceneConfig;
use crate::geometry::{icosphere, torus, MeshData};
use crate::types::InstanceRaw;
use glam::{Mat4, Vec3};

/// Positions of a square grid of backdrop spheres in the plane `z = depth`
///
/// Both axes run from `-extent` to `extent` inclusive in `step` increments.
pub fn backdrop_grid(extent: f32, step: f32, depth: f32) -> Vec<Vec3> {
    if step <= 0.0 || extent < 0.0 {
        return vec![Vec3::new(0.0, 0.0, depth)];
    }
    // tolerate float drift on the last sample
    let count = ((2.0 * extent) / step + 1e-4).floor() as usize + 1;
    let coords: Vec<f32> = (0..count).map(|k| -extent + k as f32 * step).collect();

    coords
        .iter()
        .flat_map(|&x| coords.iter().map(move |&y| Vec3::new(x, y, depth)))
        .collect()
}

/// Mesh that bends the environment texture
pub struct RefractiveMesh {
    pub mesh: MeshData,
    pub transform: Mat4,
}

/// Everything the demo draws: instanced sphere backdrop and the torus
pub struct Scene {
    pub backdrop_mesh: MeshData,
    pub backdrop_instances: Vec<InstanceRaw>,
    pub refractive: RefractiveMesh,
}

impl Scene {
    pub fn build(config: &SceneConfig) -> Self {
        let backdrop_mesh = icosphere(config.sphere_radius, config.sphere_detail);
        let backdrop_instances: Vec<InstanceRaw> =
            backdrop_grid(config.grid_extent, config.grid_step, config.grid_depth)
                .into_iter()
                .map(|p| InstanceRaw {
                    offset: p.to_array(),
                    scale: 1.0,
                })
                .collect();

        let mesh = torus(
            config.torus_radius,
            config.torus_tube,
            config.torus_radial_segments,
            config.torus_tubular_segments,
            std::f32::consts::TAU,
        );

        log::info!(
            "Scene built: {} backdrop spheres ({} triangles each), torus with {} triangles",
            backdrop_instances.len(),
            backdrop_mesh.triangle_count(),
            mesh.triangle_count()
        );
        let (min, max) = mesh.bounds();
        log::debug!("Torus bounds {min} .. {max}");

        Self {
            backdrop_mesh,
            backdrop_instances,
            refractive: RefractiveMesh {
                mesh,
                transform: Mat4::from_translation(Vec3::from_array(config.torus_position)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_seven_by_seven() {
        let grid = backdrop_grid(7.5, 2.5, -12.0);
        assert_eq!(grid.len(), 49);
        assert_eq!(grid[0], Vec3::new(-7.5, -7.5, -12.0));
        assert_eq!(grid[48], Vec3::new(7.5, 7.5, -12.0));
        assert!(grid.iter().all(|p| p.z == -12.0));
    }

    #[test]
    fn grid_with_invalid_step_is_single_sphere() {
        assert_eq!(backdrop_grid(7.5, 0.0, -1.0), vec![Vec3::new(0.0, 0.0, -1.0)]);
    }

    #[test]
    fn scene_places_torus_in_front_of_backdrop() {
        let scene = Scene::build(&SceneConfig::default());
        assert_eq!(scene.backdrop_instances.len(), 49);
        let torus_z = scene.refractive.transform.w_axis.z;
        assert_eq!(torus_z, -3.0);
        assert!(scene.backdrop_instances.iter().all(|i| i.offset[2] < torus_z));
    }
}
