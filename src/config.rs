// config.rs - Demo configuration (defaults + optional JSON overrides)
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Slider bounds for the per-channel indices of refraction
pub const IOR_MIN: f32 = 1.0;
pub const IOR_MAX: f32 = 2.0;
pub const IOR_STEP: f64 = 0.01;

/// Upper bounds on the mesh and grid sizes a config file may request
pub const MAX_SPHERE_DETAIL: u32 = 64;
pub const MAX_GRID_SIDE: u32 = 64;
pub const MAX_TORUS_RADIAL_SEGMENTS: u32 = 512;
pub const MAX_TORUS_TUBULAR_SEGMENTS: u32 = 1024;

/// Per-channel indices of refraction, tweakable from the debug panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefractionParams {
    pub ior_r: f32,
    pub ior_g: f32,
    pub ior_b: f32,
}

impl Default for RefractionParams {
    fn default() -> Self {
        Self {
            ior_r: 1.15,
            ior_g: 1.18,
            ior_b: 1.22,
        }
    }
}

impl RefractionParams {
    /// Clamp every channel into the slider range
    pub fn clamped(self) -> Self {
        Self {
            ior_r: self.ior_r.clamp(IOR_MIN, IOR_MAX),
            ior_g: self.ior_g.clamp(IOR_MIN, IOR_MAX),
            ior_b: self.ior_b.clamp(IOR_MIN, IOR_MAX),
        }
    }
}

/// Fixed shader inputs of the refractive material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    pub refract_power: f32,
    pub shininess: f32,
    pub diffuseness: f32,
    pub light: [f32; 3],
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            refract_power: 0.2,
            shininess: 40.0,
            diffuseness: 0.2,
            light: [-1.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// OrbitControls-style damping factor, `None` disables damping
    pub damping: Option<f32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            near: 1.0,
            far: 1000.0,
            position: [0.0, 0.0, 6.0],
            target: [0.0, 0.0, 0.0],
            damping: Some(0.05),
        }
    }
}

/// Scene layout: ambient light, sphere backdrop and the refractive torus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub backdrop_color: [f32; 3],
    pub sphere_radius: f32,
    pub sphere_detail: u32,
    pub grid_extent: f32,
    pub grid_step: f32,
    pub grid_depth: f32,
    pub torus_radius: f32,
    pub torus_tube: f32,
    pub torus_radial_segments: u32,
    pub torus_tubular_segments: u32,
    pub torus_position: [f32; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 50.0,
            backdrop_color: [1.0, 1.0, 1.0],
            sphere_radius: 0.5,
            sphere_detail: 8,
            grid_extent: 7.5,
            grid_step: 2.5,
            grid_depth: -12.0,
            torus_radius: 2.0,
            torus_tube: 1.0,
            torus_radial_segments: 32,
            torus_tubular_segments: 100,
            torus_position: [0.0, 0.0, -3.0],
        }
    }
}

impl SceneConfig {
    /// Bound the generated vertex and instance counts
    pub fn clamped(self) -> Self {
        // widen the step until one grid side holds at most MAX_GRID_SIDE spheres
        let min_step = 2.0 * self.grid_extent / (MAX_GRID_SIDE - 1) as f32;
        Self {
            sphere_detail: self.sphere_detail.min(MAX_SPHERE_DETAIL),
            grid_step: self.grid_step.max(min_step),
            torus_radial_segments: self.torus_radial_segments.clamp(2, MAX_TORUS_RADIAL_SEGMENTS),
            torus_tubular_segments: self
                .torus_tubular_segments
                .clamp(3, MAX_TORUS_TUBULAR_SEGMENTS),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Multisample the screen pass (the environment pass is never multisampled)
    pub antialias: bool,
    pub vsync: bool,
    pub clear_color: [f32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            antialias: true,
            vsync: true,
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}

impl RenderConfig {
    pub fn sample_count(&self) -> u32 {
        if self.antialias {
            4
        } else {
            1
        }
    }
}

/// Complete demo configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub refraction: RefractionParams,
    pub shading: ShadingConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
    pub render: RenderConfig,
}

impl DemoConfig {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(source: &str) -> Result<Self> {
        let mut config: DemoConfig =
            serde_json::from_str(source).context("Invalid demo configuration")?;
        config.refraction = config.refraction.clamped();
        config.scene = config.scene.clamped();
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&source).with_context(|| format!("While loading {}", path.display()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize demo configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_values() {
        let config = DemoConfig::default();
        assert_eq!(config.refraction.ior_r, 1.15);
        assert_eq!(config.refraction.ior_g, 1.18);
        assert_eq!(config.refraction.ior_b, 1.22);
        assert_eq!(config.shading.shininess, 40.0);
        assert_eq!(config.camera.position, [0.0, 0.0, 6.0]);
        assert_eq!(config.scene.torus_tubular_segments, 100);
        assert!(config.render.antialias);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DemoConfig::from_json(r#"{ "refraction": { "ior_g": 1.5 } }"#).unwrap();
        assert_eq!(config.refraction.ior_r, 1.15);
        assert_eq!(config.refraction.ior_g, 1.5);
        assert_eq!(config.scene, SceneConfig::default());
    }

    #[test]
    fn out_of_range_ior_is_clamped() {
        let config = DemoConfig::from_json(r#"{ "refraction": { "ior_r": 7.0, "ior_b": 0.2 } }"#)
            .unwrap();
        assert_eq!(config.refraction.ior_r, IOR_MAX);
        assert_eq!(config.refraction.ior_b, IOR_MIN);
    }

    #[test]
    fn oversized_scene_is_clamped() {
        let config = DemoConfig::from_json(
            r#"{ "scene": { "sphere_detail": 100000, "grid_step": 0.0001,
                 "torus_radial_segments": 0, "torus_tubular_segments": 4000000000 } }"#,
        )
        .unwrap();
        assert_eq!(config.scene.sphere_detail, MAX_SPHERE_DETAIL);
        assert_eq!(config.scene.torus_radial_segments, 2);
        assert_eq!(config.scene.torus_tubular_segments, MAX_TORUS_TUBULAR_SEGMENTS);

        let side = crate::scene::backdrop_grid(
            config.scene.grid_extent,
            config.scene.grid_step,
            config.scene.grid_depth,
        )
        .len() as f64;
        assert!(side.sqrt() <= MAX_GRID_SIDE as f64);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(DemoConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn printed_config_parses_back() {
        let mut config = DemoConfig::default();
        config.render.antialias = false;
        let json = config.to_json().unwrap();
        assert_eq!(DemoConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn sample_count_follows_antialias() {
        let mut render = RenderConfig::default();
        assert_eq!(render.sample_count(), 4);
        render.antialias = false;
        assert_eq!(render.sample_count(), 1);
    }
}
