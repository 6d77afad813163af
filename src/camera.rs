use glam::{Mat4, Vec3};
use crate::config::CameraConfig;
use crate::types::CameraUniform;

pub const ROTATE_SPEED: f32 = 1.0;
pub const ZOOM_STEP: f32 = 0.95;
pub const MIN_RADIUS: f32 = 0.5;
pub const MAX_RADIUS: f32 = 500.0;
const POLAR_EPSILON: f32 = 1e-6;

/// Perspective projection that tracks the viewport aspect ratio
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub aspect: f32,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fov_y: fov_degrees.to_radians(),
            near,
            far,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// Camera orbiting a target point with damped rotate/pan/zoom
///
/// Input only queues deltas; `update` applies them once per frame. With
/// damping enabled a fraction of each delta is applied and the rest decays
/// over the following frames.
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    /// Azimuth around +Y, zero looks down -Z
    pub theta: f32,
    /// Polar angle from +Y
    pub phi: f32,
    pub damping: Option<f32>,
    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
    scale: f32,
}

impl OrbitCamera {
    pub fn new(position: Vec3, target: Vec3, damping: Option<f32>) -> Self {
        let offset = position - target;
        let radius = offset.length().max(MIN_RADIUS);
        Self {
            target,
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            damping: damping.filter(|d| *d > 0.0 && *d <= 1.0),
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(
            Vec3::from_array(config.position),
            Vec3::from_array(config.target),
            config.damping,
        )
    }

    pub fn position(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + self.radius
                * Vec3::new(
                    sin_phi * self.theta.sin(),
                    self.phi.cos(),
                    sin_phi * self.theta.cos(),
                )
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position()).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Drag by `(dx, dy)` pixels on a viewport `viewport_height` pixels tall
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.delta_theta -= std::f32::consts::TAU * dx / height * ROTATE_SPEED;
        self.delta_phi -= std::f32::consts::TAU * dy / height * ROTATE_SPEED;
    }

    /// Move the target in the view plane so the scene follows the cursor
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_height: f32, fov_y: f32) {
        let height = viewport_height.max(1.0);
        let world_per_pixel = 2.0 * self.radius * (fov_y * 0.5).tan() / height;

        let forward = self.forward();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        self.pan_offset += (-right * dx + up * dy) * world_per_pixel;
    }

    /// Positive `lines` zoom in
    pub fn zoom(&mut self, lines: f32) {
        self.scale *= ZOOM_STEP.powf(lines);
    }

    /// Apply queued input, returns true while the camera is still moving
    pub fn update(&mut self) -> bool {
        let factor = self.damping.unwrap_or(1.0);

        self.theta += self.delta_theta * factor;
        self.phi = (self.phi + self.delta_phi * factor)
            .clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);
        self.radius = (self.radius * self.scale).clamp(MIN_RADIUS, MAX_RADIUS);
        self.target += self.pan_offset * factor;

        if self.damping.is_some() {
            self.delta_theta *= 1.0 - factor;
            self.delta_phi *= 1.0 - factor;
            self.pan_offset *= 1.0 - factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        self.delta_theta.abs() > 1e-6 || self.delta_phi.abs() > 1e-6 || self.pan_offset.length() > 1e-6
    }

    pub fn to_uniform(&self, projection: &Projection) -> CameraUniform {
        CameraUniform {
            view_proj: (projection.matrix() * self.view_matrix()).to_cols_array_2d(),
            position: self.position().to_array(),
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn starts_at_configured_position() {
        let camera = OrbitCamera::from_config(&CameraConfig::default());
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, 6.0)));
        assert!(approx(camera.forward(), Vec3::NEG_Z));
        assert!((camera.radius - 6.0).abs() < 1e-5);
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let mut camera = OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, None);
        // a quarter of the viewport height is a quarter turn
        camera.rotate(-25.0, 0.0, 100.0);
        camera.update();
        assert!(approx(camera.position(), Vec3::new(6.0, 0.0, 0.0)));
        assert!(!camera.update());
    }

    #[test]
    fn damping_spreads_motion_over_frames() {
        let mut camera = OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, Some(0.05));
        camera.rotate(-25.0, 0.0, 100.0);
        assert!(camera.update());
        let first = camera.theta;
        assert!((first - std::f32::consts::FRAC_PI_2 * 0.05).abs() < 1e-5);
        for _ in 0..2000 {
            camera.update();
        }
        assert!((camera.theta - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
        assert!(camera.radius - 6.0 < 1e-4);
    }

    #[test]
    fn polar_angle_never_flips_over_the_pole() {
        let mut camera = OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, None);
        camera.rotate(0.0, 1000.0, 100.0);
        camera.update();
        assert!(camera.phi > 0.0);
        assert!(camera.position().y > 5.99);
    }

    #[test]
    fn zoom_scales_radius_and_clamps() {
        let mut camera = OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, None);
        camera.zoom(1.0);
        camera.update();
        assert!((camera.radius - 6.0 * ZOOM_STEP).abs() < 1e-5);

        camera.zoom(1000.0);
        camera.update();
        assert_eq!(camera.radius, MIN_RADIUS);
    }

    #[test]
    fn pan_moves_target_with_camera() {
        let mut camera = OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, None);
        camera.pan(-10.0, 0.0, 100.0, 50f32.to_radians());
        camera.update();
        assert!(camera.target.x > 0.0);
        assert!(camera.target.y.abs() < 1e-5);
        assert!((camera.position() - camera.target - Vec3::new(0.0, 0.0, 6.0)).length() < 1e-4);
    }

    #[test]
    fn projection_tracks_aspect() {
        let mut projection = Projection::new(800, 600, 50.0, 1.0, 1000.0);
        assert!((projection.aspect - 4.0 / 3.0).abs() < 1e-6);
        projection.resize(1920, 1080);
        assert!((projection.aspect - 16.0 / 9.0).abs() < 1e-6);
        projection.resize(0, 0);
        assert_eq!(projection.aspect, 1.0);
    }

    #[test]
    fn uniform_projects_target_to_screen_center() {
        let camera = OrbitCamera::from_config(&CameraConfig::default());
        let projection = Projection::new(800, 600, 50.0, 1.0, 1000.0);
        let uniform = camera.to_uniform(&projection);
        let view_proj = Mat4::from_cols_array_2d(&uniform.view_proj);
        let clip = view_proj.project_point3(Vec3::new(0.0, 0.0, -3.0));
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }
}
