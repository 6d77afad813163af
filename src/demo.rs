//! The refraction demo: staged setup, per-frame update and the two-pass render

use anyhow::Result;

use crate::camera::{OrbitCamera, Projection};
use crate::config::{DemoConfig, RefractionParams};
use crate::core::clock::FrameTime;
use crate::core::{
    Button, Controller, FpsCounter, FrameClock, GpuContext, LoadingProgress, RenderTarget,
    ScreenTargets, SetupStage, TargetSize,
};
use crate::renderer::{FrameInputs, FrameReport, SceneRenderer};
use crate::scene::Scene;
use crate::types::{GlobalsUniform, RefractionUniform};

/// Drag distance in pixels that dollies as far as one wheel line
const DRAG_PIXELS_PER_LINE: f32 = 10.0;

pub struct Demo {
    config: DemoConfig,
    params: RefractionParams,
    camera: OrbitCamera,
    projection: Projection,
    size: TargetSize,
    max_texture_dimension: u32,
    surface_format: wgpu::TextureFormat,

    stage: SetupStage,
    progress: LoadingProgress,
    pending_targets: Option<(RenderTarget, ScreenTargets)>,
    renderer: Option<SceneRenderer>,

    clock: FrameClock,
    fps: FpsCounter,
    mouse: [f32; 2],
}

impl Demo {
    /// `width`/`height` are the physical size of the window
    pub fn new(
        config: DemoConfig,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        max_texture_dimension: u32,
    ) -> Self {
        let camera_config = config.camera;
        Self {
            params: config.refraction,
            camera: OrbitCamera::from_config(&camera_config),
            projection: Projection::new(
                width,
                height,
                camera_config.fov_degrees,
                camera_config.near,
                camera_config.far,
            ),
            size: TargetSize::from_physical(width, height, max_texture_dimension),
            max_texture_dimension,
            surface_format,
            config,
            stage: SetupStage::first(),
            progress: LoadingProgress::new(),
            pending_targets: None,
            renderer: None,
            clock: FrameClock::new(),
            fps: FpsCounter::default(),
            mouse: [0.0, 0.0],
        }
    }

    pub fn is_ready(&self) -> bool {
        self.stage == SetupStage::Done
    }

    pub fn stage(&self) -> SetupStage {
        self.stage
    }

    pub fn progress(&self) -> &LoadingProgress {
        &self.progress
    }

    pub fn fps(&self) -> &FpsCounter {
        &self.fps
    }

    pub fn params(&self) -> &RefractionParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut RefractionParams {
        &mut self.params
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn size(&self) -> TargetSize {
        self.size
    }

    /// Run the current setup stage and move to the next one
    pub fn run_setup_stage(&mut self, gpu: &GpuContext) -> Result<()> {
        match self.stage {
            SetupStage::Targets => {
                let device = gpu.device();
                let env_target = RenderTarget::new(device, self.size);
                let screen_targets = ScreenTargets::new(
                    device,
                    self.size,
                    self.surface_format,
                    self.config.render.sample_count(),
                );
                self.pending_targets = Some((env_target, screen_targets));
            }
            SetupStage::Scene => {
                let (env_target, screen_targets) = match self.pending_targets.take() {
                    Some(targets) => targets,
                    None => anyhow::bail!("Scene stage ran before render targets were created"),
                };
                let scene = Scene::build(&self.config.scene);
                let mut renderer = SceneRenderer::new(
                    gpu,
                    &scene,
                    &self.config.scene,
                    &self.config.render,
                    self.surface_format,
                    env_target,
                    screen_targets,
                );
                // the window may have been resized since the Targets stage
                renderer.resize(self.size);
                self.renderer = Some(renderer);
            }
            SetupStage::Interface => {
                self.camera.update();
                self.clock.reset();
            }
            SetupStage::Done => return Ok(()),
        }

        self.stage.complete(&mut self.progress);
        log::info!("{} ({}%)", self.stage.label(), self.progress.percent());
        self.stage = self.stage.next();
        Ok(())
    }

    /// Feed one frame of pointer and keyboard input to the camera
    pub fn handle_input(&mut self, controller: &dyn Controller) {
        if let Some((x, y)) = controller.mouse_position() {
            self.mouse = [x, y];
        }

        let (dx, dy) = controller.mouse_delta();
        let height = self.size.height as f32;
        if controller.is_down(Button::MouseLeft) {
            self.camera.rotate(dx, dy, height);
        } else if controller.is_down(Button::MouseRight) {
            self.camera.pan(dx, dy, height, self.projection.fov_y);
        } else if controller.is_down(Button::MouseMiddle) {
            self.camera.zoom(-dy / DRAG_PIXELS_PER_LINE);
        }

        let scroll = controller.scroll_delta();
        if scroll != 0.0 {
            self.camera.zoom(scroll);
        }

        if controller.was_pressed(Button::KeyR) {
            self.reset_camera();
        }
    }

    pub fn reset_camera(&mut self) {
        self.camera = OrbitCamera::from_config(&self.config.camera);
    }

    /// Follow a window resize, zero sizes (minimized) are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if !TargetSize::is_renderable(width, height) {
            return;
        }
        self.size = TargetSize::from_physical(width, height, self.max_texture_dimension);
        self.projection.resize(width, height);
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(self.size);
        }
        log::debug!("Viewport resized to {}x{}", self.size.width, self.size.height);
    }

    /// Advance camera damping and timers, returns this frame's uniform values
    pub fn update(&mut self) -> FrameInputs {
        let time = self.clock.tick();
        self.fps.tick(time.delta);
        self.camera.update();
        self.frame_inputs(time)
    }

    pub fn frame_inputs(&self, time: FrameTime) -> FrameInputs {
        FrameInputs {
            camera: self.camera.to_uniform(&self.projection),
            globals: GlobalsUniform {
                time: time.elapsed,
                delta: time.delta,
                resolution: self.size.as_vec2(),
                mouse: self.mouse,
                _pad: [0.0; 2],
            },
            refraction: RefractionUniform::new(&self.params, &self.config.shading),
        }
    }

    /// Record both passes; `None` until setup has built the renderer
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        frame_view: &wgpu::TextureView,
        inputs: &FrameInputs,
    ) -> Option<FrameReport> {
        let renderer = self.renderer.as_ref()?;
        Some(renderer.render(encoder, frame_view, inputs))
    }

    pub fn renderer(&self) -> Option<&SceneRenderer> {
        self.renderer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[derive(Default)]
    struct StubController {
        down: Vec<Button>,
        delta: (f32, f32),
        scroll: f32,
    }

    impl Controller for StubController {
        fn is_down(&self, button: Button) -> bool {
            self.down.contains(&button)
        }
        fn get_down_keys(&self) -> &[Button] {
            &self.down
        }
        fn was_pressed(&self, _button: Button) -> bool {
            false
        }
        fn mouse_position(&self) -> Option<(f32, f32)> {
            Some((640.0, 360.0))
        }
        fn mouse_delta(&self) -> (f32, f32) {
            self.delta
        }
        fn scroll_delta(&self) -> f32 {
            self.scroll
        }
    }

    fn demo() -> Demo {
        Demo::new(
            DemoConfig::default(),
            wgpu::TextureFormat::Bgra8UnormSrgb,
            1280,
            720,
            8192,
        )
    }

    fn frame_time() -> FrameTime {
        FrameTime {
            number: 0,
            elapsed: 1.0,
            delta: 0.016,
        }
    }

    #[test]
    fn starts_in_first_setup_stage() {
        let demo = demo();
        assert_eq!(demo.stage(), SetupStage::Targets);
        assert!(!demo.is_ready());
        assert_eq!(demo.progress().fraction(), 0.0);
        assert!(demo.renderer().is_none());
    }

    #[test]
    fn frame_inputs_carry_current_iors() {
        let mut demo = demo();
        demo.params_mut().ior_g = 1.9;

        assert_eq!(demo.params().ior_g, 1.9);
        let inputs = demo.frame_inputs(frame_time());
        assert_eq!(inputs.refraction.iors(), [1.15, 1.9, 1.22]);
        assert_eq!(inputs.globals.resolution, [1280.0, 720.0]);
        assert_eq!(inputs.globals.time, 1.0);
    }

    #[test]
    fn resize_tracks_physical_size_and_ignores_minimize() {
        let mut demo = demo();
        demo.resize(1920, 1080);
        assert_eq!(demo.size(), TargetSize { width: 1920, height: 1080 });

        demo.resize(0, 0);
        assert_eq!(demo.size(), TargetSize { width: 1920, height: 1080 });
        let inputs = demo.frame_inputs(frame_time());
        assert_eq!(inputs.globals.resolution, [1920.0, 1080.0]);
    }

    #[test]
    fn scroll_zooms_the_camera() {
        let mut demo = demo();
        let controller = StubController {
            scroll: 2.0,
            ..Default::default()
        };

        let radius = demo.camera().radius;
        demo.handle_input(&controller);
        demo.camera.update();
        assert!(demo.camera().radius < radius);
        assert_eq!(demo.frame_inputs(frame_time()).globals.mouse, [640.0, 360.0]);
    }

    #[test]
    fn left_drag_orbits_without_dolly() {
        let mut demo = demo();
        let controller = StubController {
            down: vec![Button::MouseLeft],
            delta: (-40.0, 0.0),
            ..Default::default()
        };

        demo.handle_input(&controller);
        for _ in 0..500 {
            demo.camera.update();
        }
        let position = demo.camera().position();
        assert!(position.x > 1.0);
        assert!((position.length() - 6.0).abs() < 1e-3);
    }

    #[test]
    fn reset_restores_configured_camera() {
        let mut demo = demo();
        demo.camera.zoom(5.0);
        demo.camera.update();
        demo.reset_camera();
        assert!((demo.camera().position() - Vec3::new(0.0, 0.0, 6.0)).length() < 1e-4);
    }
}
