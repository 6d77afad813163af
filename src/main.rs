use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use refraction_demo::cli::Cli;
use refraction_demo::config::DemoConfig;
use refraction_demo::core::{
    Button, Controller, GpuContext, SurfaceRecovery, WindowSurface, WinitController,
};
use refraction_demo::demo::Demo;
use refraction_demo::ui::{DebugOverlay, OverlayFrame};

const WINDOW_TITLE: &str = "Chromatic Refraction";

/// Everything that exists once the window does
struct Graphics {
    window: Arc<Window>,
    surface: WindowSurface,
    gpu: GpuContext,
    demo: Demo,
    overlay: DebugOverlay,
    clear_color: wgpu::Color,
}

impl Graphics {
    fn new(window: Arc<Window>, config: DemoConfig, show_panels: bool) -> Result<Self> {
        let (surface, gpu) = pollster::block_on(WindowSurface::create(window.clone(), config.render.vsync))?;
        let (width, height) = surface.size();
        let demo = Demo::new(config, surface.format(), width, height, gpu.max_texture_dimension());
        let overlay = DebugOverlay::new(&window, gpu.device(), surface.format(), show_panels);
        let [r, g, b] = config.render.clear_color;

        Ok(Self {
            window,
            surface,
            gpu,
            demo,
            overlay,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
        })
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.surface.resize(self.gpu.device(), size.width, size.height);
        self.demo.resize(size.width, size.height);
    }

    fn redraw(&mut self, controller: &mut WinitController) -> Result<()> {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }

        if controller.was_pressed(Button::KeyH) {
            self.overlay.toggle_panels();
            log::debug!("Panels visible: {}", self.overlay.panels_visible());
        }
        self.demo.handle_input(controller);
        controller.reset_deltas();

        let fps = *self.demo.fps();
        let progress = *self.demo.progress();
        let loading = (!self.demo.is_ready()).then(|| (&progress, self.demo.stage().label()));
        let ior_changed = self.overlay.run(
            &self.window,
            OverlayFrame {
                fps: &fps,
                refraction: self.demo.params_mut(),
                loading,
            },
        );
        if ior_changed {
            let params = self.demo.params();
            log::debug!("IOR set to r={:.2} g={:.2} b={:.2}", params.ior_r, params.ior_g, params.ior_b);
        }
        let inputs = self.demo.update();

        let output = match self.surface.acquire() {
            Ok(output) => output,
            Err(e) => {
                return match SurfaceRecovery::for_error(&e) {
                    SurfaceRecovery::Reconfigure => {
                        log::warn!("Surface {:?}, reconfiguring", e);
                        self.surface.reconfigure(self.gpu.device());
                        Ok(())
                    }
                    SurfaceRecovery::Skip => {
                        log::warn!("Skipping frame: {:?}", e);
                        Ok(())
                    }
                    SurfaceRecovery::Exit => Err(anyhow!("Surface error: {:?}", e)),
                };
            }
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        match self.demo.render(&mut encoder, &view, &inputs) {
            Some(report) => log::trace!("{:?}", report),
            None => clear_frame(&mut encoder, &view, self.clear_color),
        }
        self.overlay.paint(&self.gpu, &mut encoder, &view);

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();

        // one stage per frame so the loading bar gets drawn in between
        if !self.demo.is_ready() {
            self.demo
                .run_setup_stage(&self.gpu)
                .context("Scene setup failed")?;
        }
        Ok(())
    }
}

/// Background-only frame shown while the renderer is still being built
fn clear_frame(encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, color: wgpu::Color) {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Loading Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        occlusion_query_set: None,
        timestamp_writes: None,
    });
}

// === Application ===

struct App {
    cli: Cli,
    config: DemoConfig,
    graphics: Option<Graphics>,
    controller: WinitController,
}

impl App {
    fn new(cli: Cli, config: DemoConfig) -> Self {
        Self {
            cli,
            config,
            graphics: None,
            controller: WinitController::new(),
        }
    }

    fn create_graphics(&self, event_loop: &ActiveEventLoop) -> Result<Graphics> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(WINDOW_TITLE)
                    .with_inner_size(winit::dpi::LogicalSize::new(self.cli.width, self.cli.height)),
            )
            .context("Failed to create window")?;

        Graphics::new(Arc::new(window), self.config, !self.cli.no_ui)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_none() {
            match self.create_graphics(event_loop) {
                Ok(graphics) => self.graphics = Some(graphics),
                Err(e) => {
                    log::error!("Failed to initialize: {:#}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(graphics) = &mut self.graphics else {
            return;
        };

        // Let egui handle the event first
        if graphics.overlay.handle_event(&graphics.window, &event) {
            return;
        }
        self.controller.process_event(&event);

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => graphics.resize(size),
            WindowEvent::RedrawRequested => {
                if let Err(e) = graphics.redraw(&mut self.controller) {
                    log::error!("{:#}", e);
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &self.graphics {
            graphics.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.demo_config()?;

    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, config);

    log::info!("Drag to orbit, right-drag to pan, scroll to zoom, H toggles panels, R resets the camera");
    event_loop.run_app(&mut app)?;

    Ok(())
}
