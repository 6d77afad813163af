//! egui overlay drawn on top of the screen pass

pub mod panels;

use winit::window::Window;

use crate::config::RefractionParams;
use crate::core::{FpsCounter, GpuContext, LoadingProgress};

/// What the overlay shows this frame
pub struct OverlayFrame<'a> {
    pub fps: &'a FpsCounter,
    pub refraction: &'a mut RefractionParams,
    /// Present while setup is still running
    pub loading: Option<(&'a LoadingProgress, &'a str)>,
}

struct PreparedUi {
    tris: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    screen_descriptor: egui_wgpu::ScreenDescriptor,
}

pub struct DebugOverlay {
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
    show_panels: bool,
    prepared: Option<PreparedUi>,
}

impl DebugOverlay {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat, show_panels: bool) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            egui_renderer,
            egui_state,
            egui_ctx,
            show_panels,
            prepared: None,
        }
    }

    /// Returns true when egui consumed the event
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    pub fn toggle_panels(&mut self) {
        self.show_panels = !self.show_panels;
    }

    pub fn panels_visible(&self) -> bool {
        self.show_panels
    }

    /// Build this frame's panels; returns true if an IOR slider moved
    ///
    /// Runs before the scene is rendered so slider changes reach the
    /// refraction uniforms in the same frame.
    pub fn run(&mut self, window: &Window, frame: OverlayFrame<'_>) -> bool {
        let raw_input = self.egui_state.take_egui_input(window);
        let show_panels = self.show_panels;
        let OverlayFrame {
            fps,
            refraction,
            loading,
        } = frame;

        let mut changed = false;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            // the loading bar shows even with --no-ui
            if let Some((progress, label)) = loading {
                panels::loading_panel(ctx, progress, label);
            }
            if show_panels {
                panels::fps_panel(ctx, fps);
                changed |= panels::refraction_panel(ctx, refraction);
            }
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let size = window.inner_size();
        self.prepared = Some(PreparedUi {
            tris,
            textures_delta: full_output.textures_delta,
            screen_descriptor: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [size.width, size.height],
                pixels_per_point: full_output.pixels_per_point,
            },
        });

        changed
    }

    /// Paint the panels built by the last `run` onto `view`
    pub fn paint(&mut self, gpu: &GpuContext, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let Some(prepared) = self.prepared.take() else {
            return;
        };
        let PreparedUi {
            tris,
            textures_delta,
            screen_descriptor,
        } = prepared;

        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(gpu.device(), gpu.queue(), *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            gpu.device(),
            gpu.queue(),
            encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
