use anyhow::{anyhow, Result};
use std::sync::Arc;
use winit::window::Window;

use super::gpu_context::GpuContext;

/// What the frame loop does after `get_current_texture` fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRecovery {
    /// Reconfigure the surface and skip this frame
    Reconfigure,
    /// Drop this frame only
    Skip,
    /// Stop the event loop
    Exit,
}

impl SurfaceRecovery {
    pub fn for_error(error: &wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceRecovery::Reconfigure,
            wgpu::SurfaceError::OutOfMemory => SurfaceRecovery::Exit,
            _ => SurfaceRecovery::Skip,
        }
    }
}

/// First sRGB format so the swapchain encodes linear shader output
pub fn choose_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first().copied())
}

/// Fifo when vsync is on, otherwise the lowest-latency mode available
pub fn choose_present_mode(vsync: bool, available: &[wgpu::PresentMode]) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Immediate, wgpu::PresentMode::Mailbox]
        .into_iter()
        .find(|mode| available.contains(mode))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

/// Window surface together with its current configuration
pub struct WindowSurface {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

impl WindowSurface {
    /// Create the surface and a GPU context that can present to it
    pub async fn create(window: Arc<Window>, vsync: bool) -> Result<(Self, GpuContext)> {
        let size = window.inner_size();
        let instance = GpuContext::create_instance();
        let surface = instance.create_surface(window)?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;

        let caps = surface.get_capabilities(gpu.adapter());
        let format = choose_format(&caps.formats)
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: choose_present_mode(vsync, &caps.present_modes),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &config);
        log::info!(
            "Surface configured: {:?}, {:?}, {}x{}",
            config.format,
            config.present_mode,
            config.width,
            config.height
        );

        Ok((Self { surface, config }, gpu))
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Zero sizes are ignored, a minimized window keeps its last configuration
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(device, &self.config);
    }

    pub fn reconfigure(&self, device: &wgpu::Device) {
        self.surface.configure(device, &self.config);
    }

    pub fn acquire(&self) -> std::result::Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }
}
