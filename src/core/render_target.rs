//! Offscreen color target and the depth/MSAA attachments of the screen pass

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
/// Format of the environment texture the refractive mesh samples
pub const ENV_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Size of a render target in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    /// Target size for a viewport of `width` x `height` physical pixels,
    /// kept within `[1, max_dimension]` on both axes
    pub fn from_physical(width: u32, height: u32, max_dimension: u32) -> Self {
        let max_dimension = max_dimension.max(1);
        Self {
            width: width.clamp(1, max_dimension),
            height: height.clamp(1, max_dimension),
        }
    }

    /// Minimized windows report a zero-sized viewport
    pub fn is_renderable(width: u32, height: u32) -> bool {
        width > 0 && height > 0
    }

    pub fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }

    pub fn as_vec2(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

fn create_attachment(
    device: &wgpu::Device,
    label: &str,
    size: TargetSize,
    format: wgpu::TextureFormat,
    sample_count: u32,
    usage: wgpu::TextureUsages,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: size.extent(),
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Offscreen color + depth target that the environment pass renders into
///
/// The color view is sampled by the refraction shader, so whoever binds it
/// must rebuild that bind group after `resize`.
pub struct RenderTarget {
    size: TargetSize,
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl RenderTarget {
    pub fn new(device: &wgpu::Device, size: TargetSize) -> Self {
        let (color, color_view) = Self::create_color(device, size);
        let (_, depth_view) = create_attachment(
            device,
            "Environment Depth",
            size,
            DEPTH_FORMAT,
            1,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Environment Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            size,
            color,
            color_view,
            depth_view,
            sampler,
        }
    }

    fn create_color(device: &wgpu::Device, size: TargetSize) -> (wgpu::Texture, wgpu::TextureView) {
        create_attachment(
            device,
            "Environment Target",
            size,
            ENV_FORMAT,
            1,
            wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
        )
    }

    /// Recreate the textures at `size`; returns false if nothing changed
    pub fn resize(&mut self, device: &wgpu::Device, size: TargetSize) -> bool {
        if size == self.size {
            return false;
        }
        let (color, color_view) = Self::create_color(device, size);
        let (_, depth_view) = create_attachment(
            device,
            "Environment Depth",
            size,
            DEPTH_FORMAT,
            1,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        self.color = color;
        self.color_view = color_view;
        self.depth_view = depth_view;
        self.size = size;
        log::debug!("Environment target resized to {}x{}", size.width, size.height);
        true
    }

    pub fn size(&self) -> TargetSize {
        self.size
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.color
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

/// Depth buffer and optional multisampled color buffer for the screen pass
pub struct ScreenTargets {
    size: TargetSize,
    format: wgpu::TextureFormat,
    sample_count: u32,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
}

impl ScreenTargets {
    pub fn new(
        device: &wgpu::Device,
        size: TargetSize,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let (depth_view, msaa_view) = Self::create_views(device, size, format, sample_count);
        Self {
            size,
            format,
            sample_count,
            depth_view,
            msaa_view,
        }
    }

    fn create_views(
        device: &wgpu::Device,
        size: TargetSize,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> (wgpu::TextureView, Option<wgpu::TextureView>) {
        let (_, depth_view) = create_attachment(
            device,
            "Screen Depth",
            size,
            DEPTH_FORMAT,
            sample_count,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let msaa_view = (sample_count > 1).then(|| {
            create_attachment(
                device,
                "Screen MSAA Color",
                size,
                format,
                sample_count,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
            )
            .1
        });
        (depth_view, msaa_view)
    }

    pub fn resize(&mut self, device: &wgpu::Device, size: TargetSize) {
        if size == self.size {
            return;
        }
        let (depth_view, msaa_view) = Self::create_views(device, size, self.format, self.sample_count);
        self.depth_view = depth_view;
        self.msaa_view = msaa_view;
        self.size = size;
    }

    pub fn size(&self) -> TargetSize {
        self.size
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Color attachment and resolve target for a frame presented to `frame_view`
    pub fn color_attachment<'a>(
        &'a self,
        frame_view: &'a wgpu::TextureView,
    ) -> (&'a wgpu::TextureView, Option<&'a wgpu::TextureView>) {
        match &self.msaa_view {
            Some(msaa) => (msaa, Some(frame_view)),
            None => (frame_view, None),
        }
    }
}
