use crate::config::{RefractionParams, SceneConfig, ShadingConfig};
use glam::Mat4;

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _pad: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            _pad: 0.0,
        }
    }
}

/// Per-frame values every shader can read (elapsed time, resolution, mouse)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalsUniform {
    pub time: f32,
    pub delta: f32,
    /// Viewport size in device pixels
    pub resolution: [f32; 2],
    /// Cursor position in device pixels
    pub mouse: [f32; 2],
    pub _pad: [f32; 2],
}

/// Refractive material inputs, must mirror `Refraction` in refraction.wgsl
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RefractionUniform {
    pub ior_r: f32,
    pub ior_g: f32,
    pub ior_b: f32,
    pub refract_power: f32,
    pub shininess: f32,
    pub diffuseness: f32,
    pub _pad1: [f32; 2],
    pub light: [f32; 3],
    pub _pad2: f32,
}

impl RefractionUniform {
    pub fn new(params: &RefractionParams, shading: &ShadingConfig) -> Self {
        Self {
            ior_r: params.ior_r,
            ior_g: params.ior_g,
            ior_b: params.ior_b,
            refract_power: shading.refract_power,
            shininess: shading.shininess,
            diffuseness: shading.diffuseness,
            _pad1: [0.0; 2],
            light: shading.light,
            _pad2: 0.0,
        }
    }

    pub fn iors(&self) -> [f32; 3] {
        [self.ior_r, self.ior_g, self.ior_b]
    }
}

/// Model and normal matrix of a single mesh
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn from_matrix(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
        }
    }
}

/// Backdrop material: albedo lit by a single ambient light
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BackdropUniform {
    pub albedo: [f32; 3],
    pub ambient_intensity: f32,
    pub ambient_color: [f32; 3],
    pub _pad: f32,
}

impl BackdropUniform {
    pub fn from_scene(scene: &SceneConfig) -> Self {
        Self {
            albedo: scene.backdrop_color,
            ambient_intensity: scene.ambient_intensity,
            ambient_color: scene.ambient_color,
            _pad: 0.0,
        }
    }
}

/// Mesh vertex: position, normal, uv
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Per-instance data of a backdrop sphere
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub offset: [f32; 3],
    pub scale: f32,
}

impl InstanceRaw {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // advance once per sphere, not per vertex
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}
