//! Two-pass renderer: environment pass into an offscreen target, then the
//! screen pass where the refractive mesh samples that target.

pub mod frame;
pub mod pipelines;

pub use frame::{plan_frame, FrameReport, PassPlan, PassReport, PassTarget};

use wgpu::util::DeviceExt;

use crate::config::{RenderConfig, SceneConfig};
use crate::core::render_target::{RenderTarget, ScreenTargets, TargetSize, ENV_FORMAT};
use crate::core::GpuContext;
use crate::geometry::MeshData;
use crate::scene::Scene;
use crate::types::{
    BackdropUniform, CameraUniform, GlobalsUniform, ModelUniform, RefractionUniform,
};
use pipelines::TargetFormat;

/// Uniform values for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs {
    pub camera: CameraUniform,
    pub globals: GlobalsUniform,
    pub refraction: RefractionUniform,
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(format!("{label} Vertex Buffer").as_str()),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(format!("{label} Index Buffer").as_str()),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

fn uniform_buffer<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, value: &T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(value),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// Owns every GPU resource of the scene and records both passes
pub struct SceneRenderer {
    gpu: GpuContext,

    camera_buffer: wgpu::Buffer,
    globals_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    backdrop_bind_group: wgpu::BindGroup,
    backdrop_mesh: GpuMesh,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,

    refraction_buffer: wgpu::Buffer,
    model_buffer: wgpu::Buffer,
    refraction_layout: wgpu::BindGroupLayout,
    refraction_bind_group: wgpu::BindGroup,
    refractive_mesh: GpuMesh,

    env_backdrop_pipeline: wgpu::RenderPipeline,
    screen_backdrop_pipeline: wgpu::RenderPipeline,
    refraction_pipeline: wgpu::RenderPipeline,

    env_target: RenderTarget,
    screen_targets: ScreenTargets,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    pub fn new(
        gpu: &GpuContext,
        scene: &Scene,
        scene_config: &SceneConfig,
        render_config: &RenderConfig,
        screen_format: wgpu::TextureFormat,
        env_target: RenderTarget,
        screen_targets: ScreenTargets,
    ) -> Self {
        let device = gpu.device();

        let camera_buffer = uniform_buffer(device, "Camera Buffer", &CameraUniform::default());
        let globals_buffer = uniform_buffer(device, "Globals Buffer", &GlobalsUniform::default());
        let frame_layout = pipelines::frame_layout(device);
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: globals_buffer.as_entire_binding(),
                },
            ],
        });

        let backdrop_layout = pipelines::backdrop_layout(device);
        let backdrop_buffer = uniform_buffer(
            device,
            "Backdrop Material Buffer",
            &BackdropUniform::from_scene(scene_config),
        );
        let backdrop_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Backdrop Material Bind Group"),
            layout: &backdrop_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: backdrop_buffer.as_entire_binding(),
            }],
        });

        let backdrop_mesh = GpuMesh::upload(device, "Backdrop", &scene.backdrop_mesh);
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Backdrop Instance Buffer"),
            contents: bytemuck::cast_slice(&scene.backdrop_instances),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let refraction_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Refraction Buffer"),
            size: std::mem::size_of::<RefractionUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let model_buffer = uniform_buffer(
            device,
            "Refractive Model Buffer",
            &ModelUniform::from_matrix(scene.refractive.transform),
        );
        let refraction_layout = pipelines::refraction_layout(device);
        let refraction_bind_group = Self::create_refraction_bind_group(
            device,
            &refraction_layout,
            &refraction_buffer,
            &model_buffer,
            &env_target,
        );
        let refractive_mesh = GpuMesh::upload(device, "Refractive", &scene.refractive.mesh);

        let env_format = TargetFormat {
            color: ENV_FORMAT,
            sample_count: 1,
        };
        let screen_format = TargetFormat {
            color: screen_format,
            sample_count: screen_targets.sample_count(),
        };
        let env_backdrop_pipeline =
            pipelines::mk_backdrop_pipeline(device, &frame_layout, &backdrop_layout, env_format);
        let screen_backdrop_pipeline =
            pipelines::mk_backdrop_pipeline(device, &frame_layout, &backdrop_layout, screen_format);
        let refraction_pipeline =
            pipelines::mk_refraction_pipeline(device, &frame_layout, &refraction_layout, screen_format);

        let [r, g, b] = render_config.clear_color;
        log::info!(
            "Renderer ready: environment {}x{}, {} sample(s) on screen",
            env_target.size().width,
            env_target.size().height,
            screen_targets.sample_count()
        );

        Self {
            gpu: gpu.clone(),
            camera_buffer,
            globals_buffer,
            frame_bind_group,
            backdrop_bind_group,
            backdrop_mesh,
            instance_buffer,
            instance_count: scene.backdrop_instances.len() as u32,
            refraction_buffer,
            model_buffer,
            refraction_layout,
            refraction_bind_group,
            refractive_mesh,
            env_backdrop_pipeline,
            screen_backdrop_pipeline,
            refraction_pipeline,
            env_target,
            screen_targets,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
        }
    }

    fn create_refraction_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        refraction_buffer: &wgpu::Buffer,
        model_buffer: &wgpu::Buffer,
        env_target: &RenderTarget,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Refraction Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: refraction_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: model_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(env_target.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(env_target.sampler()),
                },
            ],
        })
    }

    /// Follow a viewport resize; the refraction bind group is rebuilt when the
    /// environment texture is replaced
    pub fn resize(&mut self, size: TargetSize) {
        let device = self.gpu.device();
        if self.env_target.resize(device, size) {
            self.refraction_bind_group = Self::create_refraction_bind_group(
                device,
                &self.refraction_layout,
                &self.refraction_buffer,
                &self.model_buffer,
                &self.env_target,
            );
        }
        self.screen_targets.resize(device, size);
    }

    pub fn env_target(&self) -> &RenderTarget {
        &self.env_target
    }

    pub fn screen_size(&self) -> TargetSize {
        self.screen_targets.size()
    }

    /// Record both passes of a frame into `encoder`, presenting to `frame_view`
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        frame_view: &wgpu::TextureView,
        inputs: &FrameInputs,
    ) -> FrameReport {
        let queue = self.gpu.queue();
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&inputs.camera));
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&inputs.globals));

        let mut report = FrameReport::new();
        for plan in plan_frame() {
            if plan.upload_refraction {
                queue.write_buffer(&self.refraction_buffer, 0, bytemuck::bytes_of(&inputs.refraction));
                report.iors = Some(inputs.refraction.iors());
            }
            report.passes.push(self.record_pass(encoder, &plan, frame_view));
        }
        report
    }

    fn record_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        plan: &PassPlan,
        frame_view: &wgpu::TextureView,
    ) -> PassReport {
        let (label, color_view, resolve_target, depth_view, backdrop_pipeline) = match plan.target {
            PassTarget::Environment => (
                "Environment Pass",
                self.env_target.view(),
                None,
                self.env_target.depth_view(),
                &self.env_backdrop_pipeline,
            ),
            PassTarget::Screen => {
                let (color, resolve) = self.screen_targets.color_attachment(frame_view);
                (
                    "Screen Pass",
                    color,
                    resolve,
                    self.screen_targets.depth_view(),
                    &self.screen_backdrop_pipeline,
                )
            }
        };

        // multisampled color only matters through its resolve
        let store = if resolve_target.is_some() {
            wgpu::StoreOp::Discard
        } else {
            wgpu::StoreOp::Store
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

        let mut backdrop_instances = 0;
        if plan.draw_backdrop {
            render_pass.set_pipeline(backdrop_pipeline);
            render_pass.set_bind_group(1, &self.backdrop_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.backdrop_mesh.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            render_pass.set_index_buffer(self.backdrop_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.backdrop_mesh.index_count, 0, 0..self.instance_count);
            backdrop_instances = self.instance_count;
        }

        if plan.draw_refractive {
            render_pass.set_pipeline(&self.refraction_pipeline);
            render_pass.set_bind_group(1, &self.refraction_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.refractive_mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.refractive_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.refractive_mesh.index_count, 0, 0..1);
        }

        PassReport {
            target: plan.target,
            backdrop_instances,
            refractive_drawn: plan.draw_refractive,
        }
    }
}
