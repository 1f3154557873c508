//! GPU render pass for the arm's recorded draw calls.
//!
//! [`ArmPass`] owns the one pipeline the demo needs: flat-colored vertices,
//! a camera-to-clip uniform in group 0, a per-draw world matrix in group 1,
//! depth testing against a Depth32Float buffer that resizes with the window.
//! Meshes are registered up front and addressed by [`MeshId`] so the
//! traversal core never touches wgpu types.

use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex};
use crate::render::{DrawQueue, MeshId};
use glam::Mat4;

/// Per-frame camera uniforms.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    /// Camera-to-clip (projection) matrix.
    clip: [[f32; 4]; 4],
}

/// Per-draw model uniforms.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniforms {
    /// Model-to-camera (world) matrix composed by the transform stack.
    world: [[f32; 4]; 4],
}

/// Renders a [`DrawQueue`] with depth testing.
pub struct ArmPass {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_bind_group_layout: wgpu::BindGroupLayout,
    /// One uniform slot per queued draw; grows to the deepest frame seen.
    /// A single shared buffer would leave every draw reading the last
    /// matrix written, since buffer writes land before the pass executes.
    model_slots: Vec<(wgpu::Buffer, wgpu::BindGroup)>,
    depth_texture: wgpu::Texture,
    /// View into the depth texture for render pass attachment.
    pub(crate) depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    meshes: Vec<Mesh>,
}

impl ArmPass {
    /// Creates the pipeline, uniform buffers, and an initial depth buffer
    /// sized to the current surface.
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Arm Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/arm.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Arm Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        let (depth_texture, depth_view) = Self::create_depth_texture(gpu);

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Arm Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            model_bind_group_layout,
            model_slots: Vec::new(),
            depth_texture,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
            meshes: Vec::new(),
        }
    }

    /// Registers a mesh and returns its handle.
    pub fn register_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    fn create_depth_texture(gpu: &GpuContext) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Readies the pass for a frame: recreates the depth buffer if the
    /// surface size changed and grows the model uniform slots to cover the
    /// queue. Must be called before the render pass begins, while no borrow
    /// of [`depth_view`](Self::depth_view) is held.
    pub fn prepare(&mut self, gpu: &GpuContext, queue: &DrawQueue) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            let (texture, view) = Self::create_depth_texture(gpu);
            self.depth_texture = texture;
            self.depth_view = view;
            self.depth_size = (gpu.width(), gpu.height());
        }
        self.ensure_model_slots(gpu, queue.len());
    }

    fn ensure_model_slots(&mut self, gpu: &GpuContext, count: usize) {
        while self.model_slots.len() < count {
            let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Model Uniforms"),
                size: std::mem::size_of::<ModelUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Model Bind Group"),
                layout: &self.model_bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.model_slots.push((buffer, bind_group));
        }
    }

    /// Uploads the clip matrix and draws every recorded call in order.
    /// [`prepare`](Self::prepare) must have run for this frame.
    ///
    /// Calls whose [`MeshId`] was never registered are skipped; nothing in
    /// the queue can otherwise fail here.
    pub fn render(
        &self,
        gpu: &GpuContext,
        render_pass: &mut wgpu::RenderPass,
        clip: Mat4,
        queue: &DrawQueue,
    ) {
        if queue.is_empty() {
            return;
        }

        let camera_uniforms = CameraUniforms {
            clip: clip.to_cols_array_2d(),
        };
        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniforms]),
        );

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for (slot, &(mesh_id, world)) in self.model_slots.iter().zip(queue.calls()) {
            let Some(mesh) = self.meshes.get(mesh_id.0) else {
                continue;
            };

            let model_uniforms = ModelUniforms {
                world: world.to_cols_array_2d(),
            };
            gpu.queue
                .write_buffer(&slot.0, 0, bytemuck::cast_slice(&[model_uniforms]));

            render_pass.set_bind_group(1, &slot.1, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}
