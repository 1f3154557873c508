//! GPU mesh geometry for the arm's shared unit cube.
//!
//! Every segment of the arm is the same cube, stretched into place by the
//! world matrix the traversal emits. The cube spans ±1 on each axis (so the
//! shape extents in the hierarchy read as half-sizes) and carries a flat
//! color per face instead of normals or UVs; the arm is rendered unlit.

use crate::gpu::GpuContext;

/// A colored vertex. `#[repr(C)]` for direct GPU upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    /// Vertex buffer layout: position at location 0, color at location 1,
    /// 28 bytes per vertex.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };

    pub fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

/// GPU-resident geometry: vertex and index buffers plus the draw count.
/// Immutable after creation.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Uploads raw vertex and index data to GPU buffers.
    pub fn new(gpu: &GpuContext, vertices: &[Vertex], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// The shared arm cube: ±1 on each axis, one flat color per face,
    /// counter-clockwise winding for front faces.
    pub fn cube(gpu: &GpuContext) -> Self {
        const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
        const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
        const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
        const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
        const CYAN: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
        const MAGENTA: [f32; 4] = [1.0, 0.0, 1.0, 1.0];

        #[rustfmt::skip]
        let vertices = vec![
            // Front face (Z+)
            Vertex::new([-1.0, -1.0,  1.0], GREEN),
            Vertex::new([ 1.0, -1.0,  1.0], GREEN),
            Vertex::new([ 1.0,  1.0,  1.0], GREEN),
            Vertex::new([-1.0,  1.0,  1.0], GREEN),
            // Back face (Z-)
            Vertex::new([ 1.0, -1.0, -1.0], YELLOW),
            Vertex::new([-1.0, -1.0, -1.0], YELLOW),
            Vertex::new([-1.0,  1.0, -1.0], YELLOW),
            Vertex::new([ 1.0,  1.0, -1.0], YELLOW),
            // Top face (Y+)
            Vertex::new([-1.0,  1.0,  1.0], BLUE),
            Vertex::new([ 1.0,  1.0,  1.0], BLUE),
            Vertex::new([ 1.0,  1.0, -1.0], BLUE),
            Vertex::new([-1.0,  1.0, -1.0], BLUE),
            // Bottom face (Y-)
            Vertex::new([-1.0, -1.0, -1.0], CYAN),
            Vertex::new([ 1.0, -1.0, -1.0], CYAN),
            Vertex::new([ 1.0, -1.0,  1.0], CYAN),
            Vertex::new([-1.0, -1.0,  1.0], CYAN),
            // Right face (X+)
            Vertex::new([ 1.0, -1.0,  1.0], RED),
            Vertex::new([ 1.0, -1.0, -1.0], RED),
            Vertex::new([ 1.0,  1.0, -1.0], RED),
            Vertex::new([ 1.0,  1.0,  1.0], RED),
            // Left face (X-)
            Vertex::new([-1.0, -1.0, -1.0], MAGENTA),
            Vertex::new([-1.0, -1.0,  1.0], MAGENTA),
            Vertex::new([-1.0,  1.0,  1.0], MAGENTA),
            Vertex::new([-1.0,  1.0, -1.0], MAGENTA),
        ];

        #[rustfmt::skip]
        let indices: Vec<u32> = vec![
            0,  1,  2,  2,  3,  0,  // front
            4,  5,  6,  6,  7,  4,  // back
            8,  9,  10, 10, 11, 8,  // top
            12, 13, 14, 14, 15, 12, // bottom
            16, 17, 18, 18, 19, 16, // right
            20, 21, 22, 22, 23, 20, // left
        ];

        Self::new(gpu, &vertices, &indices)
    }
}
