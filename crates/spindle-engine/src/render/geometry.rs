use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::ctx::RenderCtx;

/// Vertex format consumed by the triangle shader (`@location(0) position: vec3<f32>`).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// The one triangle, centered on the origin in the XY plane.
pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex { position: [-0.5, -0.5, 0.0] },
    Vertex { position: [0.5, -0.5, 0.0] },
    Vertex { position: [0.0, 0.5, 0.0] },
];

/// Raw bytes uploaded to the vertex buffer.
#[inline]
pub fn triangle_bytes() -> &'static [u8] {
    bytemuck::cast_slice(&TRIANGLE_VERTICES)
}

/// GPU-resident copy of [`TRIANGLE_VERTICES`].
///
/// Immutable after upload; dropping it releases the buffer.
pub struct GeometryBuffer {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl GeometryBuffer {
    pub fn upload(ctx: &RenderCtx<'_>) -> Self {
        let buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("spindle triangle vbo"),
            contents: triangle_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            buffer,
            vertex_count: TRIANGLE_VERTICES.len() as u32,
        }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}
