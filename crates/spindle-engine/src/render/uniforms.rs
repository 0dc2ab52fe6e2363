use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::transform::TransformSet;

use super::ctx::RenderCtx;
use super::shader::{ShaderProgram, TRANSFORM_BINDING};

/// CPU mirror of the shader's `Transforms` block.
///
/// Field order matches the WGSL struct: model, view, projection. Matrices are
/// column-major, as both glam and WGSL expect.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl TransformUniform {
    const SIZE: u64 = std::mem::size_of::<TransformUniform>() as u64;

    pub const MIN_BINDING_SIZE: NonZeroU64 = match NonZeroU64::new(Self::SIZE) {
        Some(n) => n,
        None => panic!("TransformUniform is zero-sized"),
    };

    pub fn min_binding_size() -> NonZeroU64 {
        Self::MIN_BINDING_SIZE
    }
}

impl From<&TransformSet> for TransformUniform {
    fn from(t: &TransformSet) -> Self {
        Self {
            model: t.model().to_cols_array_2d(),
            view: t.view().to_cols_array_2d(),
            projection: t.projection().to_cols_array_2d(),
        }
    }
}

/// Uniform description bound alongside the vertex buffer.
///
/// Holds the uniform buffer and bind group that carry the transform matrices;
/// the attribute layout lives on the pipeline (see `Vertex::layout`).
pub struct VertexArray {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl VertexArray {
    pub fn new(ctx: &RenderCtx<'_>, program: &ShaderProgram) -> Self {
        let initial = TransformUniform::from(&TransformSet::default());

        let uniform_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("spindle transform ubo"),
            contents: bytemuck::bytes_of(&initial),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("spindle transform bind group"),
            layout: program.bind_group_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: TRANSFORM_BINDING,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            uniform_buffer,
            bind_group,
        }
    }

    /// Writes all three matrices into the uniform buffer.
    pub fn upload(&self, queue: &wgpu::Queue, transforms: &TransformSet) {
        let u = TransformUniform::from(transforms);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    #[test]
    fn uniform_is_three_mat4() {
        assert_eq!(std::mem::size_of::<TransformUniform>(), 3 * 64);
        assert_eq!(TransformUniform::min_binding_size().get(), 192);
    }

    #[test]
    fn fields_follow_shader_order() {
        let mut t = TransformSet::default();
        t.set_rotation(0.75);
        let u = TransformUniform::from(&t);

        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&u));
        assert_eq!(&floats[0..16], &t.model().to_cols_array());
        assert_eq!(&floats[16..32], &t.view().to_cols_array());
        assert_eq!(&floats[32..48], &t.projection().to_cols_array());
    }

    #[test]
    fn identity_model_uploads_identity() {
        let u = TransformUniform::from(&TransformSet::default());
        assert_eq!(u.model, Mat4::IDENTITY.to_cols_array_2d());
    }
}
