use crate::core::SceneHandles;

use super::ctx::RenderCtx;
use super::geometry::GeometryBuffer;
use super::shader::{ShaderError, ShaderProgram, ShaderSources};
use super::uniforms::VertexArray;

/// The three GPU objects the triangle needs.
pub type TriangleScene = SceneHandles<GeometryBuffer, VertexArray, ShaderProgram>;

impl SceneHandles<GeometryBuffer, VertexArray, ShaderProgram> {
    /// Builds the program, uploads the triangle and describes its bindings.
    ///
    /// The program is built first; if it fails nothing else is allocated.
    pub fn build(ctx: &RenderCtx<'_>, sources: &ShaderSources) -> Result<Self, ShaderError> {
        let program = ShaderProgram::build(ctx, sources)?;
        let geometry = GeometryBuffer::upload(ctx);
        let vertex_array = VertexArray::new(ctx, &program);

        log::info!(
            "triangle scene ready ({} vertices, {:?})",
            geometry.vertex_count(),
            program.format()
        );

        Ok(Self {
            geometry,
            vertex_array,
            program,
        })
    }
}
