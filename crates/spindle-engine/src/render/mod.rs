//! GPU side of the triangle: shader program, geometry, uniforms, and the
//! wgpu implementation of the frame loop's backend.
//!
//! Convention:
//! - geometry is in object space, transformed by model/view/projection in the vertex shader
//! - one pipeline, one vertex buffer, one uniform block at @group(0) @binding(0)

mod backend;
mod ctx;
mod geometry;
mod scene;
mod shader;
mod uniforms;

pub use backend::WgpuFrameBackend;
pub use ctx::RenderCtx;
pub use geometry::{triangle_bytes, GeometryBuffer, Vertex, TRIANGLE_VERTICES};
pub use scene::TriangleScene;
pub use shader::{
    ShaderError, ShaderProgram, ShaderSources, ShaderStage, FRAGMENT_ENTRY, TRANSFORM_BINDING,
    TRANSFORM_GROUP, VERTEX_ENTRY,
};
pub use uniforms::{TransformUniform, VertexArray};
