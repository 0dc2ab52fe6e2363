use std::fmt;

use wgpu::naga;

use super::ctx::RenderCtx;
use super::geometry::Vertex;
use super::uniforms::TransformUniform;

/// Vertex stage entry point name.
pub const VERTEX_ENTRY: &str = "vs_main";

/// Fragment stage entry point name.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Bind group slot of the transform uniform block.
pub const TRANSFORM_GROUP: u32 = 0;

/// Binding index of the transform uniform block inside [`TRANSFORM_GROUP`].
pub const TRANSFORM_BINDING: u32 = 0;

/// Pipeline stage a shader source belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failure while turning shader sources into a program.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// A single stage failed to parse or validate.
    Compile { stage: ShaderStage, message: String },
    /// Both stages compiled but do not form a usable program.
    Link { message: String },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Compile { stage, message } => {
                write!(f, "{stage} shader failed to compile: {message}")
            }
            ShaderError::Link { message } => write!(f, "shader program failed to link: {message}"),
        }
    }
}

impl std::error::Error for ShaderError {}

/// WGSL sources for the two pipeline stages.
///
/// Sources are compile-time constants; they are handed to
/// [`ShaderProgram::build`] at startup rather than read from globals.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: &'static str,
    pub fragment: &'static str,
}

impl ShaderSources {
    /// The built-in triangle shaders.
    pub const TRIANGLE: Self = Self {
        vertex: include_str!("shaders/triangle.vert.wgsl"),
        fragment: include_str!("shaders/triangle.frag.wgsl"),
    };

    /// Checks both stages on the CPU, without a device.
    ///
    /// Each stage must parse and validate on its own. The pair must then expose
    /// the expected entry points and the vertex stage must declare the
    /// transform uniform block at the slot the pipeline binds.
    pub fn validate(&self) -> Result<(), ShaderError> {
        let vertex = compile_stage(ShaderStage::Vertex, self.vertex)?;
        let fragment = compile_stage(ShaderStage::Fragment, self.fragment)?;

        require_entry_point(&vertex, VERTEX_ENTRY, naga::ShaderStage::Vertex)?;
        require_entry_point(&fragment, FRAGMENT_ENTRY, naga::ShaderStage::Fragment)?;
        require_transform_uniform(&vertex)?;

        Ok(())
    }
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self::TRIANGLE
    }
}

fn compile_stage(stage: ShaderStage, source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        stage,
        message: e.emit_to_string(source),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .map_err(|e| ShaderError::Compile {
        stage,
        message: e.emit_to_string(source),
    })?;

    Ok(module)
}

fn require_entry_point(
    module: &naga::Module,
    name: &str,
    stage: naga::ShaderStage,
) -> Result<(), ShaderError> {
    let found = module
        .entry_points
        .iter()
        .any(|ep| ep.name == name && ep.stage == stage);

    if found {
        Ok(())
    } else {
        Err(ShaderError::Link {
            message: format!("missing {stage:?} entry point `{name}`"),
        })
    }
}

fn require_transform_uniform(module: &naga::Module) -> Result<(), ShaderError> {
    let expected = std::mem::size_of::<TransformUniform>() as u32;

    let global = module.global_variables.iter().find_map(|(_, var)| {
        let binding = var.binding.as_ref()?;
        (binding.group == TRANSFORM_GROUP && binding.binding == TRANSFORM_BINDING).then_some(var)
    });

    let Some(var) = global else {
        return Err(ShaderError::Link {
            message: format!(
                "vertex stage declares no uniform at @group({TRANSFORM_GROUP}) @binding({TRANSFORM_BINDING})"
            ),
        });
    };

    if var.space != naga::AddressSpace::Uniform {
        return Err(ShaderError::Link {
            message: format!("transform binding is in {:?} space, expected uniform", var.space),
        });
    }

    let size = module.types[var.ty].inner.size(module.to_ctx());
    if size != expected {
        return Err(ShaderError::Link {
            message: format!("transform uniform is {size} bytes, expected {expected}"),
        });
    }

    Ok(())
}

/// Linked render pipeline for the triangle.
///
/// Owns the pipeline and the bind group layout its uniform block uses.
/// Dropping it releases both.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
}

impl ShaderProgram {
    /// Compiles `sources` and links them into a pipeline targeting `ctx.surface_format`.
    ///
    /// Runs [`ShaderSources::validate`] first, then creates the modules and the
    /// pipeline inside wgpu validation error scopes so driver-side rejections
    /// also surface as [`ShaderError`] instead of an uncaptured error.
    pub fn build(ctx: &RenderCtx<'_>, sources: &ShaderSources) -> Result<Self, ShaderError> {
        sources.validate()?;

        let vs = create_module(ctx.device, ShaderStage::Vertex, sources.vertex)?;
        let fs = create_module(ctx.device, ShaderStage::Fragment, sources.fragment)?;

        let link_scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("spindle transform bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: TRANSFORM_BINDING,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(TransformUniform::min_binding_size()),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("spindle triangle pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("spindle triangle pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // The triangle spins through both faces; keep both visible.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(link_scope.pop()) {
            return Err(ShaderError::Link {
                message: err.to_string(),
            });
        }

        log::debug!("triangle pipeline linked for {:?}", ctx.surface_format);

        Ok(Self {
            pipeline,
            bind_group_layout,
            format: ctx.surface_format,
        })
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Color target format the pipeline was linked against.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

fn create_module(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &'static str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "spindle triangle vertex shader",
            ShaderStage::Fragment => "spindle triangle fragment shader",
        }),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match pollster::block_on(scope.pop()) {
        Some(err) => Err(ShaderError::Compile {
            stage,
            message: err.to_string(),
        }),
        None => Ok(module),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT_OK: &str = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";

    #[test]
    fn built_in_sources_validate() {
        assert_eq!(ShaderSources::TRIANGLE.validate(), Ok(()));
    }

    #[test]
    fn syntax_error_is_a_vertex_compile_error() {
        let sources = ShaderSources {
            vertex: "@vertex fn vs_main( -> @builtin(position) vec4<f32> {",
            fragment: FRAGMENT_OK,
        };
        match sources.validate() {
            Err(ShaderError::Compile { stage, .. }) => assert_eq!(stage, ShaderStage::Vertex),
            other => panic!("expected vertex compile error, got {other:?}"),
        }
    }

    #[test]
    fn type_error_is_a_fragment_compile_error() {
        let sources = ShaderSources {
            vertex: ShaderSources::TRIANGLE.vertex,
            fragment: "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1u; }",
        };
        match sources.validate() {
            Err(ShaderError::Compile { stage, .. }) => assert_eq!(stage, ShaderStage::Fragment),
            other => panic!("expected fragment compile error, got {other:?}"),
        }
    }

    #[test]
    fn wrong_entry_point_name_fails_to_link() {
        let sources = ShaderSources {
            vertex: ShaderSources::TRIANGLE.vertex,
            fragment: "@fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }",
        };
        let err = sources.validate().unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }), "{err}");
        assert!(err.to_string().contains("fs_main"));
    }

    #[test]
    fn missing_transform_uniform_fails_to_link() {
        let sources = ShaderSources {
            vertex: "@vertex fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> { return vec4<f32>(p, 1.0); }",
            fragment: FRAGMENT_OK,
        };
        let err = sources.validate().unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }), "{err}");
    }

    #[test]
    fn undersized_transform_uniform_fails_to_link() {
        let sources = ShaderSources {
            vertex: "@group(0) @binding(0) var<uniform> mvp: mat4x4<f32>;
                     @vertex fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
                         return mvp * vec4<f32>(p, 1.0);
                     }",
            fragment: FRAGMENT_OK,
        };
        let err = sources.validate().unwrap_err();
        assert!(err.to_string().contains("64 bytes"), "{err}");
    }

    #[test]
    fn error_messages_name_the_stage() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "fragment shader failed to compile: boom");
    }
}
