//! GPU context, resource wrappers and the per-mesh draw path.
//!
//! - [`GpuContext`]: device/queue owner and resource factory
//! - [`resources`]: `Buffer` / `VertexArray` / `ShaderProgram` wrappers with
//!   an explicit Unallocated → Allocated → Bound → Released lifecycle
//! - [`Mesh`]: CPU geometry coupled with lazily uploaded GPU state
//! - [`MeshRenderer`]: binds one mesh's resources and issues the draw call
//!   under a [`DisplayMode`]

pub mod context;
pub mod mesh;
pub(crate) mod pipeline;
pub mod resources;
pub mod settings;
pub mod uniforms;

pub use context::GpuContext;
pub use mesh::Mesh;
pub use resources::{Buffer, ResourceState, ShaderProgram, VertexArray};
pub use settings::RenderSettings;

use std::sync::Arc;

use glam::Mat4;

use crate::errors::{MeshViewError, Result};
use crate::renderer::pipeline::{PipelineKey, PipelineKind};
use crate::renderer::uniforms::DrawUniforms;
use crate::scene::camera::Camera;

/// Rendering style selector: point cloud, wireframe or filled facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// Vertices as a point cloud.
    Point,
    /// Facet edges as lines.
    Wire,
    /// Filled facets.
    #[default]
    Facet,
}

impl DisplayMode {
    /// Primitive topology this mode draws with.
    #[must_use]
    pub fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            Self::Point => wgpu::PrimitiveTopology::PointList,
            Self::Wire => wgpu::PrimitiveTopology::LineList,
            Self::Facet => wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

impl TryFrom<u32> for DisplayMode {
    type Error = MeshViewError;

    /// Converts a raw host-side mode value; out-of-range values are
    /// rejected.
    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Self::Point),
            1 => Ok(Self::Wire),
            2 => Ok(Self::Facet),
            _ => Err(MeshViewError::InvalidArgument(format!(
                "invalid display mode {value}, expected 0..=2"
            ))),
        }
    }
}

/// Renders one mesh: binds its vertex array and shader program, writes the
/// per-draw uniforms and issues the draw call.
///
/// Several renderers may share one mesh (`Arc`); each renderer owns its own
/// uniform buffer so actors can draw the same mesh with different
/// transforms.
pub struct MeshRenderer {
    mesh: Arc<Mesh>,
    uniform_buffer: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
}

impl MeshRenderer {
    #[must_use]
    pub fn new(mesh: Arc<Mesh>) -> Self {
        Self {
            mesh,
            uniform_buffer: None,
            bind_group: None,
        }
    }

    #[must_use]
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// Uploads the mesh if needed and creates this renderer's uniform
    /// buffer and bind group. Must run before the render pass is encoded.
    pub fn prepare(&mut self, ctx: &GpuContext) -> Result<()> {
        self.mesh.ensure_uploaded(ctx)?;
        if self.bind_group.is_none() {
            let buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
                label: Some("Draw Uniform Buffer"),
                size: std::mem::size_of::<DrawUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Mesh Bind Group"),
                layout: ctx.pipelines().mesh_bind_group_layout(),
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.uniform_buffer = Some(buffer);
            self.bind_group = Some(bind_group);
        }
        Ok(())
    }

    /// Binds the mesh's resources and issues the draw call.
    ///
    /// Fails with `NotReady` when the mesh has not completed
    /// [`Mesh::ensure_uploaded`] or [`MeshRenderer::prepare`] has not run.
    /// A mesh without facets draws nothing in `Wire`/`Facet` mode.
    pub fn draw(
        &mut self,
        ctx: &GpuContext,
        pass: &mut wgpu::RenderPass<'_>,
        camera: &Camera,
        mode: DisplayMode,
        model: Mat4,
    ) -> Result<()> {
        let (Some(uniform_buffer), Some(bind_group)) = (&self.uniform_buffer, &self.bind_group)
        else {
            return Err(MeshViewError::NotReady("mesh renderer not prepared"));
        };

        let uniforms = DrawUniforms {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            model,
        };
        ctx.queue()
            .write_buffer(uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        self.mesh.with_gpu(|gpu| {
            gpu.program.bind()?;
            gpu.vertex_array.bind()?;

            let key = PipelineKey {
                kind: PipelineKind::Mesh(mode),
                program_id: gpu.program.id(),
                color_format: ctx.color_format(),
                depth_format: ctx.depth_format(),
            };
            let layouts = gpu.vertex_array.vertex_layouts();
            let pipeline = ctx
                .pipelines()
                .pipeline_for(ctx.device(), key, &gpu.program, &layouts)?;

            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.set_vertex_buffer(0, gpu.positions.bind()?.slice(..));
            pass.set_vertex_buffer(1, gpu.normals.bind()?.slice(..));
            pass.set_vertex_buffer(2, gpu.colors.bind()?.slice(..));

            match mode {
                DisplayMode::Point => pass.draw(0..gpu.vertex_count, 0..1),
                DisplayMode::Wire => {
                    if gpu.line_index_count > 0 {
                        pass.set_index_buffer(
                            gpu.line_indices.bind()?.slice(..),
                            wgpu::IndexFormat::Uint32,
                        );
                        pass.draw_indexed(0..gpu.line_index_count, 0, 0..1);
                    }
                }
                DisplayMode::Facet => {
                    if gpu.triangle_index_count > 0 {
                        pass.set_index_buffer(
                            gpu.triangle_indices.bind()?.slice(..),
                            wgpu::IndexFormat::Uint32,
                        );
                        pass.draw_indexed(0..gpu.triangle_index_count, 0, 0..1);
                    }
                }
            }
            Ok(())
        })
    }
}
