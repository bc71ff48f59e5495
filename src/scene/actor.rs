//! Scene actors.
//!
//! An [`Actor`] is a drawable scene entity with a per-frame `update` and a
//! `render` that binds its own resources. The three concrete variants are
//! [`MeshActor`] (a mesh with a transform), [`SphereActor`] (a generated
//! sphere with a slow idle spin) and [`BkgActor`] (full-screen background
//! gradient). Dispatch is by trait object; no downcasting.

use std::sync::Arc;

use glam::{Quat, Vec4};

use crate::errors::{MeshViewError, Result};
use crate::renderer::pipeline::{PipelineKey, PipelineKind};
use crate::renderer::resources::ShaderProgram;
use crate::renderer::uniforms::BackgroundUniforms;
use crate::renderer::{DisplayMode, GpuContext, Mesh, MeshRenderer};
use crate::resources::primitives::{SphereOptions, create_sphere};
use crate::scene::camera::Camera;
use crate::scene::transform::Transform;

const BACKGROUND_SHADER: &str = include_str!("../renderer/shaders/background.wgsl");

/// Capability interface implemented by every scene actor.
pub trait Actor {
    /// Creates or refreshes GPU-side state. Runs before the render pass is
    /// encoded; the default does nothing.
    fn prepare(&mut self, _ctx: &GpuContext) -> Result<()> {
        Ok(())
    }

    /// Advances per-actor animation state. The default does nothing.
    fn update(&mut self, _dt: f32) {}

    /// Binds the actor's resources into `pass` and issues its draw calls.
    fn render(
        &mut self,
        ctx: &GpuContext,
        pass: &mut wgpu::RenderPass<'_>,
        camera: &Camera,
    ) -> Result<()>;

    fn set_display_mode(&mut self, mode: DisplayMode);

    fn display_mode(&self) -> DisplayMode;
}

// ============================================================================
// MeshActor
// ============================================================================

/// A mesh drawn with a world transform and a display mode.
pub struct MeshActor {
    renderer: MeshRenderer,
    transform: Transform,
    mode: DisplayMode,
}

impl MeshActor {
    #[must_use]
    pub fn new(mesh: Arc<Mesh>) -> Self {
        Self {
            renderer: MeshRenderer::new(mesh),
            transform: Transform::new(),
            mode: DisplayMode::default(),
        }
    }

    #[must_use]
    pub fn mesh(&self) -> &Arc<Mesh> {
        self.renderer.mesh()
    }

    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
}

impl Actor for MeshActor {
    fn prepare(&mut self, ctx: &GpuContext) -> Result<()> {
        self.renderer.prepare(ctx)
    }

    fn render(
        &mut self,
        ctx: &GpuContext,
        pass: &mut wgpu::RenderPass<'_>,
        camera: &Camera,
    ) -> Result<()> {
        self.transform.update_matrix();
        self.renderer.draw(
            ctx,
            pass,
            camera,
            self.mode,
            self.transform.matrix_as_mat4(),
        )
    }

    fn set_display_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    fn display_mode(&self) -> DisplayMode {
        self.mode
    }
}

// ============================================================================
// SphereActor
// ============================================================================

/// A generated UV sphere with a slow idle spin around the Y axis.
pub struct SphereActor {
    inner: MeshActor,
    /// Spin speed in radians per second.
    pub spin_speed: f32,
    angle: f32,
}

impl SphereActor {
    /// Creates a sphere actor with the default segment counts.
    pub fn new(radius: f32) -> Result<Self> {
        if radius <= 0.0 {
            return Err(MeshViewError::InvalidArgument(format!(
                "sphere radius must be positive, got {radius}"
            )));
        }
        let geometry = create_sphere(SphereOptions {
            radius,
            ..Default::default()
        });
        let mesh = Mesh::new("Sphere", geometry)?;
        Ok(Self {
            inner: MeshActor::new(mesh),
            spin_speed: 0.5,
            angle: 0.0,
        })
    }

    #[must_use]
    pub fn transform(&self) -> &Transform {
        self.inner.transform()
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        self.inner.transform_mut()
    }

    /// Accumulated spin angle in radians.
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.angle
    }
}

impl Actor for SphereActor {
    fn prepare(&mut self, ctx: &GpuContext) -> Result<()> {
        self.inner.prepare(ctx)
    }

    fn update(&mut self, dt: f32) {
        self.angle += self.spin_speed * dt;
        self.inner.transform_mut().rotation = Quat::from_rotation_y(self.angle);
    }

    fn render(
        &mut self,
        ctx: &GpuContext,
        pass: &mut wgpu::RenderPass<'_>,
        camera: &Camera,
    ) -> Result<()> {
        self.inner.render(ctx, pass, camera)
    }

    fn set_display_mode(&mut self, mode: DisplayMode) {
        self.inner.set_display_mode(mode);
    }

    fn display_mode(&self) -> DisplayMode {
        self.inner.display_mode()
    }
}

// ============================================================================
// BkgActor
// ============================================================================

/// Full-screen background gradient.
///
/// Renders before the scene with depth writes off and `Always` depth
/// compare, ignoring the camera's view transform entirely.
pub struct BkgActor {
    top_color: Vec4,
    bottom_color: Vec4,
    mode: DisplayMode,
    program: Option<ShaderProgram>,
    uniform_buffer: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
    colors_dirty: bool,
}

impl BkgActor {
    /// Dark blue-grey gradient, matching common 3D viewer conventions.
    #[must_use]
    pub fn new() -> Self {
        Self::with_colors(
            Vec4::new(0.10, 0.12, 0.20, 1.0),
            Vec4::new(0.02, 0.02, 0.04, 1.0),
        )
    }

    #[must_use]
    pub fn with_colors(top: Vec4, bottom: Vec4) -> Self {
        Self {
            top_color: top,
            bottom_color: bottom,
            mode: DisplayMode::default(),
            program: None,
            uniform_buffer: None,
            bind_group: None,
            colors_dirty: true,
        }
    }

    pub fn set_colors(&mut self, top: Vec4, bottom: Vec4) {
        self.top_color = top;
        self.bottom_color = bottom;
        self.colors_dirty = true;
    }

    fn uniforms(&self) -> BackgroundUniforms {
        BackgroundUniforms {
            top_color: self.top_color,
            bottom_color: self.bottom_color,
        }
    }
}

impl Default for BkgActor {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for BkgActor {
    fn prepare(&mut self, ctx: &GpuContext) -> Result<()> {
        if self.program.is_none() {
            let mut program = ctx.create_shader_program("Background Shader");
            program.link(BACKGROUND_SHADER, "vs_main", "fs_main")?;
            self.program = Some(program);
        }
        if self.bind_group.is_none() {
            let buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
                label: Some("Background Uniform Buffer"),
                size: std::mem::size_of::<BackgroundUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Background Bind Group"),
                layout: ctx.pipelines().background_bind_group_layout(),
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.uniform_buffer = Some(buffer);
            self.bind_group = Some(bind_group);
            self.colors_dirty = true;
        }
        if self.colors_dirty
            && let Some(buffer) = &self.uniform_buffer
        {
            ctx.queue()
                .write_buffer(buffer, 0, bytemuck::bytes_of(&self.uniforms()));
            self.colors_dirty = false;
        }
        Ok(())
    }

    fn render(
        &mut self,
        ctx: &GpuContext,
        pass: &mut wgpu::RenderPass<'_>,
        _camera: &Camera,
    ) -> Result<()> {
        let (Some(program), Some(bind_group)) = (&mut self.program, &self.bind_group) else {
            return Err(MeshViewError::NotReady("background actor not prepared"));
        };
        program.bind()?;

        let key = PipelineKey {
            kind: PipelineKind::Background,
            program_id: program.id(),
            color_format: ctx.color_format(),
            depth_format: ctx.depth_format(),
        };
        let pipeline = ctx
            .pipelines()
            .pipeline_for(ctx.device(), key, program, &[])?;

        pass.set_pipeline(&pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        // Fullscreen triangle, no vertex buffers
        pass.draw(0..3, 0..1);
        Ok(())
    }

    fn set_display_mode(&mut self, mode: DisplayMode) {
        // Stored for API uniformity; the background ignores it.
        self.mode = mode;
    }

    fn display_mode(&self) -> DisplayMode {
        self.mode
    }
}
