//! Mesh: CPU geometry coupled with its GPU-side resources.
//!
//! A [`Mesh`] owns one [`Geometry`] plus the GPU resource wrappers derived
//! from it, created lazily on the first [`Mesh::ensure_uploaded`] call.
//! Meshes are shared via `Arc`; several actors and renderers may reference
//! the same mesh; GPU memory is freed when the last owner drops it, or
//! eagerly via [`Mesh::invalidate`].
//!
//! # Upload protocol
//!
//! The geometry's data version is recorded at upload. `ensure_uploaded`
//! re-uploads exactly when the recorded version differs from the current
//! one, so geometry edits propagate on the next frame without manual dirty
//! flags, and repeated calls are no-ops.

use std::sync::{Arc, RwLock, RwLockReadGuard};

use glam::Vec4;

use crate::errors::{MeshViewError, Result};
use crate::renderer::GpuContext;
use crate::renderer::resources::{Buffer, ShaderProgram, VertexArray};
use crate::resources::geometry::Geometry;

const MESH_SHADER: &str = include_str!("shaders/mesh.wgsl");

/// GPU-side state of a mesh: one buffer per vertex attribute, index
/// buffers for facet and edge rendering, the attribute layout and the
/// shader program.
pub(crate) struct MeshGpu {
    pub positions: Buffer,
    pub normals: Buffer,
    pub colors: Buffer,
    pub triangle_indices: Buffer,
    pub line_indices: Buffer,
    pub vertex_array: VertexArray,
    pub program: ShaderProgram,
    pub vertex_count: u32,
    pub triangle_index_count: u32,
    pub line_index_count: u32,
    pub uploaded_version: u64,
}

impl MeshGpu {
    fn new(ctx: &GpuContext, name: &str) -> Self {
        Self {
            positions: ctx.create_buffer(
                wgpu::BufferUsages::VERTEX,
                &format!("{name} Position Buffer"),
            ),
            normals: ctx.create_buffer(
                wgpu::BufferUsages::VERTEX,
                &format!("{name} Normal Buffer"),
            ),
            colors: ctx
                .create_buffer(wgpu::BufferUsages::VERTEX, &format!("{name} Color Buffer")),
            triangle_indices: ctx.create_buffer(
                wgpu::BufferUsages::INDEX,
                &format!("{name} Triangle Index Buffer"),
            ),
            line_indices: ctx.create_buffer(
                wgpu::BufferUsages::INDEX,
                &format!("{name} Line Index Buffer"),
            ),
            vertex_array: ctx.create_vertex_array(),
            program: ctx.create_shader_program(&format!("{name} Shader")),
            vertex_count: 0,
            triangle_index_count: 0,
            line_index_count: 0,
            uploaded_version: 0,
        }
    }

    /// Uploads the geometry's attribute and index data into the wrappers.
    ///
    /// Absent normals are computed area-weighted from the facets; absent
    /// colors default to opaque white.
    fn upload(&mut self, geometry: &Geometry) -> Result<()> {
        self.positions
            .upload(bytemuck::cast_slice(geometry.vertices()))?;

        if geometry.has_normals() {
            self.normals
                .upload(bytemuck::cast_slice(geometry.normals()))?;
        } else {
            let computed = geometry.computed_normals();
            self.normals.upload(bytemuck::cast_slice(&computed))?;
        }

        if geometry.has_colors() {
            self.colors
                .upload(bytemuck::cast_slice(geometry.colors()))?;
        } else {
            let white = vec![Vec4::ONE; geometry.vertex_count()];
            self.colors.upload(bytemuck::cast_slice(&white))?;
        }

        let triangles = geometry.triangulated_indices();
        if !triangles.is_empty() {
            self.triangle_indices
                .upload(bytemuck::cast_slice(&triangles))?;
        }
        self.triangle_index_count = triangles.len() as u32;

        let lines = geometry.line_indices();
        if !lines.is_empty() {
            self.line_indices.upload(bytemuck::cast_slice(&lines))?;
        }
        self.line_index_count = lines.len() as u32;

        self.vertex_count = geometry.vertex_count() as u32;

        if self.vertex_array.attribute_count() == 0 {
            // position / normal / color, one planar buffer slot each
            self.vertex_array
                .bind_attribute(0, 0, wgpu::VertexFormat::Float32x3, 0, 12)?;
            self.vertex_array
                .bind_attribute(1, 1, wgpu::VertexFormat::Float32x3, 0, 12)?;
            self.vertex_array
                .bind_attribute(2, 2, wgpu::VertexFormat::Float32x4, 0, 16)?;
        }

        if self.program.module().is_none() {
            self.program.link(MESH_SHADER, "vs_main", "fs_main")?;
        }

        self.uploaded_version = geometry.data_version();
        Ok(())
    }

    fn release(&mut self) {
        self.positions.release();
        self.normals.release();
        self.colors.release();
        self.triangle_indices.release();
        self.line_indices.release();
        self.vertex_array.release();
        self.program.release();
    }
}

/// A drawable unit of geometry: CPU data plus lazily uploaded GPU state.
pub struct Mesh {
    name: String,
    geometry: RwLock<Geometry>,
    gpu: RwLock<Option<MeshGpu>>,
}

impl Mesh {
    /// Creates a shared mesh from validated geometry.
    ///
    /// Validation (non-empty vertices, matching attribute lengths, in-range
    /// facet indices) runs here, before any GPU upload is attempted.
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Result<Arc<Self>> {
        geometry.validate()?;
        Ok(Arc::new(Self {
            name: name.into(),
            geometry: RwLock::new(geometry),
            gpu: RwLock::new(None),
        }))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read access to the geometry.
    pub fn geometry(&self) -> RwLockReadGuard<'_, Geometry> {
        self.geometry.read().unwrap()
    }

    /// Edits the geometry atomically.
    ///
    /// The edit is applied to a copy and validated; on failure the mesh
    /// keeps its previous geometry. A successful edit bumps the data
    /// version, so the next `ensure_uploaded` re-uploads.
    pub fn update_geometry(&self, edit: impl FnOnce(&mut Geometry)) -> Result<()> {
        let mut copy = self.geometry.read().unwrap().clone();
        edit(&mut copy);
        copy.validate()?;
        *self.geometry.write().unwrap() = copy;
        Ok(())
    }

    /// Creates and fills the GPU resources on first call; afterwards a
    /// no-op unless the geometry version advanced.
    pub fn ensure_uploaded(&self, ctx: &GpuContext) -> Result<()> {
        let geometry = self.geometry.read().unwrap();
        let mut gpu = self.gpu.write().unwrap();
        match gpu.as_mut() {
            Some(state) if state.uploaded_version == geometry.data_version() => Ok(()),
            Some(state) => state.upload(&geometry),
            None => {
                let mut state = MeshGpu::new(ctx, &self.name);
                state.upload(&geometry)?;
                *gpu = Some(state);
                Ok(())
            }
        }
    }

    /// Releases the GPU resources, keeping the geometry.
    ///
    /// The next `ensure_uploaded` re-creates and re-fills them.
    pub fn invalidate(&self) {
        if let Some(mut state) = self.gpu.write().unwrap().take() {
            state.release();
        }
    }

    /// Returns `true` while the GPU resources are allocated.
    #[must_use]
    pub fn is_uploaded(&self) -> bool {
        self.gpu
            .read()
            .unwrap()
            .as_ref()
            .is_some_and(|state| state.positions.state().is_allocated())
    }

    /// Runs `f` against the GPU state, failing with `NotReady` when the
    /// mesh has not been uploaded.
    pub(crate) fn with_gpu<R>(&self, f: impl FnOnce(&mut MeshGpu) -> Result<R>) -> Result<R> {
        match self.gpu.write().unwrap().as_mut() {
            Some(state) => f(state),
            None => Err(MeshViewError::NotReady("mesh GPU resources not uploaded")),
        }
    }
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("name", &self.name)
            .field("uploaded", &self.is_uploaded())
            .finish()
    }
}
