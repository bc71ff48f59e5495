//! Render pipeline cache.
//!
//! Pipelines are derived objects: a shader program combined with a vertex
//! layout, a primitive topology (per display mode) and the target formats.
//! They are created lazily and cached by [`PipelineKey`], so switching
//! display modes or sharing a program across meshes never recompiles.

use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;

use crate::errors::{MeshViewError, Result};
use crate::renderer::DisplayMode;
use crate::renderer::resources::ShaderProgram;

/// What kind of pipeline a key describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PipelineKind {
    /// Mesh rendering under a display mode (selects the topology).
    Mesh(DisplayMode),
    /// Full-screen background (no vertex buffers, no depth write).
    Background,
}

/// Cache key: kind + program identity + target formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PipelineKey {
    pub kind: PipelineKind,
    pub program_id: u64,
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
}

pub(crate) struct PipelineCache {
    mesh_bind_group_layout: wgpu::BindGroupLayout,
    background_bind_group_layout: wgpu::BindGroupLayout,
    mesh_pipeline_layout: wgpu::PipelineLayout,
    background_pipeline_layout: wgpu::PipelineLayout,
    cache: RwLock<FxHashMap<PipelineKey, Arc<wgpu::RenderPipeline>>>,
}

impl PipelineCache {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_entry = wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let mesh_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Mesh Bind Group Layout"),
                entries: &[uniform_entry],
            });
        let background_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Background Bind Group Layout"),
                entries: &[uniform_entry],
            });
        let mesh_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Mesh Pipeline Layout"),
                bind_group_layouts: &[Some(&mesh_bind_group_layout)],
                immediate_size: 0,
            });
        let background_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Background Pipeline Layout"),
                bind_group_layouts: &[Some(&background_bind_group_layout)],
                immediate_size: 0,
            });
        Self {
            mesh_bind_group_layout,
            background_bind_group_layout,
            mesh_pipeline_layout,
            background_pipeline_layout,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn mesh_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.mesh_bind_group_layout
    }

    pub fn background_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.background_bind_group_layout
    }

    /// Fetches or builds the pipeline for `key`.
    ///
    /// The program must be linked; `vertex_layouts` comes from the mesh's
    /// vertex array (empty for background pipelines).
    pub fn pipeline_for(
        &self,
        device: &wgpu::Device,
        key: PipelineKey,
        program: &ShaderProgram,
        vertex_layouts: &[wgpu::VertexBufferLayout<'_>],
    ) -> Result<Arc<wgpu::RenderPipeline>> {
        if let Some(pipeline) = self.cache.read().unwrap().get(&key) {
            return Ok(pipeline.clone());
        }

        let module = program
            .module()
            .ok_or(MeshViewError::NotReady("shader program not linked"))?;

        let (layout, topology, depth_write_enabled, depth_compare) = match key.kind {
            PipelineKind::Mesh(mode) => (
                &self.mesh_pipeline_layout,
                mode.topology(),
                true,
                wgpu::CompareFunction::Less,
            ),
            PipelineKind::Background => (
                &self.background_pipeline_layout,
                wgpu::PrimitiveTopology::TriangleList,
                false,
                wgpu::CompareFunction::Always,
            ),
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(program.label()),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module,
                entry_point: Some(program.vs_entry()),
                buffers: vertex_layouts,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: Some(program.fs_entry()),
                targets: &[Some(wgpu::ColorTargetState {
                    format: key.color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: key.depth_format,
                depth_write_enabled: Some(depth_write_enabled),
                depth_compare: Some(depth_compare),
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let pipeline = Arc::new(pipeline);
        self.cache
            .write()
            .unwrap()
            .insert(key, pipeline.clone());
        Ok(pipeline)
    }
}
