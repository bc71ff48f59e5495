use crate::errors::{MeshViewError, Result};
use crate::renderer::context::ContextHandle;
use crate::renderer::resources::ResourceState;

/// One vertex buffer slot: stride plus its attributes.
#[derive(Debug, Clone, Default)]
struct VertexSlot {
    stride: u64,
    attributes: Vec<wgpu::VertexAttribute>,
}

/// Wrapper describing the vertex attribute layout of a mesh.
///
/// The wgpu analog of a vertex array object: it records which shader
/// attribute location reads from which buffer slot, at which offset and
/// stride. The recorded layout is turned into
/// [`wgpu::VertexBufferLayout`]s at pipeline creation; the buffers
/// themselves are bound by the owner at draw time, slot by slot.
#[derive(Debug)]
pub struct VertexArray {
    ctx: ContextHandle,
    slots: Vec<VertexSlot>,
    state: ResourceState,
}

impl VertexArray {
    pub(crate) fn new(ctx: ContextHandle) -> Self {
        Self {
            ctx,
            slots: Vec::new(),
            state: ResourceState::Unallocated,
        }
    }

    /// Associates a shader attribute location with a buffer slot's layout.
    ///
    /// Fails with [`MeshViewError::InvalidAttribute`] when `shader_location`
    /// exceeds the device's supported attribute range.
    pub fn bind_attribute(
        &mut self,
        shader_location: u32,
        slot: usize,
        format: wgpu::VertexFormat,
        offset: u64,
        stride: u64,
    ) -> Result<()> {
        self.state.ensure_live("vertex array")?;
        let shared = self.ctx.upgrade().ok_or(MeshViewError::NoContext)?;
        let max = shared.limits.max_vertex_attributes;
        if shader_location >= max {
            return Err(MeshViewError::InvalidAttribute {
                slot: shader_location,
                max: max.saturating_sub(1),
            });
        }

        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, VertexSlot::default);
        }
        let entry = &mut self.slots[slot];
        entry.stride = stride;
        entry.attributes.push(wgpu::VertexAttribute {
            format,
            offset,
            shader_location,
        });
        self.state = ResourceState::Allocated;
        Ok(())
    }

    /// Vertex buffer layouts for pipeline creation, one per slot.
    pub(crate) fn vertex_layouts(&self) -> Vec<wgpu::VertexBufferLayout<'_>> {
        self.slots
            .iter()
            .map(|s| wgpu::VertexBufferLayout {
                array_stride: s.stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &s.attributes,
            })
            .collect()
    }

    /// Marks the layout as bound for the current draw.
    ///
    /// Fails with `NotReady` while no attribute has been bound and with
    /// `UseAfterRelease` once released.
    pub(crate) fn bind(&mut self) -> Result<()> {
        self.state.ensure_live("vertex array")?;
        if self.slots.is_empty() {
            return Err(MeshViewError::NotReady("vertex array has no attributes"));
        }
        self.state = ResourceState::Bound;
        Ok(())
    }

    /// Releases the recorded layout. Safe to call multiple times.
    pub fn release(&mut self) {
        self.slots.clear();
        self.state = ResourceState::Released;
    }

    #[must_use]
    pub fn state(&self) -> ResourceState {
        self.state
    }

    /// Number of vertex buffer slots in the layout.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Total number of bound attributes across all slots.
    #[must_use]
    pub fn attribute_count(&self) -> usize {
        self.slots.iter().map(|s| s.attributes.len()).sum()
    }
}
