use wgpu::util::DeviceExt;

use crate::errors::{MeshViewError, Result};
use crate::renderer::context::ContextHandle;
use crate::renderer::resources::ResourceState;

/// Wrapper around one GPU buffer.
///
/// Created unallocated by
/// [`GpuContext::create_buffer`](crate::GpuContext::create_buffer);
/// [`Buffer::upload`] allocates (or reallocates) the GPU-side storage.
/// Re-uploading data of the same size reuses the existing allocation;
/// a different size reallocates.
#[derive(Debug)]
pub struct Buffer {
    ctx: ContextHandle,
    label: String,
    usage: wgpu::BufferUsages,
    raw: Option<wgpu::Buffer>,
    size: u64,
    state: ResourceState,
}

impl Buffer {
    pub(crate) fn new(ctx: ContextHandle, usage: wgpu::BufferUsages, label: &str) -> Self {
        Self {
            ctx,
            label: label.to_string(),
            usage,
            raw: None,
            size: 0,
            state: ResourceState::Unallocated,
        }
    }

    /// Uploads `bytes` to the GPU, allocating storage on first use.
    ///
    /// Fails with [`MeshViewError::ResourceCreation`] for zero-length data
    /// and with `UseAfterRelease` / `NoContext` per the lifecycle rules.
    /// Idempotent with respect to allocation: a same-size re-upload writes
    /// into the existing buffer, a different size reallocates.
    pub fn upload(&mut self, bytes: &[u8]) -> Result<()> {
        self.state.ensure_live("buffer")?;
        if bytes.is_empty() {
            return Err(MeshViewError::ResourceCreation(format!(
                "cannot upload zero-length data to buffer {:?}",
                self.label
            )));
        }
        let shared = self.ctx.upgrade().ok_or(MeshViewError::NoContext)?;
        let len = bytes.len() as u64;

        match &self.raw {
            // Same size and 4-byte aligned: reuse the allocation.
            Some(raw) if self.size == len && len % wgpu::COPY_BUFFER_ALIGNMENT == 0 => {
                shared.queue.write_buffer(raw, 0, bytes);
            }
            _ => {
                if self.raw.take().is_some() {
                    log::debug!(
                        "Resizing buffer {:?} from {} to {}",
                        self.label,
                        self.size,
                        len
                    );
                }
                let raw = shared
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&self.label),
                        contents: bytes,
                        usage: self.usage,
                    });
                self.raw = Some(raw);
            }
        }
        self.size = len;
        self.state = ResourceState::Allocated;
        Ok(())
    }

    /// Returns the raw buffer for binding, marking the wrapper `Bound`.
    ///
    /// Fails with `NotReady` before the first upload and with
    /// `UseAfterRelease` once released.
    pub(crate) fn bind(&mut self) -> Result<&wgpu::Buffer> {
        self.state.ensure_live("buffer")?;
        match &self.raw {
            Some(raw) => {
                self.state = ResourceState::Bound;
                Ok(raw)
            }
            None => Err(MeshViewError::NotReady("buffer has no uploaded data")),
        }
    }

    /// Releases the GPU-side storage. Safe to call multiple times.
    pub fn release(&mut self) {
        self.raw = None;
        self.size = 0;
        self.state = ResourceState::Released;
    }

    #[must_use]
    pub fn state(&self) -> ResourceState {
        self.state
    }

    /// Size in bytes of the uploaded data.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub fn usage(&self) -> wgpu::BufferUsages {
        self.usage
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}
