use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::{MeshViewError, Result};
use crate::renderer::context::ContextHandle;
use crate::renderer::resources::ResourceState;

// Program IDs key the pipeline cache.
static NEXT_PROGRAM_ID: AtomicU64 = AtomicU64::new(1);

/// Wrapper around one compiled shader program.
///
/// Created unlinked by
/// [`GpuContext::create_shader_program`](crate::GpuContext::create_shader_program);
/// [`ShaderProgram::link`] compiles and validates the WGSL module. A failed
/// link leaves the program unallocated, so it can never be bound.
#[derive(Debug)]
pub struct ShaderProgram {
    ctx: ContextHandle,
    id: u64,
    label: String,
    module: Option<wgpu::ShaderModule>,
    vs_entry: String,
    fs_entry: String,
    state: ResourceState,
}

impl ShaderProgram {
    pub(crate) fn new(ctx: ContextHandle, label: &str) -> Self {
        Self {
            ctx,
            id: NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed),
            label: label.to_string(),
            module: None,
            vs_entry: String::new(),
            fs_entry: String::new(),
            state: ResourceState::Unallocated,
        }
    }

    /// Compiles and validates `source`, recording the two stage entry points.
    ///
    /// On failure returns [`MeshViewError::Link`] carrying the backend
    /// diagnostic; the program stays unallocated and must not be bound.
    /// Relinking an already linked program replaces the module.
    pub fn link(&mut self, source: &str, vs_entry: &str, fs_entry: &str) -> Result<()> {
        self.state.ensure_live("shader program")?;
        let shared = self.ctx.upgrade().ok_or(MeshViewError::NoContext)?;

        // Capture validation failures instead of the uncaptured-error hook.
        let error_scope = shared
            .device
            .push_error_scope(wgpu::ErrorFilter::Validation);
        let module = shared
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&self.label),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
            });
        if let Some(err) = pollster::block_on(error_scope.pop()) {
            self.module = None;
            self.state = ResourceState::Unallocated;
            return Err(MeshViewError::Link(err.to_string()));
        }

        self.module = Some(module);
        self.vs_entry = vs_entry.to_string();
        self.fs_entry = fs_entry.to_string();
        self.state = ResourceState::Allocated;
        Ok(())
    }

    /// Marks the program as bound for the current draw.
    ///
    /// Fails with `NotReady` while unlinked and `UseAfterRelease` once
    /// released.
    pub(crate) fn bind(&mut self) -> Result<()> {
        self.state.ensure_live("shader program")?;
        if self.module.is_none() {
            return Err(MeshViewError::NotReady("shader program not linked"));
        }
        self.state = ResourceState::Bound;
        Ok(())
    }

    /// The compiled module, if the program linked successfully.
    pub(crate) fn module(&self) -> Option<&wgpu::ShaderModule> {
        self.module.as_ref()
    }

    /// Releases the compiled module. Safe to call multiple times.
    pub fn release(&mut self) {
        self.module = None;
        self.state = ResourceState::Released;
    }

    #[must_use]
    pub fn state(&self) -> ResourceState {
        self.state
    }

    /// Stable ID used as the pipeline cache key component.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn vs_entry(&self) -> &str {
        &self.vs_entry
    }

    #[must_use]
    pub fn fs_entry(&self) -> &str {
        &self.fs_entry
    }
}
