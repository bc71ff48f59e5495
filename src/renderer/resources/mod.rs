//! GPU resource wrappers.
//!
//! [`Buffer`], [`VertexArray`] and [`ShaderProgram`] each own one GPU-side
//! object and follow the same lifecycle state machine:
//!
//! ```text
//! Unallocated → Allocated → Bound → Released
//! ```
//!
//! `Released` is terminal; operations on a released resource fail with
//! [`MeshViewError::UseAfterRelease`](crate::MeshViewError::UseAfterRelease),
//! and `release()` itself is an idempotent no-op after the first call.
//! Wrappers are constructed through the [`GpuContext`](crate::GpuContext)
//! factory and keep a weak back-reference to it; operations after the
//! context is gone fail with
//! [`MeshViewError::NoContext`](crate::MeshViewError::NoContext).

pub mod buffer;
pub mod shader;
pub mod vertex_array;

pub use buffer::Buffer;
pub use shader::ShaderProgram;
pub use vertex_array::VertexArray;

use crate::errors::{MeshViewError, Result};

/// Lifecycle state shared by all GPU resource wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// Created but no GPU-side object exists yet.
    Unallocated,
    /// The GPU-side object exists and is usable.
    Allocated,
    /// The resource has been bound for drawing at least once.
    Bound,
    /// The GPU-side object has been released. Terminal.
    Released,
}

impl ResourceState {
    /// Returns `true` while the GPU-side object exists.
    #[must_use]
    pub fn is_allocated(self) -> bool {
        matches!(self, Self::Allocated | Self::Bound)
    }

    /// Fails with `UseAfterRelease` once the resource has been released.
    pub(crate) fn ensure_live(self, what: &'static str) -> Result<()> {
        if self == Self::Released {
            return Err(MeshViewError::UseAfterRelease(what));
        }
        Ok(())
    }
}

/// Byte offset of attribute element `index` within a buffer of the given
/// stride, starting at `base`.
#[inline]
#[must_use]
pub fn attribute_byte_offset(index: u32, stride: u64, base: u64) -> u64 {
    base + u64::from(index) * stride
}
