//! Error Types
//!
//! This module defines the error types used throughout the library.
//!
//! # Overview
//!
//! The main error type [`MeshViewError`] covers all failure modes including:
//! - Geometry validation failures
//! - GPU context and resource lifecycle errors
//! - Shader program link failures
//! - Invalid API arguments
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, MeshViewError>`.
//!
//! ```rust,ignore
//! use meshview::errors::{MeshViewError, Result};
//!
//! fn upload_mesh() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the meshview library.
///
/// This enum covers all possible error conditions that can occur
/// during library operation. Each variant provides specific context
/// about what went wrong.
#[derive(Error, Debug)]
pub enum MeshViewError {
    // ========================================================================
    // Geometry Validation Errors
    // ========================================================================
    /// The geometry has no vertices.
    #[error("Geometry has no vertices")]
    EmptyGeometry,

    /// A vertex attribute list does not match the vertex list length.
    #[error("Attribute length mismatch: {attribute} has {actual} entries, expected {expected}")]
    AttributeLengthMismatch {
        /// Name of the offending attribute
        attribute: &'static str,
        /// Number of entries in the attribute list
        actual: usize,
        /// Expected number of entries (the vertex count)
        expected: usize,
    },

    /// A facet references a vertex index outside the vertex list.
    #[error("Facet index out of bounds: index {index} >= vertex count {vertex_count}")]
    FacetIndexOutOfBounds {
        /// The invalid index
        index: u32,
        /// Number of vertices in the geometry
        vertex_count: usize,
    },

    // ========================================================================
    // GPU Context Errors
    // ========================================================================
    /// Failed to request a compatible GPU adapter.
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// A GPU operation was attempted without a live rendering context.
    #[error("No rendering context: the owning GpuContext has been dropped")]
    NoContext,

    // ========================================================================
    // GPU Resource Lifecycle Errors
    // ========================================================================
    /// A GPU resource could not be created or populated.
    #[error("Resource creation failed: {0}")]
    ResourceCreation(String),

    /// A vertex attribute slot is outside the supported range.
    #[error("Invalid attribute slot {slot}: maximum is {max}")]
    InvalidAttribute {
        /// The requested attribute slot
        slot: u32,
        /// Highest supported slot
        max: u32,
    },

    /// A shader program failed to link.
    #[error("Shader program link failed: {0}")]
    Link(String),

    /// An operation was attempted on a released GPU resource.
    #[error("Use after release: {0}")]
    UseAfterRelease(&'static str),

    /// A draw was attempted before the required GPU resources were uploaded.
    #[error("Not ready: {0}")]
    NotReady(&'static str),

    // ========================================================================
    // Argument Errors
    // ========================================================================
    /// An API argument was outside its valid range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ========================================================================
    // Platform-Specific Errors
    // ========================================================================
    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    /// Window system error.
    #[error("Window system error: {0}")]
    WindowError(#[from] raw_window_handle::HandleError),
}

/// Alias for `Result<T, MeshViewError>`.
pub type Result<T> = std::result::Result<T, MeshViewError>;
