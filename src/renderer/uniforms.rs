//! POD uniform structs uploaded per draw.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Per-draw uniforms for mesh rendering: the camera's view and projection
/// matrices plus the actor's model matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct DrawUniforms {
    pub view: Mat4,
    pub projection: Mat4,
    pub model: Mat4,
}

/// Uniforms for the full-screen background gradient.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct BackgroundUniforms {
    pub top_color: Vec4,
    pub bottom_color: Vec4,
}
