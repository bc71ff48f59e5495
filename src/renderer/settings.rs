//! Render Settings
//!
//! Plain configuration consumed by [`GpuContext::new`](crate::GpuContext)
//! at context creation time. All fields have conservative defaults; hosts
//! override only what they need:
//!
//! ```rust,ignore
//! let settings = RenderSettings {
//!     vsync: false,
//!     ..Default::default()
//! };
//! ```

/// Context-level rendering configuration.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Adapter power preference passed to the backend.
    pub power_preference: wgpu::PowerPreference,
    /// Device features requested at creation.
    pub required_features: wgpu::Features,
    /// Device limits requested at creation.
    pub required_limits: wgpu::Limits,
    /// Present with vertical sync (windowed contexts only).
    pub vsync: bool,
    /// Depth buffer format.
    pub depth_format: wgpu::TextureFormat,
    /// Clear color for the frame.
    pub clear_color: wgpu::Color,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::default(),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            vsync: true,
            depth_format: wgpu::TextureFormat::Depth32Float,
            clear_color: wgpu::Color {
                r: 0.05,
                g: 0.05,
                b: 0.05,
                a: 1.0,
            },
        }
    }
}
