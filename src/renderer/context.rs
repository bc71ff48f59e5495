//! GPU Context
//!
//! The [`GpuContext`] holds the core GPU handles (device, queue, optional
//! window surface) and acts as the factory for every GPU resource wrapper.
//! There is one context per process; all wrapper operations must run on the
//! thread that owns it.
//!
//! # Resource factory
//!
//! Wrappers are never constructed directly. [`GpuContext::create_buffer`],
//! [`GpuContext::create_vertex_array`] and
//! [`GpuContext::create_shader_program`] hand out wrappers that carry a weak
//! back-reference to the context; once the context is dropped, any further
//! operation on a surviving wrapper fails with
//! [`MeshViewError::NoContext`](crate::MeshViewError::NoContext).

use std::sync::{Arc, Weak};

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::errors::{MeshViewError, Result};
use crate::renderer::pipeline::PipelineCache;
use crate::renderer::resources::{Buffer, ShaderProgram, VertexArray};
use crate::renderer::settings::RenderSettings;

/// Shared device state referenced weakly by every resource wrapper.
pub(crate) struct ContextShared {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub limits: wgpu::Limits,
}

/// Weak back-reference from a wrapper to its owning context.
pub(crate) type ContextHandle = Weak<ContextShared>;

/// Core GPU context holding device, queue and optional surface.
///
/// Construct with [`GpuContext::new`] for a windowed context or
/// [`GpuContext::new_headless`] for offscreen rendering and tests.
pub struct GpuContext {
    shared: Arc<ContextShared>,
    surface: Option<wgpu::Surface<'static>>,
    config: Option<wgpu::SurfaceConfiguration>,
    depth_format: wgpu::TextureFormat,
    depth_texture_view: Option<wgpu::TextureView>,
    clear_color: wgpu::Color,
    pipelines: PipelineCache,
}

impl GpuContext {
    /// Creates a windowed context presenting to `window`.
    pub async fn new<W>(
        window: W,
        settings: &RenderSettings,
        width: u32,
        height: u32,
    ) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(|e| MeshViewError::AdapterRequestFailed(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: settings.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| MeshViewError::AdapterRequestFailed(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: settings.required_features,
                required_limits: settings.required_limits.clone(),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await?;

        let mut config = surface
            .get_default_config(&adapter, width, height)
            .ok_or_else(|| {
                MeshViewError::AdapterRequestFailed("Surface not supported by adapter".to_string())
            })?;

        config.present_mode = if settings.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&device, &config);

        let depth_texture_view = Self::create_depth_texture(
            &device,
            config.width,
            config.height,
            settings.depth_format,
        );
        let pipelines = PipelineCache::new(&device);
        let limits = device.limits();

        Ok(Self {
            shared: Arc::new(ContextShared {
                device,
                queue,
                limits,
            }),
            surface: Some(surface),
            config: Some(config),
            depth_format: settings.depth_format,
            depth_texture_view: Some(depth_texture_view),
            clear_color: settings.clear_color,
            pipelines,
        })
    }

    /// Creates a headless context without a surface.
    ///
    /// Used for offscreen rendering and tests; the host supplies its own
    /// color/depth targets.
    pub async fn new_headless(settings: &RenderSettings) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: settings.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| MeshViewError::AdapterRequestFailed(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: settings.required_features,
                required_limits: settings.required_limits.clone(),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await?;

        let pipelines = PipelineCache::new(&device);
        let limits = device.limits();

        Ok(Self {
            shared: Arc::new(ContextShared {
                device,
                queue,
                limits,
            }),
            surface: None,
            config: None,
            depth_format: settings.depth_format,
            depth_texture_view: None,
            clear_color: settings.clear_color,
            pipelines,
        })
    }

    // ========================================================================
    // Resource factory
    // ========================================================================

    /// Creates an unallocated [`Buffer`] wrapper.
    ///
    /// `COPY_DST` is always added to `usage` so later re-uploads of the same
    /// size can reuse the allocation.
    #[must_use]
    pub fn create_buffer(&self, usage: wgpu::BufferUsages, label: &str) -> Buffer {
        Buffer::new(
            self.handle(),
            usage | wgpu::BufferUsages::COPY_DST,
            label,
        )
    }

    /// Creates an unallocated [`VertexArray`] wrapper.
    #[must_use]
    pub fn create_vertex_array(&self) -> VertexArray {
        VertexArray::new(self.handle())
    }

    /// Creates an unallocated (unlinked) [`ShaderProgram`] wrapper.
    #[must_use]
    pub fn create_shader_program(&self, label: &str) -> ShaderProgram {
        ShaderProgram::new(self.handle(), label)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.shared.device
    }

    #[must_use]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.shared.queue
    }

    /// Returns the window surface, if this is a windowed context.
    #[must_use]
    pub fn surface(&self) -> Option<&wgpu::Surface<'static>> {
        self.surface.as_ref()
    }

    /// Returns the surface color format, or the offscreen default for
    /// headless contexts.
    #[must_use]
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.config
            .as_ref()
            .map_or(wgpu::TextureFormat::Rgba8UnormSrgb, |c| c.format)
    }

    #[must_use]
    pub fn depth_format(&self) -> wgpu::TextureFormat {
        self.depth_format
    }

    /// Returns the depth texture view of a windowed context.
    ///
    /// The depth texture is automatically recreated on resize. Headless
    /// contexts create their own via [`GpuContext::create_depth_texture`].
    #[must_use]
    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth_texture_view.as_ref()
    }

    #[must_use]
    pub fn clear_color(&self) -> wgpu::Color {
        self.clear_color
    }

    /// Returns the current surface dimensions, or `(0, 0)` when headless.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.config
            .as_ref()
            .map_or((0, 0), |c| (c.width, c.height))
    }

    pub(crate) fn handle(&self) -> ContextHandle {
        Arc::downgrade(&self.shared)
    }

    pub(crate) fn pipelines(&self) -> &PipelineCache {
        &self.pipelines
    }

    // ========================================================================
    // Surface management
    // ========================================================================

    /// Resizes the surface and recreates the depth buffer.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let (Some(surface), Some(config)) = (&self.surface, &mut self.config) {
            config.width = width;
            config.height = height;
            surface.configure(&self.shared.device, config);
            self.depth_texture_view = Some(Self::create_depth_texture(
                &self.shared.device,
                width,
                height,
                self.depth_format,
            ));
        }
    }

    /// Creates a depth texture view of the given size.
    pub fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> wgpu::TextureView {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        };
        let texture = device.create_texture(&desc);
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}
