//! Scene container.
//!
//! Owns an ordered list of actors and drives the per-frame update/render
//! cycle. A failed prepare or draw for one actor must not prevent the other
//! actors in the frame from rendering: failures are logged and skipped.

use crate::errors::Result;
use crate::renderer::GpuContext;
use crate::scene::actor::Actor;
use crate::scene::camera::Camera;

/// Ordered actor list; actors render in insertion order, so backgrounds
/// belong at the front.
#[derive(Default)]
pub struct Scene {
    actors: Vec<Box<dyn Actor>>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an actor, returning its index.
    pub fn add_actor(&mut self, actor: Box<dyn Actor>) -> usize {
        self.actors.push(actor);
        self.actors.len() - 1
    }

    /// Removes and returns the actor at `index`, destroying its scene
    /// membership. Later actors shift down.
    pub fn remove_actor(&mut self, index: usize) -> Option<Box<dyn Actor>> {
        if index < self.actors.len() {
            Some(self.actors.remove(index))
        } else {
            None
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn clear(&mut self) {
        self.actors.clear();
    }

    pub fn actors_mut(&mut self) -> &mut [Box<dyn Actor>] {
        &mut self.actors
    }

    /// Advances every actor's animation state.
    pub fn update_all(&mut self, dt: f32) {
        for actor in &mut self.actors {
            actor.update(dt);
        }
    }

    /// Encodes and submits one frame into `color_view`/`depth_view`.
    ///
    /// Per-actor failures are logged and isolated; the remaining actors
    /// still render. Presentation (surface swap) is the host's
    /// responsibility.
    pub fn render(
        &mut self,
        ctx: &GpuContext,
        camera: &Camera,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
    ) -> Result<()> {
        // Phase 1: resource preparation, outside the pass
        let mut skip = vec![false; self.actors.len()];
        for (i, actor) in self.actors.iter_mut().enumerate() {
            if let Err(e) = actor.prepare(ctx) {
                log::error!("Actor {i} prepare failed: {e}");
                skip[i] = true;
            }
        }

        // Phase 2: encode the pass
        let mut encoder = ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for (i, actor) in self.actors.iter_mut().enumerate() {
                if skip[i] {
                    continue;
                }
                if let Err(e) = actor.render(ctx, &mut pass, camera) {
                    log::error!("Actor {i} render failed: {e}");
                }
            }
        }
        ctx.queue().submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}
