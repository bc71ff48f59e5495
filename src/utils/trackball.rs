//! Trackball camera controller.
//!
//! Maps 2D pointer drags onto 3D camera motion via the virtual-sphere
//! (arc-ball) technique: the pointer position projects onto a sphere over
//! the viewport, and the rotation between two projected points becomes an
//! incremental view rotation.
//!
//! # State machine
//!
//! ```text
//!             down(Left)              up
//!   Idle ───────────────→ Rotating ──────→ Idle
//!             down(Right)             up
//!   Idle ───────────────→ Panning  ──────→ Idle
//!             down(Middle)            up
//!   Idle ───────────────→ Zooming  ──────→ Idle
//! ```
//!
//! Pointer moves outside a drag are no-ops, not errors. Every increment
//! composes as `view = incremental * view`, so repeated drags never drift.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::scene::camera::Camera;

/// Pointer button identifiers delivered by the host window system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

#[cfg(feature = "winit")]
impl PointerButton {
    /// Maps a winit mouse button; auxiliary buttons have no trackball
    /// binding.
    #[must_use]
    pub fn from_winit(button: winit::event::MouseButton) -> Option<Self> {
        match button {
            winit::event::MouseButton::Left => Some(Self::Left),
            winit::event::MouseButton::Middle => Some(Self::Middle),
            winit::event::MouseButton::Right => Some(Self::Right),
            _ => None,
        }
    }
}

/// Interaction state of the trackball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackballState {
    #[default]
    Idle,
    Rotating,
    Panning,
    Zooming,
}

/// Interactive controller mutating a [`Camera`] from pointer input.
///
/// The trackball never owns geometry or the camera; the camera is passed
/// into each event method, which must run on the same thread that issues
/// draws.
#[derive(Debug)]
pub struct Trackball {
    state: TrackballState,
    active_button: Option<PointerButton>,
    last_cursor: Vec2,
    viewport: Vec2,

    /// Rotation sensitivity multiplier.
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    pub pan_speed: f32,
    /// Zoom sensitivity multiplier.
    pub zoom_speed: f32,
}

impl Trackball {
    #[must_use]
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            state: TrackballState::Idle,
            active_button: None,
            last_cursor: Vec2::ZERO,
            viewport: Vec2::new(viewport_width.max(1.0), viewport_height.max(1.0)),
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
        }
    }

    /// Updates the viewport size used for pointer normalization. Call on
    /// window resize.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    #[must_use]
    pub fn state(&self) -> TrackballState {
        self.state
    }

    /// Begins a drag: left rotates, right pans, middle zooms.
    ///
    /// Ignored while another drag is already active.
    pub fn pointer_down(&mut self, button: PointerButton, x: f32, y: f32) {
        if self.state != TrackballState::Idle {
            return;
        }
        self.state = match button {
            PointerButton::Left => TrackballState::Rotating,
            PointerButton::Right => TrackballState::Panning,
            PointerButton::Middle => TrackballState::Zooming,
        };
        self.active_button = Some(button);
        self.last_cursor = Vec2::new(x, y);
    }

    /// Applies one incremental camera mutation for the current drag.
    ///
    /// A move with no active drag is a no-op, not an error.
    pub fn pointer_move(&mut self, camera: &mut Camera, x: f32, y: f32) {
        let cursor = Vec2::new(x, y);
        match self.state {
            TrackballState::Idle => return,
            TrackballState::Rotating => self.rotate(camera, cursor),
            TrackballState::Panning => self.pan(camera, cursor),
            TrackballState::Zooming => self.zoom_drag(camera, cursor),
        }
        self.last_cursor = cursor;
    }

    /// Ends the drag begun with the same button.
    pub fn pointer_up(&mut self, button: PointerButton) {
        if self.active_button == Some(button) {
            self.state = TrackballState::Idle;
            self.active_button = None;
        }
    }

    /// Applies a wheel zoom delta. Valid in any state.
    pub fn scroll(&mut self, camera: &mut Camera, delta: f32) {
        let dz = delta * 0.4 * self.zoom_speed;
        camera.apply_view_increment(Mat4::from_translation(Vec3::new(0.0, 0.0, dz)));
    }

    // ========================================================================
    // Drag handlers
    // ========================================================================

    fn rotate(&mut self, camera: &mut Camera, cursor: Vec2) {
        let from = self.map_to_sphere(self.last_cursor);
        let to = self.map_to_sphere(cursor);

        let axis = from.cross(to);
        if axis.length_squared() < 1e-12 {
            return;
        }
        let angle = from.dot(to).clamp(-1.0, 1.0).acos() * self.rotate_speed;
        let rotation = Quat::from_axis_angle(axis.normalize(), angle);
        camera.apply_view_increment(Mat4::from_quat(rotation));
    }

    fn pan(&mut self, camera: &mut Camera, cursor: Vec2) {
        let delta = cursor - self.last_cursor;
        // View-space units per pixel, scaled so a full-height drag moves
        // the scene by two units.
        let units_per_pixel = 2.0 / self.viewport.y * self.pan_speed;
        let translation = Vec3::new(
            delta.x * units_per_pixel,
            -delta.y * units_per_pixel,
            0.0,
        );
        camera.apply_view_increment(Mat4::from_translation(translation));
    }

    fn zoom_drag(&mut self, camera: &mut Camera, cursor: Vec2) {
        let delta_y = cursor.y - self.last_cursor.y;
        // Drag up zooms in.
        let dz = -(delta_y / self.viewport.y) * 4.0 * self.zoom_speed;
        camera.apply_view_increment(Mat4::from_translation(Vec3::new(0.0, 0.0, dz)));
    }

    /// Projects a viewport point onto the virtual unit sphere.
    ///
    /// Points inside the sphere's silhouette map onto its surface; points
    /// outside map onto the rim, keeping the rotation continuous at the
    /// boundary.
    fn map_to_sphere(&self, p: Vec2) -> Vec3 {
        let x = (2.0 * p.x - self.viewport.x) / self.viewport.x;
        let y = (self.viewport.y - 2.0 * p.y) / self.viewport.y;
        let r2 = x * x + y * y;
        if r2 <= 1.0 {
            Vec3::new(x, y, (1.0 - r2).sqrt())
        } else {
            let scale = 1.0 / r2.sqrt();
            Vec3::new(x * scale, y * scale, 0.0)
        }
    }
}
