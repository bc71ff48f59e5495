use glam::{Mat4, Vec3};

use crate::errors::{MeshViewError, Result};

/// View/projection state consumed by every renderer each frame.
///
/// Both [`Camera::set_perspective`] and [`Camera::set_view`] are absolute
/// sets: each call fully replaces the corresponding matrix. Incremental
/// motion (from the trackball) composes onto the view matrix via
/// [`Camera::apply_view_increment`].
#[derive(Debug, Clone)]
pub struct Camera {
    view_matrix: Mat4,
    projection_matrix: Mat4,

    // Last perspective parameters, kept for aspect updates on resize
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// A camera at the origin with a 45° perspective projection.
    #[must_use]
    pub fn new() -> Self {
        let mut camera = Self {
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            fov: 45.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        };
        // Defaults are always valid
        let _ = camera.set_perspective(45.0, 1.0, 0.1, 1000.0);
        camera
    }

    /// Replaces the projection matrix with a perspective projection.
    ///
    /// `fov_y` is the vertical field of view in degrees. Fails with
    /// [`MeshViewError::InvalidArgument`] for `near <= 0`, `near >= far`,
    /// or a non-positive fov/aspect.
    pub fn set_perspective(&mut self, fov_y: f32, aspect: f32, near: f32, far: f32) -> Result<()> {
        if near <= 0.0 {
            return Err(MeshViewError::InvalidArgument(format!(
                "near plane must be positive, got {near}"
            )));
        }
        if near >= far {
            return Err(MeshViewError::InvalidArgument(format!(
                "near plane {near} must be closer than far plane {far}"
            )));
        }
        if fov_y <= 0.0 || fov_y >= 180.0 {
            return Err(MeshViewError::InvalidArgument(format!(
                "vertical fov must be in (0, 180) degrees, got {fov_y}"
            )));
        }
        if aspect <= 0.0 {
            return Err(MeshViewError::InvalidArgument(format!(
                "aspect ratio must be positive, got {aspect}"
            )));
        }
        self.fov = fov_y;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
        self.projection_matrix = Mat4::perspective_rh(fov_y.to_radians(), aspect, near, far);
        Ok(())
    }

    /// Replaces the view matrix with a look-at transform.
    ///
    /// Fails with [`MeshViewError::InvalidArgument`] when `eye` and
    /// `center` coincide or `up` is parallel to the view direction.
    pub fn set_view(&mut self, eye: Vec3, center: Vec3, up: Vec3) -> Result<()> {
        let forward = center - eye;
        if forward.length_squared() < 1e-10 {
            return Err(MeshViewError::InvalidArgument(
                "eye and center coincide".to_string(),
            ));
        }
        if forward.cross(up).length_squared() < 1e-10 {
            return Err(MeshViewError::InvalidArgument(
                "up vector is parallel to the view direction".to_string(),
            ));
        }
        self.view_matrix = Mat4::look_at_rh(eye, center, up);
        Ok(())
    }

    /// Updates the aspect ratio, keeping the other perspective parameters.
    /// Call on window resize.
    pub fn set_aspect(&mut self, aspect: f32) -> Result<()> {
        self.set_perspective(self.fov, aspect, self.near, self.far)
    }

    /// Composes an incremental transform onto the view matrix:
    /// `view = incremental * view`.
    ///
    /// Left-composition keeps repeated small increments from accumulating
    /// drift relative to the current viewpoint.
    pub fn apply_view_increment(&mut self, incremental: Mat4) {
        self.view_matrix = incremental * self.view_matrix;
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
