//! Camera-to-clip matrix for the fixed arm viewpoint.
//!
//! The arm hierarchy bakes the camera offset into its root node, so no view
//! matrix exists; the render pass only needs a perspective projection,
//! recomputed from the surface aspect whenever the window resizes.

use glam::Mat4;

/// Perspective projection parameters.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: 45.0f32.to_radians(),
            z_near: 1.0,
            z_far: 100.0,
        }
    }
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the vertical field of view from degrees.
    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov_y = fov_degrees.to_radians();
        self
    }

    /// The camera-to-clip matrix for the given aspect ratio, with wgpu's
    /// [0, 1] clip-space depth range.
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.z_near, self.z_far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn near_plane_maps_to_zero_depth() {
        let projection = Projection::new();
        let clip = projection.matrix(1.0) * Vec4::new(0.0, 0.0, -1.0, 1.0);
        assert!((clip.z / clip.w).abs() < 1e-5);
    }

    #[test]
    fn far_plane_maps_to_unit_depth() {
        let projection = Projection::new();
        let clip = projection.matrix(1.0) * Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert!((clip.z / clip.w - 1.0).abs() < 1e-4);
    }
}
