//! The fixed hero camera.
//!
//! A perspective camera 16 units out on +Z, looking at the field center.
//! Only the aspect ratio ever changes (on resize); everything else is
//! constant for the life of an instance.

use crate::math::{self, Mat4, Vec2, Vec3};

/// Perspective camera with a fixed position and target.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height aspect ratio.
    pub aspect: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Eye position.
    pub position: Vec3,
}

impl Camera {
    /// Creates the hero camera for the given aspect ratio.
    #[must_use]
    pub fn new(aspect: f32) -> Self {
        Self {
            fov_y: 35.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 0.0, 16.0),
        }
    }

    /// Updates the aspect ratio (the projection changes with it).
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// View matrix looking at the field center.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        math::look_at(self.position, Vec3::ZERO, Vec3::Y)
    }

    /// Projection matrix.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        math::perspective(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Projects a world point to normalized device coordinates.
    ///
    /// Returns `None` for points at or behind the eye plane, where the
    /// perspective divide is meaningless.
    #[must_use]
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let view_proj = math::multiply(self.projection(), self.view());
        let [x, y, _, w] = math::transform_point(view_proj, point);
        if w <= f32::EPSILON {
            return None;
        }
        Some(Vec2::new(x / w, y / w))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}
