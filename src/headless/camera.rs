//! Pinhole camera with a right-handed view.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::host::{Camera, Projection};

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 1_000.0;

/// Perspective camera projecting into a pixel viewport with +Y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    view: Mat4,
    clip: Mat4,
    viewport: Vec2,
}

impl PerspectiveCamera {
    /// Places the camera at `eye` looking towards `target` with +Y up.
    #[must_use]
    pub fn looking_at(eye: Vec3, target: Vec3, viewport: Vec2, fov_y_degrees: f32) -> Self {
        let aspect = if viewport.y > 0.0 {
            viewport.x / viewport.y
        } else {
            1.0
        };
        Self {
            view: Mat4::look_at_rh(eye, target, Vec3::Y),
            clip: Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, NEAR_PLANE, FAR_PLANE),
            viewport,
        }
    }

    /// Size of the viewport in pixels.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }
}

impl Camera for PerspectiveCamera {
    fn project(&self, world: Vec3) -> Projection {
        let view = self.view.transform_point3(world);
        let depth = -view.z;
        let clip = self.clip * view.extend(1.0);
        if clip.w.abs() <= f32::EPSILON {
            return Projection::new(self.viewport / 2.0, depth);
        }
        let ndc = clip.xy() / clip.w;
        let screen = Vec2::new(
            (ndc.x + 1.0) / 2.0 * self.viewport.x,
            (1.0 - ndc.y) / 2.0 * self.viewport.y,
        );
        Projection::new(screen, depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::looking_at(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            Vec2::new(800.0, 600.0),
            60.0,
        )
    }

    #[test]
    fn point_ahead_lands_in_the_viewport_centre() {
        let projection = camera().project(Vec3::new(0.0, 0.0, -10.0));
        assert_relative_eq!(projection.depth, 10.0, epsilon = 1e-4);
        assert_relative_eq!(projection.screen.x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(projection.screen.y, 300.0, epsilon = 1e-3);
    }

    #[test]
    fn higher_points_have_smaller_screen_y() {
        let cam = camera();
        let up = cam.project(Vec3::new(0.0, 1.0, -10.0));
        let down = cam.project(Vec3::new(0.0, -1.0, -10.0));
        assert!(up.screen.y < down.screen.y);
    }

    #[test]
    fn point_behind_has_negative_depth() {
        let projection = camera().project(Vec3::new(0.0, 0.0, 5.0));
        assert!(projection.is_behind_camera());
    }

    #[test]
    fn point_on_the_eye_does_not_divide_by_zero() {
        let projection = camera().project(Vec3::ZERO);
        assert!(projection.screen.is_finite());
    }
}
