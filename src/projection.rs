//! World-to-screen projection and line geometry.
//!
//! Rig points are projected in a fixed order: box points first, then
//! skeleton joints. Projection stops at the first point that lands behind
//! the camera, and the caller hides the whole overlay for that frame. No
//! other culling happens here; points outside the viewport are still drawn.

use glam::Vec2;

use crate::host::{Camera, Projection, SceneQuery};
use crate::rig::{AnchorId, BoxPoints, Rig, SkeletonJoints};

/// Screen placement of a line primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineGeometry {
    /// Midpoint between the two endpoints.
    pub midpoint: Vec2,
    /// Distance between the endpoints in pixels.
    pub length: f32,
    /// Rotation from the screen's +X axis, in degrees.
    pub angle_degrees: f32,
}

/// Derives the placement of a line running from `p0` to `p1`.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use rigsight::projection::line_from_points;
///
/// let line = line_from_points(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
/// assert_eq!(line.midpoint, Vec2::new(1.5, 2.0));
/// assert!((line.length - 5.0).abs() < 1e-6);
/// assert!((line.angle_degrees - 53.130_1).abs() < 1e-3);
/// ```
#[must_use]
pub fn line_from_points(p0: Vec2, p1: Vec2) -> LineGeometry {
    let delta = p1 - p0;
    LineGeometry {
        midpoint: p0 + delta / 2.0,
        length: delta.length(),
        angle_degrees: delta.y.atan2(delta.x).to_degrees(),
    }
}

/// Why a rig could not be fully projected this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullReason {
    /// A point projected with negative depth.
    BehindCamera,
    /// A point's owning part has left the scene.
    Detached,
}

/// Every rig point projected for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedRig {
    /// Projected bounding-box points.
    pub box_points: BoxPoints<Projection>,
    /// Projected skeleton joints.
    pub joints: SkeletonJoints<Projection>,
}

/// Projects all eighteen rig points, stopping at the first failure.
///
/// # Errors
/// Returns [`CullReason::BehindCamera`] for the first point with negative
/// depth and [`CullReason::Detached`] for the first point whose part no longer
/// resolves.
pub fn project_rig(
    rig: &Rig,
    scene: &dyn SceneQuery,
    camera: &dyn Camera,
) -> Result<ProjectedRig, CullReason> {
    let project = |id: AnchorId| {
        let world = rig.world_position(id, scene).ok_or(CullReason::Detached)?;
        let projection = camera.project(world);
        if projection.is_behind_camera() {
            Err(CullReason::BehindCamera)
        } else {
            Ok(projection)
        }
    };
    Ok(ProjectedRig {
        box_points: rig.box_points.try_map(project)?,
        joints: rig.joints.try_map(project)?,
    })
}
