//! Which projected points each line primitive connects.

use glam::Vec2;

use crate::constants::{BOX_EDGE_COUNT, SKELETON_EDGE_COUNT};
use crate::host::Projection;
use crate::rig::{BoxPoints, SkeletonJoints};

/// Screen-space endpoints of one line.
pub type Edge = (Vec2, Vec2);

/// Box outline in cyclic order: top-left, top-right, bottom-right,
/// bottom-left and back to top-left.
#[must_use]
pub const fn box_edges(points: &BoxPoints<Projection>) -> [Edge; BOX_EDGE_COUNT] {
    let top_left = points.top_left.screen;
    let top_right = points.top_right.screen;
    let bottom_right = points.bottom_right.screen;
    let bottom_left = points.bottom_left.screen;
    [
        (top_left, top_right),
        (top_right, bottom_right),
        (bottom_right, bottom_left),
        (bottom_left, top_left),
    ]
}

/// Skeleton segments: spine first, then each arm from the neck and each leg
/// from the waist, left before right.
#[must_use]
pub const fn skeleton_edges(joints: &SkeletonJoints<Projection>) -> [Edge; SKELETON_EDGE_COUNT] {
    [
        (joints.face.screen, joints.neck.screen),
        (joints.neck.screen, joints.waist.screen),
        (joints.neck.screen, joints.left_shoulder.screen),
        (joints.left_shoulder.screen, joints.left_hand.screen),
        (joints.neck.screen, joints.right_shoulder.screen),
        (joints.right_shoulder.screen, joints.right_hand.screen),
        (joints.waist.screen, joints.left_hip.screen),
        (joints.left_hip.screen, joints.left_foot.screen),
        (joints.waist.screen, joints.right_hip.screen),
        (joints.right_hip.screen, joints.right_foot.screen),
    ]
}
