//! Fixed rig and overlay dimensions shared across modules.
//!
//! Tunable values live in [`OverlayConfig`](crate::config::OverlayConfig);
//! the counts here describe the shape of the rig itself.

/// Anchor points forming the bounding box: centre, top, bottom and corners.
pub const BOX_POINT_COUNT: usize = 7;
/// Skeleton joints attached to the limbs and torso.
pub const SKELETON_JOINT_COUNT: usize = 11;
/// Line primitives outlining the bounding box.
pub const BOX_EDGE_COUNT: usize = 4;
/// Line primitives connecting skeleton joints.
pub const SKELETON_EDGE_COUNT: usize = 10;
/// Number of body parts a rig needs resolved before it can be built.
pub const BODY_PART_COUNT: usize = 7;

/// Default world-space margin added around the bounding box.
pub const DEFAULT_BOX_MARGIN: f32 = 0.25;
/// Default bounded wait for a single body part, in milliseconds.
pub const DEFAULT_DISCOVERY_TIMEOUT_MS: u64 = 5_000;
/// Default thickness of overlay lines in screen pixels.
pub const DEFAULT_LINE_THICKNESS: f32 = 1.0;
/// Default label font size in screen pixels.
pub const DEFAULT_LABEL_FONT_SIZE: f32 = 14.0;
/// Lines rendered per label block: the name line and the stats line.
pub const LABEL_LINE_COUNT: usize = 2;
