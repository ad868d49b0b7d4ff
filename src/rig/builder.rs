//! Anchor-point construction for a resolved set of body parts.

use glam::Vec3;
use log::debug;

use crate::error::OverlayError;
use crate::host::{EntityId, PartHandle, SceneQuery};

use super::anchor::{AnchorId, AnchorTree};
use super::parts::{BodyPart, ResolvedParts};
use super::points::{BoxPoints, SkeletonJoints};

/// Vertical and horizontal reach of the bounding box, relative to the root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxExtents {
    /// Offset of the top point above the root centre.
    pub top: f32,
    /// Offset of the bottom point below the root centre (negative).
    pub bottom: f32,
    /// Sideways offset of each corner from the vertical axis.
    pub horizontal: f32,
}

impl BoxExtents {
    /// Extents that enclose head, legs and arms plus `margin` on every side.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use rigsight::rig::BoxExtents;
    ///
    /// let extents = BoxExtents::from_sizes(
    ///     Vec3::new(2.0, 2.0, 1.0),
    ///     Vec3::new(2.0, 1.0, 1.0),
    ///     Vec3::new(1.0, 2.0, 1.0),
    ///     Vec3::new(1.0, 2.0, 1.0),
    ///     0.5,
    /// );
    /// assert_eq!(extents.top, 2.5);
    /// assert_eq!(extents.bottom, -3.5);
    /// assert_eq!(extents.horizontal, 2.5);
    /// ```
    #[must_use]
    pub fn from_sizes(root: Vec3, head: Vec3, leg: Vec3, arm: Vec3, margin: f32) -> Self {
        let half_height = root.y / 2.0;
        Self {
            top: half_height + head.y + margin,
            bottom: -half_height - leg.y - margin,
            horizontal: root.x / 2.0 + arm.x + margin,
        }
    }
}

/// Anchor points attached to one entity's body parts.
#[derive(Debug, Clone)]
pub struct Rig {
    anchors: AnchorTree,
    /// Bounding-box points, rooted at the root part.
    pub box_points: BoxPoints<AnchorId>,
    /// Skeleton joints, each on its owning part.
    pub joints: SkeletonJoints<AnchorId>,
    /// Extents the box points were built from.
    pub extents: BoxExtents,
}

impl Rig {
    /// The hierarchy the points live in.
    #[must_use]
    pub const fn anchors(&self) -> &AnchorTree {
        &self.anchors
    }

    /// Current world position of an anchor from this rig.
    #[must_use]
    pub fn world_position(&self, id: AnchorId, scene: &dyn SceneQuery) -> Option<Vec3> {
        self.anchors.world_position(id, scene)
    }
}

/// Builds a [`Rig`] from resolved parts and their current sizes.
pub struct RigBuilder<'a> {
    scene: &'a dyn SceneQuery,
    margin: f32,
}

impl<'a> RigBuilder<'a> {
    /// Creates a builder reading part sizes from `scene`.
    #[must_use]
    pub fn new(scene: &'a dyn SceneQuery, margin: f32) -> Self {
        Self { scene, margin }
    }

    /// Attaches box points and skeleton joints for `entity`.
    ///
    /// # Errors
    /// Returns [`OverlayError::PartDetached`] when a part stops reporting its
    /// size. Nothing is retained on failure.
    pub fn build(&self, entity: EntityId, parts: &ResolvedParts) -> Result<Rig, OverlayError> {
        let size = |part: BodyPart| {
            self.scene
                .part_size(parts.get(part))
                .ok_or(OverlayError::PartDetached { entity, part })
        };
        let root_size = size(BodyPart::Root)?;
        let head_size = size(BodyPart::Head)?;
        let torso_size = size(BodyPart::Torso)?;
        let left_arm_size = size(BodyPart::LeftArm)?;
        let right_arm_size = size(BodyPart::RightArm)?;
        let left_leg_size = size(BodyPart::LeftLeg)?;
        let right_leg_size = size(BodyPart::RightLeg)?;

        let extents = BoxExtents::from_sizes(
            root_size,
            head_size,
            left_leg_size,
            left_arm_size,
            self.margin,
        );

        let mut anchors = AnchorTree::new();
        let box_points = attach_box(&mut anchors, parts.root, extents);

        let mut joint = |part: PartHandle, part_size: Vec3, upper: bool| {
            let half = part_size.y / 2.0;
            let offset = if upper { half } else { -half };
            anchors.attach_to_part(part, Vec3::new(0.0, offset, 0.0))
        };
        let joints = SkeletonJoints {
            face: joint(parts.head, head_size, true),
            neck: joint(parts.torso, torso_size, true),
            waist: joint(parts.torso, torso_size, false),
            left_shoulder: joint(parts.left_arm, left_arm_size, true),
            right_shoulder: joint(parts.right_arm, right_arm_size, true),
            left_hand: joint(parts.left_arm, left_arm_size, false),
            right_hand: joint(parts.right_arm, right_arm_size, false),
            left_hip: joint(parts.left_leg, left_leg_size, true),
            right_hip: joint(parts.right_leg, right_leg_size, true),
            left_foot: joint(parts.left_leg, left_leg_size, false),
            right_foot: joint(parts.right_leg, right_leg_size, false),
        };

        debug!(
            "entity {entity}: rig built with {} anchors (top {:.2}, bottom {:.2}, half-width {:.2})",
            anchors.len(),
            extents.top,
            extents.bottom,
            extents.horizontal
        );

        Ok(Rig {
            anchors,
            box_points,
            joints,
            extents,
        })
    }
}

/// Centre on the root, top and bottom above and below it, corners hanging
/// off top and bottom so the whole box follows the root.
fn attach_box(anchors: &mut AnchorTree, root: PartHandle, extents: BoxExtents) -> BoxPoints<AnchorId> {
    let center = anchors.attach_to_part(root, Vec3::ZERO);
    let top = anchors.attach_to_anchor(center, Vec3::new(0.0, extents.top, 0.0));
    let bottom = anchors.attach_to_anchor(center, Vec3::new(0.0, extents.bottom, 0.0));
    let left = Vec3::new(-extents.horizontal, 0.0, 0.0);
    let right = Vec3::new(extents.horizontal, 0.0, 0.0);
    BoxPoints {
        center,
        top,
        bottom,
        top_left: anchors.attach_to_anchor(top, left),
        top_right: anchors.attach_to_anchor(top, right),
        bottom_right: anchors.attach_to_anchor(bottom, right),
        bottom_left: anchors.attach_to_anchor(bottom, left),
    }
}
