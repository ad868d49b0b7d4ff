//! Interfaces to the collaborators the overlay core consumes.
//!
//! The core never owns a scene, a camera or a renderer. It reads entity
//! state through [`SceneQuery`], projects through [`Camera`], mutates screen
//! primitives allocated by [`ScreenHost`] and learns about entity removal
//! through [`LifecycleSource`]. The [`headless`](crate::headless) module
//! provides in-memory implementations of all of them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{LabelStyle, LineStyle};
use crate::disposal::{Dispose, Subscription};
use crate::projection::LineGeometry;

/// Opaque identifier of an entity in the host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to one body part of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartHandle(pub u64);

/// Screen-space result of projecting a world point through the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Position in screen pixels.
    pub screen: Vec2,
    /// Distance along the camera's view direction. Negative behind the camera.
    pub depth: f32,
}

impl Projection {
    /// Creates a projection result.
    #[must_use]
    pub const fn new(screen: Vec2, depth: f32) -> Self {
        Self { screen, depth }
    }

    /// Whether the source point lies behind the camera.
    #[must_use]
    pub fn is_behind_camera(&self) -> bool {
        self.depth < 0.0
    }
}

/// Name and health of an entity, read once per frame for the label.
#[derive(Debug, Clone, PartialEq)]
pub struct Vitals {
    /// Display name shown on the first label line.
    pub name: String,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
}

/// The viewer camera.
#[cfg_attr(test, mockall::automock)]
pub trait Camera {
    /// Projects a world-space point to screen space.
    fn project(&self, world: Vec3) -> Projection;
}

/// Read access to entities and their body parts.
pub trait SceneQuery {
    /// Looks up a body part by name without blocking.
    fn find_part(&self, entity: EntityId, name: &str) -> Option<PartHandle>;

    /// Current world transform of a part, or `None` once the part has left
    /// the scene.
    fn part_transform(&self, part: PartHandle) -> Option<Mat4>;

    /// Extents of a part along its local axes.
    fn part_size(&self, part: PartHandle) -> Option<Vec3>;

    /// Current name and health of an entity.
    fn vitals(&self, entity: EntityId) -> Option<Vitals>;
}

/// A line drawn between two screen points.
pub trait LinePrimitive: Dispose {
    /// Applies colour and thickness.
    fn set_style(&mut self, style: &LineStyle);
    /// Positions the line from its midpoint, length and rotation.
    fn set_geometry(&mut self, geometry: LineGeometry);
    /// Shows or hides the line.
    fn set_visible(&mut self, visible: bool);
}

/// A two-line text block: entity name above a stats line.
pub trait LabelPrimitive: Dispose {
    /// Applies colour and font size.
    fn set_style(&mut self, style: &LabelStyle);
    /// Replaces both lines of text.
    fn set_lines(&mut self, name: &str, stats: &str);
    /// Moves the block so its top-centre sits at `position`.
    ///
    /// Text flows downwards from there, so the block's bottom edge lies
    /// [`rendered_height`](Self::rendered_height) pixels below `position`.
    fn set_position(&mut self, position: Vec2);
    /// Height of the block as currently rendered, in pixels.
    fn rendered_height(&self) -> f32;
    /// Shows or hides the block.
    fn set_visible(&mut self, visible: bool);
}

/// Line primitive shared between an overlay and its resource bin.
pub type SharedLine = Rc<RefCell<dyn LinePrimitive>>;
/// Label primitive shared between an overlay and its resource bin.
pub type SharedLabel = Rc<RefCell<dyn LabelPrimitive>>;

/// Allocator of on-screen primitives.
pub trait ScreenHost {
    /// Allocates a hidden line.
    fn create_line(&mut self) -> SharedLine;
    /// Allocates a hidden label block.
    fn create_label(&mut self) -> SharedLabel;
}

/// Source of per-entity removal signals.
pub trait LifecycleSource {
    /// Registers `callback` to run when `entity` leaves the world.
    ///
    /// The returned subscription disconnects the callback when cancelled.
    fn subscribe_removed(
        &self,
        entity: EntityId,
        callback: Box<dyn FnMut()>,
    ) -> Box<dyn Subscription>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::in_front(4.0, false)]
    #[case::on_plane(0.0, false)]
    #[case::behind(-0.01, true)]
    fn behind_camera_means_negative_depth(#[case] depth: f32, #[case] behind: bool) {
        assert_eq!(Projection::new(Vec2::ZERO, depth).is_behind_camera(), behind);
    }

    #[test]
    fn entity_id_displays_its_number() {
        assert_eq!(EntityId::from(42).to_string(), "42");
    }
}
