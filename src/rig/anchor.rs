//! Explicit transform hierarchy for rig anchor points.
//!
//! An anchor stores only a local offset and a parent: either a body part or
//! another anchor. World positions are never cached. Each query walks the
//! chain up to the owning part and composes the part's current transform with
//! the accumulated local offsets, so anchors follow animation and movement
//! without any per-frame bookkeeping.

use glam::{Mat4, Vec3};

use crate::host::{PartHandle, SceneQuery};

/// Index of an anchor inside its [`AnchorTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(usize);

/// What an anchor's offset is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorParent {
    /// Directly attached to a body part.
    Part(PartHandle),
    /// Attached to another anchor in the same tree.
    Anchor(AnchorId),
}

/// A local offset from a parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Frame the offset is expressed in.
    pub parent: AnchorParent,
    /// Offset in the parent's local space.
    pub offset: Vec3,
}

/// Arena of anchors. Parents always precede their children.
#[derive(Debug, Clone, Default)]
pub struct AnchorTree {
    anchors: Vec<Anchor>,
}

impl AnchorTree {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            anchors: Vec::new(),
        }
    }

    /// Adds an anchor at `offset` in `part`'s local space.
    pub fn attach_to_part(&mut self, part: PartHandle, offset: Vec3) -> AnchorId {
        self.push(Anchor {
            parent: AnchorParent::Part(part),
            offset,
        })
    }

    /// Adds an anchor at `offset` in `parent`'s local space.
    pub fn attach_to_anchor(&mut self, parent: AnchorId, offset: Vec3) -> AnchorId {
        debug_assert!(parent.0 < self.anchors.len(), "parent anchor must exist");
        self.push(Anchor {
            parent: AnchorParent::Anchor(parent),
            offset,
        })
    }

    fn push(&mut self, anchor: Anchor) -> AnchorId {
        self.anchors.push(anchor);
        AnchorId(self.anchors.len() - 1)
    }

    /// The anchor stored under `id`.
    #[must_use]
    pub fn get(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id.0)
    }

    /// Number of anchors.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Whether the tree holds no anchors.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Walks from `id` to its owning part, returning that part and the
    /// anchor's transform relative to it.
    ///
    /// Returns `None` for an unknown id or a malformed chain.
    #[must_use]
    pub fn resolve(&self, id: AnchorId) -> Option<(PartHandle, Mat4)> {
        let mut local = Mat4::IDENTITY;
        let mut current = id;
        loop {
            let anchor = self.get(current)?;
            local = Mat4::from_translation(anchor.offset) * local;
            match anchor.parent {
                AnchorParent::Part(part) => return Some((part, local)),
                // Parents precede children, so a forward link means a cycle.
                AnchorParent::Anchor(parent) if parent.0 < current.0 => current = parent,
                AnchorParent::Anchor(_) => return None,
            }
        }
    }

    /// Current world position of `id`.
    ///
    /// Returns `None` once the owning part has left the scene.
    #[must_use]
    pub fn world_position(&self, id: AnchorId, scene: &dyn SceneQuery) -> Option<Vec3> {
        let (part, local) = self.resolve(id)?;
        let part_world = scene.part_transform(part)?;
        Some((part_world * local).transform_point3(Vec3::ZERO))
    }
}
