//! Session-scoped map from entity to its live overlay.
//!
//! The registry is the single source of truth for which entities currently
//! have an overlay. Overlays insert themselves during construction and remove
//! themselves through a [`WeakRegistry`] when their resource bin is
//! released, so an entry never outlives the overlay it names.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hashbrown::HashMap;
use log::trace;

use crate::error::OverlayError;
use crate::host::EntityId;
use crate::overlay::OverlayHandle;

type Entries = HashMap<EntityId, OverlayHandle>;

/// Shared entity-to-overlay map.
///
/// Clones share the same entries.
#[derive(Clone, Default)]
pub struct Registry {
    entries: Rc<RefCell<Entries>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<EntityId> = self.entries.borrow().keys().copied().collect();
        ids.sort_unstable();
        f.debug_struct("Registry").field("entities", &ids).finish()
    }
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the overlay for `entity`.
    ///
    /// # Errors
    /// Returns [`OverlayError::AlreadyTracked`] if `entity` already has one;
    /// the existing entry is left in place.
    pub fn insert(&self, entity: EntityId, overlay: OverlayHandle) -> Result<(), OverlayError> {
        let mut entries = self.entries.borrow_mut();
        if entries.contains_key(&entity) {
            return Err(OverlayError::AlreadyTracked { entity });
        }
        entries.insert(entity, overlay);
        trace!("registry: inserted entity {entity} ({} live)", entries.len());
        Ok(())
    }

    /// Removes and returns the entry for `entity`.
    #[must_use]
    pub fn remove(&self, entity: EntityId) -> Option<OverlayHandle> {
        self.entries.borrow_mut().remove(&entity)
    }

    /// The overlay for `entity`, if any.
    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<OverlayHandle> {
        self.entries.borrow().get(&entity).map(Rc::clone)
    }

    /// Whether `entity` has a live overlay.
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entries.borrow().contains_key(&entity)
    }

    /// Number of live overlays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether no overlay is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Copies the current entries, sorted by entity.
    ///
    /// The frame loop iterates a snapshot so overlays may remove themselves
    /// while it runs.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(EntityId, OverlayHandle)> {
        let mut entries: Vec<_> = self
            .entries
            .borrow()
            .iter()
            .map(|(entity, overlay)| (*entity, Rc::clone(overlay)))
            .collect();
        entries.sort_unstable_by_key(|(entity, _)| *entity);
        entries
    }

    /// A handle that does not keep the registry alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakRegistry {
        WeakRegistry {
            entries: Rc::downgrade(&self.entries),
        }
    }
}

/// Non-owning handle to a [`Registry`], held by overlay teardown callbacks.
#[derive(Debug, Clone)]
pub struct WeakRegistry {
    entries: Weak<RefCell<Entries>>,
}

impl WeakRegistry {
    /// Removes `entity`'s entry if the registry is still alive.
    ///
    /// Returns whether an entry was removed. The removed overlay is dropped
    /// after the map borrow ends.
    pub fn remove(&self, entity: EntityId) -> bool {
        let Some(entries) = self.entries.upgrade() else {
            return false;
        };
        let removed = entries
            .try_borrow_mut()
            .ok()
            .and_then(|mut map| map.remove(&entity));
        removed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;
    use crate::headless::{HeadlessLifecycle, HeadlessScene, HeadlessScreen};
    use crate::host::{Camera, Projection};
    use crate::overlay::{Overlay, OverlayDeps};
    use crate::rig::ResolvedParts;
    use glam::{Vec2, Vec3};

    struct Flat;

    impl Camera for Flat {
        fn project(&self, world: Vec3) -> Projection {
            Projection::new(Vec2::new(world.x, -world.y), 10.0)
        }
    }

    fn spawn(registry: &Registry, scene: &HeadlessScene, name: &str) -> (EntityId, OverlayHandle) {
        let config = OverlayConfig::default();
        let entity = scene.spawn_humanoid(name, Vec3::ZERO, &config.parts);
        let parts = ResolvedParts::from_lookup(|part| {
            crate::host::SceneQuery::find_part(scene, entity, &config.parts.get(part).primary)
        })
        .expect("humanoid has every part");
        let mut screen = HeadlessScreen::new();
        let lifecycle = HeadlessLifecycle::new();
        let overlay = Overlay::spawn(OverlayDeps {
            entity,
            parts: &parts,
            scene,
            camera: &Flat,
            screen: &mut screen,
            lifecycle: &lifecycle,
            registry,
            config: &config,
        })
        .expect("overlay spawns");
        (entity, overlay)
    }

    #[test]
    fn rejects_a_second_entry_for_the_same_entity() {
        let registry = Registry::new();
        let scene = HeadlessScene::new();
        let (entity, overlay) = spawn(&registry, &scene, "Ada");

        assert_eq!(
            registry.insert(entity, Rc::clone(&overlay)),
            Err(OverlayError::AlreadyTracked { entity })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn weak_remove_drops_the_entry_once() {
        let registry = Registry::new();
        let scene = HeadlessScene::new();
        let (entity, _overlay) = spawn(&registry, &scene, "Ada");
        let weak = registry.downgrade();

        assert!(weak.remove(entity));
        assert!(!weak.remove(entity));
        assert!(registry.is_empty());
    }

    #[test]
    fn weak_remove_after_registry_dropped_is_false() {
        let registry = Registry::new();
        let weak = registry.downgrade();
        drop(registry);
        assert!(!weak.remove(EntityId(1)));
    }

    #[test]
    fn snapshot_is_sorted_and_detached_from_the_map() {
        let registry = Registry::new();
        let scene = HeadlessScene::new();
        let (first, _a) = spawn(&registry, &scene, "Ada");
        let (second, _b) = spawn(&registry, &scene, "Bo");

        let snapshot = registry.snapshot();
        assert_eq!(
            snapshot.iter().map(|(entity, _)| *entity).collect::<Vec<_>>(),
            vec![first, second]
        );
        assert!(registry.remove(first).is_some());
        assert_eq!(snapshot.len(), 2);
        assert!(!registry.contains(first));
        assert!(registry.get(second).is_some());
    }
}
