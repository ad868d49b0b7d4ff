//! In-memory scene of box-shaped body parts.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use hashbrown::HashMap;

use crate::host::{EntityId, PartHandle, SceneQuery, Vitals};
use crate::rig::PartNames;

#[derive(Debug, Clone)]
struct EntityRecord {
    name: String,
    health: f32,
    max_health: f32,
    parts: HashMap<String, PartHandle>,
}

#[derive(Debug, Clone, Copy)]
struct PartRecord {
    transform: Mat4,
    size: Vec3,
}

#[derive(Debug, Default)]
struct SceneState {
    next_entity: u64,
    next_part: u64,
    entities: HashMap<EntityId, EntityRecord>,
    parts: HashMap<PartHandle, PartRecord>,
}

/// Shared handle to an in-memory scene.
///
/// Clones refer to the same scene, so a test can keep one handle while an
/// [`OverlayManager`](crate::manager::OverlayManager) owns another.
#[derive(Debug, Clone, Default)]
pub struct HeadlessScene {
    state: Rc<RefCell<SceneState>>,
}

impl HeadlessScene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity with no parts.
    #[must_use]
    pub fn spawn_entity(&self, name: &str, health: f32, max_health: f32) -> EntityId {
        let mut state = self.state.borrow_mut();
        state.next_entity += 1;
        let id = EntityId(state.next_entity);
        state.entities.insert(
            id,
            EntityRecord {
                name: name.to_owned(),
                health,
                max_health,
                parts: HashMap::new(),
            },
        );
        id
    }

    /// Adds a humanoid at `position` with full health and all seven parts
    /// named after the primaries in `names`.
    #[must_use]
    pub fn spawn_humanoid(&self, name: &str, position: Vec3, names: &PartNames) -> EntityId {
        let entity = self.spawn_entity(name, 100.0, 100.0);
        self.add_humanoid_parts(entity, position, names);
        entity
    }

    /// Attaches the seven humanoid parts to an existing entity.
    ///
    /// Layout, in world units: a 2x2x1 root and torso centred on `position`,
    /// a 2x1x1 head on top, 1x2x1 arms either side and 1x2x1 legs below.
    pub fn add_humanoid_parts(&self, entity: EntityId, position: Vec3, names: &PartNames) {
        let layout = [
            (&names.root, Vec3::ZERO, Vec3::new(2.0, 2.0, 1.0)),
            (&names.torso, Vec3::ZERO, Vec3::new(2.0, 2.0, 1.0)),
            (&names.head, Vec3::new(0.0, 1.5, 0.0), Vec3::new(2.0, 1.0, 1.0)),
            (&names.left_arm, Vec3::new(-1.5, 0.0, 0.0), Vec3::new(1.0, 2.0, 1.0)),
            (&names.right_arm, Vec3::new(1.5, 0.0, 0.0), Vec3::new(1.0, 2.0, 1.0)),
            (&names.left_leg, Vec3::new(-0.5, -2.0, 0.0), Vec3::new(1.0, 2.0, 1.0)),
            (&names.right_leg, Vec3::new(0.5, -2.0, 0.0), Vec3::new(1.0, 2.0, 1.0)),
        ];
        for (part, offset, size) in layout {
            self.add_part(
                entity,
                &part.primary,
                Mat4::from_translation(position + offset),
                size,
            );
        }
    }

    /// Attaches a named part to `entity`. Returns `None` for unknown entities.
    pub fn add_part(
        &self,
        entity: EntityId,
        name: &str,
        transform: Mat4,
        size: Vec3,
    ) -> Option<PartHandle> {
        let mut state = self.state.borrow_mut();
        if !state.entities.contains_key(&entity) {
            return None;
        }
        state.next_part += 1;
        let handle = PartHandle(state.next_part);
        state.parts.insert(handle, PartRecord { transform, size });
        if let Some(record) = state.entities.get_mut(&entity) {
            record.parts.insert(name.to_owned(), handle);
        }
        Some(handle)
    }

    /// Removes a named part. Returns whether it existed.
    pub fn remove_part(&self, entity: EntityId, name: &str) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(handle) = state
            .entities
            .get_mut(&entity)
            .and_then(|record| record.parts.remove(name))
        else {
            return false;
        };
        state.parts.remove(&handle).is_some()
    }

    /// Removes an entity and all of its parts. Returns whether it existed.
    pub fn despawn(&self, entity: EntityId) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(record) = state.entities.remove(&entity) else {
            return false;
        };
        for handle in record.parts.values() {
            state.parts.remove(handle);
        }
        true
    }

    /// Moves every part of `entity` by `delta`.
    pub fn translate(&self, entity: EntityId, delta: Vec3) {
        let mut state = self.state.borrow_mut();
        let handles: Vec<PartHandle> = state
            .entities
            .get(&entity)
            .map(|record| record.parts.values().copied().collect())
            .unwrap_or_default();
        for handle in handles {
            if let Some(part) = state.parts.get_mut(&handle) {
                part.transform = Mat4::from_translation(delta) * part.transform;
            }
        }
    }

    /// Updates an entity's health.
    pub fn set_health(&self, entity: EntityId, health: f32, max_health: f32) {
        if let Some(record) = self.state.borrow_mut().entities.get_mut(&entity) {
            record.health = health;
            record.max_health = max_health;
        }
    }

    /// Ids of every entity currently in the scene, sorted.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.state.borrow().entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl SceneQuery for HeadlessScene {
    fn find_part(&self, entity: EntityId, name: &str) -> Option<PartHandle> {
        self.state
            .borrow()
            .entities
            .get(&entity)
            .and_then(|record| record.parts.get(name).copied())
    }

    fn part_transform(&self, part: PartHandle) -> Option<Mat4> {
        self.state.borrow().parts.get(&part).map(|record| record.transform)
    }

    fn part_size(&self, part: PartHandle) -> Option<Vec3> {
        self.state.borrow().parts.get(&part).map(|record| record.size)
    }

    fn vitals(&self, entity: EntityId) -> Option<Vitals> {
        self.state.borrow().entities.get(&entity).map(|record| Vitals {
            name: record.name.clone(),
            health: record.health,
            max_health: record.max_health,
        })
    }
}
