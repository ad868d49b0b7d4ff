//! Per-entity overlay: rig, fourteen lines and a label.
//!
//! An [`Overlay`] moves through three states. It is `Constructing` while
//! [`Overlay::spawn`] builds the rig and allocates primitives, `Active` once
//! it is registered and subscribed to its entity's removal signal, and
//! `Destroyed` after [`Overlay::destroy`] has released its resource bin.
//! Destruction is terminal and idempotent.
//!
//! Every frame [`Overlay::render`] projects the eighteen rig points. If any
//! lands behind the camera the whole overlay is hidden and no geometry is
//! touched; otherwise every line and the label are repositioned and shown.

mod edges;
mod label;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use log::{debug, trace};

use crate::config::{LineStyle, OverlayConfig};
use crate::constants::{BOX_EDGE_COUNT, SKELETON_EDGE_COUNT};
use crate::disposal::{Disposable, ResourceBin};
use crate::error::OverlayError;
use crate::host::{
    Camera, EntityId, LifecycleSource, SceneQuery, ScreenHost, SharedLabel, SharedLine,
};
use crate::projection::{line_from_points, project_rig, CullReason};
use crate::registry::Registry;
use crate::rig::{ResolvedParts, Rig, RigBuilder};

pub use edges::{box_edges, skeleton_edges, Edge};
pub use label::{format_stats, label_position};

/// Lifecycle stage of an [`Overlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    /// Primitives are being allocated; not yet registered.
    Constructing,
    /// Registered and rendering every frame.
    Active,
    /// Resources released. Terminal.
    Destroyed,
}

/// What one call to [`Overlay::render`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Every primitive was updated and shown.
    Drawn,
    /// A rig point was behind the camera; everything is hidden.
    Culled,
    /// A rig part or the entity itself left the scene; everything is hidden
    /// and the overlay should be destroyed.
    Detached,
    /// The overlay is destroyed and draws nothing.
    Destroyed,
}

/// Shared handle to a live overlay, as stored in the [`Registry`].
pub type OverlayHandle = Rc<RefCell<Overlay>>;

/// Collaborators needed to construct an [`Overlay`].
pub struct OverlayDeps<'a> {
    /// Entity the overlay follows.
    pub entity: EntityId,
    /// The entity's discovered body parts.
    pub parts: &'a ResolvedParts,
    /// Scene the parts live in.
    pub scene: &'a dyn SceneQuery,
    /// Camera used for the first refresh.
    pub camera: &'a dyn Camera,
    /// Allocator for lines and the label.
    pub screen: &'a mut dyn ScreenHost,
    /// Source of the entity's removal signal.
    pub lifecycle: &'a dyn LifecycleSource,
    /// Registry the overlay joins.
    pub registry: &'a Registry,
    /// Margin and styles.
    pub config: &'a OverlayConfig,
}

/// Screen overlay for one tracked entity.
pub struct Overlay {
    entity: EntityId,
    state: OverlayState,
    rig: Rig,
    box_lines: [SharedLine; BOX_EDGE_COUNT],
    skeleton_lines: [SharedLine; SKELETON_EDGE_COUNT],
    label: SharedLabel,
    bin: ResourceBin,
    removed: Rc<Cell<bool>>,
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("entity", &self.entity)
            .field("state", &self.state)
            .field("held", &self.bin.len())
            .finish_non_exhaustive()
    }
}

impl Overlay {
    /// Builds, registers and first renders the overlay for `deps.entity`.
    ///
    /// Nothing is allocated if the rig cannot be built. The returned handle
    /// is also held by the registry until the overlay is destroyed.
    ///
    /// # Errors
    /// Returns [`OverlayError::AlreadyTracked`] when the entity already has a
    /// live overlay and [`OverlayError::PartDetached`] when a resolved part
    /// vanished before its size could be read.
    pub fn spawn(deps: OverlayDeps<'_>) -> Result<OverlayHandle, OverlayError> {
        let OverlayDeps {
            entity,
            parts,
            scene,
            camera,
            screen,
            lifecycle,
            registry,
            config,
        } = deps;
        if registry.contains(entity) {
            return Err(OverlayError::AlreadyTracked { entity });
        }
        let rig = RigBuilder::new(scene, config.box_margin).build(entity, parts)?;

        let style = &config.style;
        let mut bin = ResourceBin::new();
        let mut allocate_line = |line_style: &LineStyle| {
            let line = screen.create_line();
            {
                let mut primitive = line.borrow_mut();
                primitive.set_style(line_style);
                primitive.set_visible(false);
            }
            bin.add(Disposable::object(Rc::clone(&line)));
            line
        };
        let box_lines: [SharedLine; BOX_EDGE_COUNT] =
            std::array::from_fn(|_| allocate_line(&style.box_line));
        let skeleton_lines: [SharedLine; SKELETON_EDGE_COUNT] =
            std::array::from_fn(|_| allocate_line(&style.skeleton_line));

        let label = screen.create_label();
        {
            let mut primitive = label.borrow_mut();
            primitive.set_style(&style.label);
            primitive.set_visible(false);
        }
        bin.add(Disposable::object(Rc::clone(&label)));

        let handle = Rc::new(RefCell::new(Self {
            entity,
            state: OverlayState::Constructing,
            rig,
            box_lines,
            skeleton_lines,
            label,
            bin,
            removed: Rc::new(Cell::new(false)),
        }));
        registry.insert(entity, Rc::clone(&handle))?;

        let weak_registry = registry.downgrade();
        let removed = Rc::clone(&handle.borrow().removed);
        let weak_overlay = Rc::downgrade(&handle);
        let subscription = lifecycle.subscribe_removed(
            entity,
            Box::new(move || {
                removed.set(true);
                let Some(strong) = weak_overlay.upgrade() else {
                    return;
                };
                // A render in progress sees the flag and tears down instead.
                let borrowed = strong.try_borrow_mut();
                if let Ok(mut guard) = borrowed {
                    guard.destroy();
                }
            }),
        );

        let outcome = {
            let mut overlay = handle.borrow_mut();
            overlay.bin.add(Disposable::callback(move || {
                weak_registry.remove(entity);
            }));
            overlay.bin.add(subscription);
            overlay.state = OverlayState::Active;
            overlay.render(scene, camera)
        };
        debug!("entity {entity}: overlay active, first frame {outcome:?}");
        Ok(handle)
    }

    /// Entity this overlay follows.
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        self.entity
    }

    /// Current lifecycle stage.
    #[must_use]
    pub const fn state(&self) -> OverlayState {
        self.state
    }

    /// The anchor rig.
    #[must_use]
    pub const fn rig(&self) -> &Rig {
        &self.rig
    }

    /// Recomputes every primitive for the current frame.
    ///
    /// # Errors
    /// Returns [`OverlayError::Busy`] when a primitive is borrowed elsewhere.
    pub fn render(
        &mut self,
        scene: &dyn SceneQuery,
        camera: &dyn Camera,
    ) -> Result<FrameOutcome, OverlayError> {
        if self.state == OverlayState::Destroyed {
            return Ok(FrameOutcome::Destroyed);
        }
        if self.removed.get() {
            self.destroy();
            return Ok(FrameOutcome::Destroyed);
        }

        let projected = match project_rig(&self.rig, scene, camera) {
            Ok(projected) => projected,
            Err(reason) => {
                trace!("entity {}: hidden this frame ({reason:?})", self.entity);
                self.set_visible(false)?;
                return Ok(match reason {
                    CullReason::BehindCamera => FrameOutcome::Culled,
                    CullReason::Detached => FrameOutcome::Detached,
                });
            }
        };
        let Some(vitals) = scene.vitals(self.entity) else {
            self.set_visible(false)?;
            return Ok(FrameOutcome::Detached);
        };

        let entity = self.entity;
        let lines = self.box_lines.iter().zip(box_edges(&projected.box_points)).chain(
            self.skeleton_lines
                .iter()
                .zip(skeleton_edges(&projected.joints)),
        );
        for (line, (from, to)) in lines {
            let mut primitive = line
                .try_borrow_mut()
                .map_err(|_| OverlayError::Busy { entity })?;
            primitive.set_geometry(line_from_points(from, to));
        }

        {
            let mut label = self
                .label
                .try_borrow_mut()
                .map_err(|_| OverlayError::Busy { entity })?;
            label.set_lines(
                &vitals.name,
                &format_stats(projected.box_points.center.depth, &vitals),
            );
            let height = label.rendered_height();
            label.set_position(label_position(projected.box_points.top.screen, height));
        }

        self.set_visible(true)?;
        Ok(FrameOutcome::Drawn)
    }

    /// Releases every resource the overlay holds. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.state == OverlayState::Destroyed {
            return;
        }
        self.state = OverlayState::Destroyed;
        self.bin.destroy();
        debug!("entity {}: overlay destroyed", self.entity);
    }

    fn set_visible(&self, visible: bool) -> Result<(), OverlayError> {
        let busy = |_| OverlayError::Busy {
            entity: self.entity,
        };
        for line in self.box_lines.iter().chain(&self.skeleton_lines) {
            line.try_borrow_mut().map_err(busy)?.set_visible(visible);
        }
        self.label.try_borrow_mut().map_err(busy)?.set_visible(visible);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessLifecycle, HeadlessScene, HeadlessScreen};
    use crate::host::{MockCamera, Projection};
    use glam::{Vec2, Vec3};

    struct Session {
        scene: HeadlessScene,
        screen: HeadlessScreen,
        lifecycle: HeadlessLifecycle,
        registry: Registry,
        config: OverlayConfig,
    }

    impl Session {
        fn new() -> Self {
            Self {
                scene: HeadlessScene::new(),
                screen: HeadlessScreen::new(),
                lifecycle: HeadlessLifecycle::new(),
                registry: Registry::new(),
                config: OverlayConfig::default(),
            }
        }

        fn spawn(&mut self, camera: &dyn Camera) -> (EntityId, OverlayHandle) {
            let entity = self.scene.spawn_humanoid("Ada", Vec3::ZERO, &self.config.parts);
            let names = &self.config.parts;
            let parts = ResolvedParts::from_lookup(|part| {
                self.scene.find_part(entity, &names.get(part).primary)
            })
            .expect("humanoid has every part");
            let overlay = Overlay::spawn(OverlayDeps {
                entity,
                parts: &parts,
                scene: &self.scene,
                camera,
                screen: &mut self.screen,
                lifecycle: &self.lifecycle,
                registry: &self.registry,
                config: &self.config,
            })
            .expect("overlay spawns");
            (entity, overlay)
        }
    }

    fn in_front() -> MockCamera {
        let mut camera = MockCamera::new();
        camera
            .expect_project()
            .returning(|world| Projection::new(Vec2::new(world.x * 10.0, -world.y * 10.0), 12.7));
        camera
    }

    fn behind() -> MockCamera {
        let mut camera = MockCamera::new();
        camera
            .expect_project()
            .returning(|_| Projection::new(Vec2::ZERO, -1.0));
        camera
    }

    #[test]
    fn spawn_allocates_registers_and_draws() {
        let mut session = Session::new();
        let (entity, overlay) = session.spawn(&in_front());

        assert_eq!(overlay.borrow().state(), OverlayState::Active);
        assert!(session.registry.contains(entity));
        assert_eq!(session.screen.live_lines(), BOX_EDGE_COUNT + SKELETON_EDGE_COUNT);
        assert_eq!(session.screen.visible_lines(), BOX_EDGE_COUNT + SKELETON_EDGE_COUNT);
        assert_eq!(session.lifecycle.listener_count(), 1);

        let label = session.screen.labels().remove(0);
        assert_eq!(label.name, "Ada");
        assert_eq!(label.stats, "[12] [100/100] [100%]");
        assert!(label.visible);
    }

    #[test]
    fn second_spawn_for_the_same_entity_is_rejected_before_allocating() {
        let mut session = Session::new();
        let (entity, _overlay) = session.spawn(&in_front());
        let parts = ResolvedParts::from_lookup(|part| {
            session
                .scene
                .find_part(entity, &session.config.parts.get(part).primary)
        })
        .expect("humanoid has every part");

        let err = Overlay::spawn(OverlayDeps {
            entity,
            parts: &parts,
            scene: &session.scene,
            camera: &in_front(),
            screen: &mut session.screen,
            lifecycle: &session.lifecycle,
            registry: &session.registry,
            config: &session.config,
        })
        .expect_err("entity already tracked");

        assert_eq!(err, OverlayError::AlreadyTracked { entity });
        assert_eq!(session.screen.lines().len(), BOX_EDGE_COUNT + SKELETON_EDGE_COUNT);
    }

    #[test]
    fn culled_frame_hides_without_touching_geometry() {
        let mut session = Session::new();
        let (_, overlay) = session.spawn(&in_front());
        let before = session.screen.lines();

        let outcome = overlay
            .borrow_mut()
            .render(&session.scene, &behind())
            .expect("render succeeds");

        assert_eq!(outcome, FrameOutcome::Culled);
        let after = session.screen.lines();
        assert_eq!(session.screen.visible_lines(), 0);
        for (old, new) in before.iter().zip(&after) {
            assert_eq!(old.geometry, new.geometry);
            assert_eq!(old.updates, new.updates);
        }
        assert!(!session.screen.labels().remove(0).visible);
    }

    #[test]
    fn removal_signal_destroys_once_and_deregisters() {
        let mut session = Session::new();
        let (entity, overlay) = session.spawn(&in_front());

        assert_eq!(session.lifecycle.emit_removed(entity), 1);

        assert_eq!(overlay.borrow().state(), OverlayState::Destroyed);
        assert!(!session.registry.contains(entity));
        assert_eq!(session.screen.live_lines(), 0);
        assert_eq!(session.screen.live_labels(), 0);

        overlay.borrow_mut().destroy();
        let outcome = overlay
            .borrow_mut()
            .render(&session.scene, &in_front())
            .expect("destroyed overlay renders nothing");
        assert_eq!(outcome, FrameOutcome::Destroyed);
    }

    #[test]
    fn removal_during_a_borrow_is_honoured_on_the_next_render() {
        let mut session = Session::new();
        let (entity, overlay) = session.spawn(&in_front());

        {
            let _busy = overlay.borrow_mut();
            assert_eq!(session.lifecycle.emit_removed(entity), 1);
        }
        assert_eq!(overlay.borrow().state(), OverlayState::Active);

        let outcome = overlay
            .borrow_mut()
            .render(&session.scene, &in_front())
            .expect("render succeeds");
        assert_eq!(outcome, FrameOutcome::Destroyed);
        assert!(!session.registry.contains(entity));
    }

    #[test]
    fn destroy_cancels_the_removal_subscription() {
        let mut session = Session::new();
        let (_, overlay) = session.spawn(&in_front());
        overlay.borrow_mut().destroy();
        assert_eq!(session.lifecycle.listener_count(), 0);
    }

    #[test]
    fn despawned_entity_reports_detached() {
        let mut session = Session::new();
        let (entity, overlay) = session.spawn(&in_front());
        assert!(session.scene.despawn(entity));

        let outcome = overlay
            .borrow_mut()
            .render(&session.scene, &in_front())
            .expect("render succeeds");
        assert_eq!(outcome, FrameOutcome::Detached);
        assert_eq!(session.screen.visible_lines(), 0);
        assert_eq!(overlay.borrow().state(), OverlayState::Active);
    }
}
