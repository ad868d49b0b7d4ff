//! Session owner driving overlays from the three host event sources.
//!
//! [`OverlayManager`] is created at session start and owns the registry,
//! the current camera and every pending part discovery. The host forwards
//! its events to it:
//!
//! - entity became trackable: [`OverlayManager::track`]
//! - entity removed: [`OverlayManager::untrack`] (overlays also listen for
//!   their own removal signal)
//! - camera changed: [`OverlayManager::set_camera`]
//! - frame tick: [`OverlayManager::tick`]
//!
//! Faults stay with the entity that raised them. An entity whose parts never
//! appear is logged and dropped; a render failure skips that overlay for one
//! frame.

use std::task::Poll;
use std::time::Instant;

use log::{debug, info, warn};

use crate::config::OverlayConfig;
use crate::error::OverlayError;
use crate::host::{Camera, EntityId, LifecycleSource, SceneQuery, ScreenHost};
use crate::overlay::{FrameOutcome, Overlay, OverlayDeps, OverlayHandle};
use crate::registry::Registry;
use crate::rig::{PartDiscovery, ResolvedParts};

/// Result of [`OverlayManager::track`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracking {
    /// The entity is the viewer, or is already tracked or pending.
    Ignored,
    /// Some parts are still missing; discovery continues on later ticks.
    Pending,
    /// The overlay was built immediately.
    Constructed,
    /// The entity was dropped.
    Failed,
}

/// Per-frame tallies returned by [`OverlayManager::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Overlays built from discoveries that completed this frame.
    pub constructed: usize,
    /// Entities dropped because their parts never resolved.
    pub dropped: usize,
    /// Overlays drawn.
    pub drawn: usize,
    /// Overlays hidden because a point was behind the camera.
    pub culled: usize,
    /// Overlays destroyed because their entity left the scene.
    pub detached: usize,
    /// Overlays whose render failed this frame.
    pub failed: usize,
}

/// Owner of every overlay in one observing session.
pub struct OverlayManager<S, H, L>
where
    S: SceneQuery,
    H: ScreenHost,
    L: LifecycleSource,
{
    config: OverlayConfig,
    camera: Box<dyn Camera>,
    scene: S,
    screen: H,
    lifecycle: L,
    registry: Registry,
    pending: Vec<PartDiscovery>,
    viewer: Option<EntityId>,
}

impl<S, H, L> OverlayManager<S, H, L>
where
    S: SceneQuery,
    H: ScreenHost,
    L: LifecycleSource,
{
    /// Starts a session with an empty registry.
    pub fn new(
        config: OverlayConfig,
        camera: impl Camera + 'static,
        scene: S,
        screen: H,
        lifecycle: L,
    ) -> Self {
        Self {
            config,
            camera: Box::new(camera),
            scene,
            screen,
            lifecycle,
            registry: Registry::new(),
            pending: Vec::new(),
            viewer: None,
        }
    }

    /// Marks `entity` as the viewer. The viewer never gets an overlay; an
    /// existing one is removed.
    pub fn set_viewer(&mut self, entity: EntityId) {
        self.viewer = Some(entity);
        self.untrack(entity);
    }

    /// Replaces the camera used from the next frame on.
    pub fn set_camera(&mut self, camera: impl Camera + 'static) {
        self.camera = Box::new(camera);
        debug!("camera changed");
    }

    /// Begins tracking `entity`, building its overlay at once if every part
    /// is already present.
    pub fn track(&mut self, entity: EntityId, now: Instant) -> Tracking {
        if self.viewer == Some(entity)
            || self.registry.contains(entity)
            || self.pending.iter().any(|wait| wait.entity() == entity)
        {
            return Tracking::Ignored;
        }
        let mut discovery = PartDiscovery::new(entity, now, self.config.discovery_timeout());
        match discovery.poll(&self.scene, &self.config.parts, now) {
            Poll::Pending => {
                debug!("entity {entity}: waiting for body parts");
                self.pending.push(discovery);
                Tracking::Pending
            }
            Poll::Ready(Ok(parts)) => match self.construct(entity, &parts) {
                Ok(_) => Tracking::Constructed,
                Err(err) => {
                    warn!("dropping entity: {err}");
                    Tracking::Failed
                }
            },
            Poll::Ready(Err(err)) => {
                warn!("dropping entity: {err}");
                Tracking::Failed
            }
        }
    }

    /// Stops tracking `entity`, destroying its overlay or abandoning its
    /// discovery. Returns whether anything was tracked.
    pub fn untrack(&mut self, entity: EntityId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|wait| wait.entity() != entity);
        let abandoned = self.pending.len() != before;

        if let Some(handle) = self.registry.get(entity) {
            destroy_handle(entity, &handle);
            return true;
        }
        abandoned
    }

    /// Runs one frame: advances pending discoveries, then renders every
    /// registered overlay.
    pub fn tick(&mut self, now: Instant) -> FrameReport {
        let mut report = FrameReport::default();

        for mut discovery in std::mem::take(&mut self.pending) {
            let entity = discovery.entity();
            match discovery.poll(&self.scene, &self.config.parts, now) {
                Poll::Pending => self.pending.push(discovery),
                Poll::Ready(Ok(parts)) => match self.construct(entity, &parts) {
                    Ok(_) => report.constructed += 1,
                    Err(err) => {
                        warn!("dropping entity: {err}");
                        report.dropped += 1;
                    }
                },
                Poll::Ready(Err(err)) => {
                    warn!("dropping entity: {err}");
                    report.dropped += 1;
                }
            }
        }

        for (entity, handle) in self.registry.snapshot() {
            let outcome = match handle.try_borrow_mut() {
                Ok(mut overlay) => {
                    let rendered = overlay.render(&self.scene, self.camera.as_ref());
                    if rendered == Ok(FrameOutcome::Detached) {
                        overlay.destroy();
                    }
                    rendered
                }
                Err(_) => Err(OverlayError::Busy { entity }),
            };
            match outcome {
                Ok(FrameOutcome::Drawn) => report.drawn += 1,
                Ok(FrameOutcome::Culled) => report.culled += 1,
                Ok(FrameOutcome::Detached) => {
                    debug!("entity {entity}: left the scene");
                    report.detached += 1;
                }
                Ok(FrameOutcome::Destroyed) => {}
                Err(err) => {
                    warn!("skipping frame: {err}");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Destroys every overlay and abandons pending discoveries.
    pub fn shutdown(&mut self) {
        self.pending.clear();
        let live = self.registry.snapshot();
        if live.is_empty() {
            return;
        }
        for (entity, handle) in &live {
            destroy_handle(*entity, handle);
        }
        info!("session closed, {} overlay(s) destroyed", live.len());
    }

    /// The session's registry.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The scene overlays read from.
    #[must_use]
    pub const fn scene(&self) -> &S {
        &self.scene
    }

    /// The primitive allocator.
    #[must_use]
    pub const fn screen(&self) -> &H {
        &self.screen
    }

    /// The removal-signal source.
    #[must_use]
    pub const fn lifecycle(&self) -> &L {
        &self.lifecycle
    }

    /// The session configuration.
    #[must_use]
    pub const fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Entities still waiting for their parts.
    #[must_use]
    pub const fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn construct(
        &mut self,
        entity: EntityId,
        parts: &ResolvedParts,
    ) -> Result<OverlayHandle, OverlayError> {
        Overlay::spawn(OverlayDeps {
            entity,
            parts,
            scene: &self.scene,
            camera: self.camera.as_ref(),
            screen: &mut self.screen,
            lifecycle: &self.lifecycle,
            registry: &self.registry,
            config: &self.config,
        })
    }
}

impl<S, H, L> Drop for OverlayManager<S, H, L>
where
    S: SceneQuery,
    H: ScreenHost,
    L: LifecycleSource,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn destroy_handle(entity: EntityId, handle: &OverlayHandle) {
    match handle.try_borrow_mut() {
        Ok(mut overlay) => overlay.destroy(),
        Err(_) => warn!("entity {entity}: overlay busy, not destroyed"),
    }
}
