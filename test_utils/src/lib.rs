//! Utility helpers for tests.
//!
//! [`SessionFixture`] wires an [`OverlayManager`] to the in-memory host and
//! keeps its own handles to the scene, screen and lifecycle source so tests
//! can drive the session and inspect what was drawn.

use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};
use rigsight::headless::{
    HeadlessLabel, HeadlessLifecycle, HeadlessScene, HeadlessScreen, PerspectiveCamera,
};
use rigsight::{EntityId, FrameReport, OverlayConfig, OverlayManager, Tracking};

/// Viewport used by [`default_camera`].
pub const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

/// Manager type produced by [`SessionFixture`].
pub type HeadlessManager = OverlayManager<HeadlessScene, HeadlessScreen, HeadlessLifecycle>;

/// Camera at the origin looking down -Z with a 60 degree field of view.
///
/// # Examples
/// ```
/// use rigsight::Camera;
/// use test_utils::default_camera;
///
/// let projection = default_camera().project(glam::Vec3::new(0.0, 0.0, -5.0));
/// assert!((projection.depth - 5.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn default_camera() -> PerspectiveCamera {
    PerspectiveCamera::looking_at(Vec3::ZERO, Vec3::NEG_Z, VIEWPORT, 60.0)
}

/// A headless overlay session with a controllable clock.
pub struct SessionFixture {
    /// The session under test.
    pub manager: HeadlessManager,
    /// Shared handle to the scene.
    pub scene: HeadlessScene,
    /// Shared handle to the screen.
    pub screen: HeadlessScreen,
    /// Shared handle to the removal-signal source.
    pub lifecycle: HeadlessLifecycle,
    /// Current simulated time.
    pub now: Instant,
}

impl SessionFixture {
    /// Creates a session using [`default_camera`] and `config`.
    #[must_use]
    pub fn with_config(config: OverlayConfig) -> Self {
        let scene = HeadlessScene::new();
        let screen = HeadlessScreen::new();
        let lifecycle = HeadlessLifecycle::new();
        let manager = OverlayManager::new(
            config,
            default_camera(),
            scene.clone(),
            screen.clone(),
            lifecycle.clone(),
        );
        Self {
            manager,
            scene,
            screen,
            lifecycle,
            now: Instant::now(),
        }
    }

    /// Spawns a humanoid at `position` using the session's part names.
    #[must_use]
    pub fn spawn(&self, name: &str, position: Vec3) -> EntityId {
        self.scene
            .spawn_humanoid(name, position, &self.manager.config().parts)
    }

    /// Spawns and tracks a humanoid in one step.
    pub fn spawn_tracked(&mut self, name: &str, position: Vec3) -> (EntityId, Tracking) {
        let entity = self.spawn(name, position);
        let tracking = self.manager.track(entity, self.now);
        (entity, tracking)
    }

    /// Advances the clock by `elapsed` and runs one frame.
    pub fn tick_after(&mut self, elapsed: Duration) -> FrameReport {
        self.now += elapsed;
        self.manager.tick(self.now)
    }

    /// Runs one frame without advancing the clock.
    pub fn tick(&mut self) -> FrameReport {
        self.tick_after(Duration::ZERO)
    }

    /// Removes `entity` from the scene and raises its removal signal.
    ///
    /// Returns the number of removal listeners notified.
    #[must_use]
    pub fn remove(&self, entity: EntityId) -> usize {
        self.scene.despawn(entity);
        self.lifecycle.emit_removed(entity)
    }

    /// Labels that have not been released, in allocation order.
    #[must_use]
    pub fn live_labels(&self) -> Vec<HeadlessLabel> {
        self.screen
            .labels()
            .into_iter()
            .filter(|label| !label.removed)
            .collect()
    }
}

impl Default for SessionFixture {
    fn default() -> Self {
        Self::with_config(OverlayConfig::default())
    }
}
