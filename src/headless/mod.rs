//! In-memory host implementations.
//!
//! These back the demo binary and the integration tests. Every type is a
//! cheap, cloneable handle over shared state, so a caller can hand one clone
//! to an [`OverlayManager`](crate::manager::OverlayManager) and keep another
//! to drive and inspect the session.

mod camera;
mod lifecycle;
mod scene;
mod screen;

pub use camera::PerspectiveCamera;
pub use lifecycle::HeadlessLifecycle;
pub use scene::HeadlessScene;
pub use screen::{HeadlessLabel, HeadlessLine, HeadlessScreen};
