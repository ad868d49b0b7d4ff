//! Library crate providing per-entity screen-space overlays.
//!
//! Each tracked entity gets a bounding box, a ten-segment skeleton and a
//! name/stats label, recomputed every frame from one viewer camera. The host
//! supplies the scene, camera, screen primitives and removal signals through
//! the traits in [`host`]; [`manager::OverlayManager`] drives everything else.
pub mod config;
pub mod constants;
pub mod disposal;
pub mod error;
pub mod headless;
pub mod host;
pub mod logging;
pub mod manager;
pub mod numeric;
pub mod overlay;
pub mod projection;
pub mod registry;
pub mod rig;
pub use constants::*;

// Re-export commonly used items
pub use config::{ConfigError, OverlayConfig};
pub use disposal::{Disposable, Dispose, ResourceBin, ScheduledTask, Subscription};
pub use error::{OverlayError, ReleaseError};
pub use host::{
    Camera, EntityId, LabelPrimitive, LifecycleSource, LinePrimitive, PartHandle, Projection,
    SceneQuery, ScreenHost, Vitals,
};
pub use logging::init as init_logging;
pub use manager::{FrameReport, OverlayManager, Tracking};
pub use overlay::{FrameOutcome, Overlay, OverlayHandle, OverlayState};
pub use projection::{line_from_points, project_rig, LineGeometry};
pub use registry::Registry;

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use rigsight::prelude::*;
    //! ```

    pub use crate::headless::{HeadlessLifecycle, HeadlessScene, HeadlessScreen, PerspectiveCamera};
    pub use crate::host::{EntityId, SceneQuery};
    pub use crate::manager::{FrameReport, OverlayManager, Tracking};
    pub use crate::OverlayConfig;
}
