//! Error types surfaced by overlay construction, rendering and teardown.

use thiserror::Error;

use crate::host::EntityId;
use crate::rig::BodyPart;

/// Failures that stop an overlay from being built or from drawing a frame.
///
/// Each error is scoped to one entity. Callers drop or skip that entity and
/// carry on with the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// A required body part was missing after its bounded discovery wait.
    #[error("entity {entity}: body part {part} not found (tried {})", .tried.join(", "))]
    PartNotFound {
        /// Entity whose rig could not be built.
        entity: EntityId,
        /// The part that never resolved.
        part: BodyPart,
        /// Names looked up, primary first.
        tried: Vec<String>,
    },
    /// A resolved part stopped answering size queries before the rig was built.
    #[error("entity {entity}: body part {part} detached during rig construction")]
    PartDetached {
        /// Entity whose rig could not be built.
        entity: EntityId,
        /// The part that vanished.
        part: BodyPart,
    },
    /// The registry already holds a live overlay for this entity.
    #[error("entity {entity} already has a live overlay")]
    AlreadyTracked {
        /// The duplicate entity.
        entity: EntityId,
    },
    /// A screen primitive or the overlay itself was borrowed elsewhere.
    #[error("entity {entity}: overlay state is borrowed elsewhere")]
    Busy {
        /// Entity whose frame was skipped.
        entity: EntityId,
    },
}

/// Failure reported while releasing a resource held by a
/// [`ResourceBin`](crate::disposal::ResourceBin).
///
/// The bin logs these and continues with the next entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReleaseError {
    /// The resource is mutably borrowed and cannot be released right now.
    #[error("resource is borrowed elsewhere")]
    Busy,
    /// The resource had already been released.
    #[error("resource was already released")]
    AlreadyReleased,
    /// The host refused the release.
    #[error("host refused release: {0}")]
    Host(String),
}
