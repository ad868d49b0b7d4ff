//! Anchor rigs attached to an entity's body parts.
//!
//! A rig is built in two steps. [`PartDiscovery`] waits, frame by frame, for
//! the seven [`BodyPart`]s to appear under their configured names. Once they
//! resolve, [`RigBuilder`] reads their sizes and attaches:
//!
//! - seven box points on the root part (centre, top, bottom and four corners
//!   chained off top and bottom), and
//! - eleven skeleton joints, each half a part-height above or below the
//!   centre of its owning part.
//!
//! Points are stored in an [`AnchorTree`] as local offsets, so their world
//! positions always follow the parts they hang from.

mod anchor;
mod builder;
mod discovery;
mod parts;
mod points;

pub use anchor::{Anchor, AnchorId, AnchorParent, AnchorTree};
pub use builder::{BoxExtents, Rig, RigBuilder};
pub use discovery::PartDiscovery;
pub use parts::{BodyPart, PartName, PartNames, ResolvedParts};
pub use points::{BoxPoints, SkeletonJoints};
