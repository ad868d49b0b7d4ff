//! Body parts a rig attaches to and the names used to find them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::BODY_PART_COUNT;
use crate::host::PartHandle;

/// The seven body parts every rig needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyPart {
    /// Root part carrying the bounding box.
    Root,
    /// Head; its height extends the box upwards.
    Head,
    /// Torso carrying the neck and waist joints.
    Torso,
    /// Left arm carrying the left shoulder and hand.
    LeftArm,
    /// Right arm carrying the right shoulder and hand.
    RightArm,
    /// Left leg carrying the left hip and foot.
    LeftLeg,
    /// Right leg carrying the right hip and foot.
    RightLeg,
}

impl BodyPart {
    /// Every part, in discovery order.
    pub const ALL: [Self; BODY_PART_COUNT] = [
        Self::Root,
        Self::Head,
        Self::Torso,
        Self::LeftArm,
        Self::RightArm,
        Self::LeftLeg,
        Self::RightLeg,
    ];

    /// Lower-case name used in log and error output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Head => "head",
            Self::Torso => "torso",
            Self::LeftArm => "left arm",
            Self::RightArm => "right arm",
            Self::LeftLeg => "left leg",
            Self::RightLeg => "right leg",
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scene name of one body part plus an alternate tried after the wait expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartName {
    /// Name looked up first.
    pub primary: String,
    /// Name tried once the primary's wait has expired.
    #[serde(default)]
    pub fallback: Option<String>,
}

impl PartName {
    /// A name with no fallback.
    #[must_use]
    pub fn new(primary: &str) -> Self {
        Self {
            primary: primary.to_owned(),
            fallback: None,
        }
    }

    /// A name with a fallback.
    #[must_use]
    pub fn with_fallback(primary: &str, fallback: &str) -> Self {
        Self {
            primary: primary.to_owned(),
            fallback: Some(fallback.to_owned()),
        }
    }

    /// Every name this entry may resolve to, primary first.
    #[must_use]
    pub fn candidates(&self) -> Vec<String> {
        std::iter::once(self.primary.clone())
            .chain(self.fallback.clone())
            .collect()
    }
}

/// Scene names for every [`BodyPart`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartNames {
    /// Name of [`BodyPart::Root`].
    pub root: PartName,
    /// Name of [`BodyPart::Head`].
    pub head: PartName,
    /// Name of [`BodyPart::Torso`].
    pub torso: PartName,
    /// Name of [`BodyPart::LeftArm`].
    pub left_arm: PartName,
    /// Name of [`BodyPart::RightArm`].
    pub right_arm: PartName,
    /// Name of [`BodyPart::LeftLeg`].
    pub left_leg: PartName,
    /// Name of [`BodyPart::RightLeg`].
    pub right_leg: PartName,
}

impl Default for PartNames {
    fn default() -> Self {
        Self {
            root: PartName::new("Root"),
            head: PartName::new("Head"),
            torso: PartName::with_fallback("Torso", "UpperTorso"),
            left_arm: PartName::with_fallback("LeftArm", "LeftUpperArm"),
            right_arm: PartName::with_fallback("RightArm", "RightUpperArm"),
            left_leg: PartName::with_fallback("LeftLeg", "LeftUpperLeg"),
            right_leg: PartName::with_fallback("RightLeg", "RightUpperLeg"),
        }
    }
}

impl PartNames {
    /// Names configured for `part`.
    #[must_use]
    pub const fn get(&self, part: BodyPart) -> &PartName {
        match part {
            BodyPart::Root => &self.root,
            BodyPart::Head => &self.head,
            BodyPart::Torso => &self.torso,
            BodyPart::LeftArm => &self.left_arm,
            BodyPart::RightArm => &self.right_arm,
            BodyPart::LeftLeg => &self.left_leg,
            BodyPart::RightLeg => &self.right_leg,
        }
    }
}

/// Handles for every body part of one entity, produced by
/// [`PartDiscovery`](super::PartDiscovery).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedParts {
    /// Root part.
    pub root: PartHandle,
    /// Head.
    pub head: PartHandle,
    /// Torso.
    pub torso: PartHandle,
    /// Left arm.
    pub left_arm: PartHandle,
    /// Right arm.
    pub right_arm: PartHandle,
    /// Left leg.
    pub left_leg: PartHandle,
    /// Right leg.
    pub right_leg: PartHandle,
}

impl ResolvedParts {
    /// Builds the set from a lookup, or `None` if any part is missing.
    pub fn from_lookup(mut lookup: impl FnMut(BodyPart) -> Option<PartHandle>) -> Option<Self> {
        Some(Self {
            root: lookup(BodyPart::Root)?,
            head: lookup(BodyPart::Head)?,
            torso: lookup(BodyPart::Torso)?,
            left_arm: lookup(BodyPart::LeftArm)?,
            right_arm: lookup(BodyPart::RightArm)?,
            left_leg: lookup(BodyPart::LeftLeg)?,
            right_leg: lookup(BodyPart::RightLeg)?,
        })
    }

    /// Handle resolved for `part`.
    #[must_use]
    pub const fn get(&self, part: BodyPart) -> PartHandle {
        match part {
            BodyPart::Root => self.root,
            BodyPart::Head => self.head,
            BodyPart::Torso => self.torso,
            BodyPart::LeftArm => self.left_arm,
            BodyPart::RightArm => self.right_arm,
            BodyPart::LeftLeg => self.left_leg,
            BodyPart::RightLeg => self.right_leg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_part_has_a_distinct_default_name() {
        let names = PartNames::default();
        let mut primaries: Vec<_> = BodyPart::ALL
            .iter()
            .map(|part| names.get(*part).primary.clone())
            .collect();
        primaries.sort();
        primaries.dedup();
        assert_eq!(primaries.len(), BodyPart::ALL.len());
    }

    #[test]
    fn candidates_list_primary_then_fallback() {
        let name = PartName::with_fallback("Torso", "UpperTorso");
        assert_eq!(name.candidates(), vec!["Torso", "UpperTorso"]);
        assert_eq!(PartName::new("Head").candidates(), vec!["Head"]);
    }

    #[test]
    fn from_lookup_fails_on_any_missing_part() {
        let resolved = ResolvedParts::from_lookup(|part| {
            (part != BodyPart::LeftLeg).then_some(PartHandle(part as u64))
        });
        assert!(resolved.is_none());
    }

    #[test]
    fn get_returns_the_matching_handle() {
        let resolved = ResolvedParts::from_lookup(|part| Some(PartHandle(part as u64 + 10)))
            .expect("all parts resolve");
        for part in BodyPart::ALL {
            assert_eq!(resolved.get(part), PartHandle(part as u64 + 10));
        }
    }
}
