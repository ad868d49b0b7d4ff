//! Named point sets shared by the rig and its projection.
//!
//! Both structs are generic so the same shape carries anchor ids in a
//! [`Rig`](super::Rig) and screen projections in a
//! [`ProjectedRig`](crate::projection::ProjectedRig).

/// The seven points of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPoints<T> {
    /// Centre of the root part.
    pub center: T,
    /// Above the head, on the root's vertical axis.
    pub top: T,
    /// Below the feet, on the root's vertical axis.
    pub bottom: T,
    /// Top edge, towards the root's left.
    pub top_left: T,
    /// Top edge, towards the root's right.
    pub top_right: T,
    /// Bottom edge, towards the root's right.
    pub bottom_right: T,
    /// Bottom edge, towards the root's left.
    pub bottom_left: T,
}

impl<T: Copy> BoxPoints<T> {
    /// Maps every point in field order, stopping at the first error.
    ///
    /// # Errors
    /// Returns the first error produced by `f`.
    pub fn try_map<U, E>(&self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<BoxPoints<U>, E> {
        Ok(BoxPoints {
            center: f(self.center)?,
            top: f(self.top)?,
            bottom: f(self.bottom)?,
            top_left: f(self.top_left)?,
            top_right: f(self.top_right)?,
            bottom_right: f(self.bottom_right)?,
            bottom_left: f(self.bottom_left)?,
        })
    }
}

/// The eleven joints of a skeleton.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonJoints<T> {
    /// Top of the head.
    pub face: T,
    /// Top of the torso.
    pub neck: T,
    /// Bottom of the torso.
    pub waist: T,
    /// Top of the left arm.
    pub left_shoulder: T,
    /// Top of the right arm.
    pub right_shoulder: T,
    /// Bottom of the left arm.
    pub left_hand: T,
    /// Bottom of the right arm.
    pub right_hand: T,
    /// Top of the left leg.
    pub left_hip: T,
    /// Top of the right leg.
    pub right_hip: T,
    /// Bottom of the left leg.
    pub left_foot: T,
    /// Bottom of the right leg.
    pub right_foot: T,
}

impl<T: Copy> SkeletonJoints<T> {
    /// Maps every joint in field order, stopping at the first error.
    ///
    /// # Errors
    /// Returns the first error produced by `f`.
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(T) -> Result<U, E>,
    ) -> Result<SkeletonJoints<U>, E> {
        Ok(SkeletonJoints {
            face: f(self.face)?,
            neck: f(self.neck)?,
            waist: f(self.waist)?,
            left_shoulder: f(self.left_shoulder)?,
            right_shoulder: f(self.right_shoulder)?,
            left_hand: f(self.left_hand)?,
            right_hand: f(self.right_hand)?,
            left_hip: f(self.left_hip)?,
            right_hip: f(self.right_hip)?,
            left_foot: f(self.left_foot)?,
            right_foot: f(self.right_foot)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_box() -> BoxPoints<u8> {
        BoxPoints {
            center: 0,
            top: 1,
            bottom: 2,
            top_left: 3,
            top_right: 4,
            bottom_right: 5,
            bottom_left: 6,
        }
    }

    #[test]
    fn try_map_visits_in_field_order_and_stops_early() {
        let mut visited = Vec::new();
        let result: Result<BoxPoints<u8>, u8> = numbered_box().try_map(|value| {
            visited.push(value);
            if value == 2 {
                Err(value)
            } else {
                Ok(value)
            }
        });
        assert_eq!(result, Err(2));
        assert_eq!(visited, vec![0, 1, 2]);
    }

    #[test]
    fn try_map_preserves_positions() {
        let doubled: Result<BoxPoints<u16>, ()> =
            numbered_box().try_map(|value| Ok(u16::from(value) * 2));
        assert_eq!(
            doubled,
            Ok(BoxPoints {
                center: 0,
                top: 2,
                bottom: 4,
                top_left: 6,
                top_right: 8,
                bottom_right: 10,
                bottom_left: 12,
            })
        );
    }
}
