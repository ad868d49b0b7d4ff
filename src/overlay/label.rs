//! Label text and placement.

use glam::Vec2;

use crate::host::Vitals;
use crate::numeric::{floor_percent, floor_to_u32};

/// Second label line: distance, health over max health and percentage.
///
/// Every figure is floored.
///
/// # Examples
/// ```
/// use rigsight::host::Vitals;
/// use rigsight::overlay::format_stats;
///
/// let vitals = Vitals { name: "Ada".into(), health: 50.0, max_health: 100.0 };
/// assert_eq!(format_stats(12.7, &vitals), "[12] [50/100] [50%]");
/// ```
#[must_use]
pub fn format_stats(depth: f32, vitals: &Vitals) -> String {
    format!(
        "[{}] [{}/{}] [{}%]",
        floor_to_u32(depth),
        floor_to_u32(vitals.health),
        floor_to_u32(vitals.max_health),
        floor_percent(vitals.health, vitals.max_health),
    )
}

/// Top-centre of a label of `height` pixels whose bottom edge rests on
/// `top`.
#[must_use]
pub fn label_position(top: Vec2, height: f32) -> Vec2 {
    top - Vec2::new(0.0, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn vitals(health: f32, max_health: f32) -> Vitals {
        Vitals {
            name: "Ada".to_owned(),
            health,
            max_health,
        }
    }

    #[rstest]
    #[case::half(12.7, 50.0, 100.0, "[12] [50/100] [50%]")]
    #[case::fractional_health(3.2, 33.9, 100.0, "[3] [33/100] [33%]")]
    #[case::dead(40.0, 0.0, 150.0, "[40] [0/150] [0%]")]
    #[case::zero_max(1.0, 10.0, 0.0, "[1] [10/0] [0%]")]
    fn stats_line_is_floored(
        #[case] depth: f32,
        #[case] health: f32,
        #[case] max_health: f32,
        #[case] expected: &str,
    ) {
        assert_eq!(format_stats(depth, &vitals(health, max_health)), expected);
    }

    #[test]
    fn label_sits_above_the_top_point() {
        assert_eq!(label_position(Vec2::new(100.0, 50.0), 28.0), Vec2::new(100.0, 22.0));
    }
}
