//! Numeric conversion helpers used by the label formatter.
//!
//! Label text shows whole numbers only. These utilities floor floating-point
//! values into integer domains without panicking on non-finite or negative
//! input.

/// Floor the value and convert to `u32`, clamping into the `u32` domain.
///
/// Non-finite input maps to `0`.
///
/// # Examples
/// ```
/// use rigsight::numeric::floor_to_u32;
/// assert_eq!(floor_to_u32(12.7), 12);
/// assert_eq!(floor_to_u32(-3.0), 0);
/// assert_eq!(floor_to_u32(f32::NAN), 0);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The floored value is clamped to the u32 bounds before casting."
)]
#[must_use]
pub fn floor_to_u32(value: f32) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let floored = f64::from(value).floor();
    floored.clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Whole-number percentage of `part` relative to `whole`, floored.
///
/// A non-positive `whole` yields `0` rather than dividing by zero.
///
/// # Examples
/// ```
/// use rigsight::numeric::floor_percent;
/// assert_eq!(floor_percent(50.0, 100.0), 50);
/// assert_eq!(floor_percent(1.0, 3.0), 33);
/// assert_eq!(floor_percent(10.0, 0.0), 0);
/// ```
#[must_use]
pub fn floor_percent(part: f32, whole: f32) -> u32 {
    if whole <= 0.0 || !whole.is_finite() {
        return 0;
    }
    floor_to_u32(part / whole * 100.0)
}
