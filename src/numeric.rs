//! Numeric conversion helpers used across the project.
//!
//! These utilities guard conversions between the floating-point display
//! domain and integer raster indices.

/// Widen a raster dimension into `f32`.
#[expect(
    clippy::cast_precision_loss,
    reason = "Raster dimensions are far below 2^24, where f32 stays exact."
)]
#[must_use]
pub const fn dimension_to_f32(value: u32) -> f32 {
    value as f32
}

/// Round half-up and convert to an index into `0..extent`.
///
/// Returns `None` for non-finite input and for results outside the range, so
/// callers treat "off the raster" and "garbage coordinates" alike.
///
/// Rounding is `floor(value + 0.5)`; `-0.5` therefore lands on index 0 and
/// `2.5` on index 3.
///
/// # Examples
///
/// ```
/// use trackfolio::numeric::round_to_index;
/// assert_eq!(round_to_index(2.5, 10), Some(3));
/// assert_eq!(round_to_index(-0.5, 10), Some(0));
/// assert_eq!(round_to_index(-0.6, 10), None);
/// assert_eq!(round_to_index(9.6, 10), None);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The rounded value is validated against 0..extent before casting."
)]
#[must_use]
pub fn round_to_index(value: f32, extent: u32) -> Option<u32> {
    if !value.is_finite() {
        return None;
    }
    let rounded = (f64::from(value) + 0.5).floor();
    if rounded < 0.0 || rounded >= f64::from(extent) {
        return None;
    }
    Some(rounded as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, Some(0))]
    #[case(0.49, Some(0))]
    #[case(0.5, Some(1))]
    #[case(-0.5, Some(0))]
    #[case(-0.51, None)]
    #[case(99.49, Some(99))]
    #[case(99.5, None)]
    #[case(f32::NAN, None)]
    #[case(f32::INFINITY, None)]
    fn rounds_half_up_within_extent(#[case] value: f32, #[case] expected: Option<u32>) {
        assert_eq!(round_to_index(value, 100), expected);
    }

    #[test]
    fn empty_extent_has_no_indices() {
        assert_eq!(round_to_index(0.0, 0), None);
    }
}
