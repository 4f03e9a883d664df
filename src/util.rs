/// Rounds a value to the 7 decimal digits used when displaying component values.
///
/// Display-only: the conversion algorithms never round. Non-finite values pass through
/// unchanged so that a NaN shows up as a NaN rather than as a panic.
pub(crate) fn to_display_precision(value: f64) -> f64 {
    if value.is_finite() {
        (value * 1e7).round() / 1e7
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::to_display_precision;

    #[test]
    fn rounds_to_seven_digits() {
        assert_eq!(to_display_precision(0.123_456_789), 0.123_456_8);
        assert_eq!(to_display_precision(-0.123_456_749), -0.123_456_7);
        assert_eq!(to_display_precision(2.), 2.);
    }

    #[test]
    fn passes_non_finite_values_through() {
        assert!(to_display_precision(f64::NAN).is_nan());
        assert_eq!(to_display_precision(f64::INFINITY), f64::INFINITY);
    }
}
