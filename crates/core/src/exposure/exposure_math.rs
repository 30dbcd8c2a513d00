use crate::shared::constants::{ISO_VALUES, MAX_EXPOSURE_EV, MIN_EXPOSURE_EV};

/// Snaps to the closest supported ISO. Ties go to the lower value.
pub fn nearest_iso(requested: i64) -> u32 {
    let mut best = ISO_VALUES[0];
    for &iso in ISO_VALUES {
        if (iso as i64).abs_diff(requested) < (best as i64).abs_diff(requested) {
            best = iso;
        }
    }
    best
}

/// Clamps exposure compensation to the supported EV range. NaN reads as 0.
pub fn clamp_exposure(ev: f32) -> f32 {
    if ev.is_nan() {
        return 0.0;
    }
    ev.clamp(MIN_EXPOSURE_EV, MAX_EXPOSURE_EV)
}

/// Converts an EV offset into a device compensation index.
///
/// `steps_per_ev` is camera-specific calibration; query the device's
/// compensation step rather than assuming the default.
pub fn exposure_compensation_index(ev: f32, steps_per_ev: u32) -> i32 {
    (clamp_exposure(ev) * steps_per_ev as f32).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::DEFAULT_EV_STEPS_PER_UNIT;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(150, 100)]
    #[case(151, 200)]
    #[case(6500, 6400)]
    #[case(0, 100)]
    #[case(-50, 100)]
    #[case(400, 400)]
    #[case(600, 400)]
    #[case(2400, 1600)]
    #[case(1_000_000, 6400)]
    #[case(i64::MIN, 100)]
    #[case(i64::MAX, 6400)]
    fn test_nearest_iso(#[case] requested: i64, #[case] expected: u32) {
        assert_eq!(nearest_iso(requested), expected);
    }

    #[rstest]
    #[case(-5.0, -2.0)]
    #[case(-2.0, -2.0)]
    #[case(0.7, 0.7)]
    #[case(3.0, 2.0)]
    #[case(f32::NAN, 0.0)]
    #[case(f32::NEG_INFINITY, -2.0)]
    fn test_clamp_exposure(#[case] ev: f32, #[case] expected: f32) {
        assert_relative_eq!(clamp_exposure(ev), expected);
    }

    #[rstest]
    #[case(1.0, 6)]
    #[case(-0.5, -3)]
    #[case(9.0, 12)]
    #[case(0.0, 0)]
    fn test_compensation_index_default_steps(#[case] ev: f32, #[case] expected: i32) {
        assert_eq!(exposure_compensation_index(ev, DEFAULT_EV_STEPS_PER_UNIT), expected);
    }

    #[test]
    fn test_compensation_index_other_calibration() {
        assert_eq!(exposure_compensation_index(1.0, 3), 3);
        assert_eq!(exposure_compensation_index(2.0, 2), 4);
    }
}
