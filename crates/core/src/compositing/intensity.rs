use crate::shared::constants::MAX_RADIUS;

/// User-facing blur strength in `[0, 1]`.
///
/// Out-of-range input is clamped rather than rejected; NaN reads as 0.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct BokehIntensity(f32);

impl BokehIntensity {
    pub const NONE: BokehIntensity = BokehIntensity(0.0);
    pub const FULL: BokehIntensity = BokehIntensity(1.0);

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::NONE;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl From<f32> for BokehIntensity {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

/// Blur radius resolved from an intensity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlurParameters {
    pub radius: u32,
}

impl BlurParameters {
    /// Linear interpolation between `min_radius` and `max_radius`, rounded and
    /// capped at [`MAX_RADIUS`].
    pub fn from_intensity(intensity: BokehIntensity, min_radius: u32, max_radius: u32) -> Self {
        let min = min_radius.min(MAX_RADIUS) as f32;
        let max = max_radius.min(MAX_RADIUS) as f32;
        let radius = (min + (max - min) * intensity.value()).round();
        Self {
            radius: (radius.max(0.0) as u32).min(MAX_RADIUS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(-1.0, 0.0)]
    #[case(0.0, 0.0)]
    #[case(0.4, 0.4)]
    #[case(1.0, 1.0)]
    #[case(3.5, 1.0)]
    #[case(f32::NAN, 0.0)]
    #[case(f32::INFINITY, 1.0)]
    fn test_intensity_clamps(#[case] input: f32, #[case] expected: f32) {
        assert_relative_eq!(BokehIntensity::new(input).value(), expected);
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(1.0, 25)]
    #[case(0.5, 13)] // 12.5 rounds away from zero
    #[case(0.2, 5)]
    fn test_radius_from_default_range(#[case] intensity: f32, #[case] expected: u32) {
        let params = BlurParameters::from_intensity(BokehIntensity::new(intensity), 0, 25);
        assert_eq!(params.radius, expected);
    }

    #[test]
    fn test_radius_respects_custom_range() {
        let params = BlurParameters::from_intensity(BokehIntensity::NONE, 4, 10);
        assert_eq!(params.radius, 4);
        let params = BlurParameters::from_intensity(BokehIntensity::FULL, 4, 10);
        assert_eq!(params.radius, 10);
    }

    #[test]
    fn test_radius_capped_at_ceiling() {
        let params = BlurParameters::from_intensity(BokehIntensity::FULL, 0, 400);
        assert_eq!(params.radius, MAX_RADIUS);
    }
}
