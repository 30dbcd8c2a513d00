/// Discrete shutter speeds offered by the camera settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShutterSpeed {
    S1_30,
    S1_50,
    S1_60,
    S1_100,
    S1_120,
    S1_250,
    S1_500,
    S1_1000,
}

impl ShutterSpeed {
    /// Slowest first.
    pub const ALL: &'static [ShutterSpeed] = &[
        ShutterSpeed::S1_30,
        ShutterSpeed::S1_50,
        ShutterSpeed::S1_60,
        ShutterSpeed::S1_100,
        ShutterSpeed::S1_120,
        ShutterSpeed::S1_250,
        ShutterSpeed::S1_500,
        ShutterSpeed::S1_1000,
    ];

    pub fn denominator(self) -> u32 {
        match self {
            ShutterSpeed::S1_30 => 30,
            ShutterSpeed::S1_50 => 50,
            ShutterSpeed::S1_60 => 60,
            ShutterSpeed::S1_100 => 100,
            ShutterSpeed::S1_120 => 120,
            ShutterSpeed::S1_250 => 250,
            ShutterSpeed::S1_500 => 500,
            ShutterSpeed::S1_1000 => 1000,
        }
    }

    pub fn seconds(self) -> f64 {
        1.0 / self.denominator() as f64
    }
}

impl std::fmt::Display for ShutterSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "1/{}", self.denominator())
    }
}

/// 180° shutter rule: the enumerated speed closest to `1 / (2 * fps)`.
///
/// Non-positive or non-finite frame rates fall back to the slowest speed.
pub fn recommended_shutter_speed(frame_rate_fps: f64) -> ShutterSpeed {
    if !frame_rate_fps.is_finite() || frame_rate_fps <= 0.0 {
        return ShutterSpeed::ALL[0];
    }
    let target = 1.0 / (2.0 * frame_rate_fps);
    let mut best = ShutterSpeed::ALL[0];
    for &speed in ShutterSpeed::ALL {
        if (speed.seconds() - target).abs() < (best.seconds() - target).abs() {
            best = speed;
        }
    }
    best
}
