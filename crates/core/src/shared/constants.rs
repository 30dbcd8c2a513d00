/// Hard ceiling on any blur or feather radius.
pub const MAX_RADIUS: u32 = 25;

/// Radius used at intensity 0. Zero keeps the floor of the range an exact no-op.
pub const DEFAULT_MIN_RADIUS: u32 = 0;
pub const DEFAULT_MAX_RADIUS: u32 = MAX_RADIUS;

/// Mask feathering applied before blending to soften the subject cutout.
pub const DEFAULT_FEATHER_RADIUS: u32 = 5;

/// Exposure compensation range, in EV stops.
pub const MIN_EXPOSURE_EV: f32 = -2.0;
pub const MAX_EXPOSURE_EV: f32 = 2.0;

/// Compensation steps per EV on the reference camera. Device specific.
pub const DEFAULT_EV_STEPS_PER_UNIT: u32 = 6;

pub const ISO_VALUES: &[u32] = &[100, 200, 400, 800, 1600, 3200, 6400];

pub const CONFIG_DIR_NAME: &str = "Bokeh";
pub const CONFIG_FILE_NAME: &str = "compositor.json";
