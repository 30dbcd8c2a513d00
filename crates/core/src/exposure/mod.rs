pub mod exposure_math;
pub mod shutter_rule;
