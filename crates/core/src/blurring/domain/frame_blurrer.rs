use crate::shared::error::BokehError;
use crate::shared::frame::Frame;

/// Domain interface for whole-frame blur.
///
/// Implementations modify the frame in-place (`&mut Frame`) and must be
/// stateless across calls so one instance can serve concurrent frames.
pub trait FrameBlurrer: Send + Sync {
    fn blur(&self, frame: &mut Frame, radius: u32) -> Result<(), BokehError>;
}
