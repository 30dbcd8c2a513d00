use crate::blurring::domain::frame_blurrer::FrameBlurrer;
use crate::shared::error::BokehError;
use crate::shared::frame::Frame;

use super::stack_blur;

/// CPU blurrer using the running-sum tent kernel.
///
/// Colour channels are blurred independently; alpha is left as-is.
#[derive(Clone, Copy, Debug, Default)]
pub struct StackBlurrer;

impl StackBlurrer {
    pub fn new() -> Self {
        Self
    }
}

impl FrameBlurrer for StackBlurrer {
    fn blur(&self, frame: &mut Frame, radius: u32) -> Result<(), BokehError> {
        let radius = stack_blur::clamp_radius(radius);
        if radius == 0 {
            return Ok(());
        }
        let width = frame.width() as usize;
        let height = frame.height() as usize;
        let channels = frame.channels() as usize;
        log::trace!("Blurring {width}x{height} frame {} (radius={radius})", frame.index());
        stack_blur::stack_blur(frame.data_mut(), width, height, channels, radius);
        Ok(())
    }
}
