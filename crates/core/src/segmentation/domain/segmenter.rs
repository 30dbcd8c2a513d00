use crate::shared::confidence_mask::ConfidenceMask;
use crate::shared::error::BokehError;
use crate::shared::frame::Frame;

/// Domain interface for foreground segmentation.
///
/// The model itself lives outside the core. Implementations return a
/// completed mask before compositing begins, or
/// [`BokehError::UpstreamUnavailable`] when none could be produced in time.
/// Implementations may be stateful (e.g. temporal smoothing), hence
/// `&mut self`.
pub trait Segmenter: Send {
    fn segment(&mut self, frame: &Frame, timestamp_ms: u64) -> Result<ConfidenceMask, BokehError>;
}

/// Segmenter that always reports the same mask. Useful for still images with
/// a precomputed mask and for tests.
pub struct FixedMaskSegmenter {
    mask: ConfidenceMask,
}

impl FixedMaskSegmenter {
    pub fn new(mask: ConfidenceMask) -> Self {
        Self { mask }
    }
}

impl Segmenter for FixedMaskSegmenter {
    fn segment(
        &mut self,
        _frame: &Frame,
        _timestamp_ms: u64,
    ) -> Result<ConfidenceMask, BokehError> {
        Ok(self.mask.clone())
    }
}
