use crate::blurring::domain::frame_blurrer::FrameBlurrer;
use crate::blurring::infrastructure::stack_blurrer::StackBlurrer;
use crate::compositing::blend::blend_over;
use crate::compositing::intensity::{BlurParameters, BokehIntensity};
use crate::masking::mask_processor::{feather_mask, scale_mask};
use crate::shared::confidence_mask::ConfidenceMask;
use crate::shared::config::CompositorConfig;
use crate::shared::error::BokehError;
use crate::shared::frame::Frame;

/// Blurs the background of a frame while keeping the segmented subject sharp.
///
/// Holds only immutable configuration, so one instance can be shared across
/// threads and invoked on independent frame/mask pairs concurrently.
pub struct BokehCompositor {
    blurrer: Box<dyn FrameBlurrer>,
    config: CompositorConfig,
}

impl BokehCompositor {
    pub fn new(config: CompositorConfig) -> Self {
        Self::with_blurrer(Box::new(StackBlurrer::new()), config)
    }

    pub fn with_blurrer(blurrer: Box<dyn FrameBlurrer>, config: CompositorConfig) -> Self {
        Self {
            blurrer,
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    pub fn blur_parameters(&self, intensity: BokehIntensity) -> BlurParameters {
        BlurParameters::from_intensity(intensity, self.config.min_radius, self.config.max_radius)
    }

    /// Produces a new frame: blurred background, sharp foreground blended
    /// over it through the feathered mask.
    ///
    /// `frame` is left untouched. Zero-sized inputs fail with
    /// [`BokehError::InvalidInput`].
    pub fn composite(
        &self,
        frame: &Frame,
        mask: &ConfidenceMask,
        intensity: BokehIntensity,
    ) -> Result<Frame, BokehError> {
        validate(frame, mask)?;

        let params = self.blur_parameters(intensity);
        log::debug!(
            "Compositing frame {} ({}x{}, intensity={:.2}, radius={}, feather={})",
            frame.index(),
            frame.width(),
            frame.height(),
            intensity.value(),
            params.radius,
            self.config.feather_radius
        );

        let mut background = frame.clone();
        self.blurrer.blur(&mut background, params.radius)?;

        let scaled = scale_mask(mask, frame.width(), frame.height(), self.config.resample)?;
        let alpha = feather_mask(scaled, self.config.feather_radius);

        blend_over(frame, &background, &alpha)
    }
}

impl Default for BokehCompositor {
    fn default() -> Self {
        Self::new(CompositorConfig::default())
    }
}

/// Composites with the default configuration.
pub fn composite(
    frame: &Frame,
    mask: &ConfidenceMask,
    intensity: BokehIntensity,
) -> Result<Frame, BokehError> {
    BokehCompositor::default().composite(frame, mask, intensity)
}

fn validate(frame: &Frame, mask: &ConfidenceMask) -> Result<(), BokehError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(BokehError::invalid(format!(
            "frame dimensions must be non-zero, got {}x{}",
            frame.width(),
            frame.height()
        )));
    }
    if frame.channels() != 3 && frame.channels() != 4 {
        return Err(BokehError::invalid(format!(
            "frame must have 3 or 4 channels, got {}",
            frame.channels()
        )));
    }
    let expected =
        (frame.width() as usize) * (frame.height() as usize) * (frame.channels() as usize);
    if frame.data().len() != expected {
        return Err(BokehError::invalid(format!(
            "frame data length {} does not match declared size {expected}",
            frame.data().len()
        )));
    }
    if mask.width() == 0 || mask.height() == 0 {
        return Err(BokehError::invalid(format!(
            "mask dimensions must be non-zero, got {}x{}",
            mask.width(),
            mask.height()
        )));
    }
    Ok(())
}
