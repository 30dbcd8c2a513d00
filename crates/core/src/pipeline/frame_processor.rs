use std::sync::Arc;
use std::time::Instant;

use crate::compositing::bokeh_compositor::BokehCompositor;
use crate::pipeline::bokeh_settings::BokehSettings;
use crate::pipeline::pipeline_logger::{should_report, PipelineLogger};
use crate::segmentation::domain::segmenter::Segmenter;
use crate::shared::error::BokehError;
use crate::shared::frame::Frame;

/// What happened to a frame on its way through the processor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Background blurred with the given radius.
    Composited { radius: u32 },
    /// Bokeh switched off; the frame passed through unchanged.
    Disabled,
    /// No mask this frame; the sharp frame passed through unchanged.
    UpstreamUnavailable(String),
}

#[derive(Clone, Debug)]
pub struct ProcessedFrame {
    pub frame: Frame,
    pub outcome: FrameOutcome,
}

/// Per-frame pipeline: settings snapshot → segment → composite.
///
/// A missing mask is not an error here: liveness wins and the sharp frame
/// is handed on. Invalid input still fails the call.
pub struct FrameProcessor {
    segmenter: Box<dyn Segmenter>,
    compositor: Arc<BokehCompositor>,
    settings: Arc<BokehSettings>,
    upstream_misses: usize,
}

impl FrameProcessor {
    pub fn new(
        segmenter: Box<dyn Segmenter>,
        compositor: Arc<BokehCompositor>,
        settings: Arc<BokehSettings>,
    ) -> Self {
        Self {
            segmenter,
            compositor,
            settings,
            upstream_misses: 0,
        }
    }

    /// Frames passed through so far because no mask was available.
    pub fn upstream_misses(&self) -> usize {
        self.upstream_misses
    }

    pub fn process(
        &mut self,
        frame: Frame,
        timestamp_ms: u64,
        logger: &mut dyn PipelineLogger,
    ) -> Result<ProcessedFrame, BokehError> {
        let snapshot = self.settings.snapshot();
        if !snapshot.enabled {
            return Ok(ProcessedFrame {
                frame,
                outcome: FrameOutcome::Disabled,
            });
        }

        let t0 = Instant::now();
        let mask = match self.segmenter.segment(&frame, timestamp_ms) {
            Ok(mask) => mask,
            Err(BokehError::UpstreamUnavailable(reason)) => {
                self.upstream_misses += 1;
                if should_report(self.upstream_misses) {
                    log::warn!(
                        "No mask for frame {} ({reason}), passing through ({} so far)",
                        frame.index(),
                        self.upstream_misses
                    );
                }
                return Ok(ProcessedFrame {
                    frame,
                    outcome: FrameOutcome::UpstreamUnavailable(reason),
                });
            }
            Err(e) => return Err(e),
        };
        logger.timing("segment", t0.elapsed().as_secs_f64() * 1000.0);

        let t1 = Instant::now();
        let radius = self.compositor.blur_parameters(snapshot.intensity).radius;
        let composited = self
            .compositor
            .composite(&frame, &mask, snapshot.intensity)?;
        logger.timing("composite", t1.elapsed().as_secs_f64() * 1000.0);
        logger.metric("radius", radius as f64);

        Ok(ProcessedFrame {
            frame: composited,
            outcome: FrameOutcome::Composited { radius },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositing::intensity::BokehIntensity;
    use crate::pipeline::pipeline_logger::{NullPipelineLogger, StdoutPipelineLogger};
    use crate::segmentation::domain::segmenter::FixedMaskSegmenter;
    use crate::shared::confidence_mask::ConfidenceMask;

    struct UnavailableSegmenter;

    impl Segmenter for UnavailableSegmenter {
        fn segment(&mut self, _frame: &Frame, _ts: u64) -> Result<ConfidenceMask, BokehError> {
            Err(BokehError::upstream("model busy"))
        }
    }

    struct EmptyMaskSegmenter;

    impl Segmenter for EmptyMaskSegmenter {
        fn segment(&mut self, _frame: &Frame, _ts: u64) -> Result<ConfidenceMask, BokehError> {
            Ok(ConfidenceMask::uniform(0, 0, 0.0))
        }
    }

    fn checker_frame() -> Frame {
        let mut frame = Frame::filled(16, 16, &[0, 0, 0], 9);
        for (i, px) in frame.data_mut().chunks_mut(3).enumerate() {
            if (i % 16 + i / 16) % 2 == 0 {
                px.copy_from_slice(&[255, 255, 255]);
            }
        }
        frame
    }

    fn processor(segmenter: Box<dyn Segmenter>, enabled: bool) -> FrameProcessor {
        FrameProcessor::new(
            segmenter,
            Arc::new(BokehCompositor::default()),
            Arc::new(BokehSettings::new(enabled, BokehIntensity::FULL)),
        )
    }

    #[test]
    fn test_disabled_passes_frame_through() {
        let mut p = processor(
            Box::new(FixedMaskSegmenter::new(ConfidenceMask::uniform(4, 4, 0.0))),
            false,
        );
        let frame = checker_frame();
        let out = p.process(frame.clone(), 0, &mut NullPipelineLogger).unwrap();
        assert_eq!(out.outcome, FrameOutcome::Disabled);
        assert_eq!(out.frame, frame);
    }

    #[test]
    fn test_upstream_unavailable_passes_frame_through() {
        let mut p = processor(Box::new(UnavailableSegmenter), true);
        let frame = checker_frame();
        let out = p.process(frame.clone(), 0, &mut NullPipelineLogger).unwrap();
        assert_eq!(
            out.outcome,
            FrameOutcome::UpstreamUnavailable("model busy".to_string())
        );
        assert_eq!(out.frame, frame);
        assert_eq!(p.upstream_misses(), 1);
    }

    #[test]
    fn test_upstream_misses_are_counted_across_frames() {
        let mut p = processor(Box::new(UnavailableSegmenter), true);
        for _ in 0..45 {
            p.process(checker_frame(), 0, &mut NullPipelineLogger).unwrap();
        }
        assert_eq!(p.upstream_misses(), 45);
    }

    #[test]
    fn test_enabled_composites_with_snapshot_intensity() {
        let mut p = processor(
            Box::new(FixedMaskSegmenter::new(ConfidenceMask::uniform(4, 4, 0.0))),
            true,
        );
        let mut logger = StdoutPipelineLogger::new(10);
        let frame = checker_frame();
        let out = p.process(frame.clone(), 33, &mut logger).unwrap();
        assert_eq!(out.outcome, FrameOutcome::Composited { radius: 25 });
        assert_ne!(out.frame, frame);
        assert_eq!(out.frame.index(), 9);
        assert_eq!(logger.timings_for("segment").unwrap().len(), 1);
        assert_eq!(logger.timings_for("composite").unwrap().len(), 1);
    }

    #[test]
    fn test_settings_change_applies_to_next_frame() {
        let settings = Arc::new(BokehSettings::new(true, BokehIntensity::FULL));
        let mut p = FrameProcessor::new(
            Box::new(FixedMaskSegmenter::new(ConfidenceMask::uniform(4, 4, 0.0))),
            Arc::new(BokehCompositor::default()),
            Arc::clone(&settings),
        );
        settings.set_intensity(BokehIntensity::NONE);
        let frame = checker_frame();
        let out = p.process(frame.clone(), 0, &mut NullPipelineLogger).unwrap();
        assert_eq!(out.outcome, FrameOutcome::Composited { radius: 0 });
        assert_eq!(out.frame, frame);
    }

    #[test]
    fn test_invalid_mask_is_error() {
        let mut p = processor(Box::new(EmptyMaskSegmenter), true);
        let result = p.process(checker_frame(), 0, &mut NullPipelineLogger);
        assert!(matches!(result, Err(BokehError::InvalidInput(_))));
    }
}
