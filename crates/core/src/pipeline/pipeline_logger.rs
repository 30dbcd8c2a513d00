use std::collections::HashMap;
use std::time::Instant;

/// Frames between repeated warnings about the same recurring condition.
pub const WARN_EVERY: usize = 30;

/// True for the first occurrence of a recurring condition and every
/// [`WARN_EVERY`]th one after it.
pub fn should_report(count: usize) -> bool {
    count == 1 || (count > 0 && count % WARN_EVERY == 0)
}

/// Sink for per-frame pipeline events: stage timings, metrics, frame counts.
///
/// The worker reports through this trait and never touches stdout itself,
/// so a live preview and the CLI can observe the same pipeline differently.
pub trait PipelineLogger: Send {
    /// Frames processed so far and frames dropped because the worker was busy.
    fn progress(&mut self, processed: usize, dropped: usize);

    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Per-frame numeric sample, such as the blur radius used.
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Called once when the worker stops.
    fn summary(&self) {}
}

/// Discards everything.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _processed: usize, _dropped: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Collects stage timings and metrics and logs a report when the worker
/// stops. A progress line goes out every `throttle_frames` frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    processed: usize,
    dropped: usize,
    messages: Vec<String>,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn sorted_keys(map: &HashMap<String, Vec<f64>>) -> Vec<&String> {
    let mut keys: Vec<_> = map.keys().collect();
    keys.sort();
    keys
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            processed: 0,
            dropped: 0,
            messages: Vec::new(),
        }
    }

    /// Multi-line report of frame counts, per-stage latency and metric
    /// averages. `None` until a timing or metric has been recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut report = vec![format!(
            "Pipeline summary ({} frames, {} dropped, {elapsed_s:.1}s total):",
            self.processed, self.dropped
        )];

        report.extend(sorted_keys(&self.timings).into_iter().map(|stage| {
            let samples = &self.timings[stage];
            let worst = samples.iter().copied().fold(0.0, f64::max);
            let total: f64 = samples.iter().sum();
            format!(
                "  {stage:12}: avg {:6.1}ms  max {worst:6.1}ms  total {total:7.0}ms",
                mean(samples)
            )
        }));

        report.extend(
            sorted_keys(&self.metrics)
                .into_iter()
                .map(|name| format!("  {name}: avg {:.1}", mean(&self.metrics[name]))),
        );

        if self.processed > 0 && elapsed_s > 0.0 {
            report.push(format!(
                "  Throughput: {:.1} fps",
                self.processed as f64 / elapsed_s
            ));
        }

        Some(report.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(Vec::as_slice)
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(Vec::as_slice)
    }
}

/// Reports about once a second on a 30 fps stream.
impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(WARN_EVERY)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, processed: usize, dropped: usize) {
        self.processed = processed;
        self.dropped = dropped;
        if processed > 0 && processed % self.throttle_frames == 0 {
            log::info!("Processed {processed} frames ({dropped} dropped)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 0);
        logger.timing("composite", 5.0);
        logger.metric("radius", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("segment", 20.0);
        logger.timing("segment", 30.0);
        logger.timing("composite", 5.0);

        let segment = logger.timings_for("segment").unwrap();
        assert_eq!(segment.len(), 2);
        assert!((segment[1] - 30.0).abs() < f64::EPSILON);
        assert_eq!(logger.timings_for("composite").unwrap().len(), 1);
        assert!(logger.timings_for("missing").is_none());
    }

    #[test]
    fn test_metric_records_values() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.metric("radius", 3.0);
        logger.metric("radius", 4.0);

        let values = logger.metrics_for("radius").unwrap();
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        assert!((avg - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_includes_stages_and_drops() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.progress(10, 4);
        logger.timing("segment", 20.0);
        logger.timing("composite", 5.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Pipeline summary (10 frames, 4 dropped"));
        assert!(summary.contains("segment"));
        assert!(summary.contains("composite"));
        assert!(summary.contains("fps"));
    }

    #[test]
    fn test_summary_includes_metrics() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.metric("radius", 3.0);
        logger.metric("radius", 4.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("radius: avg 3.5"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = StdoutPipelineLogger::new(10);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_counts() {
        let mut logger = StdoutPipelineLogger::new(10);
        for i in 1..=20 {
            logger.progress(i, i / 3);
        }
        assert_eq!(logger.processed, 20);
        assert_eq!(logger.dropped, 6);
    }

    #[test]
    fn test_info_stores_messages() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.info("pipeline started");
        assert_eq!(logger.messages, vec!["pipeline started".to_string()]);
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(2, false)]
    #[case(29, false)]
    #[case(30, true)]
    #[case(31, false)]
    #[case(60, true)]
    fn test_should_report(#[case] count: usize, #[case] expected: bool) {
        assert_eq!(should_report(count), expected);
    }

    #[test]
    fn test_default_throttle() {
        assert_eq!(StdoutPipelineLogger::default().throttle_frames, 30);
    }
}
