use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::pipeline::frame_processor::{FrameOutcome, FrameProcessor, ProcessedFrame};
use crate::pipeline::pipeline_logger::{should_report, PipelineLogger};
use crate::shared::error::BokehError;
use crate::shared::frame::Frame;

pub type FrameResult = Result<ProcessedFrame, BokehError>;

struct FrameJob {
    frame: Frame,
    timestamp_ms: u64,
}

/// Counters reported when the executor shuts down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub processed: usize,
    pub composited: usize,
    pub passthrough: usize,
    pub failed: usize,
    pub dropped: usize,
}

/// Runs the frame processor on one dedicated worker thread, keeping at most
/// one frame in flight.
///
/// Layout: `camera → submit → [worker: segment/composite] → results`
///
/// A single idle token circulates between the executor and the worker.
/// [`submit`](Self::submit) takes the token before handing a frame over and
/// the worker returns it once the frame is finished, so a frame is dropped
/// exactly when the previous one is still being processed.
pub struct DropLatestExecutor {
    job_tx: Option<Sender<FrameJob>>,
    idle_rx: Receiver<()>,
    result_rx: Receiver<FrameResult>,
    worker: Option<JoinHandle<PipelineStats>>,
    dropped: Arc<AtomicUsize>,
}

impl DropLatestExecutor {
    pub fn spawn(processor: FrameProcessor, logger: Box<dyn PipelineLogger>) -> Self {
        let (job_tx, job_rx) = crossbeam_channel::bounded::<FrameJob>(1);
        let (idle_tx, idle_rx) = crossbeam_channel::bounded::<()>(1);
        // Results are never dropped; the consumer decides how far behind it
        // is willing to fall.
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<FrameResult>();
        let dropped = Arc::new(AtomicUsize::new(0));

        // The worker starts idle.
        let _ = idle_tx.send(());

        let worker = spawn_worker(
            processor,
            logger,
            WorkerChannels {
                job_rx,
                idle_tx,
                result_tx,
            },
            Arc::clone(&dropped),
        );

        Self {
            job_tx: Some(job_tx),
            idle_rx,
            result_rx,
            worker: Some(worker),
            dropped,
        }
    }

    /// Offers a frame to the worker. Returns `false` and drops the frame if
    /// the worker is still busy with the previous one.
    pub fn submit(&self, frame: Frame, timestamp_ms: u64) -> bool {
        let Some(tx) = self.job_tx.as_ref() else {
            return false;
        };
        match self.idle_rx.try_recv() {
            Ok(()) => Self::hand_over(tx, frame, timestamp_ms),
            Err(TryRecvError::Empty) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                if should_report(total) {
                    log::warn!(
                        "Worker busy, dropping frame {} ({total} dropped)",
                        frame.index()
                    );
                }
                false
            }
            Err(TryRecvError::Disconnected) => {
                log::warn!("Worker stopped, frame discarded");
                false
            }
        }
    }

    /// Hands a frame over, waiting for the worker to become idle. For
    /// offline sources where every frame must be processed.
    pub fn submit_blocking(&self, frame: Frame, timestamp_ms: u64) -> bool {
        let Some(tx) = self.job_tx.as_ref() else {
            return false;
        };
        match self.idle_rx.recv() {
            Ok(()) => Self::hand_over(tx, frame, timestamp_ms),
            Err(_) => false,
        }
    }

    fn hand_over(tx: &Sender<FrameJob>, frame: Frame, timestamp_ms: u64) -> bool {
        // Holding the idle token means the job slot is empty.
        tx.try_send(FrameJob {
            frame,
            timestamp_ms,
        })
        .is_ok()
    }

    pub fn results(&self) -> &Receiver<FrameResult> {
        &self.result_rx
    }

    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Stops accepting frames, waits for the in-flight frame to finish and
    /// returns the final counters. Undelivered results stay readable on
    /// [`results`](Self::results) until the executor is dropped.
    pub fn shutdown(&mut self) -> PipelineStats {
        self.job_tx.take();
        let mut stats = match self.worker.take().map(JoinHandle::join) {
            Some(Ok(stats)) => stats,
            Some(Err(_)) => {
                log::error!("Bokeh worker thread panicked");
                PipelineStats::default()
            }
            None => PipelineStats::default(),
        };
        stats.dropped = self.dropped();
        stats
    }
}

impl Drop for DropLatestExecutor {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.shutdown();
        }
    }
}

struct WorkerChannels {
    job_rx: Receiver<FrameJob>,
    idle_tx: Sender<()>,
    result_tx: Sender<FrameResult>,
}

fn spawn_worker(
    mut processor: FrameProcessor,
    mut logger: Box<dyn PipelineLogger>,
    channels: WorkerChannels,
    dropped: Arc<AtomicUsize>,
) -> JoinHandle<PipelineStats> {
    std::thread::spawn(move || {
        let WorkerChannels {
            job_rx,
            idle_tx,
            result_tx,
        } = channels;
        let mut stats = PipelineStats::default();
        logger.info("Bokeh worker started");

        for job in job_rx {
            let started = Instant::now();
            let result = processor.process(job.frame, job.timestamp_ms, logger.as_mut());
            logger.timing("frame", started.elapsed().as_secs_f64() * 1000.0);

            match &result {
                Ok(ProcessedFrame {
                    outcome: FrameOutcome::Composited { .. },
                    ..
                }) => stats.composited += 1,
                Ok(_) => stats.passthrough += 1,
                Err(e) => {
                    log::warn!("Frame failed: {e}");
                    stats.failed += 1;
                }
            }
            stats.processed += 1;
            logger.progress(stats.processed, dropped.load(Ordering::Relaxed));

            // Idle again before the result is published, so a consumer that
            // reacts to the result can submit the next frame straight away.
            let _ = idle_tx.send(());
            if result_tx.send(result).is_err() {
                break;
            }
        }

        stats.dropped = dropped.load(Ordering::Relaxed);
        logger.progress(stats.processed, stats.dropped);
        logger.metric("dropped", stats.dropped as f64);
        logger.summary();
        stats
    })
}
