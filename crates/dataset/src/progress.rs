//! Progress reporting for long generation runs.

use std::time::Duration;

use dataset_common::SampleKind;
use tracing::info;

/// Samples per progress report.
pub const PROGRESS_INTERVAL: u64 = 100;

/// Snapshot reported every [`PROGRESS_INTERVAL`] samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchProgress {
    /// Samples generated so far in this run
    pub generated: u64,
    /// Wall time spent on the last batch
    pub batch_elapsed: Duration,
}

/// Receives generator progress.
pub trait ProgressSink {
    fn batch_complete(&mut self, progress: BatchProgress);

    /// A fetched image was smaller than the crop size and kept uncropped.
    ///
    /// The fetcher already logs a warning; sinks may count or collect these.
    fn undersized(&mut self, _index: u64, _kind: SampleKind, _dimensions: (u32, u32)) {}
}

/// Sink writing progress to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn batch_complete(&mut self, progress: BatchProgress) {
        info!(
            generated = progress.generated,
            batch_secs = progress.batch_elapsed.as_secs_f64(),
            "Total images collected"
        );
    }
}
