use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum DownloadEvent {
    /// The plan is known; `expected_seconds` is the requested window length.
    PlanReady {
        segments: usize,
        expected_seconds: f64,
    },
    /// A segment is fully on disk. `downloaded_seconds` never decreases.
    SegmentCompleted {
        sequence_index: usize,
        path: PathBuf,
        downloaded_seconds: f64,
    },
    MuxStarted {
        output: PathBuf,
    },
    Finished {
        output: PathBuf,
    },
}

/// Callback receiving [`DownloadEvent`]s.
pub type OnEvent = Arc<dyn Fn(DownloadEvent) + Send + Sync>;
