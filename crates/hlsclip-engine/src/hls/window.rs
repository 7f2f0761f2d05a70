// Time window selection: turns `--start`/`--end` strings into a window and picks
// the segments overlapping it.

use tracing::debug;

use crate::hls::manifest::{ManifestDocument, SegmentDescriptor};
use crate::{HlsClipError, Result};

/// Requested playback range in seconds.
///
/// Bounds are not clamped: `start_seconds` may exceed `end_seconds` or the
/// manifest duration, which simply yields an empty or shortened plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl TimeWindow {
    pub fn new(start_seconds: f64, end_seconds: f64) -> Self {
        Self {
            start_seconds,
            end_seconds,
        }
    }

    /// The whole manifest
    pub fn full(total_duration: f64) -> Self {
        Self::new(0.0, total_duration)
    }

    /// Requested length, used as the progress total. Never negative.
    pub fn span(&self) -> f64 {
        (self.end_seconds - self.start_seconds).max(0.0)
    }
}

/// Segments selected for retrieval, in playback order.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPlan {
    pub window: TimeWindow,
    pub segments: Vec<SegmentDescriptor>,
    /// Media time skipped before the first planned segment
    pub skipped_duration: f64,
}

impl DownloadPlan {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Media time actually covered by the planned segments
    pub fn planned_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }
}

/// Parse an `HH:MM:SS` timestamp into seconds.
///
/// Each field may carry a fraction (`00:01:02.5`). Exactly three fields are required.
pub fn parse_timestamp(time_str: &str) -> Result<f64> {
    let invalid = || HlsClipError::InvalidTimeFormat(time_str.to_string());

    let fields: Vec<&str> = time_str.trim().split(':').collect();
    let [h, m, s] = fields.as_slice() else {
        return Err(invalid());
    };

    let parse = |field: &str| {
        field
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(invalid)
    };

    Ok(parse(*h)? * 3600.0 + parse(*m)? * 60.0 + parse(*s)?)
}

/// Resolve optional `start`/`end` strings against the manifest duration.
///
/// Missing or blank bounds default to `0` and `manifest_duration`.
pub fn select_window(
    manifest_duration: f64,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<TimeWindow> {
    let bound = |value: Option<&str>| -> Result<Option<f64>> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => parse_timestamp(v).map(Some),
            None => Ok(None),
        }
    };

    let start_seconds = bound(start)?.unwrap_or(0.0);
    let end_seconds = bound(end)?.unwrap_or(manifest_duration);

    if start_seconds > end_seconds || end_seconds > manifest_duration {
        debug!(
            start_seconds,
            end_seconds, manifest_duration, "Time window is not contained in the manifest"
        );
    }

    Ok(TimeWindow::new(start_seconds, end_seconds))
}

/// Select the segments to download for `window`.
///
/// A segment is skipped when it ends strictly before the window start. Selection
/// stops once the time accumulated before a segment exceeds the window end, so a
/// segment straddling either bound is kept whole.
pub fn build_plan(manifest: &ManifestDocument, window: &TimeWindow) -> DownloadPlan {
    let mut current_time = 0.0;
    let mut skipped_duration = 0.0;
    let mut segments = Vec::new();

    for segment in manifest.segments() {
        if current_time + segment.duration < window.start_seconds {
            current_time += segment.duration;
            skipped_duration = current_time;
            continue;
        }
        if current_time > window.end_seconds {
            break;
        }

        segments.push(segment.clone());
        current_time += segment.duration;
    }

    debug!(
        selected = segments.len(),
        total = manifest.len(),
        skipped_duration,
        "Built download plan"
    );

    DownloadPlan {
        window: *window,
        segments,
        skipped_duration,
    }
}
