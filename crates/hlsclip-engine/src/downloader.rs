//! End-to-end clip download: manifest fetch, parse, window selection, segment
//! download, muxing and cleanup.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use url::Url;

use crate::assembler::Muxer;
use crate::client::create_client;
use crate::hls::events::{DownloadEvent, OnEvent};
use crate::hls::fetcher::SegmentFetcher;
use crate::hls::manifest::parse_manifest;
use crate::hls::playlist::PlaylistFetcher;
use crate::hls::window::{build_plan, parse_timestamp, select_window};
use crate::workspace::Workspace;
use crate::{HlsClipConfig, HlsClipError, Result};

pub const DEFAULT_OUTPUT: &str = "ft_video.mp4";

/// What to download and where to put it.
#[derive(Debug, Clone)]
pub struct ClipRequest {
    pub manifest_url: String,
    pub output: PathBuf,
    /// `HH:MM:SS`
    pub start: Option<String>,
    /// `HH:MM:SS`
    pub end: Option<String>,
    pub workspace: Workspace,
}

impl ClipRequest {
    pub fn new(manifest_url: impl Into<String>) -> Self {
        Self {
            manifest_url: manifest_url.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            start: None,
            end: None,
            workspace: Workspace::default(),
        }
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn start(mut self, start: Option<String>) -> Self {
        self.start = start;
        self
    }

    pub fn end(mut self, end: Option<String>) -> Self {
        self.end = end;
        self
    }

    pub fn workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = workspace;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipSummary {
    pub output: PathBuf,
    pub segments: usize,
    /// Media seconds actually downloaded, possibly more than the requested window
    pub downloaded_seconds: f64,
    pub skipped_seconds: f64,
    pub elapsed: Duration,
}

pub struct ClipDownloader {
    config: Arc<HlsClipConfig>,
    playlist_fetcher: PlaylistFetcher,
    segment_fetcher: SegmentFetcher,
    muxer: Muxer,
}

impl ClipDownloader {
    pub fn new(config: HlsClipConfig) -> Result<Self> {
        let client = create_client(&config.base)?;
        let playlist_fetcher = PlaylistFetcher::new(client.clone(), Arc::new(config.playlist.clone()));
        let segment_fetcher = SegmentFetcher::new(client, Arc::new(config.fetcher.clone()));
        let muxer = Muxer::new(config.muxer.clone());

        Ok(Self {
            config: Arc::new(config),
            playlist_fetcher,
            segment_fetcher,
            muxer,
        })
    }

    /// Run the whole pipeline for `request`.
    ///
    /// Transient files are removed after a successful mux. On failure they are
    /// kept unless `keep_artifacts_on_failure` is disabled.
    pub async fn run(&self, request: &ClipRequest, on_event: Option<OnEvent>) -> Result<ClipSummary> {
        // Reject bad bounds before touching the network
        for bound in [&request.start, &request.end].into_iter().flatten() {
            if !bound.trim().is_empty() {
                parse_timestamp(bound)?;
            }
        }

        request.workspace.prepare().await?;

        match self.run_inner(request, on_event.as_ref()).await {
            Ok(summary) => {
                request.workspace.cleanup().await;
                if let Some(callback) = &on_event {
                    callback(DownloadEvent::Finished {
                        output: summary.output.clone(),
                    });
                }
                info!(
                    output = %summary.output.display(),
                    segments = summary.segments,
                    downloaded_seconds = summary.downloaded_seconds,
                    elapsed = ?summary.elapsed,
                    "Clip saved and temporary files cleaned up"
                );
                Ok(summary)
            }
            Err(e) => {
                if self.config.keep_artifacts_on_failure {
                    warn!(
                        workspace = %request.workspace.root().display(),
                        "Download failed, keeping transient files for inspection"
                    );
                } else {
                    request.workspace.cleanup().await;
                }
                Err(e)
            }
        }
    }

    async fn run_inner(&self, request: &ClipRequest, on_event: Option<&OnEvent>) -> Result<ClipSummary> {
        let started = Instant::now();

        let text = self.playlist_fetcher.fetch(&request.manifest_url).await?;
        let base_url = Url::parse(&request.manifest_url)
            .map_err(|e| HlsClipError::fetch_failed(&request.manifest_url, e))?;

        let manifest = parse_manifest(&text);
        let total_duration = manifest.total_duration();
        info!(
            segments = manifest.len(),
            total_duration, "Parsed manifest"
        );

        let window = select_window(
            total_duration,
            request.start.as_deref(),
            request.end.as_deref(),
        )?;
        let plan = build_plan(&manifest, &window);
        info!(
            start = window.start_seconds,
            end = window.end_seconds,
            selected = plan.len(),
            planned_duration = plan.planned_duration(),
            "Selected segments for time window"
        );

        if plan.is_empty() {
            return Err(HlsClipError::EmptyPlan);
        }

        if let Some(callback) = on_event {
            callback(DownloadEvent::PlanReady {
                segments: plan.len(),
                expected_seconds: window.span(),
            });
        }

        let files = self
            .segment_fetcher
            .download(&plan, &base_url, &request.workspace, on_event)
            .await?;
        debug!(files = files.len(), "All planned segments downloaded");

        if let Some(callback) = on_event {
            callback(DownloadEvent::MuxStarted {
                output: request.output.clone(),
            });
        }
        self.muxer
            .assemble(
                &files,
                &request.workspace.concat_manifest_path(),
                &request.output,
            )
            .await?;

        Ok(ClipSummary {
            output: request.output.clone(),
            segments: files.len(),
            downloaded_seconds: plan.planned_duration(),
            skipped_seconds: plan.skipped_duration,
            elapsed: started.elapsed(),
        })
    }
}
