// HLS Segment Fetcher: streams planned segments to local files with optional retry logic.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::pin::pin;
use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use url::Url;

use crate::hls::config::FetcherConfig;
use crate::hls::events::{DownloadEvent, OnEvent};
use crate::hls::manifest::SegmentDescriptor;
use crate::hls::window::DownloadPlan;
use crate::workspace::Workspace;
use crate::{HlsClipError, Result};

/// A planned segment stored on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSegmentFile {
    pub descriptor: SegmentDescriptor,
    pub local_path: PathBuf,
}

enum AttemptError {
    Retryable(String),
    Fatal(String),
    Io(std::io::Error),
}

impl From<reqwest::Error> for AttemptError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() || e.is_request() || e.is_body() {
            AttemptError::Retryable(e.to_string())
        } else {
            AttemptError::Fatal(e.to_string())
        }
    }
}

impl From<std::io::Error> for AttemptError {
    fn from(e: std::io::Error) -> Self {
        AttemptError::Io(e)
    }
}

pub struct SegmentFetcher {
    http_client: Client,
    config: Arc<FetcherConfig>,
}

impl SegmentFetcher {
    pub fn new(http_client: Client, config: Arc<FetcherConfig>) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Download every segment of `plan` into the workspace segment directory.
    ///
    /// Relative segment URIs are resolved against `base_url`. The returned files
    /// are in plan order whatever the concurrency, and the first failure aborts
    /// the whole download.
    pub async fn download(
        &self,
        plan: &DownloadPlan,
        base_url: &Url,
        workspace: &Workspace,
        on_event: Option<&OnEvent>,
    ) -> Result<Vec<LocalSegmentFile>> {
        let jobs = assign_local_paths(&plan.segments, &workspace.segments_dir());
        let concurrency = self.config.download_concurrency.max(1);

        let mut results = pin!(
            stream::iter(jobs)
                .map(|(descriptor, local_path)| async move {
                    let url = resolve_segment_url(base_url, &descriptor.url)?;
                    let bytes = self.fetch_to_file(&url, &local_path).await?;
                    debug!(
                        url = %url,
                        path = %local_path.display(),
                        bytes,
                        "Segment downloaded"
                    );
                    Ok::<_, HlsClipError>(LocalSegmentFile {
                        descriptor,
                        local_path,
                    })
                })
                .buffered(concurrency)
        );

        let mut files = Vec::with_capacity(plan.len());
        let mut downloaded_seconds = 0.0;
        while let Some(file) = results.try_next().await? {
            downloaded_seconds += file.descriptor.duration;
            if let Some(callback) = on_event {
                callback(DownloadEvent::SegmentCompleted {
                    sequence_index: file.descriptor.sequence_index,
                    path: file.local_path.clone(),
                    downloaded_seconds,
                });
            }
            files.push(file);
        }

        Ok(files)
    }

    /// Streams one segment to `path`, retrying network errors and 5xx responses.
    async fn fetch_to_file(&self, url: &Url, path: &Path) -> Result<u64> {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            let reason = match self.fetch_once(url, path).await {
                Ok(bytes) => return Ok(bytes),
                Err(AttemptError::Io(e)) => return Err(HlsClipError::Io(e)),
                Err(AttemptError::Fatal(reason)) => {
                    return Err(HlsClipError::segment_failed(url.as_str(), reason));
                }
                Err(AttemptError::Retryable(reason)) => reason,
            };

            if attempts > self.config.max_segment_retries {
                return Err(HlsClipError::segment_failed(url.as_str(), reason));
            }

            let delay = self.config.retry_delay_base * 2_u32.pow((attempts - 1).min(10));
            warn!(url = %url, attempt = attempts, error = %reason, "Segment fetch failed, retrying in {delay:?}");
            tokio::time::sleep(delay).await;
        }
    }

    async fn fetch_once(&self, url: &Url, path: &Path) -> Result<u64, AttemptError> {
        let mut request = self.http_client.get(url.clone());
        if !self.config.segment_timeout.is_zero() {
            request = request.timeout(self.config.segment_timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_server_error() {
            return Err(AttemptError::Retryable(format!("HTTP {status}")));
        } else if !status.is_success() {
            return Err(AttemptError::Fatal(format!("HTTP {status}")));
        }

        let mut file = tokio::fs::File::create(path).await?;
        let mut body = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

/// Resolve a manifest URI against the manifest URL. Absolute URIs are kept as-is.
pub fn resolve_segment_url(base_url: &Url, uri: &str) -> Result<Url> {
    base_url
        .join(uri)
        .map_err(|e| HlsClipError::segment_failed(uri, format!("invalid segment URL: {e}")))
}

/// Local file name for a segment: the last path component of its URI without
/// query string or fragment. Returns `None` when no usable component exists.
pub fn segment_file_name(uri: &str) -> Option<&str> {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    let name = path.rsplit('/').next()?;
    match name {
        "" | "." | ".." => None,
        name if name.contains('\\') => None,
        name => Some(name),
    }
}

/// Pair each descriptor with its destination under `dir`, keeping names unique.
///
/// Segments without a usable name become `segment_{index}.ts`. A name that is
/// already taken gets an `{index}_` prefix, then `{index}_{n}_` until it is free.
fn assign_local_paths(
    segments: &[SegmentDescriptor],
    dir: &Path,
) -> Vec<(SegmentDescriptor, PathBuf)> {
    let mut used = HashSet::with_capacity(segments.len());
    segments
        .iter()
        .map(|descriptor| {
            let index = descriptor.sequence_index;
            let base = match segment_file_name(&descriptor.url) {
                Some(name) => name.to_string(),
                None => format!("segment_{index}.ts"),
            };
            let mut name = base.clone();
            let mut attempt = 0usize;
            while !used.insert(name.clone()) {
                name = match attempt {
                    0 => format!("{index}_{base}"),
                    n => format!("{index}_{n}_{base}"),
                };
                attempt += 1;
            }
            (descriptor.clone(), dir.join(name))
        })
        .collect()
}
