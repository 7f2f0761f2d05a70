// Manifest retrieval: a single GET for the playlist text.

use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use crate::hls::config::PlaylistConfig;
use crate::hls::manifest::check_manifest_url;
use crate::{HlsClipError, Result};

pub struct PlaylistFetcher {
    http_client: Client,
    config: Arc<PlaylistConfig>,
}

impl PlaylistFetcher {
    pub fn new(http_client: Client, config: Arc<PlaylistConfig>) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Fetch the manifest at `url` and return its text.
    ///
    /// Any transport error or non-success status is a [`HlsClipError::FetchFailed`].
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let playlist_url =
            Url::parse(url).map_err(|e| HlsClipError::fetch_failed(url, format!("invalid URL: {e}")))?;

        if self.config.warn_on_unusual_url && !check_manifest_url(playlist_url.as_str()) {
            warn!(url = %playlist_url, "URL does not end with .m3u8, trying anyway");
        }

        let mut request = self.http_client.get(playlist_url.clone());
        if !self.config.fetch_timeout.is_zero() {
            request = request.timeout(self.config.fetch_timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HlsClipError::fetch_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HlsClipError::fetch_failed(url, format!("HTTP {status}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| HlsClipError::fetch_failed(url, e))?;

        debug!(bytes = text.len(), "Manifest body received");
        info!(url = %playlist_url, "Fetched manifest");
        Ok(text)
    }
}
