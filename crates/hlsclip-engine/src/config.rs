use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

use crate::assembler::MuxerConfig;
use crate::hls::config::{FetcherConfig, PlaylistConfig};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// HTTP options shared by the manifest and segment requests.
///
/// A zero duration disables the corresponding timeout.
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// Overall timeout for a single HTTP request
    pub timeout: Duration,

    /// Time allowed to establish the initial connection
    pub connect_timeout: Duration,

    /// Maximum time between two received chunks
    pub read_timeout: Duration,

    pub follow_redirects: bool,

    pub user_agent: String,

    /// Headers sent with every request
    pub headers: HeaderMap,

    /// Whether to pick up proxy settings from the environment
    pub use_system_proxy: bool,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::ZERO,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            follow_redirects: true,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            headers: DownloaderConfig::get_default_headers(),
            use_system_proxy: true,
        }
    }
}

impl DownloaderConfig {
    pub fn builder() -> crate::builder::DownloaderConfigBuilder {
        crate::builder::DownloaderConfigBuilder::new()
    }

    pub fn get_default_headers() -> HeaderMap {
        let mut default_headers = HeaderMap::new();

        default_headers.insert(
            reqwest::header::CONNECTION,
            HeaderValue::from_static("keep-alive"),
        );
        default_headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static("*/*"));
        default_headers
    }
}

/// Top-level configuration of a clip download.
#[derive(Debug, Clone)]
pub struct HlsClipConfig {
    pub base: DownloaderConfig,
    pub playlist: PlaylistConfig,
    pub fetcher: FetcherConfig,
    pub muxer: MuxerConfig,
    /// Leave downloaded segments and the concat list on disk when a run fails
    pub keep_artifacts_on_failure: bool,
}

impl Default for HlsClipConfig {
    fn default() -> Self {
        Self {
            base: DownloaderConfig::default(),
            playlist: PlaylistConfig::default(),
            fetcher: FetcherConfig::default(),
            muxer: MuxerConfig::default(),
            keep_artifacts_on_failure: true,
        }
    }
}

impl HlsClipConfig {
    pub fn new(base: DownloaderConfig) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }
}
