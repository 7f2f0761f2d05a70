use std::time::Duration;

// --- Playlist Configuration ---
#[derive(Debug, Clone)]
pub struct PlaylistConfig {
    /// Zero leaves the manifest request bounded only by the client timeouts
    pub fetch_timeout: Duration,
    /// Warn when the manifest URL does not end in `.m3u8`
    pub warn_on_unusual_url: bool,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(15),
            warn_on_unusual_url: true,
        }
    }
}

// --- Fetcher Configuration ---
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Zero leaves segment requests bounded only by the client timeouts
    pub segment_timeout: Duration,
    /// Extra attempts per segment; 0 fails on the first error
    pub max_segment_retries: u32,
    pub retry_delay_base: Duration, // Base for exponential backoff
    /// Segments fetched at once. Output order is unaffected.
    pub download_concurrency: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            segment_timeout: Duration::ZERO,
            max_segment_retries: 0,
            retry_delay_base: Duration::from_millis(500),
            download_concurrency: 1,
        }
    }
}
