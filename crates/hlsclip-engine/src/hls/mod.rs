// Manifest handling and segment retrieval

pub mod config;
pub mod events;
pub mod fetcher;
pub mod manifest;
pub mod playlist;
pub mod window;

// Re-exports for easier access
pub use config::{FetcherConfig, PlaylistConfig};
pub use fetcher::{LocalSegmentFile, SegmentFetcher};
pub use manifest::{ManifestDocument, SegmentDescriptor, parse_manifest};
pub use playlist::PlaylistFetcher;
pub use window::{DownloadPlan, TimeWindow, build_plan, parse_timestamp, select_window};
