//! # hlsclip engine
//!
//! Downloads the segments of a VOD media playlist, optionally restricted to a
//! time window, and joins them into a single file with an external muxer.
//!
//! ## Pipeline
//!
//! - [`hls::playlist`] fetches the manifest text
//! - [`hls::manifest`] parses `#EXTINF` durations and segment URIs
//! - [`hls::window`] turns `HH:MM:SS` bounds into a [`hls::window::DownloadPlan`]
//! - [`hls::fetcher`] streams the planned segments to disk, in order
//! - [`assembler`] writes the concat list and runs the muxer
//! - [`workspace`] owns the transient files and removes them afterwards
//!
//! [`ClipDownloader`] drives all of the above.

pub mod assembler;
pub mod builder;
pub mod client;
pub mod config;
pub mod downloader;
pub mod error;
pub mod hls;
pub mod workspace;

pub use assembler::{Muxer, MuxerConfig};
pub use builder::DownloaderConfigBuilder;
pub use client::create_client;
pub use config::{DownloaderConfig, HlsClipConfig};
pub use downloader::{ClipDownloader, ClipRequest, ClipSummary, DEFAULT_OUTPUT};
pub use error::{ErrorKind, HlsClipError, Result};
pub use hls::events::{DownloadEvent, OnEvent};
pub use workspace::Workspace;
