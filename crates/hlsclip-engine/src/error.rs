use std::process::ExitStatus;

/// Coarse classification of [`HlsClipError`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidTimeFormat,
    FetchFailed,
    SegmentFetchFailed,
    MuxerNotFound,
    MuxerFailed,
    EmptyPlan,
    Client,
    Io,
}

// Error type for every stage of a clip download
#[derive(Debug, thiserror::Error)]
pub enum HlsClipError {
    #[error("Invalid time format '{0}', expected HH:MM:SS")]
    InvalidTimeFormat(String),

    #[error("Failed to fetch manifest {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Failed to fetch segment {url}: {reason}")]
    SegmentFetchFailed { url: String, reason: String },

    #[error("Muxer '{0}' not found. Make sure it is installed and available in PATH")]
    MuxerNotFound(String),

    #[error("Muxer exited with {status}: {stderr}")]
    MuxerFailed { status: ExitStatus, stderr: String },

    #[error("No segments fall inside the requested time window")]
    EmptyPlan,

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HlsClipError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HlsClipError::InvalidTimeFormat(_) => ErrorKind::InvalidTimeFormat,
            HlsClipError::FetchFailed { .. } => ErrorKind::FetchFailed,
            HlsClipError::SegmentFetchFailed { .. } => ErrorKind::SegmentFetchFailed,
            HlsClipError::MuxerNotFound(_) => ErrorKind::MuxerNotFound,
            HlsClipError::MuxerFailed { .. } => ErrorKind::MuxerFailed,
            HlsClipError::EmptyPlan => ErrorKind::EmptyPlan,
            HlsClipError::Client(_) => ErrorKind::Client,
            HlsClipError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn fetch_failed(url: impl Into<String>, reason: impl ToString) -> Self {
        HlsClipError::FetchFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn segment_failed(url: impl Into<String>, reason: impl ToString) -> Self {
        HlsClipError::SegmentFetchFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = HlsClipError> = std::result::Result<T, E>;
