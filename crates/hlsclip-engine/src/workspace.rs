//! Transient on-disk layout of a download: the `segments/` directory and the
//! `segments.txt` concat list, both resolved under a caller-chosen root.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub const SEGMENTS_DIR: &str = "segments";
pub const CONCAT_MANIFEST: &str = "segments.txt";

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn segments_dir(&self) -> PathBuf {
        self.root.join(SEGMENTS_DIR)
    }

    pub fn concat_manifest_path(&self) -> PathBuf {
        self.root.join(CONCAT_MANIFEST)
    }

    /// Create the segment directory. Succeeds if it already exists.
    pub async fn prepare(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(self.segments_dir()).await
    }

    /// Remove the segment directory and the concat list.
    ///
    /// Missing entries are ignored and other failures are only logged.
    pub async fn cleanup(&self) {
        let dir = self.segments_dir();
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => debug!(path = %dir.display(), "Removed segment directory"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %dir.display(), error = %e, "Failed to remove segment directory"),
        }

        let concat = self.concat_manifest_path();
        match tokio::fs::remove_file(&concat).await {
            Ok(()) => debug!(path = %concat.display(), "Removed concat manifest"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %concat.display(), error = %e, "Failed to remove concat manifest"),
        }
    }
}
