//! Concatenation of downloaded segments through an external muxer.
//!
//! The muxer is invoked with the ffmpeg concat demuxer contract:
//! `-f concat -safe 0 -i <list> -fflags +igndts -c:v <video> -c:a <audio> <output>`.

use std::ffi::OsString;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tracing::{debug, info};

use crate::hls::fetcher::LocalSegmentFile;
use crate::{HlsClipError, Result};

/// Lines of muxer stderr kept in [`HlsClipError::MuxerFailed`]
const STDERR_TAIL_LINES: usize = 20;

#[derive(Debug, Clone)]
pub struct MuxerConfig {
    /// Program name or path of the muxer
    pub program: PathBuf,
    pub video_codec: String,
    pub audio_codec: String,
    /// Overwrite an existing output file instead of letting the muxer refuse
    pub overwrite: bool,
}

impl Default for MuxerConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            overwrite: false,
        }
    }
}

/// Write the concat list: one `file '<absolute path>'` line per segment, in order.
pub async fn write_concat_manifest(files: &[LocalSegmentFile], path: &Path) -> Result<()> {
    let mut contents = String::new();
    for file in files {
        let absolute = std::path::absolute(&file.local_path)?;
        // Single quotes are closed, escaped and reopened per concat syntax
        let escaped = absolute.to_string_lossy().replace('\'', r"'\''");
        let _ = writeln!(contents, "file '{escaped}'");
    }
    tokio::fs::write(path, contents).await?;
    debug!(path = %path.display(), entries = files.len(), "Wrote concat manifest");
    Ok(())
}

pub struct Muxer {
    config: MuxerConfig,
}

impl Muxer {
    pub fn new(config: MuxerConfig) -> Self {
        Self { config }
    }

    pub fn build_args(&self, concat_manifest: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(16);
        if self.config.overwrite {
            args.push("-y".into());
        }
        args.extend(
            ["-f", "concat", "-safe", "0", "-i"]
                .into_iter()
                .map(OsString::from),
        );
        args.push(concat_manifest.as_os_str().to_owned());
        args.extend(["-fflags", "+igndts", "-c:v"].into_iter().map(OsString::from));
        args.push(self.config.video_codec.clone().into());
        args.push("-c:a".into());
        args.push(self.config.audio_codec.clone().into());
        args.push(output.as_os_str().to_owned());
        args
    }

    /// Write the concat list for `files` to `concat_manifest`, then run the muxer
    /// on it to produce `output`.
    pub async fn assemble(
        &self,
        files: &[LocalSegmentFile],
        concat_manifest: &Path,
        output: &Path,
    ) -> Result<()> {
        write_concat_manifest(files, concat_manifest).await?;

        let program = &self.config.program;
        let args = self.build_args(concat_manifest, output);
        info!(
            program = %program.display(),
            segments = files.len(),
            output = %output.display(),
            "Running muxer"
        );

        let result = tokio::process::Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    HlsClipError::MuxerNotFound(program.display().to_string())
                } else {
                    HlsClipError::Io(e)
                }
            })?;

        if !result.status.success() {
            return Err(HlsClipError::MuxerFailed {
                status: result.status,
                stderr: stderr_tail(&result.stderr),
            });
        }

        Ok(())
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
