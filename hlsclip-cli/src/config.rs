use std::time::Duration;

use hlsclip_engine::hls::{FetcherConfig, PlaylistConfig};
use hlsclip_engine::{ClipRequest, DownloaderConfig, HlsClipConfig, MuxerConfig, Workspace};

use crate::cli::DownloadArgs;
use crate::error::AppError;
use crate::utils::parse_headers;

/// Configuration for the entire program
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Engine configuration
    pub clip_config: HlsClipConfig,

    /// What to download and where
    pub request: ClipRequest,

    /// Whether to render progress bars
    pub show_progress: bool,
}

impl ProgramConfig {
    pub fn from_args(args: &DownloadArgs) -> Result<Self, AppError> {
        if args.manifest_url.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Manifest URL must not be empty".to_string(),
            ));
        }

        let mut builder = DownloaderConfig::builder()
            .with_timeout(Duration::from_secs(args.timeout))
            .with_connect_timeout(Duration::from_secs(args.connect_timeout))
            .with_read_timeout(Duration::from_secs(args.read_timeout))
            .with_follow_redirects(!args.no_follow_redirects)
            .with_headers(parse_headers(&args.headers)?)
            .with_system_proxy(!args.no_system_proxy);
        if let Some(user_agent) = &args.user_agent {
            builder = builder.with_user_agent(user_agent.clone());
        }
        let base = builder.build();

        let clip_config = HlsClipConfig {
            base,
            playlist: PlaylistConfig {
                fetch_timeout: Duration::from_secs(args.playlist_timeout),
                ..Default::default()
            },
            fetcher: FetcherConfig {
                segment_timeout: Duration::from_secs(args.segment_timeout),
                max_segment_retries: args.retries,
                download_concurrency: args.concurrency as usize,
                ..Default::default()
            },
            muxer: MuxerConfig {
                program: args.ffmpeg.clone(),
                video_codec: args.video_codec.clone(),
                audio_codec: args.audio_codec.clone(),
                overwrite: args.overwrite,
            },
            keep_artifacts_on_failure: !args.clean_on_failure,
        };

        let request = ClipRequest::new(args.manifest_url.trim())
            .output(args.output_file.clone())
            .start(args.start.clone())
            .end(args.end.clone())
            .workspace(Workspace::new(args.workdir.clone()));

        Ok(Self {
            clip_config,
            request,
            show_progress: args.show_progress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CliArgs, Command};
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(argv: &[&str]) -> ProgramConfig {
        let Command::Download(args) = CliArgs::try_parse_from(argv).unwrap().command;
        ProgramConfig::from_args(&args).unwrap()
    }

    #[test]
    fn test_defaults_mirror_engine_defaults() {
        let config = parse(&["hlsclip", "download", "https://example.com/vod.m3u8"]);
        assert_eq!(config.request.output, PathBuf::from("ft_video.mp4"));
        assert_eq!(config.request.workspace.root(), PathBuf::from(".").as_path());
        assert!(config.clip_config.keep_artifacts_on_failure);
        assert_eq!(config.clip_config.fetcher.download_concurrency, 1);
        assert_eq!(config.clip_config.fetcher.max_segment_retries, 0);
        assert_eq!(config.clip_config.muxer.program, PathBuf::from("ffmpeg"));
        assert!(config.clip_config.base.timeout.is_zero());
        assert!(config.clip_config.base.follow_redirects);
        assert_eq!(
            config.clip_config.base.user_agent,
            DownloaderConfig::default().user_agent
        );
    }

    #[test]
    fn test_flags_are_applied() {
        let config = parse(&[
            "hlsclip",
            "download",
            "https://example.com/vod.m3u8",
            "out.mkv",
            "--workdir",
            "/tmp/job",
            "--ffmpeg",
            "/opt/ffmpeg/bin/ffmpeg",
            "--concurrency",
            "4",
            "--retries",
            "2",
            "--clean-on-failure",
            "--user-agent",
            "hlsclip-test/1.0",
            "--no-follow-redirects",
            "-H",
            "Referer: https://example.com/",
            "-y",
        ]);
        assert_eq!(config.request.output, PathBuf::from("out.mkv"));
        assert_eq!(config.request.workspace.root(), PathBuf::from("/tmp/job").as_path());
        assert_eq!(config.clip_config.fetcher.download_concurrency, 4);
        assert_eq!(config.clip_config.fetcher.max_segment_retries, 2);
        assert!(!config.clip_config.keep_artifacts_on_failure);
        assert!(config.clip_config.muxer.overwrite);
        assert!(config.clip_config.base.headers.contains_key("referer"));
        assert_eq!(config.clip_config.base.user_agent, "hlsclip-test/1.0");
        assert!(!config.clip_config.base.follow_redirects);
    }

    #[test]
    fn test_bad_header_is_rejected() {
        let Command::Download(args) = CliArgs::try_parse_from([
            "hlsclip",
            "download",
            "https://example.com/vod.m3u8",
            "-H",
            "broken",
        ])
        .unwrap()
        .command;
        assert!(matches!(
            ProgramConfig::from_args(&args),
            Err(AppError::InvalidInput(_))
        ));
    }
}
