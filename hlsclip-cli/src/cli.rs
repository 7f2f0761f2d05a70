use clap::{Args, Parser, Subcommand};
use hlsclip_engine::DEFAULT_OUTPUT;
use std::path::{Path, PathBuf};

/// Define CLI arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Download and concatenate video segments from an M3U8 playlist",
    long_about = "Fetches an HLS media playlist, downloads its segments (optionally only those\n\
                  covering a --start/--end window) and joins them into a single file with ffmpeg.\n\
                  \n\
                  Segments are kept whole, so the result may begin slightly before --start and\n\
                  end slightly after --end."
)]
pub struct CliArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true, help = "Enable detailed debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a playlist (or a time window of it) into one video file
    Download(DownloadArgs),
}

impl Command {
    /// Directory the command works in; the log file is written there too
    pub fn workdir(&self) -> &Path {
        match self {
            Command::Download(args) => &args.workdir,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    #[arg(help = "URL of the M3U8 playlist")]
    pub manifest_url: String,

    #[arg(
        default_value = DEFAULT_OUTPUT,
        help = "Output file name for the saved video"
    )]
    pub output_file: PathBuf,

    #[arg(
        long,
        value_name = "HH:MM:SS",
        help = "Start time (default: start of video)"
    )]
    pub start: Option<String>,

    #[arg(
        long,
        value_name = "HH:MM:SS",
        help = "End time (default: end of video)"
    )]
    pub end: Option<String>,

    #[arg(
        long,
        default_value = ".",
        help = "Directory holding the transient segments/ folder and segments.txt"
    )]
    pub workdir: PathBuf,

    #[arg(long, default_value = "ffmpeg", help = "Muxer program name or path")]
    pub ffmpeg: PathBuf,

    #[arg(long, default_value = "libx264", help = "Video encoder passed to the muxer")]
    pub video_codec: String,

    #[arg(long, default_value = "aac", help = "Audio encoder passed to the muxer")]
    pub audio_codec: String,

    #[arg(short = 'y', long, help = "Overwrite the output file if it exists")]
    pub overwrite: bool,

    #[arg(
        long,
        default_value = "0",
        help = "Overall timeout in seconds for each HTTP request (0 = none)"
    )]
    pub timeout: u64,

    #[arg(
        long,
        default_value = "10",
        help = "Connection timeout in seconds (0 = none)"
    )]
    pub connect_timeout: u64,

    #[arg(
        long,
        default_value = "30",
        help = "Maximum seconds between received chunks (0 = none)"
    )]
    pub read_timeout: u64,

    #[arg(
        long,
        default_value = "15",
        help = "Timeout in seconds for the playlist request (0 = none)"
    )]
    pub playlist_timeout: u64,

    #[arg(
        long,
        default_value = "0",
        help = "Timeout in seconds for each segment request (0 = none)"
    )]
    pub segment_timeout: u64,

    #[arg(
        long = "header",
        short = 'H',
        value_name = "HEADER",
        help = "Add custom HTTP header to requests (can be used multiple times). Format: 'Name: Value'"
    )]
    pub headers: Vec<String>,

    #[arg(
        long,
        default_value = "1",
        value_parser = clap::value_parser!(u32).range(1..=64),
        help = "Number of segments downloaded at once"
    )]
    pub concurrency: u32,

    #[arg(
        long,
        default_value = "0",
        help = "Retry attempts for segments failing with network or 5xx errors"
    )]
    pub retries: u32,

    #[arg(
        long,
        help = "Remove downloaded segments when the download fails (kept by default)"
    )]
    pub clean_on_failure: bool,

    #[arg(long, value_name = "UA", help = "User-Agent sent with every request")]
    pub user_agent: Option<String>,

    #[arg(long, help = "Fail on HTTP redirects instead of following them")]
    pub no_follow_redirects: bool,

    #[arg(long, help = "Ignore proxy settings from the environment")]
    pub no_system_proxy: bool,

    #[arg(short = 'P', long = "progress", help = "Show a progress bar")]
    pub show_progress: bool,
}
