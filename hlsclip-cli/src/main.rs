use std::sync::Arc;

use clap::Parser;
use config::ProgramConfig;
use error::AppError;
use hlsclip_engine::ClipDownloader;
use indicatif::MultiProgress;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::writer::MakeWriterExt;

mod cli;
mod config;
mod error;
mod utils;

use cli::{CliArgs, Command, DownloadArgs};
use utils::format_duration;
use utils::progress::ProgressManager;

const LOG_FILE: &str = "hlsclip.log";

fn main() {
    if let Err(e) = bootstrap() {
        eprintln!("Error: {e}");
        // Log the full error for debugging
        error!(error = ?e, "Application failed");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn bootstrap() -> Result<(), AppError> {
    // Parse command-line arguments
    let args = CliArgs::parse();

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let workdir = args.command.workdir();
    std::fs::create_dir_all(workdir)?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(workdir.join(LOG_FILE))?;

    let multi_writer = MakeWriterExt::and(std::io::stdout, log_file);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(multi_writer)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::Initialization(e.to_string()))?;

    info!("hlsclip {} - HLS time window downloader", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Download(download_args) => download(&download_args).await,
    }
}

async fn download(args: &DownloadArgs) -> Result<(), AppError> {
    let program_config = ProgramConfig::from_args(args)?;
    debug!(config = ?program_config.clip_config, "Program configuration");

    let request = &program_config.request;
    info!(
        url = %request.manifest_url,
        output = %request.output.display(),
        start = request.start.as_deref().unwrap_or("start"),
        end = request.end.as_deref().unwrap_or("end"),
        "Starting download"
    );

    // HTTP timeout settings
    let base = &program_config.clip_config.base;
    info!(
        "HTTP timeout configuration: overall={}s, connect={}s, read={}s",
        base.timeout.as_secs(),
        base.connect_timeout.as_secs(),
        base.read_timeout.as_secs()
    );

    let multi = MultiProgress::new();
    let progress_manager = if program_config.show_progress {
        ProgressManager::new(multi)
    } else {
        ProgressManager::new_disabled(multi)
    };

    let downloader = ClipDownloader::new(program_config.clip_config.clone())?;
    let summary = downloader
        .run(
            request,
            Some(Arc::new(move |event| {
                progress_manager.handle_event(event);
            })),
        )
        .await?;

    info!(
        "Video saved as {} ({} segments, {} of media, took {:.1}s)",
        summary.output.display(),
        summary.segments,
        format_duration(summary.downloaded_seconds),
        summary.elapsed.as_secs_f64()
    );
    Ok(())
}
