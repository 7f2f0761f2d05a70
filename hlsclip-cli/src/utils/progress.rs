use hlsclip_engine::DownloadEvent;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use super::format_duration;

fn download_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} {msg}\n[{elapsed_precise}] [{bar:40.green/white}] {pos}/{len}s ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ")
}

fn mux_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Renders [`DownloadEvent`]s as progress bars: seconds of media downloaded,
/// then a spinner while the muxer runs.
#[derive(Clone)]
pub struct ProgressManager {
    multi: MultiProgress,
    bar: Arc<Mutex<Option<ProgressBar>>>,
    disabled: bool,
}

impl ProgressManager {
    pub fn new(multi: MultiProgress) -> Self {
        Self {
            multi,
            bar: Arc::new(Mutex::new(None)),
            disabled: false,
        }
    }

    pub fn new_disabled(multi: MultiProgress) -> Self {
        Self {
            multi,
            bar: Arc::new(Mutex::new(None)),
            disabled: true,
        }
    }

    pub fn handle_event(&self, event: DownloadEvent) {
        if self.disabled {
            return;
        }

        let Ok(mut current) = self.bar.lock() else {
            return;
        };
        match event {
            DownloadEvent::PlanReady {
                segments,
                expected_seconds,
            } => {
                let bar = self
                    .multi
                    .add(ProgressBar::new(expected_seconds.round() as u64));
                bar.set_style(download_style());
                bar.set_message(format!(
                    "Downloading {segments} segments ({})",
                    format_duration(expected_seconds)
                ));
                bar.enable_steady_tick(Duration::from_millis(500));
                *current = Some(bar);
            }
            DownloadEvent::SegmentCompleted {
                downloaded_seconds, ..
            } => {
                if let Some(bar) = current.as_ref() {
                    bar.set_position(downloaded_seconds.round() as u64);
                }
            }
            DownloadEvent::MuxStarted { output } => {
                if let Some(bar) = current.take() {
                    bar.finish_with_message("Segments downloaded");
                }
                let spinner = self.multi.add(ProgressBar::new_spinner());
                spinner.set_style(mux_style());
                spinner.set_message(format!("Muxing into {}", output.display()));
                spinner.enable_steady_tick(Duration::from_millis(200));
                *current = Some(spinner);
            }
            DownloadEvent::Finished { output } => {
                if let Some(bar) = current.take() {
                    bar.finish_with_message(format!("Saved {}", output.display()));
                }
            }
        }
    }

    #[inline]
    #[allow(unused)]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;
    use std::path::PathBuf;

    fn hidden_manager() -> ProgressManager {
        ProgressManager::new(MultiProgress::with_draw_target(ProgressDrawTarget::hidden()))
    }

    #[test]
    fn test_bar_follows_download_events() {
        let manager = hidden_manager();
        manager.handle_event(DownloadEvent::PlanReady {
            segments: 3,
            expected_seconds: 12.0,
        });
        manager.handle_event(DownloadEvent::SegmentCompleted {
            sequence_index: 0,
            path: PathBuf::from("segments/a.ts"),
            downloaded_seconds: 4.0,
        });

        let bar = manager.bar.lock().unwrap().clone().unwrap();
        assert_eq!(bar.length(), Some(12));
        assert_eq!(bar.position(), 4);

        manager.handle_event(DownloadEvent::MuxStarted {
            output: PathBuf::from("out.mp4"),
        });
        assert!(bar.is_finished());

        manager.handle_event(DownloadEvent::Finished {
            output: PathBuf::from("out.mp4"),
        });
        assert!(manager.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_disabled_manager_ignores_events() {
        let manager = ProgressManager::new_disabled(MultiProgress::with_draw_target(
            ProgressDrawTarget::hidden(),
        ));
        manager.handle_event(DownloadEvent::PlanReady {
            segments: 1,
            expected_seconds: 4.0,
        });
        assert!(manager.is_disabled());
        assert!(manager.bar.lock().unwrap().is_none());
    }
}
