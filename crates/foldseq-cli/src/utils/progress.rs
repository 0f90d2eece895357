use foldseq::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Renders engine progress as a frame counter on stderr. Per-frame messages go to
/// stdout above the bar so the console log stays readable when piped.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr())
            .with_style(Self::bar_style());
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::RunStart { total_frames } => {
                    pb.reset();
                    pb.set_length(total_frames);
                    pb.set_position(0);
                    pb.set_message("Aligning");
                }
                Progress::FrameStart { frame } => {
                    pb.set_message(format!("Frame {}", frame));
                }
                Progress::FrameFinish { .. } => {
                    pb.inc(1);
                }
                Progress::RunFinish => {
                    pb.finish_and_clear();
                }
                Progress::Message(msg) | Progress::Warning(msg) => {
                    pb.suspend(|| println!("{}", msg));
                }
            }
        })
    }

    /// Clears the bar if the run ended early.
    pub fn finish(&self) {
        if let Ok(pb) = self.pb.lock() {
            if !pb.is_finished() {
                pb.abandon();
            }
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
