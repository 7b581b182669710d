use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use remix_core::{Mode, SessionState};

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(spinner_style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn print_banner(mode: Mode) {
    eprintln!(
        "\n{}  {} {}\n",
        style("remix").cyan().bold(),
        style("TikTok Processor").dim(),
        style(format!("({})", mode)).dim()
    );
}

pub fn print_error(message: impl std::fmt::Display) {
    eprintln!("{} {}", style("Error:").red().bold(), message);
}

pub fn check(msg: impl std::fmt::Display) -> String {
    format!("{} {}", style("✓").green().bold(), msg)
}

/// Spinner that follows one submission through its stages.
pub struct StageSpinner {
    bar: ProgressBar,
    mode: Mode,
    announced_job: bool,
    announced_frames: bool,
}

impl StageSpinner {
    pub fn start(mode: Mode) -> Self {
        Self {
            bar: create_spinner(stage_message(&SessionState::Submitting, mode)),
            mode,
            announced_job: false,
            announced_frames: false,
        }
    }

    pub fn update(&mut self, state: &SessionState) {
        if let SessionState::PartiallyLoaded {
            result,
            transcript_loading,
        } = state
        {
            if let Some(job_id) = result.job_id.as_ref().filter(|_| !self.announced_job) {
                self.bar
                    .println(check(format!("Job accepted: {}", style(job_id).yellow())));
                self.announced_job = true;
            }
            if *transcript_loading && !self.announced_frames {
                let frames = match result.frames.len() {
                    0 => style("none yet".to_string()).dim().to_string(),
                    n => n.to_string(),
                };
                self.bar.println(check(format!("Frames: {}", frames)));
                self.announced_frames = true;
            }
        }
        self.bar.set_message(stage_message(state, self.mode));
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }

    pub fn abandon(self, note: &str) {
        self.bar
            .finish_with_message(format!("{} {}", style("↷").yellow(), style(note).dim()));
    }
}

fn stage_message(state: &SessionState, mode: Mode) -> &'static str {
    match state {
        SessionState::Submitting => match mode {
            Mode::MultiCall => "Ingesting video...",
            Mode::Aggregate => "Processing video...",
        },
        SessionState::PartiallyLoaded {
            transcript_loading: true,
            ..
        } => "Loading transcript...",
        SessionState::PartiallyLoaded { .. } => "Fetching frames...",
        _ => "Finishing...",
    }
}
