use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use remix_core::{
    Mode, RemixConfig, ReqwestTransport, Session, SessionState, format_view_readable,
    get_cache_dir, get_result_path, probe_frames, save_result,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::output::{
    StageSpinner, check, create_spinner, format_duration, print_banner, print_error,
};

mod logging;
mod output;

/// CLI wrapper for Mode enum (needed for clap ValueEnum)
#[derive(Clone, Copy, ValueEnum)]
enum CliMode {
    MultiCall,
    Aggregate,
}

impl From<CliMode> for Mode {
    fn from(cli: CliMode) -> Self {
        match cli {
            CliMode::MultiCall => Mode::MultiCall,
            CliMode::Aggregate => Mode::Aggregate,
        }
    }
}

#[derive(Parser)]
#[command(name = "remix")]
#[command(
    about = "Submit TikTok videos to the remix webhooks and show frames, transcripts and tone variations"
)]
struct Cli {
    /// TikTok video URL. When omitted, URLs are read from stdin one per line.
    url: Option<String>,

    /// Endpoint topology (overrides REMIX_MODE)
    #[arg(short, long)]
    mode: Option<CliMode>,

    /// Ingest webhook URL (overrides REMIX_INGEST_URL)
    #[arg(long)]
    ingest_url: Option<String>,

    /// Frames webhook URL (overrides REMIX_FRAMES_URL)
    #[arg(long)]
    frames_url: Option<String>,

    /// Transcribe webhook URL (overrides REMIX_TRANSCRIBE_URL)
    #[arg(long)]
    transcribe_url: Option<String>,

    /// Aggregate webhook URL (overrides REMIX_AGGREGATE_URL)
    #[arg(long)]
    aggregate_url: Option<String>,

    /// Per-request timeout in seconds. Requests wait indefinitely by default.
    #[arg(long)]
    timeout: Option<u64>,

    /// Download every frame thumbnail and report the ones that fail to load
    #[arg(long)]
    check_frames: bool,

    /// Print the normalized result as JSON instead of the readable report
    #[arg(long)]
    json: bool,

    /// Save the result under the cache directory
    #[arg(short, long)]
    save: bool,

    /// Save the result to this path (implies --save)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> remix_core::Result<RemixConfig> {
        self.config_from(|key| std::env::var(key).ok())
    }

    /// Flags win over `lookup`, which wins over the defaults.
    fn config_from(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> remix_core::Result<RemixConfig> {
        let mut config = RemixConfig::from_lookup(lookup)?;
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        let endpoints = &mut config.endpoints;
        for (flag, slot) in [
            (&self.ingest_url, &mut endpoints.ingest),
            (&self.frames_url, &mut endpoints.frames),
            (&self.transcribe_url, &mut endpoints.transcribe),
            (&self.aggregate_url, &mut endpoints.aggregate),
        ] {
            if let Some(url) = flag {
                *slot = url.trim().to_string();
            }
        }
        config.timeout = self.timeout.map(Duration::from_secs);
        config.validate()?;
        Ok(config)
    }
}

struct App {
    cli: Cli,
    mode: Mode,
    session: Session,
    transport: Arc<ReqwestTransport>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger_once(cli.verbose);

    let config = match cli.config() {
        Ok(config) => config,
        Err(e) => {
            print_error(e);
            std::process::exit(1);
        }
    };

    let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
    let session = Session::from_config(&config, transport.clone())?;
    let mut app = App {
        cli,
        mode: config.mode,
        session,
        transport,
    };

    print_banner(app.mode);

    match app.cli.url.clone() {
        Some(url) => {
            if !app.run_once(&url).await? {
                std::process::exit(1);
            }
        }
        None => app.run_interactive().await?,
    }

    Ok(())
}

impl App {
    /// Returns whether the submission succeeded.
    async fn run_once(&mut self, url: &str) -> Result<bool> {
        if let Err(e) = self.session.submit(url) {
            print_error(e);
            return Ok(false);
        }

        let started = Instant::now();
        let mut spinner = StageSpinner::start(self.mode);
        while self.session.is_busy() {
            let state = self.session.next_update().await;
            spinner.update(state);
        }
        spinner.finish();

        self.show_outcome(url, started).await
    }

    /// Each line is a new submission. A line entered while a submission is running
    /// supersedes it.
    async fn run_interactive(&mut self) -> Result<()> {
        eprintln!(
            "{}",
            style("Paste a TikTok URL and press Enter (Ctrl-D to quit)").dim()
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut current: Option<(String, Instant, StageSpinner)> = None;

        loop {
            let busy = self.session.is_busy();
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match self.session.submit(&line) {
                        Ok(_) => {
                            if let Some((_, _, spinner)) = current.take() {
                                spinner.abandon("Superseded by a newer submission");
                            }
                            current = Some((
                                line.trim().to_string(),
                                Instant::now(),
                                StageSpinner::start(self.mode),
                            ));
                        }
                        Err(e) => print_error(e),
                    }
                }
                _ = async { self.session.next_update().await; }, if busy => {
                    if let Some((_, _, spinner)) = current.as_mut() {
                        spinner.update(self.session.state());
                    }
                    if !self.session.is_busy() {
                        if let Some((url, started, spinner)) = current.take() {
                            spinner.finish();
                            self.show_outcome(&url, started).await?;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    async fn show_outcome(&self, url: &str, started: Instant) -> Result<bool> {
        let state = self.session.state();
        let result = match state {
            SessionState::Loaded(result) => result,
            SessionState::Failed { message } => {
                print_error(message);
                return Ok(false);
            }
            _ => return Ok(false),
        };

        if self.cli.save || self.cli.output.is_some() {
            let path = match &self.cli.output {
                Some(path) => path.clone(),
                None => get_result_path(&get_cache_dir(url)),
            };
            save_result(result, &path).await?;
            eprintln!(
                "{} {}",
                style("Saved:").dim(),
                style(path.display()).cyan()
            );
        }

        if self.cli.json {
            println!("{}", serde_json::to_string_pretty(result)?);
            return Ok(true);
        }

        let mut view = self.session.view();
        if self.cli.check_frames && view.frames.is_some() {
            let spinner = create_spinner("Checking thumbnails...");
            probe_frames(self.transport.as_ref(), &mut view).await;
            spinner.finish_and_clear();
        }

        eprintln!(
            "{}",
            check(format!(
                "Done {}",
                style(format!("[{}]", format_duration(started.elapsed()))).dim()
            ))
        );
        eprintln!("{}", style("─".repeat(60)).dim());
        println!("{}", format_view_readable(&view));

        Ok(true)
    }
}
