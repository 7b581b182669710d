use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::{
    client::WebhookClient,
    config::RemixConfig,
    error::{RemixError, Result},
    render::{View, render},
    state::SessionState,
    strategy::{IngestionStrategy, Progress, ProgressSink, strategy_for},
    transport::HttpTransport,
    types::{IngestionResult, Submission},
};

/// Monotonic submission counter. Updates tagged with an older value are stale.
pub type Generation = u64;

enum Update {
    Progress(Progress),
    Finished(Result<IngestionResult>),
}

struct Tagged {
    generation: Generation,
    update: Update,
}

/// Sends the outcome of a submission task. If the task unwinds before reporting,
/// the drop sends [`RemixError::Interrupted`] so the session never waits forever.
struct Completion {
    generation: Generation,
    tx: Option<mpsc::UnboundedSender<Tagged>>,
}

impl Completion {
    fn send(mut self, outcome: Result<IngestionResult>) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Tagged {
                generation: self.generation,
                update: Update::Finished(outcome),
            });
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Tagged {
                generation: self.generation,
                update: Update::Finished(Err(RemixError::Interrupted)),
            });
        }
    }
}

/// Owns the state of one client and runs submissions against a strategy.
///
/// Each submission runs on its own tokio task. A new submission aborts the previous
/// one and bumps the generation, so late updates from superseded work are dropped
/// instead of overwriting the newer state.
pub struct Session {
    strategy: Arc<dyn IngestionStrategy>,
    state: SessionState,
    /// Validation error of the last rejected input, shown over the current state.
    rejected: Option<String>,
    generation: Generation,
    in_flight: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Tagged>,
    rx: mpsc::UnboundedReceiver<Tagged>,
}

impl Session {
    pub fn new(strategy: Arc<dyn IngestionStrategy>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            strategy,
            state: SessionState::Idle,
            rejected: None,
            generation: 0,
            in_flight: None,
            tx,
            rx,
        }
    }

    pub fn from_config(config: &RemixConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        config.validate()?;
        let client = WebhookClient::new(transport, config.endpoints.clone());
        Ok(Self::new(strategy_for(config.mode, client)))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// The error to show: a rejected input, else the failure of the current submission.
    pub fn error(&self) -> Option<&str> {
        self.rejected.as_deref().or_else(|| self.state.error())
    }

    pub fn view(&self) -> View {
        let mut view = render(&self.state);
        view.error = self.error().map(str::to_string);
        view
    }

    /// Validate `raw` and start a new submission. Must be called inside a tokio runtime.
    ///
    /// Invalid input makes no request and leaves the current state and any in-flight
    /// submission alone; only [`Session::error`] reports it. Valid input supersedes
    /// whatever is in flight.
    pub fn submit(&mut self, raw: &str) -> Result<Generation> {
        let submission = match Submission::parse(raw) {
            Ok(submission) => submission,
            Err(e) => {
                self.rejected = Some(e.to_string());
                return Err(e);
            }
        };

        self.supersede();
        self.rejected = None;

        let generation = self.generation;
        let submission_id = Uuid::new_v4();
        info!(
            %submission_id,
            generation,
            url = submission.url(),
            mode = %self.strategy.mode(),
            "submission accepted"
        );
        self.state = SessionState::Submitting;

        let strategy = Arc::clone(&self.strategy);
        let progress_tx = self.tx.clone();
        let sink = ProgressSink::new(move |progress| {
            let _ = progress_tx.send(Tagged {
                generation,
                update: Update::Progress(progress),
            });
        });
        let completion = Completion {
            generation,
            tx: Some(self.tx.clone()),
        };

        let task = async move {
            let outcome = strategy.run(&submission, &sink).await;
            if let Err(e) = &outcome {
                warn!(error = %e, "submission failed");
            }
            completion.send(outcome);
        };
        self.in_flight = Some(tokio::spawn(
            task.instrument(info_span!("submission", %submission_id, generation)),
        ));

        Ok(generation)
    }

    /// Wait for the next update of the current submission and apply it.
    ///
    /// Pending forever when nothing is in flight; use [`Session::settle`] to wait
    /// for a submission to finish.
    pub async fn next_update(&mut self) -> &SessionState {
        loop {
            let Some(tagged) = self.rx.recv().await else {
                return &self.state;
            };
            if tagged.generation != self.generation {
                debug!(
                    stale = tagged.generation,
                    current = self.generation,
                    "dropping update from superseded submission"
                );
                continue;
            }

            let state = std::mem::take(&mut self.state);
            self.state = match tagged.update {
                Update::Progress(progress) => state.apply(progress),
                Update::Finished(outcome) => {
                    self.in_flight = None;
                    if outcome.is_err() {
                        self.rejected = None;
                    }
                    state.finish(outcome)
                }
            };
            return &self.state;
        }
    }

    /// Apply updates until the current submission is no longer busy.
    pub async fn settle(&mut self) -> &SessionState {
        while self.state.is_busy() {
            self.next_update().await;
        }
        &self.state
    }

    fn supersede(&mut self) {
        if let Some(task) = self.in_flight.take() {
            debug!(generation = self.generation, "aborting in-flight submission");
            task.abort();
        }
        self.generation += 1;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}
