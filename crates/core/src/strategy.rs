use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{
    client::WebhookClient,
    config::Mode,
    error::Result,
    types::{IngestionResult, JobId, Submission, Transcript},
};

/// Intermediate results reported while a strategy runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    JobAccepted(JobId),
    FramesLoaded(Vec<String>),
    TranscriptRequested,
    /// The transcript call finished; `None` when it failed or came back empty.
    TranscriptSettled(Option<Transcript>),
}

pub struct ProgressSink {
    emit: Box<dyn Fn(Progress) + Send + Sync>,
}

impl ProgressSink {
    pub fn new(emit: impl Fn(Progress) + Send + Sync + 'static) -> Self {
        Self {
            emit: Box::new(emit),
        }
    }

    pub fn discard() -> Self {
        Self::new(|_| {})
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Progress>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Self::new(move |progress| {
            let _ = tx.send(progress);
        });
        (sink, rx)
    }

    pub fn emit(&self, progress: Progress) {
        (self.emit)(progress)
    }
}

#[async_trait]
pub trait IngestionStrategy: Send + Sync {
    fn mode(&self) -> Mode;

    async fn run(&self, submission: &Submission, progress: &ProgressSink)
    -> Result<IngestionResult>;
}

/// ingest, frames, transcribe in sequence. Only ingest is allowed to fail the run.
pub struct MultiCallStrategy {
    client: WebhookClient,
}

impl MultiCallStrategy {
    pub fn new(client: WebhookClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IngestionStrategy for MultiCallStrategy {
    fn mode(&self) -> Mode {
        Mode::MultiCall
    }

    async fn run(
        &self,
        submission: &Submission,
        progress: &ProgressSink,
    ) -> Result<IngestionResult> {
        let job_id = self.client.ingest(submission).await?;
        info!(%job_id, "job accepted");
        progress.emit(Progress::JobAccepted(job_id.clone()));

        // frames and transcript may still be computing on the backend
        let frames = match self.client.frames(&job_id).await {
            Ok(frames) => frames,
            Err(e) => {
                warn!(%job_id, error = %e, "error fetching frames");
                Vec::new()
            }
        };
        progress.emit(Progress::FramesLoaded(frames.clone()));

        progress.emit(Progress::TranscriptRequested);
        let transcript = match self.client.transcribe(&job_id).await {
            Ok(body) => Transcript::from_response(body),
            Err(e) => {
                warn!(%job_id, error = %e, "error fetching transcript");
                None
            }
        };
        progress.emit(Progress::TranscriptSettled(transcript.clone()));

        Ok(IngestionResult {
            job_id: Some(job_id),
            video: None,
            frames,
            transcript,
            tones: None,
        })
    }
}

/// Single call; the backend does the orchestration.
pub struct AggregateStrategy {
    client: WebhookClient,
}

impl AggregateStrategy {
    pub fn new(client: WebhookClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IngestionStrategy for AggregateStrategy {
    fn mode(&self) -> Mode {
        Mode::Aggregate
    }

    async fn run(
        &self,
        submission: &Submission,
        _progress: &ProgressSink,
    ) -> Result<IngestionResult> {
        let result = self.client.aggregate(submission).await?;
        info!(
            frames = result.frames.len(),
            transcript = result.transcript.is_some(),
            tones = result.tones.is_some(),
            "aggregate result received"
        );
        Ok(result)
    }
}

pub fn strategy_for(mode: Mode, client: WebhookClient) -> Arc<dyn IngestionStrategy> {
    match mode {
        Mode::MultiCall => Arc::new(MultiCallStrategy::new(client)),
        Mode::Aggregate => Arc::new(AggregateStrategy::new(client)),
    }
}
