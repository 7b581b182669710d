use crate::{
    error::RemixError,
    strategy::Progress,
    types::IngestionResult,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    /// Waiting on the first (mandatory) response.
    Submitting,
    /// Some sections have arrived; others are still being fetched.
    PartiallyLoaded {
        result: IngestionResult,
        transcript_loading: bool,
    },
    Loaded(IngestionResult),
    Failed { message: String },
}

impl SessionState {
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SessionState::Submitting | SessionState::PartiallyLoaded { .. }
        )
    }

    pub fn result(&self) -> Option<&IngestionResult> {
        match self {
            SessionState::PartiallyLoaded { result, .. } | SessionState::Loaded(result) => {
                Some(result)
            }
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SessionState::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn transcript_loading(&self) -> bool {
        matches!(
            self,
            SessionState::PartiallyLoaded {
                transcript_loading: true,
                ..
            }
        )
    }

    pub fn failed(error: &RemixError) -> Self {
        SessionState::Failed {
            message: error.to_string(),
        }
    }

    /// Fold a progress report into the state. Reports arriving outside a running
    /// submission are ignored.
    pub fn apply(self, progress: Progress) -> Self {
        let (mut result, mut transcript_loading) = match self {
            SessionState::Submitting => (IngestionResult::default(), false),
            SessionState::PartiallyLoaded {
                result,
                transcript_loading,
            } => (result, transcript_loading),
            other => return other,
        };

        match progress {
            Progress::JobAccepted(job_id) => result.job_id = Some(job_id),
            Progress::FramesLoaded(frames) => result.frames = frames,
            Progress::TranscriptRequested => transcript_loading = true,
            Progress::TranscriptSettled(transcript) => {
                result.transcript = transcript;
                transcript_loading = false;
            }
        }

        SessionState::PartiallyLoaded {
            result,
            transcript_loading,
        }
    }

    pub fn finish(self, outcome: Result<IngestionResult, RemixError>) -> Self {
        if !self.is_busy() {
            return self;
        }
        match outcome {
            Ok(result) => SessionState::Loaded(result),
            Err(e) => SessionState::failed(&e),
        }
    }
}
