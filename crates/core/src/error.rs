use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemixError {
    #[error("Please enter a TikTok URL")]
    EmptySubmission,

    #[error("Ingest failed: {status_text}")]
    IngestFailed { status_text: String },

    #[error("No job_id received from ingest endpoint")]
    MissingJobId,

    /// A best-effort step (frames, transcribe) came back with a non-success status.
    #[error("{step} failed: {status_text}")]
    StepFailed {
        step: &'static str,
        status_text: String,
    },

    #[error("Request failed: {status_text}")]
    RequestFailed { status_text: String },

    /// The aggregate endpoint answered with a non-success `status` field.
    #[error("{message}")]
    Rejected { message: String },

    #[error("Invalid {name} endpoint {url:?}: {reason}")]
    InvalidEndpoint {
        name: &'static str,
        url: String,
        reason: String,
    },

    #[error("Unknown mode {0:?} (expected \"multi-call\" or \"aggregate\")")]
    UnknownMode(String),

    /// The submission task ended without reporting an outcome.
    #[error("Submission stopped unexpectedly")]
    Interrupted,

    #[error("Network error: {reason}")]
    Network { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, RemixError>;
