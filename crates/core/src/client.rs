use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use crate::{
    config::EndpointConfig,
    error::{RemixError, Result},
    payload::{AggregatePayload, extract_frames, extract_job_id},
    transport::HttpTransport,
    types::{IngestionResult, JobId, Submission},
};

/// Typed calls against the remix webhooks.
#[derive(Clone)]
pub struct WebhookClient {
    transport: Arc<dyn HttpTransport>,
    endpoints: EndpointConfig,
}

impl WebhookClient {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: EndpointConfig) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Start a job for the submitted video and return its identifier.
    pub async fn ingest(&self, submission: &Submission) -> Result<JobId> {
        debug!(url = %self.endpoints.ingest, "POST ingest");
        let reply = self
            .transport
            .post_json(&self.endpoints.ingest, &json!({ "tiktokURL": submission.url() }))
            .await?;

        if !reply.is_success() {
            return Err(RemixError::IngestFailed {
                status_text: reply.status_text,
            });
        }

        extract_job_id(&reply.parse_json()?).ok_or(RemixError::MissingJobId)
    }

    pub async fn frames(&self, job_id: &JobId) -> Result<Vec<String>> {
        debug!(url = %self.endpoints.frames, %job_id, "POST frames");
        let body = self.job_request("frames", &self.endpoints.frames, job_id).await?;
        Ok(extract_frames(&body))
    }

    /// The raw transcribe response; its shape is up to the backend.
    pub async fn transcribe(&self, job_id: &JobId) -> Result<Value> {
        debug!(url = %self.endpoints.transcribe, %job_id, "POST transcribe");
        self.job_request("transcribe", &self.endpoints.transcribe, job_id)
            .await
    }

    /// One call that returns every section at once.
    pub async fn aggregate(&self, submission: &Submission) -> Result<IngestionResult> {
        debug!(url = %self.endpoints.aggregate, "POST aggregate");
        let reply = self
            .transport
            .post_json(
                &self.endpoints.aggregate,
                &json!({ "tiktokURL": submission.url() }),
            )
            .await?;

        if !reply.is_success() {
            return Err(RemixError::RequestFailed {
                status_text: reply.status_text,
            });
        }

        let payload = AggregatePayload::from_value(reply.parse_json()?);
        if !payload.is_success() {
            return Err(RemixError::Rejected {
                message: payload.failure_message(),
            });
        }

        Ok(payload.into_result())
    }

    async fn job_request(&self, step: &'static str, url: &str, job_id: &JobId) -> Result<Value> {
        let reply = self
            .transport
            .post_json(url, &json!({ "job_id": job_id.as_str() }))
            .await?;

        if !reply.is_success() {
            return Err(RemixError::StepFailed {
                step,
                status_text: reply.status_text,
            });
        }

        reply.parse_json()
    }
}
