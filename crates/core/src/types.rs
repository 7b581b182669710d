use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RemixError, Result};

/// A validated submission: the trimmed, non-empty video URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    url: String,
}

impl Submission {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = raw.trim();
        if url.is_empty() {
            return Err(RemixError::EmptySubmission);
        }
        Ok(Self {
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Opaque identifier handed out by the ingest endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video_id: Option<String>,
    pub user_name: Option<String>,
    /// Seconds.
    pub video_duration: Option<f64>,
    pub video_url: Option<String>,
}

impl VideoMetadata {
    pub fn is_empty(&self) -> bool {
        self.video_id.is_none()
            && self.user_name.is_none()
            && self.video_duration.is_none()
            && self.video_url.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptField {
    pub label: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Transcript {
    /// Labeled fields in the order the endpoint sent them.
    Fields(Vec<TranscriptField>),
    Text(String),
}

impl Transcript {
    /// Builds a transcript from a transcribe response. Objects keep one field per key,
    /// arrays are labeled by index and scalars become plain text.
    pub fn from_response(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Object(map) => Some(Transcript::Fields(
                map.into_iter()
                    .map(|(label, value)| TranscriptField { label, value })
                    .collect(),
            )),
            Value::Array(items) => Some(Transcript::Fields(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, value)| TranscriptField {
                        label: i.to_string(),
                        value,
                    })
                    .collect(),
            )),
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(Transcript::Text(text)),
            other => Some(Transcript::Text(other.to_string())),
        }
    }

    /// Builds a transcript from the opaque `transcript` value of an aggregate payload.
    pub fn from_blob(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(Transcript::Text(text)),
            other => Some(Transcript::Text(other.to_string())),
        }
    }
}

/// Tone name to generated text, in payload order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToneSet(pub serde_json::Map<String, Value>);

/// The normalized result both ingestion strategies produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestionResult {
    pub job_id: Option<JobId>,
    pub video: Option<VideoMetadata>,
    pub frames: Vec<String>,
    pub transcript: Option<Transcript>,
    pub tones: Option<ToneSet>,
}
