//! Normalization of the loosely-typed webhook responses.
//!
//! Webhook payloads name the same thing several ways. Each field is read through an
//! ordered alias list and the first value that is present and non-empty wins.

use serde_json::Value;

use crate::types::{IngestionResult, JobId, ToneSet, Transcript, VideoMetadata};

/// Job identifier aliases, highest priority first.
pub const JOB_ID_FIELDS: [&str; 3] = ["job_id", "jobId", "id"];

/// Frame list aliases, highest priority first.
pub const FRAME_FIELDS: [&str; 3] = ["frames", "frame_urls", "thumbnails"];

pub const SUCCESS_STATUS: &str = "success";

/// Whether a value counts as set. Null, `false`, zero and the empty string do not;
/// empty arrays and objects do.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First present value among `aliases`.
pub fn first_present<'a>(payload: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| payload.get(alias))
        .find(|value| is_present(value))
}

pub fn extract_job_id(payload: &Value) -> Option<JobId> {
    match first_present(payload, &JOB_ID_FIELDS)? {
        Value::String(s) => Some(JobId(s.clone())),
        Value::Number(n) => Some(JobId(n.to_string())),
        _ => None,
    }
}

/// Frame URLs in display order. Anything that is not a list yields no frames.
pub fn extract_frames(payload: &Value) -> Vec<String> {
    match first_present(payload, &FRAME_FIELDS) {
        Some(value) => frame_list(value),
        None => Vec::new(),
    }
}

fn frame_list(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item.as_str())
        .map(str::to_string)
        .collect()
}

/// Response of the aggregate endpoint. Every field is kept as raw JSON so a
/// mistyped field degrades to "absent" instead of failing the whole payload.
#[derive(Debug, Default)]
pub struct AggregatePayload {
    pub status: Value,
    pub message: Value,
    pub video: Value,
    pub frames: Value,
    pub transcript: Value,
    pub tones: Value,
}

impl AggregatePayload {
    /// Anything other than an object reads as an empty payload.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };
        let mut take = |key: &str| map.remove(key).unwrap_or(Value::Null);
        Self {
            status: take("status"),
            message: take("message"),
            video: take("video"),
            frames: take("frames"),
            transcript: take("transcript"),
            tones: take("tones"),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.as_str() == Some(SUCCESS_STATUS)
    }

    /// The failure message to show when the payload is not successful.
    pub fn failure_message(&self) -> String {
        Some(&self.message)
            .filter(|m| is_present(m))
            .and_then(text_of)
            .unwrap_or_else(|| "Processing failed".to_string())
    }

    pub fn into_result(self) -> IngestionResult {
        let tones = match self.tones {
            Value::Object(map) => Some(ToneSet(map)),
            _ => None,
        };

        IngestionResult {
            job_id: None,
            video: video_of(&self.video).filter(|v| !v.is_empty()),
            frames: frame_list(&self.frames),
            transcript: Transcript::from_blob(self.transcript),
            tones,
        }
    }
}

/// Video metadata from the `video` object. Non-objects are treated as absent.
fn video_of(value: &Value) -> Option<VideoMetadata> {
    let Value::Object(video) = value else {
        return None;
    };
    let field = |key: &str| video.get(key).unwrap_or(&Value::Null);
    Some(VideoMetadata {
        video_id: text_of(field("video_id")),
        user_name: text_of(field("user_name")),
        video_duration: seconds_of(field("video_duration")),
        video_url: text_of(field("video_url")),
    })
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn seconds_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
