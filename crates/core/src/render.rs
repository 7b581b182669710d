//! Pure view model built from a [`SessionState`].
//!
//! Every section is optional. A section whose data is missing or empty is `None`
//! so front ends never draw an empty container.

use serde::Serialize;
use serde_json::Value;

use crate::{
    format::format_timestamp,
    state::SessionState,
    types::{IngestionResult, ToneSet, Transcript, TranscriptField, VideoMetadata},
};

pub const FRAME_PLACEHOLDER: &str = "Failed to load image";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: String,
}

impl LabeledValue {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameLoad {
    #[default]
    Pending,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameTile {
    pub url: String,
    pub alt: String,
    pub load: FrameLoad,
}

impl FrameTile {
    /// The image is hidden once it failed to load.
    pub fn shows_image(&self) -> bool {
        self.load != FrameLoad::Failed
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        (self.load == FrameLoad::Failed).then_some(FRAME_PLACEHOLDER)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum TranscriptSection {
    Loading,
    Fields(Vec<LabeledValue>),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct View {
    pub busy: bool,
    pub error: Option<String>,
    pub job_id: Option<String>,
    pub video: Option<Vec<LabeledValue>>,
    pub frames: Option<Vec<FrameTile>>,
    pub transcript: Option<TranscriptSection>,
    pub tones: Option<Vec<LabeledValue>>,
}

impl View {
    /// Record the load outcome of one thumbnail. Other tiles are left untouched.
    pub fn set_frame_load(&mut self, index: usize, load: FrameLoad) {
        if let Some(tile) = self.frames.as_mut().and_then(|tiles| tiles.get_mut(index)) {
            tile.load = load;
        }
    }

    pub fn frame_urls(&self) -> Vec<&str> {
        self.frames
            .iter()
            .flatten()
            .map(|tile| tile.url.as_str())
            .collect()
    }
}

pub fn render(state: &SessionState) -> View {
    let mut view = View {
        busy: state.is_busy(),
        error: state.error().map(str::to_string),
        ..View::default()
    };

    if let Some(result) = state.result() {
        render_result(&mut view, result);
    }

    if state.transcript_loading() {
        view.transcript = Some(TranscriptSection::Loading);
    }

    view
}

fn render_result(view: &mut View, result: &IngestionResult) {
    view.job_id = result
        .job_id
        .as_ref()
        .map(|id| id.to_string())
        .filter(|id| !id.is_empty());
    view.video = result.video.as_ref().and_then(render_video);
    view.frames = render_frames(&result.frames);
    view.transcript = result.transcript.as_ref().and_then(render_transcript);
    view.tones = result.tones.as_ref().and_then(render_tones);
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

fn render_video(video: &VideoMetadata) -> Option<Vec<LabeledValue>> {
    let mut rows = Vec::new();
    if let Some(id) = video.video_id.as_deref().filter(|s| !s.is_empty()) {
        rows.push(LabeledValue::new("Video ID", id));
    }
    if let Some(user) = video.user_name.as_deref().filter(|s| !s.is_empty()) {
        rows.push(LabeledValue::new("Creator", format!("@{user}")));
    }
    if let Some(seconds) = video.video_duration {
        rows.push(LabeledValue::new("Duration", format_timestamp(seconds)));
    }
    if let Some(url) = video.video_url.as_deref().filter(|s| !s.is_empty()) {
        rows.push(LabeledValue::new("URL", url));
    }
    non_empty(rows)
}

fn render_frames(frames: &[String]) -> Option<Vec<FrameTile>> {
    non_empty(
        frames
            .iter()
            .enumerate()
            .map(|(i, url)| FrameTile {
                url: url.clone(),
                alt: format!("Frame {}", i + 1),
                load: FrameLoad::Pending,
            })
            .collect(),
    )
}

fn render_transcript(transcript: &Transcript) -> Option<TranscriptSection> {
    match transcript {
        Transcript::Fields(fields) => non_empty(
            fields
                .iter()
                .filter(|field| is_displayable(&field.value))
                .map(|TranscriptField { label, value }| {
                    LabeledValue::new(label.clone(), display_value(value))
                })
                .collect(),
        )
        .map(TranscriptSection::Fields),
        Transcript::Text(text) if text.is_empty() => None,
        Transcript::Text(text) => Some(TranscriptSection::Text(text.clone())),
    }
}

fn render_tones(tones: &ToneSet) -> Option<Vec<LabeledValue>> {
    non_empty(
        tones
            .0
            .iter()
            .filter(|(_, value)| is_displayable(value))
            .map(|(key, value)| LabeledValue::new(humanize_key(key), display_value(value)))
            .collect(),
    )
}

/// Null and the empty string are never shown. Unlike alias probing, `false` and `0`
/// are real values here.
fn is_displayable(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `formal_tone` -> `Formal Tone`
pub fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::JobId;

    fn loaded(result: IngestionResult) -> SessionState {
        SessionState::Loaded(result)
    }

    fn fields(value: Value) -> Transcript {
        Transcript::from_response(value).unwrap()
    }

    #[test]
    fn idle_renders_nothing() {
        assert_eq!(render(&SessionState::Idle), View::default());
    }

    #[test]
    fn failure_renders_only_the_error() {
        let view = render(&SessionState::Failed {
            message: "Ingest failed: Bad Gateway".into(),
        });
        assert_eq!(view.error.as_deref(), Some("Ingest failed: Bad Gateway"));
        assert!(!view.busy);
        assert!(view.job_id.is_none() && view.frames.is_none() && view.transcript.is_none());
    }

    #[test]
    fn transcript_fields_skip_null_and_empty() {
        let view = render(&loaded(IngestionResult {
            transcript: Some(fields(json!({"a": "x", "b": null, "c": ""}))),
            ..Default::default()
        }));
        assert_eq!(
            view.transcript,
            Some(TranscriptSection::Fields(vec![LabeledValue::new("a", "x")]))
        );
    }

    #[test]
    fn transcript_with_only_empty_fields_is_suppressed() {
        let view = render(&loaded(IngestionResult {
            transcript: Some(fields(json!({"b": null, "c": ""}))),
            ..Default::default()
        }));
        assert_eq!(view.transcript, None);
    }

    #[test]
    fn transcript_non_string_values_are_stringified() {
        let view = render(&loaded(IngestionResult {
            transcript: Some(fields(json!({"words": 42, "final": false, "raw": {"k": 1}}))),
            ..Default::default()
        }));
        assert_eq!(
            view.transcript,
            Some(TranscriptSection::Fields(vec![
                LabeledValue::new("words", "42"),
                LabeledValue::new("final", "false"),
                LabeledValue::new("raw", r#"{"k":1}"#),
            ]))
        );
    }

    #[test]
    fn tones_are_humanized_and_filtered() {
        let mut map = serde_json::Map::new();
        map.insert("formal_tone".into(), json!("Good day."));
        map.insert("gen_z".into(), json!(null));
        map.insert("very__casual".into(), json!("hey"));
        map.insert("pirate".into(), json!(""));
        let view = render(&loaded(IngestionResult {
            tones: Some(ToneSet(map)),
            ..Default::default()
        }));
        assert_eq!(
            view.tones,
            Some(vec![
                LabeledValue::new("Formal Tone", "Good day."),
                LabeledValue::new("Very Casual", "hey"),
            ])
        );
    }

    #[test]
    fn humanize_examples() {
        assert_eq!(humanize_key("friendly"), "Friendly");
        assert_eq!(humanize_key("very_excited_tone"), "Very Excited Tone");
        assert_eq!(humanize_key(""), "");
    }

    #[test]
    fn empty_sections_are_suppressed() {
        let view = render(&loaded(IngestionResult {
            job_id: Some(JobId("j1".into())),
            video: Some(VideoMetadata::default()),
            frames: Vec::new(),
            transcript: None,
            tones: Some(ToneSet::default()),
        }));
        assert_eq!(view.job_id.as_deref(), Some("j1"));
        assert!(view.video.is_none());
        assert!(view.frames.is_none());
        assert!(view.transcript.is_none());
        assert!(view.tones.is_none());
    }

    #[test]
    fn video_metadata_rows() {
        let view = render(&loaded(IngestionResult {
            video: Some(VideoMetadata {
                video_id: Some("7301".into()),
                user_name: Some("creator".into()),
                video_duration: Some(75.0),
                video_url: None,
            }),
            ..Default::default()
        }));
        assert_eq!(
            view.video,
            Some(vec![
                LabeledValue::new("Video ID", "7301"),
                LabeledValue::new("Creator", "@creator"),
                LabeledValue::new("Duration", "01:15"),
            ])
        );
    }

    #[test]
    fn frames_keep_order_and_alt_text() {
        let view = render(&loaded(IngestionResult {
            frames: vec!["a.jpg".into(), "b.jpg".into()],
            ..Default::default()
        }));
        let tiles = view.frames.unwrap();
        assert_eq!(tiles[0].url, "a.jpg");
        assert_eq!(tiles[1].alt, "Frame 2");
        assert!(tiles.iter().all(|t| t.load == FrameLoad::Pending));
    }

    #[test]
    fn failed_frame_only_affects_its_own_tile() {
        let mut view = render(&loaded(IngestionResult {
            frames: vec!["a.jpg".into(), "b.jpg".into(), "c.jpg".into()],
            ..Default::default()
        }));
        view.set_frame_load(0, FrameLoad::Loaded);
        view.set_frame_load(1, FrameLoad::Failed);
        view.set_frame_load(9, FrameLoad::Failed);

        let tiles = view.frames.unwrap();
        assert!(tiles[0].shows_image());
        assert_eq!(tiles[0].placeholder(), None);
        assert!(!tiles[1].shows_image());
        assert_eq!(tiles[1].placeholder(), Some(FRAME_PLACEHOLDER));
        assert_eq!(tiles[2].load, FrameLoad::Pending);
        assert!(tiles[2].shows_image());
    }

    #[test]
    fn loading_indicator_replaces_transcript() {
        let state = SessionState::PartiallyLoaded {
            result: IngestionResult {
                job_id: Some(JobId("j1".into())),
                transcript: Some(Transcript::Text("old".into())),
                ..Default::default()
            },
            transcript_loading: true,
        };
        let view = render(&state);
        assert!(view.busy);
        assert_eq!(view.transcript, Some(TranscriptSection::Loading));
    }
}
