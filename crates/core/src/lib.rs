//! Remix Core Library
//!
//! Submits TikTok video URLs to the remix ingestion webhooks, normalizes whatever
//! comes back and renders it into a front-end independent view.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod payload;
pub mod render;
pub mod session;
pub mod state;
pub mod strategy;
pub mod thumbnail;
pub mod transport;
pub mod types;

// Re-export commonly used items at crate root
pub use cache::{get_cache_dir, get_result_path, load_result, save_result};
pub use client::WebhookClient;
pub use config::{EndpointConfig, Mode, RemixConfig};
pub use error::{RemixError, Result};
pub use format::{format_timestamp, format_view_readable};
pub use render::{FrameLoad, FrameTile, TranscriptSection, View, render};
pub use session::{Generation, Session};
pub use state::SessionState;
pub use strategy::{
    AggregateStrategy, IngestionStrategy, MultiCallStrategy, Progress, ProgressSink, strategy_for,
};
pub use thumbnail::probe_frames;
pub use transport::{HttpReply, HttpTransport, ReqwestTransport};
pub use types::{IngestionResult, JobId, Submission, ToneSet, Transcript, VideoMetadata};
