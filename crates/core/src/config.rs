use std::{fmt, str::FromStr, time::Duration};

use crate::error::{RemixError, Result};

pub const DEFAULT_INGEST_URL: &str = "https://iwc.app.n8n.cloud/webhook/api/remix/ingest";
pub const DEFAULT_FRAMES_URL: &str = "https://iwc.app.n8n.cloud/webhook/api/remix/frames";
pub const DEFAULT_TRANSCRIBE_URL: &str = "https://iwc.app.n8n.cloud/webhook/api/remix/transcribe";
pub const DEFAULT_AGGREGATE_URL: &str = "https://iwc.app.n8n.cloud/webhook/api/remix/process";

/// Which endpoint topology to drive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// ingest, then frames, then transcribe
    #[default]
    MultiCall,
    /// one call returning everything
    Aggregate,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::MultiCall => "multi-call",
            Mode::Aggregate => "aggregate",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = RemixError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multi-call" | "multi" | "multicall" => Ok(Mode::MultiCall),
            "aggregate" | "single" => Ok(Mode::Aggregate),
            other => Err(RemixError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointConfig {
    pub ingest: String,
    pub frames: String,
    pub transcribe: String,
    pub aggregate: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            ingest: DEFAULT_INGEST_URL.to_string(),
            frames: DEFAULT_FRAMES_URL.to_string(),
            transcribe: DEFAULT_TRANSCRIBE_URL.to_string(),
            aggregate: DEFAULT_AGGREGATE_URL.to_string(),
        }
    }
}

impl EndpointConfig {
    pub const INGEST_ENV: &'static str = "REMIX_INGEST_URL";
    pub const FRAMES_ENV: &'static str = "REMIX_FRAMES_URL";
    pub const TRANSCRIBE_ENV: &'static str = "REMIX_TRANSCRIBE_URL";
    pub const AGGREGATE_ENV: &'static str = "REMIX_AGGREGATE_URL";

    /// All endpoints under one base URL, e.g. a local webhook server.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            ingest: format!("{base}/ingest"),
            frames: format!("{base}/frames"),
            transcribe: format!("{base}/transcribe"),
            aggregate: format!("{base}/process"),
        }
    }

    /// Replace endpoints for which `lookup` yields a non-empty value.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let slots = [
            (Self::INGEST_ENV, &mut self.ingest),
            (Self::FRAMES_ENV, &mut self.frames),
            (Self::TRANSCRIBE_ENV, &mut self.transcribe),
            (Self::AGGREGATE_ENV, &mut self.aggregate),
        ];
        for (key, slot) in slots {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = value.trim().to_string();
            }
        }
        self
    }

    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Validate the endpoints `mode` will call.
    pub fn validate(&self, mode: Mode) -> Result<()> {
        match mode {
            Mode::MultiCall => {
                validate_url("ingest", &self.ingest)?;
                validate_url("frames", &self.frames)?;
                validate_url("transcribe", &self.transcribe)
            }
            Mode::Aggregate => validate_url("aggregate", &self.aggregate),
        }
    }
}

fn validate_url(name: &'static str, url: &str) -> Result<()> {
    let invalid = |reason: String| RemixError::InvalidEndpoint {
        name,
        url: url.to_string(),
        reason,
    };
    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    Ok(())
}

#[derive(Clone, Debug, Default)]
pub struct RemixConfig {
    pub mode: Mode,
    pub endpoints: EndpointConfig,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl RemixConfig {
    pub const MODE_ENV: &'static str = "REMIX_MODE";

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` yields for the `REMIX_*` keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mode = match lookup(Self::MODE_ENV) {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => Mode::default(),
        };
        Ok(Self {
            mode,
            endpoints: EndpointConfig::default().with_overrides(&lookup),
            timeout: None,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.endpoints.validate(self.mode)
    }
}
