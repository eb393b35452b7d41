//! Error types for Vigil.
//!
//! Transport and decode failures are both represented by `FetchError` so the
//! poll task boundary can treat them identically.

use std::time::Duration;
use thiserror::Error;

/// Failure of a single request against the telemetry API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status} from {path}")]
    Status { status: u16, path: String },

    #[error("invalid JSON response: {0}")]
    Decode(String),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("server rejected request: {0}")]
    Rejected(String),
}

impl FetchError {
    /// Short machine-friendly kind, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Status { .. } => "status",
            FetchError::Decode(_) => "decode",
            FetchError::Timeout(_) => "timeout",
            FetchError::Rejected(_) => "rejected",
        }
    }

    /// Whether the API could not be reached at all
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Timeout(_))
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Invalid time-series buffer construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("series '{0}' must have a capacity greater than zero")]
    ZeroCapacity(String),
}

/// Configuration loading and validation failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
