//! Slack integration client library.
//!
//! Provides OAuth code exchange (v1 and v2) and typed decoding of
//! Events API payloads.

pub mod api;
pub mod auth;
pub mod config;
pub mod events;

pub use auth::SlackAuth;
pub use config::SlackConfig;
pub use events::{DecodeError, EventRegistry, InnerEvent, InnerEventData};

use serde::{Deserialize, Serialize};

/// Status block embedded in every Slack Web API response.
///
/// A body can decode cleanly and still report `ok: false`; call
/// [`SlackResponse::err`] after decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl SlackResponse {
    /// Turn a logically failed response into [`SlackError::Api`].
    pub fn err(&self) -> Result<(), SlackError> {
        if self.ok {
            return Ok(());
        }
        Err(SlackError::Api {
            error: self
                .error
                .clone()
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "unknown_error".into()),
        })
    }
}

/// Unified error type for the slack-client crate.
#[derive(Debug, thiserror::Error)]
pub enum SlackError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("event decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Slack API error: {error}")]
    Api { error: String },

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request timed out")]
    Timeout,

    #[error("verification token does not match")]
    InvalidVerificationToken,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl SlackError {
    /// The platform's machine-readable error code, for logical API failures.
    pub fn api_error(&self) -> Option<&str> {
        match self {
            SlackError::Api { error } => Some(error),
            _ => None,
        }
    }
}
