//! Outer Events API envelopes.
//!
//! Slack wraps every delivery in an outer object whose own `type` is
//! `event_callback`, `url_verification` or `app_rate_limited`. Callbacks
//! carry the inner event, which is handed to the [`EnvelopeDecoder`] as the
//! exact bytes Slack sent.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;

use super::decoder::{DecodeError, EnvelopeDecoder, InnerEvent, discriminator};
use crate::{SlackConfig, SlackError};

pub const CALLBACK_EVENT: &str = "event_callback";
pub const URL_VERIFICATION: &str = "url_verification";
pub const APP_RATE_LIMITED: &str = "app_rate_limited";

/// An `event_callback` delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsApiCallbackEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub enterprise_id: Option<String>,
    #[serde(default)]
    pub api_app_id: String,
    /// The inner event, kept as received.
    pub event: Box<RawValue>,
    #[serde(default)]
    pub authed_users: Vec<String>,
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub event_time: i64,
}

/// The handshake Slack sends when an events URL is configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsApiUrlVerificationEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub token: String,
    pub challenge: String,
}

/// Body to reply with to a `url_verification` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub challenge: String,
}

impl From<&EventsApiUrlVerificationEvent> for ChallengeResponse {
    fn from(e: &EventsApiUrlVerificationEvent) -> Self {
        Self {
            challenge: e.challenge.clone(),
        }
    }
}

/// Sent when the app exceeds the Events API delivery rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsApiAppRateLimited {
    #[serde(rename = "type")]
    pub event_type: String,
    pub token: String,
    pub team_id: String,
    pub minute_rate_limited: i64,
    pub api_app_id: String,
}

#[derive(Debug, Clone)]
pub enum OuterEventData {
    Callback(EventsApiCallbackEvent),
    UrlVerification(EventsApiUrlVerificationEvent),
    AppRateLimited(EventsApiAppRateLimited),
    /// Outer type this crate does not know; see `EventsApiEvent::raw`.
    Unrecognized,
}

/// A fully decoded Events API delivery.
#[derive(Debug, Clone)]
pub struct EventsApiEvent {
    pub token: String,
    pub team_id: String,
    pub api_app_id: String,
    pub event_type: String,
    pub data: OuterEventData,
    /// Decoded inner event, present for `event_callback` deliveries.
    pub inner_event: Option<InnerEvent>,
    pub raw: Value,
}

impl EventsApiEvent {
    /// The challenge to echo back, for `url_verification` deliveries.
    pub fn challenge(&self) -> Option<ChallengeResponse> {
        match &self.data {
            OuterEventData::UrlVerification(e) => Some(e.into()),
            _ => None,
        }
    }
}

/// Options for [`parse_event`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// When set, deliveries whose `token` differs are rejected.
    pub verification_token: Option<String>,
}

impl ParseOptions {
    pub fn verify_token(token: impl Into<String>) -> Self {
        Self {
            verification_token: Some(token.into()),
        }
    }

    pub fn from_config(config: &SlackConfig) -> Self {
        Self {
            verification_token: config.verification_token.clone(),
        }
    }
}

/// Decode an Events API delivery using the built-in registry.
pub fn parse_event(raw: &[u8], options: &ParseOptions) -> Result<EventsApiEvent, SlackError> {
    parse_event_with(&EnvelopeDecoder::default(), raw, options)
}

/// Decode an Events API delivery, resolving the inner event with `decoder`.
pub fn parse_event_with(
    decoder: &EnvelopeDecoder<'_>,
    raw: &[u8],
    options: &ParseOptions,
) -> Result<EventsApiEvent, SlackError> {
    let generic: Value = serde_json::from_slice(raw).map_err(DecodeError::Syntax)?;
    let event_type = discriminator(&generic)?;

    let str_field = |key: &str| -> String {
        generic
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let token = str_field("token");
    let team_id = str_field("team_id");
    let api_app_id = str_field("api_app_id");

    if let Some(expected) = &options.verification_token {
        if token != *expected {
            return Err(SlackError::InvalidVerificationToken);
        }
    }

    let mut inner_event = None;
    let data = match event_type.as_str() {
        CALLBACK_EVENT => {
            let callback: EventsApiCallbackEvent =
                decode_outer(raw, &event_type, "EventsApiCallbackEvent")?;
            inner_event = Some(decoder.decode(callback.event.get().as_bytes())?);
            OuterEventData::Callback(callback)
        }
        URL_VERIFICATION => OuterEventData::UrlVerification(decode_outer(
            raw,
            &event_type,
            "EventsApiUrlVerificationEvent",
        )?),
        APP_RATE_LIMITED => OuterEventData::AppRateLimited(decode_outer(
            raw,
            &event_type,
            "EventsApiAppRateLimited",
        )?),
        _ => OuterEventData::Unrecognized,
    };

    Ok(EventsApiEvent {
        token,
        team_id,
        api_app_id,
        event_type,
        data,
        inner_event,
        raw: generic,
    })
}

fn decode_outer<T: DeserializeOwned>(
    raw: &[u8],
    event_type: &str,
    shape: &'static str,
) -> Result<T, DecodeError> {
    serde_json::from_slice(raw).map_err(|source| DecodeError::Shape {
        event_type: event_type.to_string(),
        shape,
        source,
    })
}
