//! Slack Web API transport.
//!
//! Form-encoded POSTs against `{api_url}{method}` with a per-request
//! timeout. Responses are decoded into a typed body and then checked for
//! the embedded `ok` flag.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::{SlackConfig, SlackError, SlackResponse};

/// Typed Web API response bodies expose their embedded status block.
pub trait ApiResponse {
    fn status(&self) -> &SlackResponse;
}

impl ApiResponse for SlackResponse {
    fn status(&self) -> &SlackResponse {
        self
    }
}

/// Minimal Web API client. No retries; transport errors surface as-is.
#[derive(Debug, Clone)]
pub struct SlackApiClient {
    http: reqwest::Client,
    api_url: String,
    timeout: Duration,
}

impl SlackApiClient {
    pub fn new(config: &SlackConfig) -> Self {
        Self::with_http(reqwest::Client::new(), config)
    }

    /// Use a caller-supplied `reqwest::Client` (shared pools, proxies).
    pub fn with_http(http: reqwest::Client, config: &SlackConfig) -> Self {
        Self {
            http,
            api_url: config.api_url.clone(),
            timeout: config.request_timeout,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// POST `params` form-encoded to a Web API method and decode the reply.
    ///
    /// A reply with `ok: false` becomes [`SlackError::Api`].
    pub async fn post_form<T>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<T, SlackError>
    where
        T: DeserializeOwned + ApiResponse,
    {
        let url = format!("{}{method}", self.api_url);
        tracing::debug!(method, "Calling Slack Web API");

        let resp = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .form(params)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(map_transport_error)?;

        let parsed = parse_api_body::<T>(status.as_u16(), &body)?;
        parsed.status().err()?;
        Ok(parsed)
    }
}

/// Decode a Web API body, distinguishing platform errors from bare HTTP
/// failures.
pub(crate) fn parse_api_body<T: DeserializeOwned>(
    status: u16,
    body: &str,
) -> Result<T, SlackError> {
    if !(200..300).contains(&status) {
        tracing::warn!(status, "Slack Web API returned non-success status");
        if let Ok(resp) = serde_json::from_str::<SlackResponse>(body) {
            if resp.error.is_some() {
                resp.err()?;
            }
        }
        return Err(SlackError::Status {
            status,
            body: body.to_string(),
        });
    }

    Ok(serde_json::from_str(body)?)
}

fn map_transport_error(e: reqwest::Error) -> SlackError {
    if e.is_timeout() {
        SlackError::Timeout
    } else {
        SlackError::Http(e)
    }
}
