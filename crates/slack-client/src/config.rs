//! Client configuration with environment overrides.

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://slack.com/api/";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by the OAuth client and the event parser.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Web API base URL, always ending with `/`.
    pub api_url: String,
    pub request_timeout: Duration,
    /// Legacy Events API verification token, checked when set.
    pub verification_token: Option<String>,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            api_url: DEFAULT_API_URL.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            verification_token: None,
        }
    }
}

impl SlackConfig {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            ..Self::default()
        }
    }

    /// Load configuration from `SLACK_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> Option<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        if let Some(v) = g("SLACK_CLIENT_ID") {
            config.client_id = v;
        }
        if let Some(v) = g("SLACK_CLIENT_SECRET") {
            config.client_secret = v;
        }
        if let Some(v) = g("SLACK_REDIRECT_URI") {
            config.redirect_uri = v;
        }
        if let Some(v) = g("SLACK_API_URL") {
            config = config.with_api_url(v);
        }
        if let Some(v) = g("SLACK_REQUEST_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %v, "Ignoring invalid SLACK_REQUEST_TIMEOUT_SECS"),
            }
        }
        config.verification_token = g("SLACK_VERIFICATION_TOKEN");
        config
    }

    /// Override the Web API base URL (useful for proxies and tests).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        let mut url = api_url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.api_url = url;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
