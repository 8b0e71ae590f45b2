//! OAuth token exchange for Slack apps.
//!
//! Handles authorization URL generation and the v1 (`oauth.access`) and
//! v2 (`oauth.v2.access`) code exchanges. Tokens are returned to the
//! caller, which is responsible for persisting them.

mod models;

use url::Url;

use crate::api::SlackApiClient;
use crate::{SlackConfig, SlackError};

pub use models::{
    OAuthResponse, OAuthResponseBot, OAuthResponseIncomingWebhook, OAuthV2Response,
    OAuthV2ResponseAuthedUser, OAuthV2ResponseEnterprise, OAuthV2ResponseTeam,
};

const AUTHORIZE_URL: &str = "https://slack.com/oauth/v2/authorize";

/// Bot scopes covering every event kind this crate decodes.
pub const DEFAULT_BOT_SCOPES: &[&str] = &[
    "app_mentions:read",
    "channels:history",
    "channels:read",
    "groups:history",
    "im:history",
    "links:read",
    "pins:read",
    "reactions:read",
];

/// Exchanges OAuth authorization codes for access tokens.
pub struct SlackAuth {
    config: SlackConfig,
    api: SlackApiClient,
}

impl SlackAuth {
    pub fn new(config: SlackConfig) -> Self {
        let api = SlackApiClient::new(&config);
        Self { config, api }
    }

    /// Use a caller-supplied `reqwest::Client`.
    pub fn with_http(config: SlackConfig, http: reqwest::Client) -> Self {
        let api = SlackApiClient::with_http(http, &config);
        Self { config, api }
    }

    pub fn config(&self) -> &SlackConfig {
        &self.config
    }

    /// Generate the v2 "Add to Slack" authorization URL.
    pub fn authorize_url(
        &self,
        scopes: &[&str],
        user_scopes: &[&str],
        state: Option<&str>,
    ) -> Result<String, SlackError> {
        self.require_client_id()?;

        let mut url = Url::parse(AUTHORIZE_URL)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &self.config.client_id);
            if !scopes.is_empty() {
                query.append_pair("scope", &scopes.join(","));
            }
            if !user_scopes.is_empty() {
                query.append_pair("user_scope", &user_scopes.join(","));
            }
            if !self.config.redirect_uri.is_empty() {
                query.append_pair("redirect_uri", &self.config.redirect_uri);
            }
            if let Some(state) = state {
                query.append_pair("state", state);
            }
        }
        Ok(url.to_string())
    }

    /// Exchange a code through the legacy `oauth.access` method.
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthResponse, SlackError> {
        self.require_client_id()?;
        tracing::info!("Exchanging Slack OAuth code (v1)");

        let resp: OAuthResponse = self
            .api
            .post_form("oauth.access", &self.exchange_params(code))
            .await?;

        tracing::info!(team_id = %resp.team_id, "Slack OAuth exchange succeeded");
        Ok(resp)
    }

    /// Exchange a code and return only `(access_token, scope)`.
    pub async fn get_oauth_token(&self, code: &str) -> Result<(String, String), SlackError> {
        let resp = self.exchange_code(code).await?;
        Ok((resp.access_token, resp.scope))
    }

    /// Exchange a code through `oauth.v2.access`.
    pub async fn exchange_code_v2(&self, code: &str) -> Result<OAuthV2Response, SlackError> {
        self.require_client_id()?;
        tracing::info!("Exchanging Slack OAuth code (v2)");

        let resp: OAuthV2Response = self
            .api
            .post_form("oauth.v2.access", &self.exchange_params(code))
            .await?;

        tracing::info!(
            team_id = resp.team_id().unwrap_or_default(),
            enterprise_id = resp.enterprise_id().unwrap_or_default(),
            "Slack OAuth v2 exchange succeeded"
        );
        Ok(resp)
    }

    fn exchange_params<'a>(&'a self, code: &'a str) -> [(&'a str, &'a str); 4] {
        [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ]
    }

    fn require_client_id(&self) -> Result<(), SlackError> {
        if self.config.client_id.is_empty() {
            return Err(SlackError::Config("client_id is not set".into()));
        }
        Ok(())
    }
}
