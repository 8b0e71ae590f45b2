use serde::{Deserialize, Serialize};

use crate::SlackResponse;
use crate::api::ApiResponse;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthResponseIncomingWebhook {
    pub url: String,
    pub channel: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel_id: String,
    pub configuration_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthResponseBot {
    pub bot_user_id: String,
    pub bot_access_token: String,
}

/// Response of the legacy `oauth.access` method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthResponse {
    pub access_token: String,
    pub scope: String,
    pub team_name: String,
    pub team_id: String,
    pub incoming_webhook: Option<OAuthResponseIncomingWebhook>,
    pub bot: Option<OAuthResponseBot>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    #[serde(flatten)]
    pub status: SlackResponse,
}

impl ApiResponse for OAuthResponse {
    fn status(&self) -> &SlackResponse {
        &self.status
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthV2ResponseTeam {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthV2ResponseEnterprise {
    pub id: String,
    pub name: String,
}

/// User token half of a v2 install, present when user scopes were granted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthV2ResponseAuthedUser {
    pub id: String,
    pub scope: String,
    pub access_token: String,
    pub token_type: String,
}

/// Response of the `oauth.v2.access` method.
///
/// `access_token` is the bot token; the user token lives in `authed_user`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthV2Response {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
    pub bot_user_id: String,
    pub app_id: String,
    pub team: Option<OAuthV2ResponseTeam>,
    pub enterprise: Option<OAuthV2ResponseEnterprise>,
    pub is_enterprise_install: bool,
    pub authed_user: Option<OAuthV2ResponseAuthedUser>,
    pub incoming_webhook: Option<OAuthResponseIncomingWebhook>,
    #[serde(flatten)]
    pub status: SlackResponse,
}

impl ApiResponse for OAuthV2Response {
    fn status(&self) -> &SlackResponse {
        &self.status
    }
}

impl OAuthV2Response {
    pub fn team_id(&self) -> Option<&str> {
        self.team.as_ref().map(|t| t.id.as_str())
    }

    pub fn enterprise_id(&self) -> Option<&str> {
        self.enterprise.as_ref().map(|e| e.id.as_str())
    }

    /// The user access token, if the install granted one.
    pub fn user_token(&self) -> Option<&str> {
        self.authed_user
            .as_ref()
            .map(|u| u.access_token.as_str())
            .filter(|t| !t.is_empty())
    }
}
