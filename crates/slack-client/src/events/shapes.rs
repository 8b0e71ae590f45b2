//! Inner event shapes delivered inside `event_callback` payloads.
//!
//! Every shape carries its own `type` field, so a decoded value still knows
//! which discriminator it was registered under.

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};

use super::common::{Edited, EventTimestamp, File, Icon, Item, RevokedTokens, SharedLink};
use super::*;

/// A concrete event shape that can be registered with an
/// [`EventRegistry`](super::EventRegistry).
pub trait EventShape: DeserializeOwned + Into<InnerEventData> {
    /// Discriminator this shape is registered under.
    const EVENT_TYPE: &'static str;

    /// The `type` value carried in the decoded payload.
    fn event_type(&self) -> &str;
}

/// The app was mentioned in a message.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMentionEvent {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub user: String,
    #[serde_as(as = "DefaultOnNull")]
    pub text: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "ts")]
    pub timestamp: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "thread_ts")]
    pub thread_timestamp: String,
    #[serde_as(as = "DefaultOnNull")]
    pub channel: String,
    #[serde(rename = "event_ts")]
    pub event_timestamp: EventTimestamp,
    // Set when the message comes from a channel shared between workspaces.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_team: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_team: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bot_id: String,
}

/// The app home tab was opened.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppHomeOpenedEvent {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub user: String,
    #[serde_as(as = "DefaultOnNull")]
    pub channel: String,
    #[serde(rename = "event_ts")]
    pub event_timestamp: EventTimestamp,
    #[serde_as(as = "DefaultOnNull")]
    pub tab: String,
    /// Block Kit view, left undecoded.
    pub view: serde_json::Value,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppUninstalledEvent {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type")]
    pub event_type: String,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridMigrationFinishedEvent {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub enterprise_id: String,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridMigrationStartedEvent {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub enterprise_id: String,
}

/// A message contained links registered by the app.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkSharedEvent {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub user: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "ts")]
    pub timestamp: String,
    #[serde_as(as = "DefaultOnNull")]
    pub channel: String,
    #[serde(rename = "message_ts")]
    pub message_timestamp: EventTimestamp,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "thread_ts")]
    pub thread_timestamp: String,
    #[serde_as(as = "DefaultOnNull")]
    pub links: Vec<SharedLink>,
}

/// A message was posted. `channel_type` tells where: `channel`, `group`
/// (private channel), `im` or `mpim`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageEvent {
    #[serde_as(as = "DefaultOnNull")]
    pub client_msg_id: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub user: String,
    #[serde_as(as = "DefaultOnNull")]
    pub text: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "thread_ts")]
    pub thread_timestamp: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "ts")]
    pub timestamp: String,
    #[serde_as(as = "DefaultOnNull")]
    pub channel: String,
    #[serde_as(as = "DefaultOnNull")]
    pub channel_type: String,
    #[serde(rename = "event_ts")]
    pub event_timestamp: EventTimestamp,

    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_team: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_team: String,

    // message_changed / message_deleted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Box<MessageEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_message: Option<Box<MessageEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited: Option<Edited>,

    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "subtype", skip_serializing_if = "String::is_empty")]
    pub sub_type: String,

    // bot_message
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bot_id: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons: Option<Icon>,

    #[serde_as(as = "DefaultOnNull")]
    pub upload: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub files: Vec<File>,

    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<serde_json::Value>,

    /// Broadcast root, only set for `thread_broadcast` messages.
    pub root: Option<Box<MessageEvent>>,
}

impl MessageEvent {
    /// Whether this event reports an edit of an earlier message.
    pub fn is_edited(&self) -> bool {
        self.message
            .as_ref()
            .is_some_and(|m| m.edited.is_some())
    }
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberJoinedChannelEvent {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub user: String,
    #[serde_as(as = "DefaultOnNull")]
    pub channel: String,
    #[serde_as(as = "DefaultOnNull")]
    pub channel_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub team: String,
    #[serde_as(as = "DefaultOnNull")]
    pub inviter: String,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberLeftChannelEvent {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub user: String,
    #[serde_as(as = "DefaultOnNull")]
    pub channel: String,
    #[serde_as(as = "DefaultOnNull")]
    pub channel_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub team: String,
}

/// Layout shared by `pin_added` and `pin_removed`. Slack never sends this
/// on its own.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinEvent {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub user: String,
    #[serde_as(as = "DefaultOnNull")]
    pub item: Item,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "channel_id")]
    pub channel: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "event_ts")]
    pub event_timestamp: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub has_pins: bool,
}

/// Layout shared by `reaction_added` and `reaction_removed`. Slack never
/// sends this on its own.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionEvent {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub user: String,
    #[serde_as(as = "DefaultOnNull")]
    pub reaction: String,
    #[serde_as(as = "DefaultOnNull")]
    pub item_user: String,
    #[serde_as(as = "DefaultOnNull")]
    pub item: Item,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "event_ts")]
    pub event_timestamp: String,
}

/// An item was pinned to a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinAddedEvent(pub PinEvent);

/// An item was unpinned from a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinRemovedEvent(pub PinEvent);

/// A reaction was added to an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionAddedEvent(pub ReactionEvent);

/// A reaction was removed from an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionRemovedEvent(pub ReactionEvent);

/// The app's API tokens were revoked.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokensRevokedEvent {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub tokens: RevokedTokens,
}

macro_rules! deref_alias {
    ($($alias:ident => $inner:ty),* $(,)?) => {
        $(
            impl Deref for $alias {
                type Target = $inner;

                fn deref(&self) -> &$inner {
                    &self.0
                }
            }
        )*
    };
}

deref_alias! {
    PinAddedEvent => PinEvent,
    PinRemovedEvent => PinEvent,
    ReactionAddedEvent => ReactionEvent,
    ReactionRemovedEvent => ReactionEvent,
}

/// Typed payload of an [`InnerEvent`](super::InnerEvent).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InnerEventData {
    AppMention(AppMentionEvent),
    AppHomeOpened(AppHomeOpenedEvent),
    AppUninstalled(AppUninstalledEvent),
    GridMigrationFinished(GridMigrationFinishedEvent),
    GridMigrationStarted(GridMigrationStartedEvent),
    LinkShared(LinkSharedEvent),
    Message(Box<MessageEvent>),
    MemberJoinedChannel(MemberJoinedChannelEvent),
    MemberLeftChannel(MemberLeftChannelEvent),
    PinAdded(PinAddedEvent),
    PinRemoved(PinRemovedEvent),
    ReactionAdded(ReactionAddedEvent),
    ReactionRemoved(ReactionRemovedEvent),
    TokensRevoked(TokensRevokedEvent),
    /// The discriminator is not registered; see `InnerEvent::raw`.
    Unrecognized,
}

impl InnerEventData {
    /// The `type` value decoded into the payload, `None` when unrecognized.
    pub fn event_type(&self) -> Option<&str> {
        let t = match self {
            Self::AppMention(e) => &e.event_type,
            Self::AppHomeOpened(e) => &e.event_type,
            Self::AppUninstalled(e) => &e.event_type,
            Self::GridMigrationFinished(e) => &e.event_type,
            Self::GridMigrationStarted(e) => &e.event_type,
            Self::LinkShared(e) => &e.event_type,
            Self::Message(e) => &e.event_type,
            Self::MemberJoinedChannel(e) => &e.event_type,
            Self::MemberLeftChannel(e) => &e.event_type,
            Self::PinAdded(e) => &e.event_type,
            Self::PinRemoved(e) => &e.event_type,
            Self::ReactionAdded(e) => &e.event_type,
            Self::ReactionRemoved(e) => &e.event_type,
            Self::TokensRevoked(e) => &e.event_type,
            Self::Unrecognized => return None,
        };
        Some(t)
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized)
    }
}

macro_rules! impl_event_shape {
    ($($shape:ident => $variant:ident, $key:expr;)*) => {
        $(
            impl EventShape for $shape {
                const EVENT_TYPE: &'static str = $key;

                fn event_type(&self) -> &str {
                    &self.event_type
                }
            }

            impl From<$shape> for InnerEventData {
                fn from(e: $shape) -> Self {
                    InnerEventData::$variant(e.into())
                }
            }
        )*
    };
}

impl_event_shape! {
    AppMentionEvent => AppMention, APP_MENTION;
    AppHomeOpenedEvent => AppHomeOpened, APP_HOME_OPENED;
    AppUninstalledEvent => AppUninstalled, APP_UNINSTALLED;
    GridMigrationFinishedEvent => GridMigrationFinished, GRID_MIGRATION_FINISHED;
    GridMigrationStartedEvent => GridMigrationStarted, GRID_MIGRATION_STARTED;
    LinkSharedEvent => LinkShared, LINK_SHARED;
    MessageEvent => Message, MESSAGE;
    MemberJoinedChannelEvent => MemberJoinedChannel, MEMBER_JOINED_CHANNEL;
    MemberLeftChannelEvent => MemberLeftChannel, MEMBER_LEFT_CHANNEL;
    PinAddedEvent => PinAdded, PIN_ADDED;
    PinRemovedEvent => PinRemoved, PIN_REMOVED;
    ReactionAddedEvent => ReactionAdded, REACTION_ADDED;
    ReactionRemovedEvent => ReactionRemoved, REACTION_REMOVED;
    TokensRevokedEvent => TokensRevoked, TOKENS_REVOKED;
}
