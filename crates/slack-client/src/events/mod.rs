//! Events API payload decoding.
//!
//! Inner events share one envelope and a `type` discriminator. The
//! [`EventRegistry`] maps each discriminator to the shape its payload must
//! be decoded into; the [`EnvelopeDecoder`] reads the discriminator from a
//! generic parse and decodes the original bytes again into that shape.
//! Unknown kinds are not errors: they decode to
//! [`InnerEventData::Unrecognized`] with the generic form preserved.

pub mod common;
mod decoder;
mod outer;
mod registry;
mod shapes;
#[cfg(test)]
mod tests;

pub use decoder::{DecodeError, EnvelopeDecoder, InnerEvent};
pub use outer::{
    APP_RATE_LIMITED, CALLBACK_EVENT, ChallengeResponse, EventsApiAppRateLimited,
    EventsApiCallbackEvent, EventsApiEvent, EventsApiUrlVerificationEvent, OuterEventData,
    ParseOptions, URL_VERIFICATION, parse_event, parse_event_with,
};
pub use registry::{EventPrototype, EventRegistry};
pub use shapes::{
    AppHomeOpenedEvent, AppMentionEvent, AppUninstalledEvent, EventShape,
    GridMigrationFinishedEvent, GridMigrationStartedEvent, InnerEventData, LinkSharedEvent,
    MemberJoinedChannelEvent, MemberLeftChannelEvent, MessageEvent, PinAddedEvent, PinEvent,
    PinRemovedEvent, ReactionAddedEvent, ReactionEvent, ReactionRemovedEvent, TokensRevokedEvent,
};

/// Inner event types decoded by the built-in registry.
pub const APP_MENTION: &str = "app_mention";
pub const APP_HOME_OPENED: &str = "app_home_opened";
pub const APP_UNINSTALLED: &str = "app_uninstalled";
pub const GRID_MIGRATION_FINISHED: &str = "grid_migration_finished";
pub const GRID_MIGRATION_STARTED: &str = "grid_migration_started";
pub const LINK_SHARED: &str = "link_shared";
pub const MESSAGE: &str = "message";
pub const MEMBER_JOINED_CHANNEL: &str = "member_joined_channel";
pub const MEMBER_LEFT_CHANNEL: &str = "member_left_channel";
pub const PIN_ADDED: &str = "pin_added";
pub const PIN_REMOVED: &str = "pin_removed";
pub const REACTION_ADDED: &str = "reaction_added";
pub const REACTION_REMOVED: &str = "reaction_removed";
pub const TOKENS_REVOKED: &str = "tokens_revoked";

/// Decode an inner event from raw bytes with the built-in registry.
pub fn parse_inner_event(raw: &[u8]) -> Result<InnerEvent, DecodeError> {
    EnvelopeDecoder::default().decode(raw)
}

/// Decode an already-parsed inner event with the built-in registry.
pub fn parse_inner_event_value(value: serde_json::Value) -> Result<InnerEvent, DecodeError> {
    EnvelopeDecoder::default().decode_value(value)
}
