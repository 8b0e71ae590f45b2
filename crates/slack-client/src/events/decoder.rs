//! Two-phase event decoding.
//!
//! The payload is first parsed into a generic [`Value`] so the `type`
//! discriminator can be read, then the original bytes are decoded again
//! into the shape registered for that discriminator.

use serde::Serialize;
use serde_json::Value;

use super::registry::{EventPrototype, EventRegistry};
use super::shapes::InnerEventData;

/// Failures of the event decode path.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The bytes are not valid JSON.
    #[error("malformed event payload: {0}")]
    Syntax(#[source] serde_json::Error),

    /// The `type` field is absent or not a string.
    #[error("missing or malformed discriminator: {found}")]
    MalformedDiscriminator { found: String },

    /// The discriminator is known but the body does not fit its shape.
    #[error("payload for '{event_type}' does not match {shape}: {source}")]
    Shape {
        event_type: String,
        shape: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A decoded event: discriminator, typed payload and the generic form it
/// was read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InnerEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: InnerEventData,
    /// The whole payload as parsed, for fields no shape covers.
    pub raw: Value,
}

impl InnerEvent {
    /// Whether the discriminator was found in the registry.
    pub fn is_recognized(&self) -> bool {
        !self.data.is_unrecognized()
    }

    /// The typed payload, `None` for unregistered kinds.
    pub fn typed(&self) -> Option<&InnerEventData> {
        self.is_recognized().then_some(&self.data)
    }

    pub fn into_data(self) -> InnerEventData {
        self.data
    }
}

/// Decodes payloads against a borrowed [`EventRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeDecoder<'r> {
    registry: &'r EventRegistry,
}

impl Default for EnvelopeDecoder<'static> {
    fn default() -> Self {
        Self::new(EventRegistry::builtin())
    }
}

impl<'r> EnvelopeDecoder<'r> {
    pub fn new(registry: &'r EventRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r EventRegistry {
        self.registry
    }

    /// Decode one JSON event object from raw bytes.
    pub fn decode(&self, raw: &[u8]) -> Result<InnerEvent, DecodeError> {
        let generic: Value = serde_json::from_slice(raw).map_err(DecodeError::Syntax)?;
        let event_type = discriminator(&generic)?;

        let data = match self.registry.lookup(&event_type) {
            Some(proto) => proto
                .decode_slice(raw)
                .map_err(|e| shape_error(proto, &event_type, e))?,
            None => InnerEventData::Unrecognized,
        };

        Ok(self.finish(event_type, data, generic))
    }

    /// Decode an event that has already been parsed into a generic value.
    pub fn decode_value(&self, generic: Value) -> Result<InnerEvent, DecodeError> {
        let event_type = discriminator(&generic)?;

        let data = match self.registry.lookup(&event_type) {
            Some(proto) => proto
                .decode_value(&generic)
                .map_err(|e| shape_error(proto, &event_type, e))?,
            None => InnerEventData::Unrecognized,
        };

        Ok(self.finish(event_type, data, generic))
    }

    fn finish(&self, event_type: String, data: InnerEventData, raw: Value) -> InnerEvent {
        debug_assert!(
            data.event_type().is_none_or(|t| t == event_type),
            "typed payload disagrees with discriminator"
        );
        tracing::trace!(
            event_type = %event_type,
            recognized = !data.is_unrecognized(),
            "Decoded Slack event"
        );
        InnerEvent {
            event_type,
            data,
            raw,
        }
    }
}

/// Read the `type` field of a generic payload.
pub(crate) fn discriminator(generic: &Value) -> Result<String, DecodeError> {
    let Some(object) = generic.as_object() else {
        return Err(DecodeError::MalformedDiscriminator {
            found: format!("payload is {}, not an object", json_kind(generic)),
        });
    };
    match object.get("type") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(DecodeError::MalformedDiscriminator {
            found: format!("'type' is {}", json_kind(other)),
        }),
        None => Err(DecodeError::MalformedDiscriminator {
            found: "'type' is missing".into(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn shape_error(proto: &EventPrototype, event_type: &str, source: serde_json::Error) -> DecodeError {
    DecodeError::Shape {
        event_type: event_type.to_string(),
        shape: proto.shape(),
        source,
    }
}
