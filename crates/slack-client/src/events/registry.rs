//! Discriminator -> event shape registry.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde_json::Value;

use super::shapes::*;

type SliceDecoder = fn(&[u8]) -> serde_json::Result<InnerEventData>;
type ValueDecoder = fn(&Value) -> serde_json::Result<InnerEventData>;

/// Every shape decoded out of the box. Adding an event kind means adding
/// one line here.
const BUILTIN_SHAPES: &[fn() -> EventPrototype] = &[
    EventPrototype::of::<AppMentionEvent>,
    EventPrototype::of::<AppHomeOpenedEvent>,
    EventPrototype::of::<AppUninstalledEvent>,
    EventPrototype::of::<GridMigrationFinishedEvent>,
    EventPrototype::of::<GridMigrationStartedEvent>,
    EventPrototype::of::<LinkSharedEvent>,
    EventPrototype::of::<MessageEvent>,
    EventPrototype::of::<MemberJoinedChannelEvent>,
    EventPrototype::of::<MemberLeftChannelEvent>,
    EventPrototype::of::<PinAddedEvent>,
    EventPrototype::of::<PinRemovedEvent>,
    EventPrototype::of::<ReactionAddedEvent>,
    EventPrototype::of::<ReactionRemovedEvent>,
    EventPrototype::of::<TokensRevokedEvent>,
];

static BUILTIN_REGISTRY: LazyLock<EventRegistry> =
    LazyLock::new(|| EventRegistry::from_entries(BUILTIN_SHAPES.iter().map(|entry| entry())));

/// Describes how to decode one event kind: the discriminator it answers to,
/// the shape's name and decoders that allocate a fresh value of the shape.
#[derive(Debug, Clone, Copy)]
pub struct EventPrototype {
    event_type: &'static str,
    shape: &'static str,
    from_slice: SliceDecoder,
    from_value: ValueDecoder,
}

impl EventPrototype {
    pub fn of<T: EventShape>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            event_type: T::EVENT_TYPE,
            shape: full_name.rsplit("::").next().unwrap_or(full_name),
            from_slice: decode_slice::<T>,
            from_value: decode_value::<T>,
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.event_type
    }

    /// Unqualified Rust type name of the shape, e.g. `MessageEvent`.
    pub fn shape(&self) -> &'static str {
        self.shape
    }

    pub fn decode_slice(&self, raw: &[u8]) -> serde_json::Result<InnerEventData> {
        (self.from_slice)(raw)
    }

    pub fn decode_value(&self, value: &Value) -> serde_json::Result<InnerEventData> {
        (self.from_value)(value)
    }
}

fn decode_slice<T: EventShape>(raw: &[u8]) -> serde_json::Result<InnerEventData> {
    serde_json::from_slice::<T>(raw).map(Into::into)
}

fn decode_value<T: EventShape>(value: &Value) -> serde_json::Result<InnerEventData> {
    T::deserialize(value).map(Into::into)
}

/// Immutable mapping from discriminator to [`EventPrototype`].
///
/// Never mutated after construction, so shared references can be read from
/// any number of threads.
#[derive(Debug, Clone)]
pub struct EventRegistry {
    entries: HashMap<&'static str, EventPrototype>,
}

impl EventRegistry {
    /// The process-wide registry of every built-in shape, created on first use.
    pub fn builtin() -> &'static EventRegistry {
        &BUILTIN_REGISTRY
    }

    /// Build a registry. A later entry replaces an earlier one with the
    /// same discriminator.
    pub fn from_entries(entries: impl IntoIterator<Item = EventPrototype>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|proto| (proto.event_type, proto))
                .collect(),
        }
    }

    /// Find the prototype registered for `event_type`.
    pub fn lookup(&self, event_type: &str) -> Option<&EventPrototype> {
        self.entries.get(event_type)
    }

    pub fn contains(&self, event_type: &str) -> bool {
        self.entries.contains_key(event_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered discriminators in sorted order.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.entries.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
