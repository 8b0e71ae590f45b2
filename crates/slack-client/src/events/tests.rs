use serde_json::{Value, json};

use super::common::{EventTimestamp, JsonTime};
use super::*;
use crate::SlackError;

fn item() -> Value {
    json!({"type": "message", "channel": "C1", "ts": "1360782400.498405"})
}

/// A payload matching the shape registered under `event_type`.
fn fixture(event_type: &str) -> Value {
    match event_type {
        APP_MENTION => json!({
            "type": APP_MENTION,
            "user": "U1",
            "text": "<@UBOT> hi",
            "ts": "1515449522.000016",
            "thread_ts": "1515449500.000001",
            "channel": "C1",
            "event_ts": "1515449522000016"
        }),
        APP_HOME_OPENED => json!({
            "type": APP_HOME_OPENED,
            "user": "U1",
            "channel": "D1",
            "event_ts": "1515449522000016",
            "tab": "home",
            "view": {"id": "V1", "type": "home"}
        }),
        APP_UNINSTALLED => json!({"type": APP_UNINSTALLED}),
        GRID_MIGRATION_FINISHED | GRID_MIGRATION_STARTED => json!({
            "type": event_type,
            "enterprise_id": "E1"
        }),
        LINK_SHARED => json!({
            "type": LINK_SHARED,
            "user": "U1",
            "ts": "123456789.9875",
            "channel": "C1",
            "message_ts": "123456789.9875",
            "thread_ts": "123456621.1855",
            "links": [{"domain": "example.com", "url": "https://example.com/12345"}]
        }),
        MESSAGE => json!({
            "type": MESSAGE,
            "user": "U1",
            "text": "hello",
            "ts": "1355517523.000005",
            "channel": "C1",
            "channel_type": "im",
            "event_ts": "1355517523.000005"
        }),
        MEMBER_JOINED_CHANNEL => json!({
            "type": MEMBER_JOINED_CHANNEL,
            "user": "U1",
            "channel": "C1",
            "channel_type": "C",
            "team": "T1",
            "inviter": "U2"
        }),
        MEMBER_LEFT_CHANNEL => json!({
            "type": MEMBER_LEFT_CHANNEL,
            "user": "U1",
            "channel": "C1",
            "channel_type": "G",
            "team": "T1"
        }),
        PIN_ADDED | PIN_REMOVED => json!({
            "type": event_type,
            "user": "U1",
            "item": item(),
            "channel_id": "C1",
            "event_ts": "1360782804.083113",
            "has_pins": true
        }),
        REACTION_ADDED | REACTION_REMOVED => json!({
            "type": event_type,
            "user": "U1",
            "reaction": "thumbsup",
            "item_user": "U2",
            "item": item(),
            "event_ts": "1360782804.083113"
        }),
        TOKENS_REVOKED => json!({
            "type": TOKENS_REVOKED,
            "tokens": {"oauth": ["UXXXXXXXX"], "bot": ["UXXXXXXXX"]}
        }),
        other => panic!("no fixture for {other}"),
    }
}

fn decode(payload: &Value) -> Result<InnerEvent, DecodeError> {
    parse_inner_event(payload.to_string().as_bytes())
}

#[test]
fn test_builtin_registry_contents() {
    let registry = EventRegistry::builtin();
    assert_eq!(registry.len(), 14);
    assert!(registry.contains(MESSAGE));
    assert!(!registry.contains("channel_created"));

    let keys = registry.keys();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    let proto = registry.lookup(REACTION_ADDED).unwrap();
    assert_eq!(proto.event_type(), REACTION_ADDED);
    assert_eq!(proto.shape(), "ReactionAddedEvent");
    assert!(registry.lookup("nope").is_none());
}

#[test]
fn test_every_registered_kind_round_trips() {
    for event_type in EventRegistry::builtin().keys() {
        let payload = fixture(event_type);
        let event = decode(&payload).unwrap_or_else(|e| panic!("{event_type}: {e}"));

        assert_eq!(event.event_type, event_type);
        assert!(event.is_recognized(), "{event_type} not recognized");
        assert_eq!(event.data.event_type(), Some(event_type));
        assert_eq!(event.raw, payload);

        let typed = serde_json::to_value(&event.data).unwrap();
        for (key, expected) in payload.as_object().unwrap() {
            assert_eq!(&typed[key], expected, "{event_type}.{key}");
        }
    }
}

#[test]
fn test_decode_value_matches_decode() {
    for event_type in EventRegistry::builtin().keys() {
        let payload = fixture(event_type);
        let from_bytes = decode(&payload).unwrap();
        let from_value = parse_inner_event_value(payload).unwrap();
        assert_eq!(from_bytes, from_value, "{event_type}");
    }
}

#[test]
fn test_unknown_kind_is_not_an_error() {
    let payload = json!({
        "type": "channel_created",
        "channel": {"id": "C024BE91L", "name": "fun", "created": 1360782804}
    });
    let event = decode(&payload).unwrap();

    assert_eq!(event.event_type, "channel_created");
    assert!(!event.is_recognized());
    assert!(event.typed().is_none());
    assert!(event.data.is_unrecognized());
    assert_eq!(event.data.event_type(), None);
    assert_eq!(event.raw, payload);
    assert_eq!(event.raw["channel"]["name"], "fun");
}

#[test]
fn test_generic_form_preserves_key_order() {
    let raw = br#"{"zeta":1,"type":"brand_new_event","alpha":2}"#;
    let event = parse_inner_event(raw).unwrap();
    let keys: Vec<_> = event.raw.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["zeta", "type", "alpha"]);
}

#[test]
fn test_missing_discriminator_rejected() {
    let err = decode(&json!({"user": "U1", "text": "hi"})).unwrap_err();
    match err {
        DecodeError::MalformedDiscriminator { found } => assert!(found.contains("missing")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_non_string_discriminator_rejected() {
    let err = decode(&json!({"type": 42, "user": "U1"})).unwrap_err();
    match err {
        DecodeError::MalformedDiscriminator { found } => assert!(found.contains("number")),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = decode(&json!({"type": null})).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedDiscriminator { .. }));
}

#[test]
fn test_non_object_payload_rejected() {
    let err = parse_inner_event(br#"["message"]"#).unwrap_err();
    match err {
        DecodeError::MalformedDiscriminator { found } => assert!(found.contains("array")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_malformed_json_rejected() {
    let err = parse_inner_event(br#"{"type": "message", "#).unwrap_err();
    assert!(matches!(err, DecodeError::Syntax(_)));
}

#[test]
fn test_typed_mismatch_rejected() {
    let mut payload = fixture(REACTION_ADDED);
    payload["user"] = json!({"id": "U1"});

    let err = decode(&payload).unwrap_err();
    match err {
        DecodeError::Shape {
            event_type, shape, ..
        } => {
            assert_eq!(event_type, REACTION_ADDED);
            assert_eq!(shape, "ReactionAddedEvent");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let mut payload = fixture(MEMBER_JOINED_CHANNEL);
    payload["inviter"] = json!(7);
    let err = parse_inner_event_value(payload).unwrap_err();
    assert!(matches!(err, DecodeError::Shape { .. }));
}

#[test]
fn test_message_event_scenario() {
    let raw = br#"{"type":"message","user":"U1","text":"hi","ts":"123.456","channel":"C1","channel_type":"channel"}"#;
    let event = parse_inner_event(raw).unwrap();

    let InnerEventData::Message(msg) = &event.data else {
        panic!("expected message, got {:?}", event.data);
    };
    assert_eq!(msg.event_type, "message");
    assert_eq!(msg.user, "U1");
    assert_eq!(msg.text, "hi");
    assert_eq!(msg.timestamp, "123.456");
    assert_eq!(msg.channel, "C1");
    assert_eq!(msg.channel_type, "channel");
    assert!(msg.event_timestamp.is_empty());
    assert!(!msg.is_edited());
}

#[test]
fn test_reaction_aliases_decode_to_distinct_types() {
    let added = decode(&fixture(REACTION_ADDED)).unwrap();
    let removed = decode(&fixture(REACTION_REMOVED)).unwrap();

    let (InnerEventData::ReactionAdded(a), InnerEventData::ReactionRemoved(r)) =
        (&added.data, &removed.data)
    else {
        panic!("unexpected variants: {:?} / {:?}", added.data, removed.data);
    };

    assert_eq!(a.event_type, REACTION_ADDED);
    assert_eq!(r.event_type, REACTION_REMOVED);
    assert_eq!(a.reaction, "thumbsup");
    assert_eq!(
        ReactionEvent {
            event_type: String::new(),
            ..a.0.clone()
        },
        ReactionEvent {
            event_type: String::new(),
            ..r.0.clone()
        }
    );
}

#[test]
fn test_pin_aliases_decode_to_distinct_types() {
    let added = decode(&fixture(PIN_ADDED)).unwrap();
    let removed = decode(&fixture(PIN_REMOVED)).unwrap();

    match (&added.data, &removed.data) {
        (InnerEventData::PinAdded(a), InnerEventData::PinRemoved(r)) => {
            assert_eq!(a.item, r.item);
            assert_eq!(a.channel, "C1");
            assert!(a.has_pins);
            assert_eq!(a.item.message, None);
        }
        other => panic!("unexpected variants: {other:?}"),
    }
}

#[test]
fn test_reaction_on_file_comment() {
    let payload = json!({
        "type": REACTION_ADDED,
        "user": "U1",
        "reaction": "tada",
        "item": {
            "type": "file_comment",
            "file_comment": "Fc1",
            "file": {"id": "F1", "name": "notes.txt", "size": 42},
            "comment": {"id": "Fc1", "created": 1356032811, "comment": "nice"}
        },
        "event_ts": "1360782804.083113"
    });
    let event = decode(&payload).unwrap();
    let InnerEventData::ReactionAdded(reaction) = event.data else {
        panic!("expected reaction_added");
    };
    let file = reaction.0.item.file.unwrap();
    assert_eq!(file.name, "notes.txt");
    assert_eq!(file.size, 42);
    let comment = reaction.0.item.comment.unwrap();
    assert_eq!(comment.created, JsonTime(1356032811));
    assert_eq!(comment.created.to_string(), "2012-12-20 19:46:51 UTC");
}

#[test]
fn test_edited_message() {
    let payload = json!({
        "type": MESSAGE,
        "subtype": "message_changed",
        "channel": "C1",
        "ts": "1358878755.000001",
        "hidden": true,
        "message": {
            "type": MESSAGE,
            "user": "U1",
            "text": "Hello, world!",
            "ts": "1355517523.000005",
            "edited": {"user": "U1", "ts": "1358878755.000001"}
        },
        "previous_message": {"type": MESSAGE, "user": "U1", "text": "Helo, world"}
    });
    let event = decode(&payload).unwrap();
    let InnerEventData::Message(msg) = event.data else {
        panic!("expected message");
    };
    assert_eq!(msg.sub_type, "message_changed");
    assert!(msg.is_edited());
    let edited = msg.message.as_ref().and_then(|m| m.edited.as_ref()).unwrap();
    assert_eq!(edited.timestamp, "1358878755.000001");
    assert_eq!(msg.previous_message.as_ref().unwrap().text, "Helo, world");
}

#[test]
fn test_event_timestamp_accepts_numbers() {
    let mut payload = fixture(APP_MENTION);
    payload["event_ts"] = json!(1515449522);
    let event = decode(&payload).unwrap();
    let InnerEventData::AppMention(mention) = event.data else {
        panic!("expected app_mention");
    };
    assert_eq!(mention.event_timestamp, EventTimestamp::from("1515449522"));
    assert_eq!(mention.event_timestamp.as_f64(), Some(1515449522.0));

    let event = parse_inner_event(br#"{"type":"app_mention","event_ts":1515449522.000010}"#).unwrap();
    let InnerEventData::AppMention(mention) = event.data else {
        panic!("expected app_mention");
    };
    assert_eq!(mention.event_timestamp.as_str(), "1515449522.00001");

    let event = parse_inner_event(br#"{"type":"app_mention","event_ts":"1515449522.000010"}"#).unwrap();
    let InnerEventData::AppMention(mention) = event.data else {
        panic!("expected app_mention");
    };
    assert_eq!(mention.event_timestamp.as_str(), "1515449522.000010");
}

#[test]
fn test_incomplete_known_payload_is_permissive() {
    let event = decode(&json!({"type": MEMBER_LEFT_CHANNEL})).unwrap();
    let InnerEventData::MemberLeftChannel(left) = event.data else {
        panic!("expected member_left_channel");
    };
    assert_eq!(left.event_type, MEMBER_LEFT_CHANNEL);
    assert!(left.user.is_empty());
}

#[test]
fn test_null_fields_take_zero_values() {
    let raw = br#"{"type":"message","user":"U1","text":"hi","thread_ts":null,"ts":"1355517523.000005","channel":"C1","upload":null,"files":null,"event_ts":null}"#;
    let event = parse_inner_event(raw).unwrap();
    let InnerEventData::Message(msg) = event.data else {
        panic!("expected message");
    };
    assert_eq!(msg.user, "U1");
    assert_eq!(msg.text, "hi");
    assert!(msg.thread_timestamp.is_empty());
    assert!(!msg.upload);
    assert!(msg.files.is_empty());
    assert!(msg.event_timestamp.is_empty());

    let mut payload = fixture(REACTION_ADDED);
    payload["item_user"] = Value::Null;
    payload["item"]["channel"] = Value::Null;
    let event = decode(&payload).unwrap();
    let InnerEventData::ReactionAdded(reaction) = event.data else {
        panic!("expected reaction_added");
    };
    assert!(reaction.item_user.is_empty());
    assert!(reaction.item.channel.is_empty());
    assert_eq!(reaction.reaction, "thumbsup");

    let event = parse_inner_event(br#"{"type":"tokens_revoked","tokens":{"oauth":null,"bot":["B1"]}}"#).unwrap();
    let InnerEventData::TokensRevoked(revoked) = event.data else {
        panic!("expected tokens_revoked");
    };
    assert!(revoked.tokens.oauth.is_empty());
    assert_eq!(revoked.tokens.bot, vec!["B1"]);
}

#[test]
fn test_custom_registry_injection() {
    let registry = EventRegistry::from_entries([EventPrototype::of::<MessageEvent>()]);
    let decoder = EnvelopeDecoder::new(&registry);
    assert_eq!(registry.keys(), vec![MESSAGE]);

    let event = decoder
        .decode(fixture(REACTION_ADDED).to_string().as_bytes())
        .unwrap();
    assert!(!event.is_recognized());

    let event = decoder
        .decode(fixture(MESSAGE).to_string().as_bytes())
        .unwrap();
    assert!(matches!(event.data, InnerEventData::Message(_)));
}

#[test]
fn test_concurrent_decoding_shares_registry() {
    let payloads: Vec<String> = EventRegistry::builtin()
        .keys()
        .into_iter()
        .map(|k| fixture(k).to_string())
        .collect();

    std::thread::scope(|scope| {
        for payload in &payloads {
            scope.spawn(move || {
                let event = parse_inner_event(payload.as_bytes()).unwrap();
                assert_eq!(event.data.event_type(), Some(event.event_type.as_str()));
            });
        }
    });
}

fn callback(inner: Value) -> Value {
    json!({
        "token": "XXYYZZ",
        "team_id": "T1",
        "api_app_id": "A1",
        "event": inner,
        "type": CALLBACK_EVENT,
        "authed_users": ["U2"],
        "event_id": "Ev08MFMKH6",
        "event_time": 1234567890
    })
}

#[test]
fn test_outer_callback_decodes_inner_event() {
    let raw = callback(fixture(MESSAGE)).to_string();
    let event = parse_event(raw.as_bytes(), &ParseOptions::default()).unwrap();

    assert_eq!(event.event_type, CALLBACK_EVENT);
    assert_eq!(event.team_id, "T1");
    assert_eq!(event.api_app_id, "A1");
    let OuterEventData::Callback(cb) = &event.data else {
        panic!("expected callback");
    };
    assert_eq!(cb.event_id, "Ev08MFMKH6");
    assert_eq!(cb.event_time, 1234567890);
    assert_eq!(cb.authed_users, vec!["U2"]);

    let inner = event.inner_event.unwrap();
    assert_eq!(inner.event_type, MESSAGE);
    assert_eq!(inner.raw, fixture(MESSAGE));
    assert!(matches!(inner.data, InnerEventData::Message(ref m) if m.text == "hello"));
}

#[test]
fn test_outer_callback_with_unknown_inner_kind() {
    let raw = callback(json!({"type": "team_join", "user": {"id": "U9"}})).to_string();
    let event = parse_event(raw.as_bytes(), &ParseOptions::default()).unwrap();
    let inner = event.inner_event.unwrap();
    assert!(!inner.is_recognized());
    assert_eq!(inner.raw["user"]["id"], "U9");
}

#[test]
fn test_outer_callback_inner_mismatch_is_decode_error() {
    let mut inner = fixture(REACTION_REMOVED);
    inner["item"] = json!("not-an-object");
    let raw = callback(inner).to_string();
    let err = parse_event(raw.as_bytes(), &ParseOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        SlackError::Decode(DecodeError::Shape { ref event_type, .. }) if event_type == REACTION_REMOVED
    ));
}

#[test]
fn test_outer_callback_without_event_is_shape_error() {
    let raw = json!({"type": CALLBACK_EVENT, "token": "XXYYZZ"}).to_string();
    let err = parse_event(raw.as_bytes(), &ParseOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        SlackError::Decode(DecodeError::Shape { shape: "EventsApiCallbackEvent", .. })
    ));
}

#[test]
fn test_url_verification_challenge() {
    let raw = br#"{"token":"Jhj5dZrVaK7ZwHHjRyZWjbDl","challenge":"3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P","type":"url_verification"}"#;
    let event = parse_event(raw, &ParseOptions::verify_token("Jhj5dZrVaK7ZwHHjRyZWjbDl")).unwrap();

    assert!(event.inner_event.is_none());
    let challenge = event.challenge().unwrap();
    assert_eq!(
        challenge.challenge,
        "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P"
    );
    assert_eq!(
        serde_json::to_value(&challenge).unwrap(),
        json!({"challenge": "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P"})
    );
}

#[test]
fn test_verification_token_mismatch() {
    let raw = callback(fixture(MESSAGE)).to_string();
    let err = parse_event(raw.as_bytes(), &ParseOptions::verify_token("other")).unwrap_err();
    assert!(matches!(err, SlackError::InvalidVerificationToken));

    let config = crate::SlackConfig {
        verification_token: Some("XXYYZZ".into()),
        ..Default::default()
    };
    assert!(parse_event(raw.as_bytes(), &ParseOptions::from_config(&config)).is_ok());
}

#[test]
fn test_app_rate_limited() {
    let raw = br#"{"token":"Jhj5dZrVaK7ZwHHjRyZWjbDl","type":"app_rate_limited","team_id":"T123456","minute_rate_limited":1518467820,"api_app_id":"A123456"}"#;
    let event = parse_event(raw, &ParseOptions::default()).unwrap();
    match &event.data {
        OuterEventData::AppRateLimited(limited) => {
            assert_eq!(limited.minute_rate_limited, 1518467820);
            assert_eq!(limited.team_id, "T123456");
        }
        other => panic!("unexpected outer data: {other:?}"),
    }
    assert!(event.challenge().is_none());
}

#[test]
fn test_unknown_outer_kind_is_preserved() {
    let raw = br#"{"type":"app_deleted","token":"t","extra":{"a":1}}"#;
    let event = parse_event(raw, &ParseOptions::default()).unwrap();
    assert!(matches!(event.data, OuterEventData::Unrecognized));
    assert_eq!(event.raw["extra"]["a"], 1);
}

#[test]
fn test_outer_malformed_discriminator() {
    let err = parse_event(br#"{"token":"t"}"#, &ParseOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        SlackError::Decode(DecodeError::MalformedDiscriminator { .. })
    ));
}
