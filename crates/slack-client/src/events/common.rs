//! Structures nested inside event payloads.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DefaultOnNull, serde_as};

/// Unix seconds as sent in comment timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonTime(pub i64);

impl JsonTime {
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }
}

impl fmt::Display for JsonTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
            None => write!(f, "{}", self.0),
        }
    }
}

/// An `event_ts` value. Slack sends it as a string (`"1515449522.000016"`),
/// kept verbatim. Older payloads use a bare number, which is rendered with
/// its shortest decimal form, so trailing fractional zeros are dropped.
/// `null` decodes to an empty timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EventTimestamp(pub String);

impl EventTimestamp {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for EventTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventTimestamp {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Serialize for EventTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EventTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimestampVisitor;

        impl Visitor<'_> for TimestampVisitor {
            type Value = EventTimestamp;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a timestamp string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(EventTimestamp(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(EventTimestamp(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(EventTimestamp(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(EventTimestamp(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(EventTimestamp(v.to_string()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(EventTimestamp::default())
            }
        }

        deserializer.deserialize_any(TimestampVisitor)
    }
}

/// A file comment referenced by reaction and pin items.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub created: JsonTime,
    #[serde_as(as = "DefaultOnNull")]
    pub timestamp: JsonTime,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

/// A file upload.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct File {
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub created: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub timestamp: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub title: String,
    #[serde_as(as = "DefaultOnNull")]
    pub mimetype: String,
    #[serde_as(as = "DefaultOnNull")]
    pub filetype: String,
    #[serde_as(as = "DefaultOnNull")]
    pub pretty_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub user: String,
    #[serde_as(as = "DefaultOnNull")]
    pub editable: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub size: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub mode: String,
    #[serde_as(as = "DefaultOnNull")]
    pub is_external: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub external_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub is_public: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub public_url_shared: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub display_as_bot: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub username: String,
    #[serde_as(as = "DefaultOnNull")]
    pub url_private: String,
    #[serde_as(as = "DefaultOnNull")]
    pub url_private_download: String,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_64: String,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_80: String,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_160: String,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_360: String,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_360_w: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_360_h: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_480: String,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_480_w: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_480_h: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_720: String,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_720_w: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_720_h: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_800: String,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_800_w: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_800_h: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_960: String,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_960_w: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_960_h: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_1024: String,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_1024_w: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub thumb_1024_h: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub image_exif_rotation: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub original_w: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub original_h: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub permalink: String,
    #[serde_as(as = "DefaultOnNull")]
    pub permalink_public: String,
}

/// Present on a message that has been edited.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Edited {
    #[serde_as(as = "DefaultOnNull")]
    pub user: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "ts")]
    pub timestamp: String,
}

/// Bot message icon.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Icon {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_url: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_emoji: String,
}

/// The target of a reaction or pin: a message, a file or a file comment.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<ItemMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<File>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "ts", skip_serializing_if = "String::is_empty")]
    pub timestamp: String,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemMessage {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub user: String,
    #[serde_as(as = "DefaultOnNull")]
    pub text: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "ts")]
    pub timestamp: String,
    #[serde_as(as = "DefaultOnNull")]
    pub pinned_to: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub replace_original: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub delete_original: bool,
}

/// A link found in a `link_shared` message.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedLink {
    #[serde_as(as = "DefaultOnNull")]
    pub domain: String,
    #[serde_as(as = "DefaultOnNull")]
    pub url: String,
}

/// Token ids listed in a `tokens_revoked` event.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevokedTokens {
    #[serde_as(as = "DefaultOnNull")]
    pub oauth: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub bot: Vec<String>,
}
