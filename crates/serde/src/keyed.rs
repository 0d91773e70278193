//! Keyed trees: free-form nested data addressed by name rather than by a
//! record schema.
//!
//! In XML every leaf becomes `<key><![CDATA[text]]></key>` and every branch
//! an element wrapping its children. In JSON the tree is a nested object
//! whose leaves are strings.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::sanitize::clean_text;

/// A leaf or branch value of a keyed tree.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyedValue {
    Text(String),
    Nested(Vec<KeyedEntry>),
}

/// One named entry of a keyed tree.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedEntry {
    pub key: String,
    pub value: KeyedValue,
}

impl KeyedEntry {
    pub fn text(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: KeyedValue::Text(text.into()),
        }
    }

    pub fn nested(key: impl Into<String>, entries: Vec<KeyedEntry>) -> Self {
        Self {
            key: key.into(),
            value: KeyedValue::Nested(entries),
        }
    }

    /// Rewrites every key in the tree with `rename`, leaving values alone.
    pub fn map_keys(self, rename: &impl Fn(&str) -> String) -> Self {
        let value = match self.value {
            KeyedValue::Text(text) => KeyedValue::Text(text),
            KeyedValue::Nested(entries) => KeyedValue::Nested(
                entries.into_iter().map(|entry| entry.map_keys(rename)).collect(),
            ),
        };
        Self {
            key: rename(&self.key),
            value,
        }
    }
}

/// Serializes a list of entries as one JSON object, in order. Repeated keys
/// are kept.
pub struct KeyedObject<'a>(pub &'a [KeyedEntry]);

impl Serialize for KeyedObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(&clean_text(&entry.key), &entry.value)?;
        }
        map.end()
    }
}

impl Serialize for KeyedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            KeyedValue::Text(text) => serializer.serialize_str(&clean_text(text)),
            KeyedValue::Nested(entries) => KeyedObject(entries).serialize(serializer),
        }
    }
}
