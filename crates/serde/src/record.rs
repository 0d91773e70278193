//! Projected records: the format-neutral shape every entity is reduced to
//! before it is written as XML or JSON.
//!
//! A [`Record`] is an element name, an optional `id` attribute and an
//! ordered list of [`Field`]s. Field order is significant and duplicate
//! names are kept in encounter order by both writers.
//!
//! | Value | XML | JSON |
//! |-------|-----|------|
//! | `Integer(3)` | `<track>3</track>` | `"track": 3` |
//! | `Text("x")` | `<name><![CDATA[x]]></name>` | `"name": "x"` |
//! | `Null` | `<rating/>` | `"rating": null` |
//! | `Link` | `<artist id="1"><![CDATA[x]]></artist>` | `"artist": {"id": "1", "name": "x"}` |
//! | `Links` | one `<genre id="..">` element per link | `"genre": [{"id", "name"}, ..]` |
//! | `Listing` | `<tracks><playlisttrack id="..">1</playlisttrack></tracks>` | `"tracks": [{"id", "playlisttrack"}, ..]` |
//! | `Records` | `<albums><album id="..">..</album></albums>` | `"albums": [{..}, ..]` |

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::sanitize::clean_text;

/// A link payload: either a number or free text.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Integer(i64),
    Text(String),
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Integer(n) => serializer.serialize_i64(*n),
            Scalar::Text(s) => serializer.serialize_str(&clean_text(s)),
        }
    }
}

/// A reference to another object, rendered as an element with an `id` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: String,
    pub value: Scalar,
}

impl Link {
    pub fn new(id: impl ToString, value: impl Into<Scalar>) -> Self {
        Self {
            id: id.to_string(),
            value: value.into(),
        }
    }
}

/// The value of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Decimal(f64),
    Text(String),
    Null,
    Link(Link),
    Links(Vec<Link>),
    Listing { item: String, links: Vec<Link> },
    Records(Vec<Record>),
}

impl Value {
    /// Returns the text payload for `Text` values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns nested records for `Records` values.
    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            Value::Records(records) => Some(records),
            _ => None,
        }
    }
}

/// A named field of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

/// An ordered, named collection of fields ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub id: Option<String>,
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            fields: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Appends a field, keeping any earlier field with the same name.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push(Field {
            name: name.into(),
            value,
        });
    }

    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.push(name, value);
        self
    }

    /// Appends `value` when present; otherwise leaves the record unchanged.
    pub fn optional_field(self, name: &str, value: Option<Value>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    pub fn integer(self, name: &str, value: impl Into<i64>) -> Self {
        self.field(name, Value::Integer(value.into()))
    }

    /// Appends an unsigned count, saturating at `i64::MAX`.
    pub fn unsigned(self, name: &str, value: u64) -> Self {
        self.field(name, Value::Integer(i64::try_from(value).unwrap_or(i64::MAX)))
    }

    pub fn text(self, name: &str, value: impl Into<String>) -> Self {
        self.field(name, Value::Text(value.into()))
    }

    /// Appends a decimal, or `Null` when there is no finite value.
    pub fn decimal(self, name: &str, value: Option<f64>) -> Self {
        let value = match value {
            Some(d) if d.is_finite() => Value::Decimal(d),
            _ => Value::Null,
        };
        self.field(name, value)
    }

    /// Appends an integer, or `Null` when absent.
    pub fn optional_integer(self, name: &str, value: Option<i64>) -> Self {
        let value = value.map(Value::Integer).unwrap_or(Value::Null);
        self.field(name, value)
    }

    pub fn link(self, name: &str, id: impl ToString, value: impl Into<Scalar>) -> Self {
        self.field(name, Value::Link(Link::new(id, value)))
    }

    pub fn links(self, name: &str, links: Vec<Link>) -> Self {
        self.field(name, Value::Links(links))
    }

    pub fn records(self, name: &str, records: Vec<Record>) -> Self {
        self.field(name, Value::Records(records))
    }

    /// Returns the first field named `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    /// Returns every field named `name`, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.fields
            .iter()
            .filter(move |field| field.name == name)
            .map(|field| &field.value)
    }
}

struct LinkObject<'a>(&'a Link);

impl Serialize for LinkObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("id", &clean_text(&self.0.id))?;
        map.serialize_entry("name", &self.0.value)?;
        map.end()
    }
}

struct ListingEntry<'a> {
    item: &'a str,
    link: &'a Link,
}

impl Serialize for ListingEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("id", &clean_text(&self.link.id))?;
        map.serialize_entry(&clean_text(self.item), &self.link.value)?;
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Decimal(d) if d.is_finite() => serializer.serialize_f64(*d),
            Value::Decimal(_) | Value::Null => serializer.serialize_unit(),
            Value::Text(s) => serializer.serialize_str(&clean_text(s)),
            Value::Link(link) => LinkObject(link).serialize(serializer),
            Value::Links(links) => {
                let mut seq = serializer.serialize_seq(Some(links.len()))?;
                for link in links {
                    seq.serialize_element(&LinkObject(link))?;
                }
                seq.end()
            }
            Value::Listing { item, links } => {
                let mut seq = serializer.serialize_seq(Some(links.len()))?;
                for link in links {
                    seq.serialize_element(&ListingEntry { item, link })?;
                }
                seq.end()
            }
            Value::Records(records) => {
                let mut seq = serializer.serialize_seq(Some(records.len()))?;
                for record in records {
                    seq.serialize_element(record)?;
                }
                seq.end()
            }
        }
    }
}

/// Serializes as a JSON object: `id` first, then every field in order.
///
/// Goes through `SerializeMap` directly so that duplicate field names
/// survive into the output. Every string, key or value, is cleaned of
/// characters that the XML writer would also drop.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.fields.len() + usize::from(self.id.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(id) = &self.id {
            map.serialize_entry("id", &clean_text(id))?;
        }
        for field in &self.fields {
            map.serialize_entry(&clean_text(&field.name), &field.value)?;
        }
        map.end()
    }
}
