//! Error, empty and success documents, plus the free-form keyed and
//! object-array documents.
//!
//! These never fail: a document that cannot be written falls back to a
//! fixed minimal one, logged at `error` level.

use std::collections::BTreeMap;
use std::fmt::Display;

use cadence_model::EntityKind;
use cadence_serde::xml::XmlStreamWriter;
use cadence_serde::xml::utils::normalize_name;
use cadence_serde::{KeyedEntry, KeyedObject, Record, Value, clean_body, to_json_string_pretty};
use serde::Serialize;
use tracing::error;

use crate::context::{Format, XmlFlavor};
use crate::document::DocumentAssembler;
use crate::error::ApiResult;
use crate::projection::element_name;

const FALLBACK_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<root>\n</root>\n";
const FALLBACK_JSON: &str = "{}";

#[derive(Serialize)]
struct ErrorBody<'a> {
    #[serde(rename = "errorCode")]
    code: String,
    #[serde(rename = "errorAction")]
    action: &'a str,
    #[serde(rename = "errorMessage")]
    message: &'a str,
}

#[derive(Serialize)]
struct ErrorDocument<'a> {
    error: ErrorBody<'a>,
}

/// One object-array row: the `id` column becomes the attribute, columns
/// that parse as integers are numeric, everything else is text.
fn object_row(item: &str, row: &[(&str, &str)]) -> Record {
    let mut record = Record::new(item);
    for (key, value) in row {
        if *key == "id" {
            record.id = Some(value.to_string());
            continue;
        }
        let value = match value.parse::<i64>() {
            Ok(n) => Value::Integer(n),
            Err(_) => Value::Text(value.to_string()),
        };
        record.push(normalize_name(key), value);
    }
    record
}

fn or_fallback(result: ApiResult<String>, format: Format) -> String {
    result.unwrap_or_else(|e| {
        error!(error = %e, "Failed to build outcome document");
        match format {
            Format::Json => FALLBACK_JSON.to_string(),
            Format::Xml(_) => FALLBACK_XML.to_string(),
        }
    })
}

impl DocumentAssembler<'_> {
    /// `<error errorCode="..">` with `errorAction` and `errorMessage`, or the
    /// JSON object with the same three fields.
    pub fn error(&self, code: impl Display, message: &str, action: &str, format: Format) -> String {
        let code = code.to_string();
        let result: ApiResult<String> = match format {
            Format::Json => to_json_string_pretty(&ErrorDocument {
                error: ErrorBody {
                    code,
                    action,
                    message,
                },
            })
            .map(|json| clean_body(&json))
            .map_err(Into::into),
            Format::Xml(_) => self.xml_document(|writer| {
                writer.start("error", &[("errorCode", code.as_str())])?;
                writer.text_element("errorAction", &[], action)?;
                writer.text_element("errorMessage", &[], message)?;
                writer.end("error")
            }),
        };
        or_fallback(result, format)
    }

    /// An empty document.
    pub fn empty(&self, format: Format) -> String {
        let result: ApiResult<String> = match format {
            Format::Json => Ok(FALLBACK_JSON.to_string()),
            Format::Xml(_) => self.xml_document(|_| Ok(())),
        };
        or_fallback(result, format)
    }

    /// An empty document for a typed collection: `{"<kind>": []}` in JSON,
    /// the plain empty envelope in XML.
    pub fn empty_collection(&self, kind: EntityKind, format: Format) -> String {
        match format {
            Format::Json => {
                let mut object = serde_json::Map::new();
                object.insert(element_name(kind).to_string(), serde_json::Value::Array(Vec::new()));
                or_fallback(to_json_string_pretty(&object).map_err(Into::into), format)
            }
            Format::Xml(_) => self.empty(format),
        }
    }

    /// `<success code="1">` followed by one text element per data pair.
    /// Keys are normalized to legal element names.
    pub fn success(&self, message: &str, data: &[(&str, &str)], format: Format) -> String {
        let result: ApiResult<String> = match format {
            Format::Json => {
                let record = data.iter().fold(
                    Record::new("success").text("success", message),
                    |record, (key, value)| record.text(key, *value),
                );
                to_json_string_pretty(&record).map_err(Into::into)
            }
            Format::Xml(_) => self.xml_document(|writer| {
                writer.text_element("success", &[("code", "1")], message)?;
                for (key, value) in data {
                    writer.text_element(&normalize_name(key), &[], value)?;
                }
                Ok(())
            }),
        };
        or_fallback(result, format)
    }

    /// A keyed tree: nested elements in XML, a nested object in JSON. Keys
    /// are normalized to legal element names at every level, in both
    /// formats.
    pub fn keyed_array(&self, entries: &[KeyedEntry], format: Format) -> String {
        let entries: Vec<KeyedEntry> = entries
            .iter()
            .cloned()
            .map(|entry| entry.map_keys(&normalize_name))
            .collect();
        let result: ApiResult<String> = match format {
            Format::Json => to_json_string_pretty(&KeyedObject(&entries))
                .map(|json| clean_body(&json))
                .map_err(Into::into),
            Format::Xml(_) => self.xml_document(|writer| writer.write_keyed(&entries)),
        };
        or_fallback(result, format)
    }

    /// One `<item id="..">` element per row, or `{"item": [..]}` in JSON.
    pub fn object_array(&self, item: &str, rows: &[Vec<(&str, &str)>], format: Format) -> String {
        let item = normalize_name(item);
        let records: Vec<Record> = rows.iter().map(|row| object_row(&item, row)).collect();
        let result: ApiResult<String> = match format {
            Format::Json => to_json_string_pretty(&BTreeMap::from([(item.as_str(), &records)]))
                .map(|json| clean_body(&json))
                .map_err(Into::into),
            Format::Xml(_) => self.xml_document(|writer| {
                for record in &records {
                    writer.write_record(record)?;
                }
                Ok(())
            }),
        };
        or_fallback(result, format)
    }

    fn xml_document(
        &self,
        write: impl FnOnce(&mut XmlStreamWriter) -> cadence_serde::Result<()>,
    ) -> ApiResult<String> {
        let envelope = self.envelope(XmlFlavor::Root, None);
        let mut writer = XmlStreamWriter::with_depth(envelope.depth);
        write(&mut writer)?;
        let body = clean_body(&writer.finish()?);
        if body.is_empty() {
            // an empty root closes on the following line
            return Ok(format!("{}</root>\n", envelope.header));
        }
        Ok(envelope.wrap(&body))
    }
}
