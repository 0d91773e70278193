//! Single-pass, nesting-aware XML writer.
//!
//! Events go straight to a quick-xml [`Writer`]. Indentation is produced as
//! elements are opened, so no reparse or reformat pass is needed afterwards:
//!
//! - a start tag that follows other output goes on a new line, indented two
//!   spaces per open element;
//! - an end tag is written inline unless the element had child elements, so
//!   an empty container reads `<albums></albums>`;
//! - every text node is sanitized and written as CDATA, falling back to
//!   escaped text when it contains `]]>`; empty text still gets an empty
//!   `<![CDATA[]]>` section.

use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Result, SerdeError};
use crate::keyed::{KeyedEntry, KeyedValue};
use crate::record::{Field, Link, Record, Scalar, Value};
use crate::sanitize::clean_text;
use crate::xml::utils::{format_decimal, is_valid_name};

const INDENT: &[u8] = b"  ";

#[derive(Debug)]
struct OpenElement {
    name: String,
    has_children: bool,
}

/// Streaming XML writer that validates nesting as it goes.
pub struct XmlStreamWriter {
    writer: Writer<Vec<u8>>,
    open: Vec<OpenElement>,
    base_depth: usize,
}

impl Default for XmlStreamWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlStreamWriter {
    /// Creates a writer whose top-level elements are not indented.
    pub fn new() -> Self {
        Self::with_depth(0)
    }

    /// Creates a writer whose top-level elements are indented `depth` levels,
    /// for bodies that are later placed inside an envelope.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            writer: Writer::new(Vec::new()),
            open: Vec::new(),
            base_depth: depth,
        }
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn break_line(&mut self) {
        if let Some(parent) = self.open.last_mut() {
            parent.has_children = true;
        }
        let level = self.base_depth + self.open.len();
        let buf = self.writer.get_mut();
        if !buf.is_empty() {
            buf.push(b'\n');
        }
        for _ in 0..level {
            buf.extend_from_slice(INDENT);
        }
    }

    fn element<'a>(name: &'a str, attributes: &[(&str, &str)]) -> Result<BytesStart<'a>> {
        if !is_valid_name(name) {
            return Err(SerdeError::malformed(format!(
                "illegal element name '{}'",
                name
            )));
        }
        let mut element = BytesStart::new(name);
        for (key, value) in attributes {
            if !is_valid_name(key) {
                return Err(SerdeError::malformed(format!(
                    "illegal attribute name '{}' on <{}>",
                    key, name
                )));
            }
            element.push_attribute((*key, clean_text(value).as_ref()));
        }
        Ok(element)
    }

    /// Opens an element.
    pub fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let element = Self::element(name, attributes)?;
        self.break_line();
        self.writer.write_event(Event::Start(element))?;
        self.open.push(OpenElement {
            name: name.to_string(),
            has_children: false,
        });
        Ok(())
    }

    /// Closes the innermost open element, which must be `name`.
    pub fn end(&mut self, name: &str) -> Result<()> {
        let element = match self.open.pop() {
            Some(element) if element.name == name => element,
            Some(element) => {
                let expected = element.name.clone();
                self.open.push(element);
                return Err(SerdeError::malformed(format!(
                    "expected </{}>, got </{}>",
                    expected, name
                )));
            }
            None => {
                return Err(SerdeError::malformed(format!(
                    "</{}> has no open element",
                    name
                )));
            }
        };
        if element.has_children {
            let level = self.base_depth + self.open.len();
            let buf = self.writer.get_mut();
            buf.push(b'\n');
            for _ in 0..level {
                buf.extend_from_slice(INDENT);
            }
        }
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Writes a self-closing element.
    pub fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let element = Self::element(name, attributes)?;
        self.break_line();
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    /// Writes text into the current element as CDATA.
    pub fn cdata(&mut self, text: &str) -> Result<()> {
        self.require_open("text")?;
        let text = clean_text(text);
        if text.contains("]]>") {
            self.writer.write_event(Event::Text(BytesText::new(text.as_ref())))?;
        } else {
            self.writer.write_event(Event::CData(BytesCData::new(text.as_ref())))?;
        }
        Ok(())
    }

    /// Writes escaped text into the current element.
    pub fn text(&mut self, text: &str) -> Result<()> {
        self.require_open("text")?;
        let text = clean_text(text);
        if !text.is_empty() {
            self.writer.write_event(Event::Text(BytesText::new(text.as_ref())))?;
        }
        Ok(())
    }

    /// Writes `<name>text</name>` with the text escaped (no CDATA).
    pub fn plain_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name, &[])?;
        self.text(text)?;
        self.end(name)
    }

    /// Writes `<name attrs><![CDATA[text]]></name>`.
    pub fn text_element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attributes)?;
        self.cdata(text)?;
        self.end(name)
    }

    /// Writes `<name attrs>number</name>` without text escaping markers.
    pub fn number_element(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
        number: impl std::fmt::Display,
    ) -> Result<()> {
        self.start(name, attributes)?;
        let number = number.to_string();
        self.writer.write_event(Event::Text(BytesText::new(&number)))?;
        self.end(name)
    }

    fn require_open(&self, what: &str) -> Result<()> {
        if self.open.is_empty() {
            return Err(SerdeError::malformed(format!(
                "{} written outside of an element",
                what
            )));
        }
        Ok(())
    }

    /// Writes a projected record and all of its fields.
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        match &record.id {
            Some(id) => self.start(&record.name, &[("id", id.as_str())])?,
            None => self.start(&record.name, &[])?,
        }
        for field in &record.fields {
            self.write_field(field)?;
        }
        self.end(&record.name)
    }

    /// Writes a single field as one or more elements.
    pub fn write_field(&mut self, field: &Field) -> Result<()> {
        let name = field.name.as_str();
        match &field.value {
            Value::Integer(n) => self.number_element(name, &[], n),
            Value::Decimal(d) if d.is_finite() => self.number_element(name, &[], format_decimal(*d)),
            Value::Decimal(_) | Value::Null => self.empty(name, &[]),
            Value::Text(text) => self.text_element(name, &[], text),
            Value::Link(link) => self.write_link(name, link),
            Value::Links(links) => {
                for link in links {
                    self.write_link(name, link)?;
                }
                Ok(())
            }
            Value::Listing { item, links } => {
                self.start(name, &[])?;
                for link in links {
                    self.write_link(item, link)?;
                }
                self.end(name)
            }
            Value::Records(records) => {
                self.start(name, &[])?;
                for record in records {
                    self.write_record(record)?;
                }
                self.end(name)
            }
        }
    }

    /// Writes a keyed tree: leaves as CDATA text elements, branches as
    /// elements wrapping their children.
    pub fn write_keyed(&mut self, entries: &[KeyedEntry]) -> Result<()> {
        for entry in entries {
            match &entry.value {
                KeyedValue::Text(text) => self.text_element(&entry.key, &[], text)?,
                KeyedValue::Nested(children) => {
                    self.start(&entry.key, &[])?;
                    self.write_keyed(children)?;
                    self.end(&entry.key)?;
                }
            }
        }
        Ok(())
    }

    fn write_link(&mut self, name: &str, link: &Link) -> Result<()> {
        let attributes = [("id", link.id.as_str())];
        match &link.value {
            Scalar::Integer(n) => self.number_element(name, &attributes, n),
            Scalar::Text(text) => self.text_element(name, &attributes, text),
        }
    }

    /// Returns the written markup. Fails if any element is still open.
    pub fn finish(self) -> Result<String> {
        if let Some(element) = self.open.last() {
            return Err(SerdeError::malformed(format!(
                "<{}> was never closed",
                element.name
            )));
        }
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| SerdeError::Custom(format!("Invalid UTF-8 in output: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_container_stays_on_one_line() {
        let mut writer = XmlStreamWriter::new();
        writer.start("artist", &[("id", "1")]).unwrap();
        writer.text_element("name", &[], "Plaid").unwrap();
        writer.start("albums", &[]).unwrap();
        writer.end("albums").unwrap();
        writer.end("artist").unwrap();

        assert_eq!(
            writer.finish().unwrap(),
            "<artist id=\"1\">\n  <name><![CDATA[Plaid]]></name>\n  <albums></albums>\n</artist>"
        );
    }

    #[test]
    fn test_base_depth_indents_top_level() {
        let mut writer = XmlStreamWriter::with_depth(1);
        writer.number_element("total_count", &[], 3).unwrap();
        writer.empty("rating", &[]).unwrap();
        assert_eq!(
            writer.finish().unwrap(),
            "  <total_count>3</total_count>\n  <rating/>"
        );
    }

    #[test]
    fn test_cdata_terminator_is_escaped() {
        let mut writer = XmlStreamWriter::new();
        writer.text_element("title", &[], "a]]>b\u{0}").unwrap();
        let xml = writer.finish().unwrap();
        assert_eq!(xml, "<title>a]]&gt;b</title>");
    }

    #[test]
    fn test_mismatched_end_is_rejected() {
        let mut writer = XmlStreamWriter::new();
        writer.start("a", &[]).unwrap();
        assert!(matches!(writer.end("b"), Err(SerdeError::Malformed(_))));
        assert_eq!(writer.depth(), 1);
        assert!(writer.finish().is_err());
    }

    #[test]
    fn test_illegal_names_are_rejected() {
        let mut writer = XmlStreamWriter::new();
        assert!(writer.start("1st", &[]).is_err());
        assert!(writer.empty("a", &[("bad key", "v")]).is_err());
        assert!(writer.cdata("orphan").is_err());
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let mut writer = XmlStreamWriter::new();
        writer.empty("enclosure", &[("url", "http://x/?a=1&b=\"2\"")]).unwrap();
        assert_eq!(
            writer.finish().unwrap(),
            "<enclosure url=\"http://x/?a=1&amp;b=&quot;2&quot;\"/>"
        );
    }

    #[test]
    fn test_record_links_and_listing() {
        let record = Record::new("playlist")
            .with_id(4)
            .link("artist", 2, "Plaid")
            .field(
                "tracks",
                Value::Listing {
                    item: "playlisttrack".into(),
                    links: vec![Link::new(101, 1), Link::new(102, 2)],
                },
            )
            .field("rating", Value::Null);

        let mut writer = XmlStreamWriter::new();
        writer.write_record(&record).unwrap();
        assert_eq!(
            writer.finish().unwrap(),
            "<playlist id=\"4\">\n  <artist id=\"2\"><![CDATA[Plaid]]></artist>\n  <tracks>\n    <playlisttrack id=\"101\">1</playlisttrack>\n    <playlisttrack id=\"102\">2</playlisttrack>\n  </tracks>\n  <rating/>\n</playlist>"
        );
    }
}
