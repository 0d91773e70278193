//! Single-pass well-formedness check for XML produced outside the writer.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, SerdeError};
use crate::sanitize::is_xml_char;
use crate::xml::utils::{is_valid_name, is_valid_reference};

/// Verifies that `xml` is a well-formed document.
///
/// Checks, in one streaming read:
/// - every character is an allowed XML character;
/// - element and attribute names are legal XML names;
/// - tags are properly nested and closed;
/// - there is exactly one root element and no text outside it;
/// - attributes parse and entity references are defined.
pub fn check_well_formed(xml: &str) -> Result<()> {
    if let Some(c) = xml.chars().find(|c| !is_xml_char(*c)) {
        return Err(SerdeError::malformed(format!(
            "disallowed character U+{:04X}",
            c as u32
        )));
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut depth: usize = 0;
    let mut roots: usize = 0;

    loop {
        let event = reader.read_event().map_err(|e| {
            SerdeError::malformed(format!(
                "parse error at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;
        match event {
            Event::Start(start) => {
                if depth == 0 {
                    roots += 1;
                }
                check_tag(&start)?;
                depth += 1;
            }
            Event::Empty(empty) => {
                if depth == 0 {
                    roots += 1;
                }
                check_tag(&empty)?;
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| SerdeError::malformed("unexpected end tag"))?;
            }
            Event::Text(text) => {
                if depth == 0 && !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(SerdeError::malformed("text outside of the root element"));
                }
            }
            Event::CData(_) => {
                if depth == 0 {
                    return Err(SerdeError::malformed("CDATA outside of the root element"));
                }
            }
            Event::GeneralRef(reference) => {
                if depth == 0 {
                    return Err(SerdeError::malformed("reference outside of the root element"));
                }
                if !is_valid_reference(&reference) {
                    return Err(SerdeError::malformed(format!(
                        "undefined reference &{};",
                        String::from_utf8_lossy(&reference)
                    )));
                }
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if depth != 0 {
        return Err(SerdeError::malformed(format!(
            "{} element(s) left unclosed",
            depth
        )));
    }
    match roots {
        1 => Ok(()),
        0 => Err(SerdeError::malformed("document has no root element")),
        n => Err(SerdeError::malformed(format!(
            "document has {} root elements",
            n
        ))),
    }
}

fn check_tag(tag: &BytesStart<'_>) -> Result<()> {
    check_name(tag.name().as_ref())?;
    for attribute in tag.attributes() {
        let attribute = attribute.map_err(|e| SerdeError::malformed(e.to_string()))?;
        check_name(attribute.key.as_ref())?;
    }
    Ok(())
}

fn check_name(name: &[u8]) -> Result<()> {
    match std::str::from_utf8(name) {
        Ok(name) if is_valid_name(name) => Ok(()),
        _ => Err(SerdeError::malformed(format!(
            "invalid name {:?}",
            String::from_utf8_lossy(name)
        ))),
    }
}
