//! Character sanitization for XML and JSON output.
//!
//! Strips every code point outside the XML 1.0 `Char` production, plus the
//! C1 control block (except NEL), the `FDD0-FDDF` non-characters and the
//! `xFFFE`/`xFFFF` non-characters of every supplementary plane.

use std::borrow::Cow;

use tracing::warn;

/// Returns true when `c` may appear in an emitted document.
pub fn is_xml_char(c: char) -> bool {
    let cp = c as u32;
    let permitted = matches!(
        cp,
        0x9 | 0xA | 0xD | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    );
    let discouraged = matches!(cp, 0x7F..=0x84 | 0x86..=0x9F | 0xFDD0..=0xFDDF)
        || (cp >= 0x1FFFE && (cp & 0xFFFE) == 0xFFFE);
    permitted && !discouraged
}

/// Removes disallowed code points from a single text value.
///
/// Borrows when nothing needs to be removed. A non-empty input that cleans
/// down to nothing is logged and returned as an empty string.
pub fn clean_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }
    let cleaned: String = text.chars().filter(|c| is_xml_char(*c)).collect();
    if cleaned.is_empty() {
        warn!(len = text.len(), "Charset cleanup failed, something might break");
    }
    Cow::Owned(cleaned)
}

/// Sanitizes an assembled document body and trims trailing whitespace.
pub fn clean_body(body: &str) -> String {
    let cleaned = clean_text(body);
    cleaned
        .trim_end_matches([' ', '\t', '\n', '\r', '\x0B'])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permitted_ranges() {
        assert!(is_xml_char('\t'));
        assert!(is_xml_char('\n'));
        assert!(is_xml_char('a'));
        assert!(is_xml_char('\u{85}'));
        assert!(is_xml_char('\u{1F3B5}'));
        assert!(!is_xml_char('\u{0}'));
        assert!(!is_xml_char('\u{B}'));
        assert!(!is_xml_char('\u{7F}'));
        assert!(!is_xml_char('\u{9F}'));
        assert!(!is_xml_char('\u{FDD0}'));
        assert!(!is_xml_char('\u{FFFE}'));
        assert!(!is_xml_char('\u{1FFFF}'));
        assert!(!is_xml_char('\u{10FFFE}'));
    }

    #[test]
    fn test_clean_text_borrows_when_clean() {
        assert!(matches!(clean_text("Geogaddi"), Cow::Borrowed(_)));
        assert_eq!(clean_text("a\u{0}b\u{1B}c"), "abc");
    }

    #[test]
    fn test_clean_text_degrades_to_empty() {
        assert_eq!(clean_text("\u{0}\u{1}"), "");
    }

    #[test]
    fn test_clean_body_trims_trailing_whitespace() {
        assert_eq!(clean_body("  <song/>\n\t \n"), "  <song/>");
    }
}
