//! Name and number helpers shared by the XML writer and checker.

/// Checks `c` against the XML 1.0 `NameStartChar` production, minus `:`.
pub fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

/// Checks `c` against the XML 1.0 `NameChar` production, minus `:`.
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// Checks if `name` is a legal XML element or attribute name.
///
/// `:` is only accepted after the first character, as a namespace
/// separator (`itunes:author`).
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => {}
        _ => return false,
    }
    chars.all(|c| c == ':' || is_name_char(c))
}

/// Derives a legal element name from free-form text.
///
/// Every character that is not an alphanumeric name character becomes
/// `_`. A leading `_` is added when the result would not start with a name
/// start character, or is empty. Two different inputs may normalize to the
/// same name.
pub fn normalize_name(raw: &str) -> String {
    let mut name: String = raw
        .chars()
        .map(|c| if c.is_alphanumeric() && is_name_char(c) { c } else { '_' })
        .collect();
    if !name.starts_with(is_name_start_char) {
        name.insert(0, '_');
    }
    name
}

/// Formats a decimal the way it appears in element text.
pub fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Checks an entity or character reference body (the part between `&` and `;`).
pub fn is_valid_reference(reference: &[u8]) -> bool {
    match reference {
        b"lt" | b"gt" | b"amp" | b"apos" | b"quot" => true,
        [b'#', b'x', hex @ ..] => {
            !hex.is_empty()
                && hex.iter().all(u8::is_ascii_hexdigit)
                && std::str::from_utf8(hex)
                    .ok()
                    .and_then(|h| u32::from_str_radix(h, 16).ok())
                    .and_then(char::from_u32)
                    .is_some_and(crate::sanitize::is_xml_char)
        }
        [b'#', dec @ ..] => {
            !dec.is_empty()
                && dec.iter().all(u8::is_ascii_digit)
                && std::str::from_utf8(dec)
                    .ok()
                    .and_then(|d| d.parse::<u32>().ok())
                    .and_then(char::from_u32)
                    .is_some_and(crate::sanitize::is_xml_char)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("song"));
        assert!(is_valid_name("album_mbid"));
        assert!(is_valid_name("itunes:author"));
        assert!(is_valid_name("_3"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("3d"));
        assert!(!is_valid_name("bad name"));
        assert!(!is_valid_name("a<b"));
        assert!(!is_valid_name(":a"));
    }

    #[test]
    fn test_name_ranges_follow_xml_productions() {
        assert!(is_valid_name("Tempo_é"));
        assert!(is_valid_name("曲名"));
        assert!(is_valid_name("a\u{345}"));
        assert!(is_valid_name("a\u{B7}b"));
        assert!(!is_valid_name("BPM\u{B2}"));
        assert!(!is_valid_name("\u{345}x"));
        assert!(!is_valid_name("a\u{D7}b"));
        assert!(!is_valid_name("\u{B7}"));
        assert!(!is_valid_name("a\u{37E}"));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Recording Location"), "Recording_Location");
        assert_eq!(normalize_name("BPM (detected)"), "BPM__detected_");
        assert_eq!(normalize_name("a/b\\c#d"), "a_b_c_d");
        assert_eq!(normalize_name("7 inch"), "_7_inch");
        assert_eq!(normalize_name(""), "_");
        assert_eq!(normalize_name("Mix-Version"), "Mix_Version");
        assert_eq!(normalize_name("Tempo é"), "Tempo_é");
    }

    #[test]
    fn test_normalize_name_outside_xml_ranges() {
        assert_eq!(normalize_name("BPM\u{B2}"), "BPM_");
        assert_eq!(normalize_name("\u{345}x"), "_\u{345}x");
        assert_eq!(normalize_name("\u{BD} size"), "__size");
        assert!(is_valid_name(&normalize_name("\u{345}x")));
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(4.0), "4");
        assert_eq!(format_decimal(3.5), "3.5");
        assert_eq!(format_decimal(-6.25), "-6.25");
    }

    #[test]
    fn test_is_valid_reference() {
        assert!(is_valid_reference(b"amp"));
        assert!(is_valid_reference(b"#x41"));
        assert!(is_valid_reference(b"#65"));
        assert!(!is_valid_reference(b"#x0"));
        assert!(!is_valid_reference(b"nbsp"));
        assert!(!is_valid_reference(b"#"));
    }
}
