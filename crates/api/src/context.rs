//! Per-request render settings: output format, pagination window and the
//! requesting user.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::ApiError;

/// XML document flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum XmlFlavor {
    /// `<root>` envelope with `total_count`.
    #[default]
    Root,
    /// RSS 2.0 channel.
    Rss,
    /// XSPF playlist.
    Xspf,
    /// iTunes property list.
    Itunes,
}

impl XmlFlavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            XmlFlavor::Root => "xml",
            XmlFlavor::Rss => "rss",
            XmlFlavor::Xspf => "xspf",
            XmlFlavor::Itunes => "itunes",
        }
    }

    /// Depth at which the body sits inside this flavor's envelope.
    pub fn body_depth(&self) -> usize {
        match self {
            XmlFlavor::Root | XmlFlavor::Rss => 1,
            XmlFlavor::Xspf | XmlFlavor::Itunes => 2,
        }
    }
}

/// Output format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Xml(XmlFlavor),
    Json,
}

impl Default for Format {
    fn default() -> Self {
        Format::Xml(XmlFlavor::Root)
    }
}

impl Format {
    pub fn is_json(&self) -> bool {
        matches!(self, Format::Json)
    }

    /// Returns the XML flavor, or `None` for JSON.
    pub fn flavor(&self) -> Option<XmlFlavor> {
        match self {
            Format::Xml(flavor) => Some(*flavor),
            Format::Json => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Xml(flavor) => f.write_str(flavor.as_str()),
            Format::Json => f.write_str("json"),
        }
    }
}

impl FromStr for Format {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "xml" | "default" | "root" => Ok(Format::Xml(XmlFlavor::Root)),
            "rss" => Ok(Format::Xml(XmlFlavor::Rss)),
            "xspf" => Ok(Format::Xml(XmlFlavor::Xspf)),
            "itunes" => Ok(Format::Xml(XmlFlavor::Itunes)),
            "json" => Ok(Format::Json),
            _ => Err(ApiError::InvalidFormat(s.to_string())),
        }
    }
}

/// API generation requested by the client. Only the genre element name
/// differs between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiVersion {
    V4,
    #[default]
    V5,
}

impl ApiVersion {
    /// Maps a major version number; anything below 5 speaks the older dialect.
    pub fn from_major(major: u32) -> Self {
        if major >= 5 { ApiVersion::V5 } else { ApiVersion::V4 }
    }

    /// Element name used for genre links.
    pub fn genre_element(&self) -> &'static str {
        match self {
            ApiVersion::V4 => "tag",
            ApiVersion::V5 => "genre",
        }
    }
}

/// Pagination window. A zero limit means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Window {
    pub offset: usize,
    pub limit: usize,
}

impl Window {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    pub fn is_unlimited(&self) -> bool {
        self.limit == 0
    }
}

/// Everything a single render call needs to know about the request.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Requesting user, for personal ratings and flags.
    pub user_id: Option<u64>,
    /// Session token embedded into art and play URLs.
    pub auth: Option<String>,
    pub format: Format,
    pub window: Window,
    /// A top-level document gets an envelope and is paginated; a fragment
    /// is neither.
    pub top_level: bool,
    /// Title for XSPF playlists and JSON documents.
    pub title: Option<String>,
    pub api_version: ApiVersion,
    /// Timestamp printed in generator banners.
    pub generated_at: DateTime<Utc>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(Format::default())
    }
}

impl RenderContext {
    pub fn new(format: Format) -> Self {
        Self {
            user_id: None,
            auth: None,
            format,
            window: Window::default(),
            top_level: true,
            title: None,
            api_version: ApiVersion::default(),
            generated_at: Utc::now(),
        }
    }

    pub fn with_user(mut self, user_id: u64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    pub fn with_window(mut self, offset: usize, limit: usize) -> Self {
        self.window = Window::new(offset, limit);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = at;
        self
    }

    /// Marks the render as a fragment to be embedded elsewhere.
    pub fn fragment(mut self) -> Self {
        self.top_level = false;
        self
    }

    /// Context for children expanded inside another object.
    pub(crate) fn nested(&self) -> Self {
        let mut nested = self.clone();
        nested.top_level = false;
        nested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("xml".parse::<Format>().unwrap(), Format::Xml(XmlFlavor::Root));
        assert_eq!("XSPF".parse::<Format>().unwrap(), Format::Xml(XmlFlavor::Xspf));
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert!(matches!(
            "yaml".parse::<Format>(),
            Err(ApiError::InvalidFormat(ref s)) if s == "yaml"
        ));
    }

    #[test]
    fn test_api_version_genre_element() {
        assert_eq!(ApiVersion::from_major(4).genre_element(), "tag");
        assert_eq!(ApiVersion::from_major(6).genre_element(), "genre");
    }

    #[test]
    fn test_nested_context_is_fragment() {
        let ctx = RenderContext::new(Format::Json).with_user(2).with_window(5, 10);
        let nested = ctx.nested();
        assert!(ctx.top_level);
        assert!(!nested.top_level);
        assert_eq!(nested.user_id, Some(2));
        assert_eq!(nested.window, Window::new(5, 10));
    }
}
