//! Document assembly: envelopes, whole-body sanitization and the final
//! well-formedness check.
//!
//! | Flavor | Header | Footer |
//! |--------|--------|--------|
//! | root | declaration, `<root>` | `</root>` |
//! | rss | declaration, generator comment, `<rss version="2.0">`, `<channel>` | `</channel>`, `</rss>` |
//! | xspf | declaration, `<playlist>`, title/creator/annotation/info, `<trackList>` | `</trackList>`, `</playlist>` |
//! | itunes | declaration, generator comment, `<plist>`, `<dict>`, `<key>Tracks</key>`, `<dict>` | `</dict>`, `</dict>`, `</plist>` |

use std::borrow::Cow;

use cadence_serde::xml::check_well_formed;
use cadence_serde::{clean_body, clean_text, parse_object, to_json_string_pretty};
use chrono::{DateTime, Utc};
use quick_xml::escape::escape;

use crate::config::RenderConfig;
use crate::context::{Format, RenderContext, XmlFlavor};
use crate::error::ApiResult;

const XSPF_NAMESPACE: &str = "http://xspf.org/ns/0/";

/// Opening and closing markup around a document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub header: String,
    pub footer: String,
    /// Nesting depth of the body inside the envelope, for indentation.
    pub depth: usize,
}

impl Envelope {
    /// Places `body` inside this envelope.
    pub fn wrap(&self, body: &str) -> String {
        let mut document =
            String::with_capacity(self.header.len() + body.len() + self.footer.len());
        document.push_str(&self.header);
        document.push_str(body);
        document.push_str(&self.footer);
        document
    }
}

/// Builds envelopes and assembles finished documents.
#[derive(Debug, Clone)]
pub struct DocumentAssembler<'a> {
    config: &'a RenderConfig,
    generated_at: DateTime<Utc>,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(config: &'a RenderConfig, generated_at: DateTime<Utc>) -> Self {
        Self {
            config,
            generated_at,
        }
    }

    pub fn for_context(config: &'a RenderConfig, ctx: &RenderContext) -> Self {
        Self::new(config, ctx.generated_at)
    }

    pub fn config(&self) -> &'a RenderConfig {
        self.config
    }

    fn declaration(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"{}\" ?>\n",
            escape(clean_text(&self.config.site_charset).as_ref())
        )
    }

    /// Generator banner text, safe to place inside a comment.
    fn banner(&self, text: String) -> String {
        let mut text = clean_text(&text).into_owned();
        while text.contains("--") {
            text = text.replace("--", "- -");
        }
        text
    }

    /// Returns the envelope for `flavor`. `title` only affects XSPF.
    pub fn envelope(&self, flavor: XmlFlavor, title: Option<&str>) -> Envelope {
        let site_title = clean_text(&self.config.site_title);
        match flavor {
            XmlFlavor::Root => Envelope {
                header: format!("{}<root>\n", self.declaration()),
                footer: "\n</root>\n".to_string(),
                depth: flavor.body_depth(),
            },
            XmlFlavor::Rss => {
                let banner = self.banner(format!(
                    "RSS Generated by {} v.{} on {}",
                    site_title,
                    self.config.server_version,
                    self.generated_at.to_rfc2822()
                ));
                Envelope {
                    header: format!(
                        "{}<!-- {} -->\n<rss version=\"2.0\">\n<channel>\n",
                        self.declaration(),
                        banner
                    ),
                    footer: "\n</channel>\n</rss>\n".to_string(),
                    depth: flavor.body_depth(),
                }
            }
            XmlFlavor::Xspf => {
                let title: Cow<'_, str> = match title {
                    Some(title) => clean_text(title),
                    None => Cow::Owned(format!("{} XSPF Playlist", site_title)),
                };
                let web_path = clean_text(&self.config.web_path);
                Envelope {
                    header: format!(
                        "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n\
                         <playlist version=\"1\" xmlns=\"{}\">\n  \
                         <title>{}</title>\n  \
                         <creator>{}</creator>\n  \
                         <annotation>{}</annotation>\n  \
                         <info>{}</info>\n  \
                         <trackList>\n",
                        XSPF_NAMESPACE,
                        escape(title.as_ref()),
                        escape(site_title.as_ref()),
                        escape(site_title.as_ref()),
                        escape(web_path.as_ref()),
                    ),
                    footer: "\n  </trackList>\n</playlist>\n".to_string(),
                    depth: flavor.body_depth(),
                }
            }
            XmlFlavor::Itunes => {
                let banner = self.banner(format!(
                    "XML Generated by {} v.{}",
                    site_title, self.config.server_version
                ));
                Envelope {
                    header: format!(
                        "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n\
                         <!-- {} -->\n\
                         <plist version=\"1.0\">\n\
                         <dict>\n  \
                         <key>Tracks</key>\n  \
                         <dict>\n",
                        banner
                    ),
                    footer: "\n  </dict>\n</dict>\n</plist>\n".to_string(),
                    depth: flavor.body_depth(),
                }
            }
        }
    }

    /// Wraps a body produced by the XML writer. The writer already
    /// guarantees nesting, so no reparse happens here.
    pub(crate) fn wrap_trusted(
        &self,
        body: &str,
        flavor: XmlFlavor,
        top_level: bool,
        title: Option<&str>,
    ) -> String {
        let body = clean_body(body);
        if !top_level {
            return body;
        }
        self.envelope(flavor, title).wrap(&body)
    }

    /// Assembles an arbitrary body into a finished document.
    ///
    /// Fragments (`top_level == false`) come back sanitized and otherwise
    /// untouched. Top-level XML is enveloped and checked for
    /// well-formedness; top-level JSON must be an object and is
    /// re-emitted pretty-printed, with `title` added when given.
    pub fn assemble(
        &self,
        body: &str,
        format: Format,
        top_level: bool,
        title: Option<&str>,
    ) -> ApiResult<String> {
        let body = clean_body(body);
        if !top_level {
            return Ok(body);
        }
        match format {
            Format::Xml(flavor) => {
                let document = self.envelope(flavor, title).wrap(&body);
                check_well_formed(&document)?;
                Ok(document)
            }
            Format::Json => {
                let mut object = if body.trim().is_empty() {
                    serde_json::Map::new()
                } else {
                    parse_object(&body)?
                };
                if let Some(title) = title {
                    object.insert(
                        "title".to_string(),
                        serde_json::Value::String(clean_text(title).into_owned()),
                    );
                }
                Ok(to_json_string_pretty(&object)?)
            }
        }
    }
}
