//! Art, play and web links rooted at the configured web path.

use cadence_model::EntityRef;
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Builds absolute URLs below the server's web path.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: Url,
}

impl UrlBuilder {
    pub fn new(web_path: &str) -> ApiResult<Self> {
        let base = Url::parse(web_path)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "web path '{}' cannot be used as a base URL",
                web_path
            )));
        }
        Ok(Self { base })
    }

    /// The web path exactly as it is used for links.
    pub fn web_path(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Image URL for the art of `reference`.
    pub fn art(&self, reference: EntityRef, auth: Option<&str>) -> String {
        let mut url = self.endpoint(&["image.php"]);
        url.query_pairs_mut()
            .append_pair("object_id", &reference.id.to_string())
            .append_pair("object_type", reference.kind.as_str())
            .append_pair("auth", auth.unwrap_or_default());
        url.into()
    }

    /// Streaming URL for a playable object.
    pub fn play(&self, reference: EntityRef, auth: Option<&str>, user_id: Option<u64>) -> String {
        let mut url = self.endpoint(&["play", "index.php"]);
        url.query_pairs_mut()
            .append_pair("ssid", auth.unwrap_or_default())
            .append_pair("type", reference.kind.as_str())
            .append_pair("oid", &reference.id.to_string())
            .append_pair("uid", &user_id.map(|id| id.to_string()).unwrap_or_default())
            .append_pair("player", "api");
        url.into()
    }

    /// Web page for an object, used as a stable guid in feeds.
    pub fn link(&self, reference: EntityRef) -> String {
        let page = format!("{}.php", reference.kind.as_str());
        let mut url = self.endpoint(&[page.as_str()]);
        url.query_pairs_mut()
            .append_pair("action", "show")
            .append_pair(&format!("{}_id", reference.kind.as_str()), &reference.id.to_string());
        url.into()
    }
}
