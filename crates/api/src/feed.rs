//! RSS 2.0 podcast feed for any [`LibraryItem`].

use cadence_model::{Catalog, LibraryItem, UserActivity};
use cadence_serde::clean_body;
use cadence_serde::xml::XmlStreamWriter;
use tracing::debug;

use crate::context::RenderContext;
use crate::error::ApiResult;
use crate::render::Renderer;
use crate::tracks::TrackInfo;

const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";
const ITUNES_NAMESPACE: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";

impl<L: Catalog + UserActivity> Renderer<'_, L> {
    /// Renders `item` and its playable media as a podcast feed.
    ///
    /// Media that no longer resolve, or that are not playable, are skipped.
    pub fn podcast_feed(&self, item: &dyn LibraryItem, ctx: &RenderContext) -> ApiResult<String> {
        let catalog: &dyn Catalog = self.library();
        let reference = item.item_ref();

        let mut writer = XmlStreamWriter::new();
        writer.start(
            "rss",
            &[
                ("xmlns:atom", ATOM_NAMESPACE),
                ("xmlns:itunes", ITUNES_NAMESPACE),
                ("version", "2.0"),
            ],
        )?;
        writer.start("channel", &[])?;
        writer.plain_element("title", &format!("{} Podcast", item.full_name()))?;
        if catalog.has_art(reference) {
            let art = self.urls().art(reference, ctx.auth.as_deref());
            writer.empty("itunes:image", &[("href", art.as_str())])?;
        }
        let description = item.description();
        if !description.is_empty() {
            writer.plain_element("description", &description)?;
            writer.plain_element("itunes:summary", &description)?;
        }
        writer.plain_element("generator", &self.config().site_title)?;
        writer.plain_element("itunes:category", "Music")?;
        if let Some(owner) = item.owner_id().and_then(|id| catalog.user(id)) {
            writer.start("itunes:owner", &[])?;
            writer.plain_element("itunes:name", owner.display_name())?;
            writer.end("itunes:owner")?;
        }

        let medias = item.medias(catalog);
        let mut written = 0usize;
        for media in &medias {
            let Some(entity) = catalog.find(*media) else {
                debug!(reference = %media, "Skipping missing feed item");
                continue;
            };
            let Some(track) = TrackInfo::from_entity(&entity, catalog, self.config()) else {
                debug!(reference = %media, "Skipping non-playable feed item");
                continue;
            };
            self.write_feed_item(&mut writer, &track, ctx)?;
            written += 1;
        }
        debug!(%reference, items = written, skipped = medias.len() - written, "Rendered podcast feed");

        writer.end("channel")?;
        writer.end("rss")?;
        let body = clean_body(&writer.finish()?);
        Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n{}\n", body))
    }

    fn write_feed_item(
        &self,
        writer: &mut XmlStreamWriter,
        track: &TrackInfo,
        ctx: &RenderContext,
    ) -> ApiResult<()> {
        writer.start("item", &[])?;
        writer.plain_element("title", &track.title)?;
        if !track.creator.is_empty() {
            writer.plain_element("itunes:author", &track.creator)?;
        }
        writer.plain_element("guid", &self.urls().link(track.reference))?;
        if let Some(added) = track.added {
            writer.plain_element("pubDate", &added.to_rfc2822())?;
        }
        if !track.description.is_empty() {
            writer.plain_element("description", &track.description)?;
        }
        writer.plain_element("itunes:duration", &track.duration())?;
        if !track.mime.is_empty() {
            let length = track.size.to_string();
            let url = self
                .urls()
                .play(track.reference, ctx.auth.as_deref(), ctx.user_id);
            writer.empty(
                "enclosure",
                &[
                    ("type", track.mime.as_str()),
                    ("length", length.as_str()),
                    ("url", url.as_str()),
                ],
            )?;
        }
        writer.end("item")?;
        Ok(())
    }
}
