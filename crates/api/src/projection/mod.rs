//! Entity projection.
//!
//! A [`Projector`] turns one catalog entity into a [`Record`]: the ordered,
//! format-neutral field list that both the XML and the JSON writers
//! consume. Field order per type is fixed and shared by both formats.
//!
//! Every projection reads through the [`Catalog`] and [`UserActivity`]
//! traits and never writes, so one projector can be shared across threads
//! for as long as the library it borrows.

mod album;
mod artist;
mod index;
mod media;
mod playlist;
mod podcast;
mod social;
mod song;

use cadence_model::{Catalog, Entity, EntityKind, EntityRef, Tag, UserActivity};
use cadence_serde::{Link, Record};

use crate::config::RenderConfig;
use crate::context::RenderContext;
use crate::include::{IncludeExpander, IncludeSet};
use crate::urls::UrlBuilder;

/// Element name for a kind. Smart playlists share the `playlist` element.
pub fn element_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::SmartPlaylist => "playlist",
        kind => kind.as_str(),
    }
}

/// Projects entities into records.
pub struct Projector<'a, L> {
    config: &'a RenderConfig,
    library: &'a L,
    urls: &'a UrlBuilder,
}

impl<'a, L: Catalog + UserActivity> Projector<'a, L> {
    pub fn new(config: &'a RenderConfig, library: &'a L, urls: &'a UrlBuilder) -> Self {
        Self {
            config,
            library,
            urls,
        }
    }

    pub fn library(&self) -> &'a L {
        self.library
    }

    pub fn config(&self) -> &'a RenderConfig {
        self.config
    }

    pub fn urls(&self) -> &'a UrlBuilder {
        self.urls
    }

    pub(crate) fn expander(&self) -> IncludeExpander<'_, 'a, L> {
        IncludeExpander::new(self)
    }

    /// Full projection of an entity.
    pub fn project(&self, entity: &Entity, ctx: &RenderContext, includes: &IncludeSet) -> Record {
        self.project_at(entity, 1, ctx, includes)
    }

    /// Full projection of an entity at a 1-based position in its listing.
    /// The position only shows up as a song's `playlisttrack`.
    pub fn project_at(
        &self,
        entity: &Entity,
        position: usize,
        ctx: &RenderContext,
        includes: &IncludeSet,
    ) -> Record {
        match entity {
            Entity::Artist(artist) => self.artist(artist, ctx, includes),
            Entity::Album(album) => self.album(album, ctx, includes),
            Entity::Song(song) => self.song(song, position, ctx),
            Entity::Playlist(playlist) => self.playlist(playlist, ctx, includes),
            Entity::SmartPlaylist(playlist) => self.smart_playlist(playlist, ctx, includes),
            Entity::Podcast(podcast) => self.podcast(podcast, ctx, includes),
            Entity::PodcastEpisode(episode) => self.podcast_episode(episode, ctx),
            Entity::Video(video) => self.video(video, ctx),
            Entity::Share(share) => self.share(share),
            Entity::Label(label) => self.label(label),
            Entity::LiveStream(stream) => self.live_stream(stream),
            Entity::User(user) => self.user(user),
        }
    }

    /// Art URL for `reference`, carrying the session token.
    pub(crate) fn art(&self, reference: EntityRef, ctx: &RenderContext) -> String {
        self.urls.art(reference, ctx.auth.as_deref())
    }

    /// Appends `flag`, `preciserating`, `rating` and `averagerating`.
    pub(crate) fn personal(&self, record: Record, reference: EntityRef, ctx: &RenderContext) -> Record {
        let (flagged, rating) = match ctx.user_id {
            Some(user) => (
                self.library.is_flagged(reference, user),
                self.library.user_rating(reference, user),
            ),
            None => (false, None),
        };
        let rating = rating.map(i64::from);
        record
            .integer("flag", i64::from(flagged))
            .optional_integer("preciserating", rating)
            .optional_integer("rating", rating)
            .decimal("averagerating", self.library.average_rating(reference))
    }

    /// Appends one genre link per distinct tag id, in first-seen order.
    pub(crate) fn genres(&self, record: Record, tags: &[Tag], ctx: &RenderContext) -> Record {
        let mut seen = Vec::with_capacity(tags.len());
        let links = tags
            .iter()
            .filter(|tag| {
                if seen.contains(&tag.id) {
                    false
                } else {
                    seen.push(tag.id);
                    true
                }
            })
            .map(|tag| Link::new(tag.id, tag.name.as_str()))
            .collect();
        record.links(ctx.api_version.genre_element(), links)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::context::{ApiVersion, Format};
    use cadence_model::MemoryLibrary;
    use cadence_serde::Value;

    pub(crate) fn fixture() -> (RenderConfig, UrlBuilder) {
        let config = RenderConfig::for_testing();
        let urls = UrlBuilder::new(&config.web_path).unwrap();
        (config, urls)
    }

    #[test]
    fn test_genres_dedup_by_tag_id() {
        let (config, urls) = fixture();
        let library = MemoryLibrary::new();
        let projector = Projector::new(&config, &library, &urls);
        let tags = [Tag::new(1, "IDM"), Tag::new(2, "Ambient"), Tag::new(1, "IDM")];

        let record = projector.genres(Record::new("song"), &tags, &RenderContext::default());
        let Some(Value::Links(links)) = record.get("genre") else {
            panic!("expected genre links");
        };
        assert_eq!(links.len(), 2);
        assert_eq!(links[1], Link::new(2, "Ambient"));
    }

    #[test]
    fn test_genre_element_follows_api_version() {
        let (config, urls) = fixture();
        let library = MemoryLibrary::new();
        let projector = Projector::new(&config, &library, &urls);
        let ctx = RenderContext::new(Format::Json).with_api_version(ApiVersion::V4);

        let record = projector.genres(Record::new("song"), &[Tag::new(3, "Dub")], &ctx);
        assert!(record.get("tag").is_some());
        assert!(record.get("genre").is_none());
    }

    #[test]
    fn test_personal_fields_without_user() {
        let (config, urls) = fixture();
        let mut library = MemoryLibrary::new();
        let reference = EntityRef::new(EntityKind::Song, 1);
        library.rate(reference, 7, 4);
        let projector = Projector::new(&config, &library, &urls);

        let record = projector.personal(Record::new("song"), reference, &RenderContext::default());
        assert_eq!(record.get("flag"), Some(&Value::Integer(0)));
        assert_eq!(record.get("rating"), Some(&Value::Null));
        assert_eq!(record.get("averagerating"), Some(&Value::Decimal(4.0)));
    }

    #[test]
    fn test_element_name() {
        assert_eq!(element_name(EntityKind::SmartPlaylist), "playlist");
        assert_eq!(element_name(EntityKind::LiveStream), "live_stream");
    }
}
