use cadence_model::{Catalog, EntityKind, EntityRef, Podcast, PodcastEpisode, UserActivity};
use cadence_serde::Record;

use super::Projector;
use crate::context::RenderContext;
use crate::include::{IncludeSet, Parent};

impl<L: Catalog + UserActivity> Projector<'_, L> {
    /// Podcast channel fields shared by the full and index projections.
    pub(super) fn podcast_fields(&self, podcast: &Podcast, ctx: &RenderContext) -> Record {
        Record::new("podcast")
            .with_id(podcast.id)
            .text("name", &podcast.title)
            .text("description", &podcast.description)
            .text("language", &podcast.language)
            .text("copyright", &podcast.copyright)
            .text("feed_url", &podcast.feed_url)
            .text("generator", &podcast.generator)
            .text("website", &podcast.website)
            .text("build_date", &podcast.build_date)
            .text("sync_date", &podcast.sync_date)
            .text("public_url", &podcast.public_url)
            .text("art", self.art(EntityRef::new(EntityKind::Podcast, podcast.id), ctx))
    }

    /// `podcast`, with an `episodes` container only when requested.
    pub fn podcast(&self, podcast: &Podcast, ctx: &RenderContext, includes: &IncludeSet) -> Record {
        let reference = EntityRef::new(EntityKind::Podcast, podcast.id);
        let mut containers = self
            .expander()
            .expand(Parent::Podcast(&podcast.episodes), ctx, includes);
        self.personal(self.podcast_fields(podcast, ctx), reference, ctx)
            .optional_field("episodes", containers.take("episodes"))
    }

    /// `podcast_episode`. Art is the parent podcast's.
    pub fn podcast_episode(&self, episode: &PodcastEpisode, ctx: &RenderContext) -> Record {
        let reference = EntityRef::new(EntityKind::PodcastEpisode, episode.id);
        let record = Record::new("podcast_episode")
            .with_id(episode.id)
            .text("title", &episode.title)
            .text("name", &episode.title)
            .text("description", &episode.description)
            .text("category", &episode.category)
            .text("author", &episode.author)
            .text("author_full", &episode.author_full)
            .text("website", &episode.website)
            .text("pubdate", &episode.pubdate)
            .text("state", &episode.state)
            .text("filelength", &episode.filelength)
            .text("filesize", &episode.filesize)
            .text("filename", &episode.filename)
            .text("mime", &episode.mime)
            .text("public_url", &episode.public_url)
            .text("url", self.urls.play(reference, ctx.auth.as_deref(), ctx.user_id))
            .unsigned("catalog", episode.catalog)
            .text(
                "art",
                self.art(EntityRef::new(EntityKind::Podcast, episode.podcast), ctx),
            );
        self.personal(record, reference, ctx)
            .integer("played", i64::from(episode.played))
    }
}
