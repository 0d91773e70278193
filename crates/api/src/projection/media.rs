use cadence_model::{Catalog, EntityKind, EntityRef, LiveStream, UserActivity, Video};
use cadence_serde::Record;

use super::Projector;
use crate::context::RenderContext;

impl<L: Catalog + UserActivity> Projector<'_, L> {
    /// `video`: title, name, mime, resolution, size, genres, time, url, art
    /// and ratings.
    pub fn video(&self, video: &Video, ctx: &RenderContext) -> Record {
        let reference = EntityRef::new(EntityKind::Video, video.id);
        let record = Record::new("video")
            .with_id(video.id)
            .text("title", &video.title)
            .text("name", &video.title)
            .text("mime", &video.mime)
            .text("resolution", &video.resolution)
            .unsigned("size", video.size);
        let record = self
            .genres(record, &video.tags, ctx)
            .integer("time", video.time)
            .text("url", self.urls.play(reference, ctx.auth.as_deref(), ctx.user_id))
            .text("art", self.art(reference, ctx));
        self.personal(record, reference, ctx)
    }

    pub fn live_stream(&self, stream: &LiveStream) -> Record {
        Record::new("live_stream")
            .with_id(stream.id)
            .text("name", &stream.name)
            .text("url", &stream.url)
            .text("codec", &stream.codec)
    }
}
