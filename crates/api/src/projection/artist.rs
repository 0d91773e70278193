use cadence_model::{Artist, Catalog, EntityKind, EntityRef, UserActivity};
use cadence_serde::Record;

use super::Projector;
use crate::context::RenderContext;
use crate::include::{IncludeSet, Parent};

impl<L: Catalog + UserActivity> Projector<'_, L> {
    /// `artist`: name, genres, albums, albumcount, songs, songcount, art,
    /// ratings, mbid, summary, time, yearformed, placeformed.
    ///
    /// The `albums` and `songs` containers are always present and only
    /// filled when the matching include was requested.
    pub fn artist(&self, artist: &Artist, ctx: &RenderContext, includes: &IncludeSet) -> Record {
        let reference = EntityRef::new(EntityKind::Artist, artist.id);
        let mut containers = self
            .expander()
            .expand(Parent::Artist(artist.id), ctx, includes);

        let record = Record::new("artist")
            .with_id(artist.id)
            .text("name", &artist.name);
        let record = self
            .genres(record, &artist.tags, ctx)
            .optional_field("albums", containers.take("albums"))
            .integer("albumcount", artist.album_count)
            .optional_field("songs", containers.take("songs"))
            .integer("songcount", artist.song_count)
            .text("art", self.art(reference, ctx));
        self.personal(record, reference, ctx)
            .text("mbid", &artist.mbid)
            .text("summary", &artist.summary)
            .integer("time", artist.time)
            .integer("yearformed", artist.year_formed)
            .text("placeformed", &artist.place_formed)
    }
}
