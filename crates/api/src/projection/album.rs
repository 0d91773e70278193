use cadence_model::{Album, Catalog, EntityKind, EntityRef, UserActivity};
use cadence_serde::Record;

use super::Projector;
use crate::context::RenderContext;
use crate::include::{IncludeSet, Parent};

impl<L: Catalog + UserActivity> Projector<'_, L> {
    /// `album`: name, artist, time, year, tracks, songcount, diskcount,
    /// type, genres, art, ratings, mbid.
    pub fn album(&self, album: &Album, ctx: &RenderContext, includes: &IncludeSet) -> Record {
        let reference = EntityRef::new(EntityKind::Album, album.id);
        let mut containers = self.expander().expand(Parent::Album(album.id), ctx, includes);

        let record = Record::new("album")
            .with_id(album.id)
            .text("name", &album.name);
        let record = album_artist(record, album)
            .integer("time", album.total_duration)
            .integer("year", album.year)
            .optional_field("tracks", containers.take("tracks"))
            .integer("songcount", album.song_count)
            .integer("diskcount", self.disk_count(album))
            .text("type", &album.release_type);
        let record = self
            .genres(record, &album.tags, ctx)
            .text("art", self.art(reference, ctx));
        self.personal(record, reference, ctx)
            .text("mbid", &album.mbid)
    }

    fn disk_count(&self, album: &Album) -> u32 {
        if self.config.allow_group_disks && album.suite_size > 1 {
            album.suite_size
        } else {
            album.disk
        }
    }
}

/// Credits the album artist when known, `Various` (id 0) for multi-artist
/// albums, and the single artist otherwise.
pub(super) fn album_artist(record: Record, album: &Album) -> Record {
    if !album.album_artist_name.is_empty() {
        let id = album.album_artist.unwrap_or(album.artist_id);
        record.link("artist", id, album.album_artist_name.as_str())
    } else if album.artist_count != 1 {
        record.link("artist", 0, "Various")
    } else {
        record.link("artist", album.artist_id, album.artist_name.as_str())
    }
}
