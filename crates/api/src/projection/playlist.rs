use cadence_model::{Catalog, EntityKind, EntityRef, Playlist, SmartPlaylist, UserActivity};
use cadence_serde::Record;

use super::Projector;
use crate::context::RenderContext;
use crate::include::{IncludeSet, Parent};

/// Item count reported for a smart playlist with neither a limit nor a
/// previous result count.
pub const SMART_PLAYLIST_DEFAULT_ITEMS: u32 = 5000;

/// Owner shown for a smart playlist: its type when public, else the owner.
pub(super) fn smart_owner(playlist: &SmartPlaylist) -> &str {
    if playlist.kind == "public" {
        &playlist.kind
    } else {
        &playlist.owner
    }
}

/// Item count for a smart playlist: the limit, else the last result count,
/// else [`SMART_PLAYLIST_DEFAULT_ITEMS`].
pub(super) fn smart_items(playlist: &SmartPlaylist) -> u32 {
    if playlist.limit > 0 {
        playlist.limit
    } else if playlist.last_count > 0 {
        playlist.last_count
    } else {
        SMART_PLAYLIST_DEFAULT_ITEMS
    }
}

impl<L: Catalog + UserActivity> Projector<'_, L> {
    /// `playlist`: name, owner, items, type, art, ratings, then `tracks`
    /// when requested.
    pub fn playlist(&self, playlist: &Playlist, ctx: &RenderContext, includes: &IncludeSet) -> Record {
        let reference = EntityRef::new(EntityKind::Playlist, playlist.id);
        let record = Record::new("playlist")
            .with_id(reference.wire_id())
            .text("name", &playlist.name)
            .text("owner", &playlist.owner)
            .unsigned("items", playlist.song_count())
            .text("type", &playlist.kind)
            .text("art", self.art(reference, ctx));
        let mut containers = self
            .expander()
            .expand(Parent::Playlist(&playlist.items), ctx, includes);
        self.personal(record, reference, ctx)
            .optional_field("tracks", containers.take("tracks"))
    }

    /// Smart playlists share the `playlist` shape, with a `smart_` id and
    /// ratings stored under the `search` type.
    pub fn smart_playlist(
        &self,
        playlist: &SmartPlaylist,
        ctx: &RenderContext,
        includes: &IncludeSet,
    ) -> Record {
        let reference = EntityRef::new(EntityKind::SmartPlaylist, playlist.id);
        let record = Record::new("playlist")
            .with_id(reference.wire_id())
            .text("name", &playlist.name)
            .text("owner", smart_owner(playlist))
            .integer("items", smart_items(playlist))
            .text("type", &playlist.kind)
            .text("art", self.art(reference, ctx));
        let mut containers = self
            .expander()
            .expand(Parent::Playlist(&playlist.items), ctx, includes);
        self.personal(record, reference, ctx)
            .optional_field("tracks", containers.take("tracks"))
    }
}
