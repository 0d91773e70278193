//! Compact index projections for browsing.

use cadence_model::{
    Album, Artist, Catalog, Entity, EntityKind, Playlist, PlaylistItem, Podcast, Song, UserActivity,
};
use cadence_serde::{Link, Record};

use super::album::album_artist;
use super::playlist::{smart_items, smart_owner};
use super::Projector;
use crate::context::RenderContext;
use crate::include::{IncludeSet, Parent};

impl<L: Catalog + UserActivity> Projector<'_, L> {
    /// Compact projection of an entity.
    ///
    /// Artists and albums fall back to the full projection when any include
    /// was requested. Types without a compact form use the full one.
    pub fn project_index(&self, entity: &Entity, ctx: &RenderContext, includes: &IncludeSet) -> Record {
        match entity {
            Entity::Artist(artist) if includes.is_empty() => self.artist_index(artist),
            Entity::Album(album) if includes.is_empty() => self.album_index(album),
            Entity::Song(song) => song_index(song),
            Entity::Playlist(playlist) => self.playlist_index(playlist, ctx, includes),
            Entity::SmartPlaylist(playlist) => {
                let record = Record::new("playlist")
                    .with_id(entity.entity_ref().wire_id())
                    .text("name", &playlist.name)
                    .integer("items", smart_items(playlist))
                    .text("owner", smart_owner(playlist))
                    .text("type", &playlist.kind);
                self.playlist_containers(record, &playlist.items, ctx, includes)
            }
            Entity::Podcast(podcast) => self.podcast_index(podcast, ctx, includes),
            Entity::LiveStream(stream) => self.live_stream(stream),
            other => self.project(other, ctx, includes),
        }
    }

    fn artist_index(&self, artist: &Artist) -> Record {
        let albums = self
            .library
            .albums_by_artist(artist.id)
            .into_iter()
            .filter_map(|id| self.library.album(id))
            .map(|album| Link::new(album.id, album.name))
            .collect();
        Record::new("artist")
            .with_id(artist.id)
            .text("name", &artist.name)
            .links("album", albums)
    }

    fn album_index(&self, album: &Album) -> Record {
        let record = Record::new("album")
            .with_id(album.id)
            .text("name", &album.name);
        album_artist(record, album)
    }

    fn playlist_containers(
        &self,
        record: Record,
        items: &[PlaylistItem],
        ctx: &RenderContext,
        includes: &IncludeSet,
    ) -> Record {
        let mut containers = self.expander().expand(Parent::Playlist(items), ctx, includes);
        record.optional_field("tracks", containers.take("tracks"))
    }

    fn playlist_index(&self, playlist: &Playlist, ctx: &RenderContext, includes: &IncludeSet) -> Record {
        let record = Record::new("playlist")
            .with_id(playlist.id)
            .text("name", &playlist.name)
            .unsigned("items", playlist.song_count())
            .text("owner", &playlist.owner)
            .text("type", &playlist.kind);
        self.playlist_containers(record, &playlist.items, ctx, includes)
    }

    fn podcast_index(&self, podcast: &Podcast, ctx: &RenderContext, includes: &IncludeSet) -> Record {
        let mut containers = self
            .expander()
            .expand(Parent::Podcast(&podcast.episodes), ctx, includes);
        self.podcast_fields(podcast, ctx)
            .optional_field("episodes", containers.take("episodes"))
    }
}

fn song_index(song: &Song) -> Record {
    Record::new(EntityKind::Song.as_str())
        .with_id(song.id)
        .text("title", &song.title)
        .text("name", &song.title)
        .link("artist", song.artist, song.artist_name.as_str())
        .link("album", song.album, song.album_name.as_str())
        .link("albumartist", song.album_artist, song.album_artist_name.as_str())
        .integer("disk", song.disk)
        .integer("track", song.track)
}
