use cadence_model::{Catalog, EntityKind, EntityRef, Song, UserActivity};
use cadence_serde::{Record, Value};
use cadence_serde::xml::utils::normalize_name;

use super::Projector;
use crate::context::RenderContext;

impl<L: Catalog + UserActivity> Projector<'_, L> {
    /// `song` at 1-based `position` in its listing.
    ///
    /// Custom metadata is appended last, one field per entry, with names
    /// normalized to legal element names. Colliding names are all kept.
    pub fn song(&self, song: &Song, position: usize, ctx: &RenderContext) -> Record {
        let reference = EntityRef::new(EntityKind::Song, song.id);

        let record = Record::new("song")
            .with_id(song.id)
            .text("title", &song.title)
            .text("name", &song.title)
            .link("artist", song.artist, song.artist_name.as_str())
            .link("album", song.album, song.album_name.as_str())
            .link("albumartist", song.album_artist, song.album_artist_name.as_str())
            .integer("disk", song.disk)
            .integer("track", song.track);
        let record = self
            .genres(record, &song.tags, ctx)
            .text("filename", &song.file)
            .unsigned("playlisttrack", position as u64)
            .integer("time", song.time)
            .integer("year", song.year)
            .integer("bitrate", song.bitrate)
            .integer("rate", song.rate)
            .text("mode", &song.mode)
            .text("mime", &song.mime)
            .text("url", self.urls.play(reference, ctx.auth.as_deref(), ctx.user_id))
            .unsigned("size", song.size)
            .text("mbid", &song.mbid)
            .text("album_mbid", &song.album_mbid)
            .text("artist_mbid", &song.artist_mbid)
            .text("albumartist_mbid", &song.albumartist_mbid)
            .text("art", self.art(self.song_art(song), ctx));
        let mut record = self
            .personal(record, reference, ctx)
            .unsigned("playcount", song.play_count)
            .unsigned("catalog", song.catalog)
            .text("composer", &song.composer)
            .optional_integer("channels", song.channels.map(i64::from))
            .text("comment", &song.comment)
            .text("license", &song.license)
            .text("publisher", &song.publisher)
            .text("language", &song.language)
            .decimal("replaygain_album_gain", song.replaygain_album_gain)
            .decimal("replaygain_album_peak", song.replaygain_album_peak)
            .decimal("replaygain_track_gain", song.replaygain_track_gain)
            .decimal("replaygain_track_peak", song.replaygain_track_peak)
            .optional_integer("r128_album_gain", song.r128_album_gain.map(i64::from))
            .optional_integer("r128_track_gain", song.r128_track_gain.map(i64::from));

        if self.config.custom_metadata {
            for entry in &song.metadata {
                record.push(normalize_name(&entry.field), Value::Text(entry.data.clone()));
            }
        }
        record
    }

    /// `song` as an entry of the democratic play queue: a short song
    /// record closed by the number of votes it holds.
    pub fn democratic_song(&self, song: &Song, ctx: &RenderContext) -> Record {
        let reference = EntityRef::new(EntityKind::Song, song.id);
        let record = Record::new("song")
            .with_id(song.id)
            .text("title", &song.title)
            .text("name", &song.title)
            .link("artist", song.artist, song.artist_name.as_str())
            .link("album", song.album, song.album_name.as_str());
        let record = self
            .genres(record, &song.tags, ctx)
            .integer("track", song.track)
            .integer("time", song.time)
            .text("mime", &song.mime)
            .text("url", self.urls.play(reference, ctx.auth.as_deref(), ctx.user_id))
            .unsigned("size", song.size)
            .text("art", self.art(self.song_art(song), ctx));
        self.personal(record, reference, ctx)
            .unsigned("vote", self.library.votes(reference))
    }

    /// Songs show album art unless per-song art is enabled.
    pub(crate) fn song_art(&self, song: &Song) -> EntityRef {
        if self.config.show_song_art {
            EntityRef::new(EntityKind::Song, song.id)
        } else {
            EntityRef::new(EntityKind::Album, song.album)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::fixture;
    use cadence_model::{CustomMetadata, MemoryLibrary};

    fn song() -> Song {
        Song {
            id: 101,
            title: "Music Is Math".into(),
            artist: 1,
            artist_name: "Boards of Canada".into(),
            album: 10,
            album_name: "Geogaddi".into(),
            track: 3,
            metadata: vec![
                CustomMetadata {
                    field: "Recording Location".into(),
                    data: "Pentland".into(),
                },
                CustomMetadata {
                    field: "Recording/Location".into(),
                    data: "Leith".into(),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_custom_metadata_appended_last() {
        let (config, urls) = fixture();
        let library = MemoryLibrary::new();
        let projector = Projector::new(&config, &library, &urls);

        let record = projector.song(&song(), 1, &RenderContext::default());
        let tail: Vec<_> = record.fields.iter().rev().take(3).map(|f| f.name.as_str()).collect();
        assert_eq!(tail, ["Recording_Location", "Recording_Location", "r128_track_gain"]);
        let values: Vec<_> = record
            .get_all("Recording_Location")
            .filter_map(Value::as_text)
            .collect();
        assert_eq!(values, ["Pentland", "Leith"]);
    }

    #[test]
    fn test_custom_metadata_names_outside_xml_ranges() {
        let (config, urls) = fixture();
        let library = MemoryLibrary::new();
        let projector = Projector::new(&config, &library, &urls);
        let song = Song {
            metadata: vec![
                CustomMetadata {
                    field: "BPM\u{B2}".into(),
                    data: "120".into(),
                },
                CustomMetadata {
                    field: "\u{345}x".into(),
                    data: "1".into(),
                },
            ],
            ..song()
        };

        let record = projector.song(&song, 1, &RenderContext::default());
        assert_eq!(record.get("BPM_").and_then(Value::as_text), Some("120"));
        assert_eq!(record.get("_\u{345}x").and_then(Value::as_text), Some("1"));
    }

    #[test]
    fn test_democratic_song_ends_with_votes() {
        let (config, urls) = fixture();
        let mut library = MemoryLibrary::new();
        let reference = EntityRef::new(EntityKind::Song, 101);
        library.set_votes(reference, 3);
        library.rate(reference, 7, 4);
        let projector = Projector::new(&config, &library, &urls);
        let ctx = RenderContext::default().with_user(7).with_auth("tok");

        let record = projector.democratic_song(&song(), &ctx);
        let names: Vec<_> = record.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "title", "name", "artist", "album", "genre", "track", "time", "mime", "url", "size",
                "art", "flag", "preciserating", "rating", "averagerating", "vote",
            ]
        );
        assert_eq!(record.get("vote"), Some(&Value::Integer(3)));
        assert_eq!(record.get("rating"), Some(&Value::Integer(4)));
        assert_eq!(
            record.get("url").and_then(Value::as_text),
            Some("http://music.test/play/index.php?ssid=tok&type=song&oid=101&uid=7&player=api")
        );
    }

    #[test]
    fn test_custom_metadata_can_be_disabled() {
        let (mut config, urls) = fixture();
        config.custom_metadata = false;
        let library = MemoryLibrary::new();
        let projector = Projector::new(&config, &library, &urls);

        let record = projector.song(&song(), 1, &RenderContext::default());
        assert!(record.get("Recording_Location").is_none());
    }

    #[test]
    fn test_song_art_follows_config() {
        let (mut config, urls) = fixture();
        let library = MemoryLibrary::new();
        let ctx = RenderContext::default().with_auth("tok");

        let record = Projector::new(&config, &library, &urls).song(&song(), 1, &ctx);
        assert_eq!(
            record.get("art").and_then(Value::as_text),
            Some("http://music.test/image.php?object_id=10&object_type=album&auth=tok")
        );

        config.show_song_art = true;
        let record = Projector::new(&config, &library, &urls).song(&song(), 1, &ctx);
        assert_eq!(
            record.get("art").and_then(Value::as_text),
            Some("http://music.test/image.php?object_id=101&object_type=song&auth=tok")
        );
    }

    #[test]
    fn test_playlisttrack_is_position() {
        let (config, urls) = fixture();
        let library = MemoryLibrary::new();
        let projector = Projector::new(&config, &library, &urls);

        let record = projector.song(&song(), 4, &RenderContext::default());
        assert_eq!(record.get("playlisttrack"), Some(&Value::Integer(4)));
        assert_eq!(record.get("track"), Some(&Value::Integer(3)));
    }
}
