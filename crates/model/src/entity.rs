//! Catalog entities as handed to the renderer.
//!
//! Every struct here is a fully loaded, already formatted view of a catalog
//! row. The renderer selects and orders these fields; it never recomputes them.

use serde::{Deserialize, Serialize};

use crate::kind::{EntityKind, EntityRef};

/// A genre tag attached to an artist, album, song or video.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

impl Tag {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Artist {
    pub id: u64,
    /// Full display name, prefix included.
    pub name: String,
    pub tags: Vec<Tag>,
    pub album_count: u32,
    pub song_count: u32,
    pub mbid: String,
    pub summary: String,
    /// Total play time in seconds.
    pub time: u32,
    pub year_formed: u32,
    pub place_formed: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Album {
    pub id: u64,
    pub name: String,
    /// Album artist id; `None` when the album has no explicit album artist.
    pub album_artist: Option<u64>,
    pub album_artist_name: String,
    /// Artist of the album's tracks when they share a single artist.
    pub artist_id: u64,
    pub artist_name: String,
    /// Number of distinct track artists.
    pub artist_count: u32,
    /// Sum of track durations in seconds.
    pub total_duration: u32,
    pub year: u32,
    pub song_count: u32,
    pub disk: u32,
    /// Number of disks in the album suite this album belongs to.
    pub suite_size: u32,
    pub release_type: String,
    pub tags: Vec<Tag>,
    pub mbid: String,
    pub description: String,
}

/// User-defined metadata attached to a song.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomMetadata {
    /// The metadata field's display name, e.g. `"Recording Location"`.
    pub field: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Song {
    pub id: u64,
    pub title: String,
    pub artist: u64,
    pub artist_name: String,
    pub album: u64,
    pub album_name: String,
    pub album_artist: u64,
    pub album_artist_name: String,
    pub disk: u32,
    pub track: u32,
    pub tags: Vec<Tag>,
    pub file: String,
    /// Duration in seconds.
    pub time: u32,
    pub year: u32,
    pub bitrate: u32,
    pub rate: u32,
    pub mode: String,
    pub mime: String,
    pub size: u64,
    pub mbid: String,
    pub album_mbid: String,
    pub artist_mbid: String,
    pub albumartist_mbid: String,
    pub play_count: u64,
    pub catalog: u64,
    pub composer: String,
    pub channels: Option<u32>,
    pub comment: String,
    pub license: String,
    pub publisher: String,
    pub language: String,
    pub replaygain_album_gain: Option<f64>,
    pub replaygain_album_peak: Option<f64>,
    pub replaygain_track_gain: Option<f64>,
    pub replaygain_track_peak: Option<f64>,
    pub r128_album_gain: Option<i32>,
    pub r128_track_gain: Option<i32>,
    pub metadata: Vec<CustomMetadata>,
    /// Unix timestamp of when the file was added to the catalog.
    pub addition_time: Option<i64>,
}

/// An item stored in a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub object_type: EntityKind,
    pub object_id: u64,
}

impl PlaylistItem {
    pub fn song(id: u64) -> Self {
        Self {
            object_type: EntityKind::Song,
            object_id: id,
        }
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.object_type, self.object_id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Playlist {
    pub id: u64,
    pub name: String,
    /// Owner's display name.
    pub owner: String,
    pub owner_id: Option<u64>,
    /// `public` or `private`.
    pub kind: String,
    pub items: Vec<PlaylistItem>,
}

impl Playlist {
    /// Number of songs in the playlist; other media types are not counted.
    pub fn song_count(&self) -> u64 {
        self.items
            .iter()
            .filter(|item| item.object_type == EntityKind::Song)
            .count() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartPlaylist {
    pub id: u64,
    pub name: String,
    pub owner: String,
    pub owner_id: Option<u64>,
    pub kind: String,
    /// Declared result limit; 0 means the query is unbounded.
    pub limit: u32,
    /// Result count cached from the last evaluation; 0 when never evaluated.
    pub last_count: u32,
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Podcast {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub language: String,
    pub copyright: String,
    pub feed_url: String,
    pub generator: String,
    pub website: String,
    pub build_date: String,
    pub sync_date: String,
    pub public_url: String,
    pub owner_id: Option<u64>,
    pub episodes: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PodcastEpisode {
    pub id: u64,
    pub podcast: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub author: String,
    pub author_full: String,
    pub website: String,
    pub pubdate: String,
    pub state: String,
    /// Human readable duration, e.g. `"01:02:03"`.
    pub filelength: String,
    /// Human readable size, e.g. `"12.3 MB"`.
    pub filesize: String,
    pub filename: String,
    pub mime: String,
    pub public_url: String,
    pub catalog: u64,
    pub played: bool,
    pub time: u32,
    pub size: u64,
    pub addition_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    pub id: u64,
    pub title: String,
    pub mime: String,
    pub resolution: String,
    pub size: u64,
    pub tags: Vec<Tag>,
    pub time: u32,
    pub addition_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Share {
    pub id: u64,
    pub object_name: String,
    pub user_name: String,
    pub allow_stream: bool,
    pub allow_download: bool,
    pub creation_date: String,
    pub lastvisit_date: String,
    pub object_type: String,
    pub object_id: u64,
    pub expire_days: u32,
    pub max_counter: u32,
    pub counter: u32,
    pub secret: String,
    pub public_url: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub id: u64,
    pub name: String,
    pub artist_count: u32,
    pub summary: String,
    pub link: String,
    pub address: String,
    pub category: String,
    pub email: String,
    pub website: String,
    pub user: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveStream {
    pub id: u64,
    pub name: String,
    pub url: String,
    pub codec: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub fullname: String,
}

impl User {
    /// Full name when set, otherwise the login name.
    pub fn display_name(&self) -> &str {
        if self.fullname.is_empty() {
            &self.username
        } else {
            &self.fullname
        }
    }
}

/// Tagged union over every serializable entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Artist(Artist),
    Album(Album),
    Song(Song),
    Playlist(Playlist),
    SmartPlaylist(SmartPlaylist),
    Podcast(Podcast),
    PodcastEpisode(PodcastEpisode),
    Video(Video),
    Share(Share),
    Label(Label),
    LiveStream(LiveStream),
    User(User),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Artist(_) => EntityKind::Artist,
            Entity::Album(_) => EntityKind::Album,
            Entity::Song(_) => EntityKind::Song,
            Entity::Playlist(_) => EntityKind::Playlist,
            Entity::SmartPlaylist(_) => EntityKind::SmartPlaylist,
            Entity::Podcast(_) => EntityKind::Podcast,
            Entity::PodcastEpisode(_) => EntityKind::PodcastEpisode,
            Entity::Video(_) => EntityKind::Video,
            Entity::Share(_) => EntityKind::Share,
            Entity::Label(_) => EntityKind::Label,
            Entity::LiveStream(_) => EntityKind::LiveStream,
            Entity::User(_) => EntityKind::User,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Entity::Artist(e) => e.id,
            Entity::Album(e) => e.id,
            Entity::Song(e) => e.id,
            Entity::Playlist(e) => e.id,
            Entity::SmartPlaylist(e) => e.id,
            Entity::Podcast(e) => e.id,
            Entity::PodcastEpisode(e) => e.id,
            Entity::Video(e) => e.id,
            Entity::Share(e) => e.id,
            Entity::Label(e) => e.id,
            Entity::LiveStream(e) => e.id,
            Entity::User(e) => e.id,
        }
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.kind(), self.id())
    }
}

macro_rules! impl_from_entity {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Entity {
                fn from(value: $variant) -> Self {
                    Entity::$variant(value)
                }
            }
        )*
    };
}

impl_from_entity!(
    Artist,
    Album,
    Song,
    Playlist,
    SmartPlaylist,
    Podcast,
    PodcastEpisode,
    Video,
    Share,
    Label,
    LiveStream,
    User,
);
