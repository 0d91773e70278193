//! Entity kinds and type-tagged identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The closed set of object types the renderer knows how to serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Artist,
    Album,
    Song,
    Playlist,
    /// Query-defined playlist. Its wire and rating namespace is `search`.
    #[serde(rename = "search")]
    SmartPlaylist,
    Podcast,
    PodcastEpisode,
    Video,
    Share,
    Label,
    LiveStream,
    User,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [EntityKind; 12] = [
        EntityKind::Artist,
        EntityKind::Album,
        EntityKind::Song,
        EntityKind::Playlist,
        EntityKind::SmartPlaylist,
        EntityKind::Podcast,
        EntityKind::PodcastEpisode,
        EntityKind::Video,
        EntityKind::Share,
        EntityKind::Label,
        EntityKind::LiveStream,
        EntityKind::User,
    ];

    /// Returns the object type name used on the wire and by the rating/art services.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Artist => "artist",
            EntityKind::Album => "album",
            EntityKind::Song => "song",
            EntityKind::Playlist => "playlist",
            EntityKind::SmartPlaylist => "search",
            EntityKind::Podcast => "podcast",
            EntityKind::PodcastEpisode => "podcast_episode",
            EntityKind::Video => "video",
            EntityKind::Share => "share",
            EntityKind::Label => "label",
            EntityKind::LiveStream => "live_stream",
            EntityKind::User => "user",
        }
    }

    /// Returns true for kinds that carry a playable media file.
    pub fn is_media(&self) -> bool {
        matches!(
            self,
            EntityKind::Song | EntityKind::Video | EntityKind::PodcastEpisode
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "artist" => EntityKind::Artist,
            "album" => EntityKind::Album,
            "song" => EntityKind::Song,
            "playlist" => EntityKind::Playlist,
            "search" | "smartplaylist" | "smart_playlist" => EntityKind::SmartPlaylist,
            "podcast" => EntityKind::Podcast,
            "podcast_episode" => EntityKind::PodcastEpisode,
            "video" => EntityKind::Video,
            "share" => EntityKind::Share,
            "label" => EntityKind::Label,
            "live_stream" => EntityKind::LiveStream,
            "user" => EntityKind::User,
            _ => {
                return Err(ModelError::UnknownKind {
                    name: s.to_string(),
                });
            }
        };
        Ok(kind)
    }
}

/// A type-tagged identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: u64,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: u64) -> Self {
        Self { kind, id }
    }

    /// Returns the id as it appears in `id="..."` attributes.
    ///
    /// Smart playlists keep their `smart_<n>` form so clients can tell them apart.
    pub fn wire_id(&self) -> String {
        match self.kind {
            EntityKind::SmartPlaylist => PlaylistRef::Smart(self.id).to_string(),
            _ => self.id.to_string(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.wire_id())
    }
}

/// Reference to either a stored playlist or a query-defined smart playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistRef {
    Real(u64),
    Smart(u64),
}

impl PlaylistRef {
    /// Returns the collaborator-lookup form of this reference.
    pub fn entity_ref(&self) -> EntityRef {
        match *self {
            PlaylistRef::Real(id) => EntityRef::new(EntityKind::Playlist, id),
            PlaylistRef::Smart(id) => EntityRef::new(EntityKind::SmartPlaylist, id),
        }
    }

    pub fn is_smart(&self) -> bool {
        matches!(self, PlaylistRef::Smart(_))
    }
}

impl fmt::Display for PlaylistRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaylistRef::Real(id) => write!(f, "{}", id),
            PlaylistRef::Smart(id) => write!(f, "smart_{}", id),
        }
    }
}

impl FromStr for PlaylistRef {
    type Err = ModelError;

    /// Parses `"42"` as a stored playlist and `"smart_3"` as a smart playlist.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ModelError::InvalidIdentifier {
            kind: "playlist",
            value: s.to_string(),
        };
        match s.strip_prefix("smart_") {
            Some(rest) => rest.parse().map(PlaylistRef::Smart).map_err(|_| invalid()),
            None => s.parse().map(PlaylistRef::Real).map_err(|_| invalid()),
        }
    }
}

impl From<PlaylistRef> for EntityRef {
    fn from(value: PlaylistRef) -> Self {
        value.entity_ref()
    }
}
