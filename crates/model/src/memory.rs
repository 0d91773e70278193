//! In-memory library backed by a JSON catalog snapshot.
//!
//! Used by the CLI and by tests. Lookups are map reads; nothing is cached
//! beyond the snapshot itself.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{
    Album, Artist, Entity, Label, LiveStream, Playlist, Podcast, PodcastEpisode, Share,
    SmartPlaylist, Song, User, Video,
};
use crate::error::ModelResult;
use crate::kind::{EntityKind, EntityRef};
use crate::library::{Catalog, UserActivity};

/// A user's rating of one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub object_type: EntityKind,
    pub object_id: u64,
    pub user: u64,
    pub rating: u8,
}

/// A reference to one object, optionally scoped to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub object_type: EntityKind,
    pub object_id: u64,
    #[serde(default)]
    pub user: Option<u64>,
}

/// Democratic play votes for one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteEntry {
    pub object_type: EntityKind,
    pub object_id: u64,
    pub votes: u64,
}

/// On-disk layout of a catalog snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    pub artists: Vec<Artist>,
    pub albums: Vec<Album>,
    pub songs: Vec<Song>,
    pub playlists: Vec<Playlist>,
    pub smart_playlists: Vec<SmartPlaylist>,
    pub podcasts: Vec<Podcast>,
    pub podcast_episodes: Vec<PodcastEpisode>,
    pub videos: Vec<Video>,
    pub shares: Vec<Share>,
    pub labels: Vec<Label>,
    pub live_streams: Vec<LiveStream>,
    pub users: Vec<User>,
    /// Catalog-wide counts that override the number of loaded rows.
    pub counts: BTreeMap<EntityKind, u64>,
    pub ratings: Vec<RatingEntry>,
    pub flags: Vec<ObjectEntry>,
    pub art: Vec<ObjectEntry>,
    pub votes: Vec<VoteEntry>,
}

/// A [`Catalog`] and [`UserActivity`] implementation held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLibrary {
    entities: BTreeMap<EntityRef, Entity>,
    counts: BTreeMap<EntityKind, u64>,
    ratings: BTreeMap<EntityRef, BTreeMap<u64, u8>>,
    flags: BTreeSet<(EntityRef, u64)>,
    art: BTreeSet<EntityRef>,
    votes: BTreeMap<EntityRef, u64>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON snapshot.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let snapshot: CatalogSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        let mut library = Self::new();
        let CatalogSnapshot {
            artists,
            albums,
            songs,
            playlists,
            smart_playlists,
            podcasts,
            podcast_episodes,
            videos,
            shares,
            labels,
            live_streams,
            users,
            counts,
            ratings,
            flags,
            art,
            votes,
        } = snapshot;

        artists.into_iter().for_each(|e| library.insert(e));
        albums.into_iter().for_each(|e| library.insert(e));
        songs.into_iter().for_each(|e| library.insert(e));
        playlists.into_iter().for_each(|e| library.insert(e));
        smart_playlists.into_iter().for_each(|e| library.insert(e));
        podcasts.into_iter().for_each(|e| library.insert(e));
        podcast_episodes.into_iter().for_each(|e| library.insert(e));
        videos.into_iter().for_each(|e| library.insert(e));
        shares.into_iter().for_each(|e| library.insert(e));
        labels.into_iter().for_each(|e| library.insert(e));
        live_streams.into_iter().for_each(|e| library.insert(e));
        users.into_iter().for_each(|e| library.insert(e));

        library.counts = counts;
        for entry in ratings {
            library.rate(
                EntityRef::new(entry.object_type, entry.object_id),
                entry.user,
                entry.rating,
            );
        }
        for entry in flags {
            if let Some(user) = entry.user {
                library.flag(EntityRef::new(entry.object_type, entry.object_id), user);
            }
        }
        for entry in art {
            library.add_art(EntityRef::new(entry.object_type, entry.object_id));
        }
        for entry in votes {
            library.set_votes(EntityRef::new(entry.object_type, entry.object_id), entry.votes);
        }

        debug!(objects = library.entities.len(), "Loaded catalog snapshot");
        library
    }

    /// Adds or replaces an entity.
    pub fn insert(&mut self, entity: impl Into<Entity>) {
        let entity = entity.into();
        self.entities.insert(entity.entity_ref(), entity);
    }

    /// Overrides the catalog-wide count for `kind`.
    pub fn set_count(&mut self, kind: EntityKind, count: u64) {
        self.counts.insert(kind, count);
    }

    pub fn rate(&mut self, reference: EntityRef, user_id: u64, rating: u8) {
        self.ratings
            .entry(reference)
            .or_default()
            .insert(user_id, rating.min(5));
    }

    pub fn flag(&mut self, reference: EntityRef, user_id: u64) {
        self.flags.insert((reference, user_id));
    }

    pub fn add_art(&mut self, reference: EntityRef) {
        self.art.insert(reference);
    }

    /// Sets the democratic vote count of an object; zero clears it.
    pub fn set_votes(&mut self, reference: EntityRef, votes: u64) {
        if votes == 0 {
            self.votes.remove(&reference);
        } else {
            self.votes.insert(reference, votes);
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Ids of every loaded object of `kind`, ascending.
    pub fn ids(&self, kind: EntityKind) -> Vec<u64> {
        self.of_kind(kind).map(Entity::id).collect()
    }

    fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities
            .range(EntityRef::new(kind, 0)..=EntityRef::new(kind, u64::MAX))
            .map(|(_, entity)| entity)
    }
}

impl Catalog for MemoryLibrary {
    fn find(&self, reference: EntityRef) -> Option<Entity> {
        self.entities.get(&reference).cloned()
    }

    fn count(&self, kind: EntityKind) -> u64 {
        match self.counts.get(&kind) {
            Some(count) => *count,
            None => self.of_kind(kind).count() as u64,
        }
    }

    fn albums_by_artist(&self, artist_id: u64) -> Vec<u64> {
        self.of_kind(EntityKind::Album)
            .filter_map(|entity| match entity {
                Entity::Album(album) => {
                    let credited = album.album_artist.unwrap_or(album.artist_id);
                    (credited == artist_id).then_some(album.id)
                }
                _ => None,
            })
            .collect()
    }

    fn songs_by_artist(&self, artist_id: u64) -> Vec<u64> {
        self.of_kind(EntityKind::Song)
            .filter_map(|entity| match entity {
                Entity::Song(song) if song.artist == artist_id => Some(song.id),
                _ => None,
            })
            .collect()
    }

    fn songs_by_album(&self, album_id: u64) -> Vec<u64> {
        let mut songs: Vec<(u32, u32, u64)> = self
            .of_kind(EntityKind::Song)
            .filter_map(|entity| match entity {
                Entity::Song(song) if song.album == album_id => {
                    Some((song.disk, song.track, song.id))
                }
                _ => None,
            })
            .collect();
        songs.sort_unstable();
        songs.into_iter().map(|(_, _, id)| id).collect()
    }

    fn has_art(&self, reference: EntityRef) -> bool {
        self.art.contains(&reference)
    }
}

impl UserActivity for MemoryLibrary {
    fn user_rating(&self, reference: EntityRef, user_id: u64) -> Option<u8> {
        self.ratings
            .get(&reference)
            .and_then(|by_user| by_user.get(&user_id))
            .copied()
    }

    fn average_rating(&self, reference: EntityRef) -> Option<f64> {
        let by_user = self.ratings.get(&reference)?;
        if by_user.is_empty() {
            return None;
        }
        let sum: u32 = by_user.values().map(|r| u32::from(*r)).sum();
        Some(f64::from(sum) / by_user.len() as f64)
    }

    fn is_flagged(&self, reference: EntityRef, user_id: u64) -> bool {
        self.flags.contains(&(reference, user_id))
    }

    fn votes(&self, reference: EntityRef) -> u64 {
        self.votes.get(&reference).copied().unwrap_or(0)
    }
}
