//! Collaborator traits the renderer consumes.
//!
//! The model layer owns loading, formatting and persistence. The renderer
//! only reads through these traits and never writes.

use crate::entity::{
    Album, Artist, Entity, Label, LiveStream, Playlist, Podcast, PodcastEpisode, Share,
    SmartPlaylist, Song, User, Video,
};
use crate::kind::{EntityKind, EntityRef, PlaylistRef};

/// Read access to loaded catalog objects and catalog-wide counts.
pub trait Catalog {
    /// Looks up a single entity. Returns `None` when the row does not exist.
    fn find(&self, reference: EntityRef) -> Option<Entity>;

    /// Authoritative number of objects of `kind` in the catalog.
    fn count(&self, kind: EntityKind) -> u64;

    /// Album ids credited to the artist, in catalog order.
    fn albums_by_artist(&self, artist_id: u64) -> Vec<u64>;

    /// Song ids performed by the artist, in catalog order.
    fn songs_by_artist(&self, artist_id: u64) -> Vec<u64>;

    /// Song ids on the album, ordered by disk then track.
    fn songs_by_album(&self, album_id: u64) -> Vec<u64>;

    /// Whether the art service holds an image for the object.
    fn has_art(&self, reference: EntityRef) -> bool;

    fn artist(&self, id: u64) -> Option<Artist> {
        match self.find(EntityRef::new(EntityKind::Artist, id)) {
            Some(Entity::Artist(artist)) => Some(artist),
            _ => None,
        }
    }

    fn album(&self, id: u64) -> Option<Album> {
        match self.find(EntityRef::new(EntityKind::Album, id)) {
            Some(Entity::Album(album)) => Some(album),
            _ => None,
        }
    }

    fn song(&self, id: u64) -> Option<Song> {
        match self.find(EntityRef::new(EntityKind::Song, id)) {
            Some(Entity::Song(song)) => Some(song),
            _ => None,
        }
    }

    fn playlist(&self, id: u64) -> Option<Playlist> {
        match self.find(EntityRef::new(EntityKind::Playlist, id)) {
            Some(Entity::Playlist(playlist)) => Some(playlist),
            _ => None,
        }
    }

    fn smart_playlist(&self, id: u64) -> Option<SmartPlaylist> {
        match self.find(EntityRef::new(EntityKind::SmartPlaylist, id)) {
            Some(Entity::SmartPlaylist(playlist)) => Some(playlist),
            _ => None,
        }
    }

    /// Resolves either kind of playlist reference.
    fn playlist_ref(&self, reference: PlaylistRef) -> Option<Entity> {
        self.find(reference.entity_ref())
    }

    fn podcast(&self, id: u64) -> Option<Podcast> {
        match self.find(EntityRef::new(EntityKind::Podcast, id)) {
            Some(Entity::Podcast(podcast)) => Some(podcast),
            _ => None,
        }
    }

    fn podcast_episode(&self, id: u64) -> Option<PodcastEpisode> {
        match self.find(EntityRef::new(EntityKind::PodcastEpisode, id)) {
            Some(Entity::PodcastEpisode(episode)) => Some(episode),
            _ => None,
        }
    }

    fn video(&self, id: u64) -> Option<Video> {
        match self.find(EntityRef::new(EntityKind::Video, id)) {
            Some(Entity::Video(video)) => Some(video),
            _ => None,
        }
    }

    fn share(&self, id: u64) -> Option<Share> {
        match self.find(EntityRef::new(EntityKind::Share, id)) {
            Some(Entity::Share(share)) => Some(share),
            _ => None,
        }
    }

    fn label(&self, id: u64) -> Option<Label> {
        match self.find(EntityRef::new(EntityKind::Label, id)) {
            Some(Entity::Label(label)) => Some(label),
            _ => None,
        }
    }

    fn live_stream(&self, id: u64) -> Option<LiveStream> {
        match self.find(EntityRef::new(EntityKind::LiveStream, id)) {
            Some(Entity::LiveStream(stream)) => Some(stream),
            _ => None,
        }
    }

    fn user(&self, id: u64) -> Option<User> {
        match self.find(EntityRef::new(EntityKind::User, id)) {
            Some(Entity::User(user)) => Some(user),
            _ => None,
        }
    }
}

/// Per-user rating, favorite and vote lookups.
pub trait UserActivity {
    /// The user's own rating (1-5) for the object, if any.
    fn user_rating(&self, reference: EntityRef, user_id: u64) -> Option<u8>;

    /// Mean rating across all users, if anyone has rated the object.
    fn average_rating(&self, reference: EntityRef) -> Option<f64>;

    /// Whether the user has flagged the object as a favorite.
    fn is_flagged(&self, reference: EntityRef, user_id: u64) -> bool;

    /// Votes the object holds on the democratic play queue.
    fn votes(&self, _reference: EntityRef) -> u64 {
        0
    }
}

/// A container whose media can be published as a podcast feed.
pub trait LibraryItem {
    fn item_ref(&self) -> EntityRef;

    fn full_name(&self) -> String;

    fn description(&self) -> String {
        String::new()
    }

    /// Id of the owning user, when the item has one.
    fn owner_id(&self) -> Option<u64> {
        None
    }

    /// The playable media of this item, resolved through the catalog.
    fn medias(&self, catalog: &dyn Catalog) -> Vec<EntityRef>;
}

impl LibraryItem for Podcast {
    fn item_ref(&self) -> EntityRef {
        EntityRef::new(EntityKind::Podcast, self.id)
    }

    fn full_name(&self) -> String {
        self.title.clone()
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn owner_id(&self) -> Option<u64> {
        self.owner_id
    }

    fn medias(&self, _catalog: &dyn Catalog) -> Vec<EntityRef> {
        self.episodes
            .iter()
            .map(|id| EntityRef::new(EntityKind::PodcastEpisode, *id))
            .collect()
    }
}

impl LibraryItem for Album {
    fn item_ref(&self) -> EntityRef {
        EntityRef::new(EntityKind::Album, self.id)
    }

    fn full_name(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn medias(&self, catalog: &dyn Catalog) -> Vec<EntityRef> {
        catalog
            .songs_by_album(self.id)
            .into_iter()
            .map(|id| EntityRef::new(EntityKind::Song, id))
            .collect()
    }
}

impl LibraryItem for Artist {
    fn item_ref(&self) -> EntityRef {
        EntityRef::new(EntityKind::Artist, self.id)
    }

    fn full_name(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> String {
        self.summary.clone()
    }

    fn medias(&self, catalog: &dyn Catalog) -> Vec<EntityRef> {
        catalog
            .songs_by_artist(self.id)
            .into_iter()
            .map(|id| EntityRef::new(EntityKind::Song, id))
            .collect()
    }
}

impl LibraryItem for Playlist {
    fn item_ref(&self) -> EntityRef {
        EntityRef::new(EntityKind::Playlist, self.id)
    }

    fn full_name(&self) -> String {
        self.name.clone()
    }

    fn owner_id(&self) -> Option<u64> {
        self.owner_id
    }

    fn medias(&self, _catalog: &dyn Catalog) -> Vec<EntityRef> {
        self.items.iter().map(|item| item.entity_ref()).collect()
    }
}

impl LibraryItem for SmartPlaylist {
    fn item_ref(&self) -> EntityRef {
        EntityRef::new(EntityKind::SmartPlaylist, self.id)
    }

    fn full_name(&self) -> String {
        self.name.clone()
    }

    fn owner_id(&self) -> Option<u64> {
        self.owner_id
    }

    fn medias(&self, _catalog: &dyn Catalog) -> Vec<EntityRef> {
        self.items.iter().map(|item| item.entity_ref()).collect()
    }
}
