//! # Cadence catalog model
//!
//! Domain objects handed to the wire-format renderer, plus the collaborator
//! traits it reads them through.
//!
//! - [`Entity`] is a closed tagged union over every serializable object type.
//! - [`EntityKind`] names a type; [`EntityRef`] pairs a kind with an id.
//! - [`PlaylistRef`] distinguishes stored playlists from smart playlists.
//! - [`Catalog`], [`UserActivity`] and [`LibraryItem`] are the read-only
//!   seams to the storage layer. [`MemoryLibrary`] implements them over a
//!   JSON snapshot.
//!
//! ```
//! use cadence_model::{Catalog, EntityKind, MemoryLibrary, Song};
//!
//! let mut library = MemoryLibrary::new();
//! library.insert(Song { id: 1, title: "Intro".into(), ..Default::default() });
//! assert_eq!(library.count(EntityKind::Song), 1);
//! ```

pub mod entity;
pub mod error;
pub mod kind;
pub mod library;
pub mod memory;

pub use entity::{
    Album, Artist, CustomMetadata, Entity, Label, LiveStream, Playlist, PlaylistItem, Podcast,
    PodcastEpisode, Share, SmartPlaylist, Song, Tag, User, Video,
};
pub use error::{ModelError, ModelResult};
pub use kind::{EntityKind, EntityRef, PlaylistRef};
pub use library::{Catalog, LibraryItem, UserActivity};
pub use memory::{CatalogSnapshot, MemoryLibrary, ObjectEntry, RatingEntry, VoteEntry};
