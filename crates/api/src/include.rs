//! Include expansion: which child collections are embedded in a parent.
//!
//! | Parent | Includes |
//! |--------|----------|
//! | artist | `albums`, `songs` |
//! | album | `songs` (the `tracks` container) |
//! | playlist, smart playlist | `tracks` |
//! | podcast | `episodes` |
//!
//! Children are always projected as fragments with an empty include set,
//! so expansion goes exactly one level deep.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use cadence_model::{Catalog, EntityKind, EntityRef, PlaylistItem, UserActivity};
use cadence_serde::{Field, Link, Record, Value};
use tracing::debug;

use crate::context::RenderContext;
use crate::error::{ApiError, ApiResult};
use crate::projection::Projector;

/// A child collection that can be embedded in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Include {
    Albums,
    Songs,
    Tracks,
    Episodes,
}

impl Include {
    pub fn as_str(&self) -> &'static str {
        match self {
            Include::Albums => "albums",
            Include::Songs => "songs",
            Include::Tracks => "tracks",
            Include::Episodes => "episodes",
        }
    }

    /// Includes a parent kind supports.
    pub fn allowed_on(kind: EntityKind) -> &'static [Include] {
        match kind {
            EntityKind::Artist => &[Include::Albums, Include::Songs],
            EntityKind::Album => &[Include::Songs],
            EntityKind::Playlist | EntityKind::SmartPlaylist => &[Include::Tracks],
            EntityKind::Podcast => &[Include::Episodes],
            _ => &[],
        }
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Include {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "albums" => Ok(Include::Albums),
            "songs" => Ok(Include::Songs),
            "tracks" => Ok(Include::Tracks),
            "episodes" => Ok(Include::Episodes),
            _ => Err(ApiError::InvalidInclude(s.to_string())),
        }
    }
}

/// A set of requested includes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeSet(BTreeSet<Include>);

impl IncludeSet {
    pub fn none() -> Self {
        Self::default()
    }

    /// Every include the kind supports.
    pub fn all_for(kind: EntityKind) -> Self {
        Include::allowed_on(kind).iter().copied().collect()
    }

    /// Parses a comma separated list such as `albums,songs`.
    pub fn parse(list: &str) -> ApiResult<Self> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::parse::<Include>)
            .collect()
    }

    pub fn contains(&self, include: Include) -> bool {
        self.0.contains(&include)
    }

    pub fn insert(&mut self, include: Include) -> bool {
        self.0.insert(include)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Include> + '_ {
        self.0.iter().copied()
    }

    /// Fails on the first include `kind` does not support.
    pub fn validate_for(&self, kind: EntityKind) -> ApiResult<()> {
        let allowed = Include::allowed_on(kind);
        match self.iter().find(|include| !allowed.contains(include)) {
            Some(include) => Err(ApiError::UnsupportedInclude { kind, include }),
            None => Ok(()),
        }
    }
}

impl FromIterator<Include> for IncludeSet {
    fn from_iter<I: IntoIterator<Item = Include>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A parent whose child collections can be embedded: the parent type with
/// its id, or with the child list it already carries.
#[derive(Debug, Clone, Copy)]
pub enum Parent<'e> {
    Artist(u64),
    Album(u64),
    Podcast(&'e [u64]),
    Playlist(&'e [PlaylistItem]),
}

/// Container fields expanded for one parent. Projectors take each one out
/// by name when they reach its position in the record.
#[derive(Debug, Default)]
pub struct Containers(Vec<Field>);

impl Containers {
    /// Removes and returns the container named `name`, if it was expanded.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let index = self.0.iter().position(|field| field.name == name)?;
        Some(self.0.remove(index).value)
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.0
    }
}

/// Expands child collections of a parent into container fields.
pub struct IncludeExpander<'p, 'a, L> {
    projector: &'p Projector<'a, L>,
}

impl<'p, 'a, L: Catalog + UserActivity> IncludeExpander<'p, 'a, L> {
    pub fn new(projector: &'p Projector<'a, L>) -> Self {
        Self { projector }
    }

    /// Container fields `parent` carries for `includes`, in field order.
    ///
    /// Artist `albums`/`songs` and album `tracks` are always present;
    /// podcast `episodes` and playlist `tracks` only when requested.
    pub fn expand(&self, parent: Parent<'_>, ctx: &RenderContext, includes: &IncludeSet) -> Containers {
        let field = |name: &str, value: Value| Field {
            name: name.to_string(),
            value,
        };
        let mut fields = Vec::with_capacity(2);
        match parent {
            Parent::Artist(id) => {
                fields.push(field("albums", self.albums_of(id, ctx, includes)));
                fields.push(field("songs", self.songs_of_artist(id, ctx, includes)));
            }
            Parent::Album(id) => fields.push(field("tracks", self.tracks_of_album(id, ctx, includes))),
            Parent::Podcast(episodes) => {
                if let Some(value) = self.episodes_of(episodes, ctx, includes) {
                    fields.push(field("episodes", value));
                }
            }
            Parent::Playlist(items) => {
                if let Some(links) = self.playlist_tracks(items, includes) {
                    let listing = Value::Listing {
                        item: "playlisttrack".to_string(),
                        links,
                    };
                    fields.push(field("tracks", listing));
                }
            }
        }
        Containers(fields)
    }

    /// Projects each id of `kind` as a child record, skipping ids that no
    /// longer resolve.
    fn children(&self, kind: EntityKind, ids: &[u64], ctx: &RenderContext) -> Vec<Record> {
        let nested = ctx.nested();
        let none = IncludeSet::none();
        let library = self.projector.library();
        let mut records = Vec::with_capacity(ids.len());
        for &id in ids {
            let reference = EntityRef::new(kind, id);
            match library.find(reference) {
                Some(entity) => {
                    let position = records.len() + 1;
                    records.push(self.projector.project_at(&entity, position, &nested, &none));
                }
                None => debug!(%reference, "Skipping missing child"),
            }
        }
        records
    }

    /// Albums container for an artist.
    fn albums_of(&self, artist_id: u64, ctx: &RenderContext, includes: &IncludeSet) -> Value {
        Value::Records(self.requested(includes, Include::Albums, || {
            let ids = self.projector.library().albums_by_artist(artist_id);
            self.children(EntityKind::Album, &ids, ctx)
        }))
    }

    /// Songs container for an artist.
    fn songs_of_artist(
        &self,
        artist_id: u64,
        ctx: &RenderContext,
        includes: &IncludeSet,
    ) -> Value {
        Value::Records(self.requested(includes, Include::Songs, || {
            let ids = self.projector.library().songs_by_artist(artist_id);
            self.children(EntityKind::Song, &ids, ctx)
        }))
    }

    /// Tracks container for an album.
    fn tracks_of_album(&self, album_id: u64, ctx: &RenderContext, includes: &IncludeSet) -> Value {
        Value::Records(self.requested(includes, Include::Songs, || {
            let ids = self.projector.library().songs_by_album(album_id);
            self.children(EntityKind::Song, &ids, ctx)
        }))
    }

    /// Episodes container for a podcast, or `None` when not requested.
    fn episodes_of(
        &self,
        episode_ids: &[u64],
        ctx: &RenderContext,
        includes: &IncludeSet,
    ) -> Option<Value> {
        includes.contains(Include::Episodes).then(|| {
            Value::Records(self.children(EntityKind::PodcastEpisode, episode_ids, ctx))
        })
    }

    /// Playlist track listing: one `playlisttrack` link per song item,
    /// numbered from 1. `None` when not requested.
    fn playlist_tracks(
        &self,
        items: &[PlaylistItem],
        includes: &IncludeSet,
    ) -> Option<Vec<Link>> {
        includes.contains(Include::Tracks).then(|| {
            items
                .iter()
                .filter(|item| item.object_type == EntityKind::Song)
                .enumerate()
                .map(|(index, item)| Link::new(item.object_id, (index + 1) as i64))
                .collect()
        })
    }

    fn requested(
        &self,
        includes: &IncludeSet,
        include: Include,
        expand: impl FnOnce() -> Vec<Record>,
    ) -> Vec<Record> {
        if includes.contains(include) {
            expand()
        } else {
            Vec::new()
        }
    }
}
