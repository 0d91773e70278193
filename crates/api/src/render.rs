//! The [`Renderer`] façade: one call per object type, each producing a
//! complete document in the format the context asks for.

use std::collections::BTreeMap;

use cadence_model::{Catalog, Entity, EntityKind, EntityRef, PlaylistRef, UserActivity};
use cadence_serde::xml::XmlStreamWriter;
use cadence_serde::{Record, clean_body, to_json_string_pretty};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::config::RenderConfig;
use crate::context::{Format, RenderContext, XmlFlavor};
use crate::document::DocumentAssembler;
use crate::error::{ApiError, ApiResult};
use crate::include::IncludeSet;
use crate::pagination::paginate;
use crate::projection::{Projector, element_name};
use crate::tracks::{TrackInfo, write_track};
use crate::urls::UrlBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Projection {
    Full,
    Index,
}

/// Top-level JSON document: `total_count`, then the records under the
/// element name of the kind.
struct JsonCollection<'r> {
    total_count: u64,
    key: &'static str,
    records: &'r [Record],
    title: Option<&'r str>,
}

impl Serialize for JsonCollection<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 2 + usize::from(self.title.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("total_count", &self.total_count)?;
        map.serialize_entry(self.key, self.records)?;
        if let Some(title) = self.title {
            map.serialize_entry("title", title)?;
        }
        map.end()
    }
}

/// Renders catalog objects as API documents.
///
/// Holds only shared references and an immutable URL builder, so a single
/// renderer can serve concurrent calls when the library allows it.
///
/// # Example
///
/// ```
/// use cadence_api::{Format, RenderConfig, RenderContext, Renderer};
/// use cadence_model::{MemoryLibrary, Song};
///
/// let mut library = MemoryLibrary::new();
/// library.insert(Song { id: 1, title: "Intro".into(), ..Default::default() });
///
/// let config = RenderConfig::for_testing();
/// let renderer = Renderer::new(&config, &library)?;
/// let ctx = RenderContext::new(Format::Json);
/// let json = renderer.songs(&[1], &ctx)?;
/// assert!(json.contains("\"total_count\": 1"));
/// # Ok::<(), cadence_api::ApiError>(())
/// ```
pub struct Renderer<'a, L> {
    config: &'a RenderConfig,
    library: &'a L,
    urls: UrlBuilder,
}

impl<'a, L: Catalog + UserActivity> Renderer<'a, L> {
    pub fn new(config: &'a RenderConfig, library: &'a L) -> ApiResult<Self> {
        let urls = UrlBuilder::new(&config.web_path)?;
        Ok(Self {
            config,
            library,
            urls,
        })
    }

    pub fn config(&self) -> &'a RenderConfig {
        self.config
    }

    pub fn library(&self) -> &'a L {
        self.library
    }

    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    pub fn projector(&self) -> Projector<'_, L> {
        Projector::new(self.config, self.library, &self.urls)
    }

    pub fn assembler(&self, ctx: &RenderContext) -> DocumentAssembler<'a> {
        DocumentAssembler::for_context(self.config, ctx)
    }

    /// Renders `error` as an error document for `action`.
    pub fn error_document(&self, error: &ApiError, action: &str, ctx: &RenderContext) -> String {
        error.to_document(&self.assembler(ctx), action, ctx.format)
    }

    /// Full documents for `ids` of `kind`.
    pub fn render(
        &self,
        kind: EntityKind,
        ids: &[u64],
        includes: &IncludeSet,
        ctx: &RenderContext,
    ) -> ApiResult<String> {
        let refs: Vec<EntityRef> = ids.iter().map(|id| EntityRef::new(kind, *id)).collect();
        self.document(kind, &refs, includes, ctx, Projection::Full)
    }

    /// Compact browse listing for `ids` of `kind`.
    pub fn indexes(
        &self,
        kind: EntityKind,
        ids: &[u64],
        includes: &IncludeSet,
        ctx: &RenderContext,
    ) -> ApiResult<String> {
        let refs: Vec<EntityRef> = ids.iter().map(|id| EntityRef::new(kind, *id)).collect();
        self.document(kind, &refs, includes, ctx, Projection::Index)
    }

    pub fn artists(&self, ids: &[u64], includes: &IncludeSet, ctx: &RenderContext) -> ApiResult<String> {
        self.render(EntityKind::Artist, ids, includes, ctx)
    }

    pub fn albums(&self, ids: &[u64], includes: &IncludeSet, ctx: &RenderContext) -> ApiResult<String> {
        self.render(EntityKind::Album, ids, includes, ctx)
    }

    pub fn songs(&self, ids: &[u64], ctx: &RenderContext) -> ApiResult<String> {
        self.render(EntityKind::Song, ids, &IncludeSet::none(), ctx)
    }

    /// Stored and smart playlists, in the order given.
    pub fn playlists(
        &self,
        playlists: &[PlaylistRef],
        includes: &IncludeSet,
        ctx: &RenderContext,
    ) -> ApiResult<String> {
        let refs: Vec<EntityRef> = playlists.iter().map(PlaylistRef::entity_ref).collect();
        self.document(EntityKind::Playlist, &refs, includes, ctx, Projection::Full)
    }

    pub fn podcasts(&self, ids: &[u64], includes: &IncludeSet, ctx: &RenderContext) -> ApiResult<String> {
        self.render(EntityKind::Podcast, ids, includes, ctx)
    }

    pub fn podcast_episodes(&self, ids: &[u64], ctx: &RenderContext) -> ApiResult<String> {
        self.render(EntityKind::PodcastEpisode, ids, &IncludeSet::none(), ctx)
    }

    pub fn videos(&self, ids: &[u64], ctx: &RenderContext) -> ApiResult<String> {
        self.render(EntityKind::Video, ids, &IncludeSet::none(), ctx)
    }

    pub fn shares(&self, ids: &[u64], ctx: &RenderContext) -> ApiResult<String> {
        self.render(EntityKind::Share, ids, &IncludeSet::none(), ctx)
    }

    pub fn labels(&self, ids: &[u64], ctx: &RenderContext) -> ApiResult<String> {
        self.render(EntityKind::Label, ids, &IncludeSet::none(), ctx)
    }

    pub fn live_streams(&self, ids: &[u64], ctx: &RenderContext) -> ApiResult<String> {
        self.render(EntityKind::LiveStream, ids, &IncludeSet::none(), ctx)
    }

    pub fn users(&self, ids: &[u64], ctx: &RenderContext) -> ApiResult<String> {
        self.render(EntityKind::User, ids, &IncludeSet::none(), ctx)
    }

    /// The democratic play queue: songs in queue order, each closed by its
    /// vote count. Always the default envelope, with no `total_count` and
    /// no pagination.
    pub fn democratic(&self, ids: &[u64], ctx: &RenderContext) -> ApiResult<String> {
        let refs: Vec<EntityRef> = ids
            .iter()
            .map(|id| EntityRef::new(EntityKind::Song, *id))
            .collect();
        let projector = self.projector();
        let records: Vec<Record> = self
            .resolve(&refs)
            .iter()
            .filter_map(|entity| match entity {
                Entity::Song(song) => Some(projector.democratic_song(song, ctx)),
                _ => None,
            })
            .collect();
        debug!(
            requested = ids.len(),
            rendered = records.len(),
            format = %ctx.format,
            "Rendering democratic queue"
        );

        match ctx.format {
            Format::Json => {
                let json = if ctx.top_level {
                    to_json_string_pretty(&BTreeMap::from([("song", &records)]))?
                } else {
                    to_json_string_pretty(&records)?
                };
                Ok(clean_body(&json))
            }
            Format::Xml(_) => {
                let flavor = XmlFlavor::Root;
                let depth = if ctx.top_level { flavor.body_depth() } else { 0 };
                let mut writer = XmlStreamWriter::with_depth(depth);
                for record in &records {
                    writer.write_record(record)?;
                }
                let body = writer.finish()?;
                Ok(self.assembler(ctx).wrap_trusted(&body, flavor, ctx.top_level, None))
            }
        }
    }

    /// Loads `refs`, skipping rows that no longer exist.
    fn resolve(&self, refs: &[EntityRef]) -> Vec<Entity> {
        refs.iter()
            .filter_map(|reference| {
                let entity = self.library.find(*reference);
                if entity.is_none() {
                    debug!(%reference, "Skipping missing object");
                }
                entity
            })
            .collect()
    }

    fn document(
        &self,
        kind: EntityKind,
        refs: &[EntityRef],
        includes: &IncludeSet,
        ctx: &RenderContext,
        projection: Projection,
    ) -> ApiResult<String> {
        includes.validate_for(kind)?;
        let page = paginate(refs, ctx.window, ctx.top_level, self.library.count(kind));
        let entities = self.resolve(page.items);
        debug!(
            kind = %kind,
            requested = refs.len(),
            rendered = entities.len(),
            format = %ctx.format,
            top_level = ctx.top_level,
            "Rendering document"
        );

        let projector = self.projector();
        let project = |position: usize, entity: &Entity| match projection {
            Projection::Full => projector.project_at(entity, position, ctx, includes),
            Projection::Index => projector.project_index(entity, ctx, includes),
        };

        match ctx.format {
            Format::Json => {
                let records: Vec<Record> = entities
                    .iter()
                    .enumerate()
                    .map(|(index, entity)| project(index + 1, entity))
                    .collect();
                let json = if ctx.top_level {
                    to_json_string_pretty(&JsonCollection {
                        total_count: page.total_count,
                        key: element_name(kind),
                        records: &records,
                        title: ctx.title.as_deref(),
                    })?
                } else {
                    to_json_string_pretty(&records)?
                };
                Ok(clean_body(&json))
            }
            Format::Xml(flavor) => {
                let depth = if ctx.top_level { flavor.body_depth() } else { 0 };
                let mut writer = XmlStreamWriter::with_depth(depth);
                if ctx.top_level && flavor == XmlFlavor::Root {
                    writer.number_element("total_count", &[], page.total_count)?;
                }
                for (index, entity) in entities.iter().enumerate() {
                    let track = match flavor {
                        XmlFlavor::Root => None,
                        _ if entity.kind().is_media() => {
                            TrackInfo::from_entity(entity, self.library, self.config)
                        }
                        _ => None,
                    };
                    match track {
                        Some(track) => write_track(&mut writer, flavor, &track, &self.urls, ctx)?,
                        None => writer.write_record(&project(index + 1, entity))?,
                    }
                }
                let body = writer.finish()?;
                Ok(self.assembler(ctx).wrap_trusted(
                    &body,
                    flavor,
                    ctx.top_level,
                    ctx.title.as_deref(),
                ))
            }
        }
    }
}
