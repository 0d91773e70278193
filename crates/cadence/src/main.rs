//! Cadence document renderer.
//!
//! Loads a catalog snapshot and writes one API document to stdout. Request
//! errors are reported as error documents in the requested format; only
//! configuration and catalog loading failures abort the process.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use cadence_api::{
    ApiError, ApiResult, ApiVersion, Format, IncludeSet, RenderConfig, RenderContext, Renderer,
    init_logging,
};
use cadence_model::{Catalog, EntityKind, EntityRef, LibraryItem, MemoryLibrary, PlaylistRef};
use clap::Parser;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "cadence", version)]
#[command(about = "Render Cadence API documents from a catalog snapshot")]
struct Cli {
    /// Catalog snapshot (JSON).
    #[arg(long, env = "CADENCE_CATALOG")]
    catalog: PathBuf,

    /// Object type: artist, album, song, playlist, search, podcast,
    /// podcast_episode, video, share, label, live_stream or user.
    #[arg(long, default_value = "song")]
    kind: String,

    /// Comma separated ids. Playlists also accept `smart_N`. When empty,
    /// every loaded object of the type is rendered.
    #[arg(long, value_delimiter = ',')]
    ids: Vec<String>,

    /// Output format: xml, rss, xspf, itunes or json.
    #[arg(long, default_value = "xml")]
    format: String,

    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Page size; 0 means unlimited.
    #[arg(long, default_value_t = 0)]
    limit: usize,

    /// Requesting user, for personal ratings and flags.
    #[arg(long)]
    user: Option<u64>,

    /// Session token embedded in art and play URLs.
    #[arg(long)]
    auth: Option<String>,

    /// Comma separated includes: albums, songs, tracks, episodes.
    #[arg(long, default_value = "")]
    include: String,

    /// Render the compact browse listing.
    #[arg(long)]
    index: bool,

    /// Render a fragment, with no envelope and no pagination.
    #[arg(long)]
    fragment: bool,

    /// Document title for XSPF and JSON output.
    #[arg(long)]
    title: Option<String>,

    /// Major API version. Versions below 5 emit `tag` instead of `genre`.
    #[arg(long, default_value_t = 5)]
    api_version: u32,

    /// Render a podcast feed for the single object named by `--ids`.
    #[arg(long, conflicts_with = "index")]
    feed: bool,

    /// Render `--ids` as the democratic play queue, with vote counts.
    #[arg(long, conflicts_with_all = ["index", "feed"])]
    democratic: bool,

    #[command(flatten)]
    config: RenderConfig,
}

impl Cli {
    fn context(&self, format: Format) -> RenderContext {
        let mut ctx = RenderContext::new(format)
            .with_window(self.offset, self.limit)
            .with_api_version(ApiVersion::from_major(self.api_version));
        if let Some(user) = self.user {
            ctx = ctx.with_user(user);
        }
        if let Some(auth) = &self.auth {
            ctx = ctx.with_auth(auth.as_str());
        }
        if let Some(title) = &self.title {
            ctx = ctx.with_title(title.as_str());
        }
        if self.fragment {
            ctx = ctx.fragment();
        }
        ctx
    }

    fn action(&self) -> &str {
        if self.feed {
            "podcast_feed"
        } else if self.democratic {
            "democratic"
        } else if self.index {
            "indexes"
        } else {
            &self.kind
        }
    }
}

fn parse_id(raw: &str) -> ApiResult<u64> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::InvalidIdentifier(raw.to_string()))
}

/// Looks up an object that can be published as a feed.
fn feed_item(library: &MemoryLibrary, reference: EntityRef) -> ApiResult<Box<dyn LibraryItem>> {
    let id = reference.id;
    let item: Option<Box<dyn LibraryItem>> = match reference.kind {
        EntityKind::Artist => library.artist(id).map(|i| Box::new(i) as Box<dyn LibraryItem>),
        EntityKind::Album => library.album(id).map(|i| Box::new(i) as Box<dyn LibraryItem>),
        EntityKind::Playlist => library.playlist(id).map(|i| Box::new(i) as Box<dyn LibraryItem>),
        EntityKind::SmartPlaylist => library
            .smart_playlist(id)
            .map(|i| Box::new(i) as Box<dyn LibraryItem>),
        EntityKind::Podcast => library.podcast(id).map(|i| Box::new(i) as Box<dyn LibraryItem>),
        other => return Err(ApiError::UnsupportedType(other.to_string())),
    };
    item.ok_or(ApiError::NotFound(reference))
}

fn render(cli: &Cli, renderer: &Renderer<'_, MemoryLibrary>, ctx: &RenderContext) -> ApiResult<String> {
    let library = renderer.library();
    let kind: EntityKind = cli.kind.parse()?;
    let includes = IncludeSet::parse(&cli.include)?;

    if cli.feed {
        let id = match cli.ids.as_slice() {
            [id] => parse_id(id)?,
            _ => return Err(ApiError::InvalidIdentifier(cli.ids.join(","))),
        };
        let item = feed_item(library, EntityRef::new(kind, id))?;
        return renderer.podcast_feed(&*item, ctx);
    }

    if kind == EntityKind::Playlist && !cli.index {
        let playlists: Vec<PlaylistRef> = if cli.ids.is_empty() {
            let real = library.ids(EntityKind::Playlist).into_iter().map(PlaylistRef::Real);
            let smart = library
                .ids(EntityKind::SmartPlaylist)
                .into_iter()
                .map(PlaylistRef::Smart);
            real.chain(smart).collect()
        } else {
            cli.ids
                .iter()
                .map(|id| id.parse::<PlaylistRef>())
                .collect::<Result<_, _>>()?
        };
        return renderer.playlists(&playlists, &includes, ctx);
    }

    if cli.democratic {
        let ids = cli
            .ids
            .iter()
            .map(|id| parse_id(id))
            .collect::<ApiResult<Vec<_>>>()?;
        return renderer.democratic(&ids, ctx);
    }

    let ids = if cli.ids.is_empty() {
        library.ids(kind)
    } else {
        cli.ids
            .iter()
            .map(|id| parse_id(id))
            .collect::<ApiResult<Vec<_>>>()?
    };
    debug!(%kind, ids = ids.len(), index = cli.index, "Rendering request");
    if cli.index {
        renderer.indexes(kind, &ids, &includes, ctx)
    } else {
        renderer.render(kind, &ids, &includes, ctx)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli.config.log_level);

    if let Err(errors) = cli.config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let json = std::fs::read_to_string(&cli.catalog)
        .with_context(|| format!("failed to read catalog {}", cli.catalog.display()))?;
    let library = MemoryLibrary::from_json(&json)
        .with_context(|| format!("failed to parse catalog {}", cli.catalog.display()))?;
    info!(
        catalog = %cli.catalog.display(),
        objects = library.len(),
        "Loaded catalog"
    );

    let renderer = Renderer::new(&cli.config, &library)?;

    // An unknown format still gets an error document, in the default envelope.
    let (format, format_error) = match cli.format.parse::<Format>() {
        Ok(format) => (format, None),
        Err(e) => (Format::default(), Some(e)),
    };
    let ctx = cli.context(format);
    let result = match format_error {
        Some(e) => Err(e),
        None => render(&cli, &renderer, &ctx),
    };

    match result {
        Ok(document) => {
            println!("{}", document.trim_end());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            debug!(error = %e, code = e.code(), "Request failed");
            let document = renderer.error_document(&e, cli.action(), &ctx);
            println!("{}", document.trim_end());
            Ok(ExitCode::FAILURE)
        }
    }
}
