//! # Cadence API rendering
//!
//! Turns catalog objects into the documents the Cadence remote API
//! returns: XML in the default, RSS, XSPF and iTunes flavors, or JSON.
//!
//! ## Overview
//!
//! - [`Renderer`] is the entry point, with one operation per object type
//!   plus [`Renderer::indexes`], [`Renderer::democratic`] and
//!   [`Renderer::podcast_feed`].
//! - [`RenderContext`] carries everything request-specific: format,
//!   pagination [`Window`], user, session token and title.
//! - [`RenderConfig`] carries server-wide settings and reads them from
//!   `CADENCE_*` environment variables.
//! - [`Projector`] reduces each entity to an ordered record that both the
//!   XML and JSON writers consume, so the two formats cannot drift apart.
//! - [`DocumentAssembler`] owns envelopes and the error, empty, success,
//!   keyed-array and object-array documents.
//!
//! ## Example
//!
//! ```rust
//! use cadence_api::{Format, IncludeSet, RenderConfig, RenderContext, Renderer};
//! use cadence_model::{Album, MemoryLibrary, Song};
//!
//! let mut library = MemoryLibrary::new();
//! library.insert(Album { id: 10, name: "Geogaddi".into(), artist_count: 1, ..Default::default() });
//! library.insert(Song { id: 101, title: "Music Is Math".into(), album: 10, ..Default::default() });
//!
//! let config = RenderConfig::for_testing();
//! let renderer = Renderer::new(&config, &library)?;
//!
//! let includes = IncludeSet::parse("songs")?;
//! let xml = renderer.albums(&[10], &includes, &RenderContext::new(Format::default()))?;
//! assert!(xml.contains("<song id=\"101\">"));
//! # Ok::<(), cadence_api::ApiError>(())
//! ```

pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod feed;
pub mod include;
pub mod outcome;
pub mod pagination;
pub mod projection;
pub mod render;
pub mod tracks;
pub mod urls;

pub use config::RenderConfig;
pub use context::{ApiVersion, Format, RenderContext, Window, XmlFlavor};
pub use document::{DocumentAssembler, Envelope};
pub use error::{ApiError, ApiResult};
pub use include::{Include, IncludeExpander, IncludeSet};
pub use pagination::{Page, paginate};
pub use projection::{Projector, element_name};
pub use render::Renderer;
pub use tracks::TrackInfo;
pub use urls::UrlBuilder;

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins when set; otherwise every Cadence crate logs at `level`.
/// Output goes to stderr so rendered documents on stdout stay clean.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "cadence={level},cadence_api={level},cadence_serde={level},cadence_model={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
