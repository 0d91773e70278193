//! Render configuration.
//!
//! Server-wide settings that shape every document: where URLs point, what
//! the banners say, and which optional fields are emitted. Values come from
//! command line flags, environment variables, or code.
//!
//! Switches accept an explicit value, so a default-on switch can be turned
//! off from the command line: `--custom-metadata false`.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CADENCE_WEB_PATH` | http://localhost/cadence | Base URL for art and play links |
//! | `CADENCE_SITE_TITLE` | Cadence | Site name used in banners and playlist titles |
//! | `CADENCE_SITE_CHARSET` | UTF-8 | Encoding declared by the default envelope |
//! | `CADENCE_VERSION` | crate version | Server version shown in banners |
//! | `CADENCE_SHOW_SONG_ART` | false | Use per-song art instead of album art |
//! | `CADENCE_ALLOW_GROUP_DISKS` | false | Report disk set size as album disk count |
//! | `CADENCE_CUSTOM_METADATA` | true | Append custom song metadata fields |
//! | `CADENCE_LOG_LEVEL` | info | Log level |
//!
//! # Example
//!
//! ```rust
//! use cadence_api::RenderConfig;
//!
//! let config = RenderConfig {
//!     site_title: "Basement Radio".to_string(),
//!     show_song_art: true,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use clap::{ArgAction, Parser};
use url::Url;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Settings shared by every render call.
#[derive(Debug, Clone, Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence API document renderer")]
pub struct RenderConfig {
    /// Base URL that art and play links are built from.
    #[arg(long, env = "CADENCE_WEB_PATH", default_value = "http://localhost/cadence")]
    pub web_path: String,

    /// Site name used in banners and default playlist titles.
    #[arg(long, env = "CADENCE_SITE_TITLE", default_value = "Cadence")]
    pub site_title: String,

    /// Character encoding declared by the default XML envelope.
    #[arg(long, env = "CADENCE_SITE_CHARSET", default_value = "UTF-8")]
    pub site_charset: String,

    /// Server version shown in generator banners.
    #[arg(long = "server-version", env = "CADENCE_VERSION", default_value = env!("CARGO_PKG_VERSION"))]
    pub server_version: String,

    /// Point song art at the song instead of its album.
    #[arg(
        long,
        env = "CADENCE_SHOW_SONG_ART",
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub show_song_art: bool,

    /// Report an album's disk set size as its disk count.
    #[arg(
        long,
        env = "CADENCE_ALLOW_GROUP_DISKS",
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub allow_group_disks: bool,

    /// Append custom metadata fields to songs.
    #[arg(
        long,
        env = "CADENCE_CUSTOM_METADATA",
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub custom_metadata: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "CADENCE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            web_path: "http://localhost/cadence".to_string(),
            site_title: "Cadence".to_string(),
            site_charset: "UTF-8".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            show_song_art: false,
            allow_group_disks: false,
            custom_metadata: true,
            log_level: "info".to_string(),
        }
    }
}

impl RenderConfig {
    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        match Url::parse(&self.web_path) {
            Ok(url) if url.cannot_be_a_base() => {
                errors.push(format!("Web path '{}' cannot be used as a base URL", self.web_path));
            }
            Ok(_) => {}
            Err(e) => errors.push(format!("Web path '{}' is not a URL: {}", self.web_path, e)),
        }

        if self.site_charset.trim().is_empty() {
            errors.push("Site charset cannot be empty".to_string());
        }

        if self.site_title.trim().is_empty() {
            errors.push("Site title cannot be empty".to_string());
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "Log level '{}' must be one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses a fixed host and version so rendered documents are stable.
    pub fn for_testing() -> Self {
        Self {
            web_path: "http://music.test".to_string(),
            site_title: "Cadence".to_string(),
            site_charset: "UTF-8".to_string(),
            server_version: "test".to_string(),
            show_song_art: false,
            allow_group_disks: false,
            custom_metadata: true,
            log_level: "debug".to_string(),
        }
    }
}
