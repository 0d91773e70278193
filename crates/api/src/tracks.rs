//! Track entries for the XSPF, iTunes and RSS flavors.
//!
//! Media objects (songs, videos, podcast episodes) are first reduced to a
//! [`TrackInfo`], then written in the shape each flavor expects.

use cadence_model::{Catalog, Entity, EntityKind, EntityRef};
use cadence_serde::xml::XmlStreamWriter;
use chrono::{DateTime, Utc};

use crate::config::RenderConfig;
use crate::context::{RenderContext, XmlFlavor};
use crate::urls::UrlBuilder;

/// The playable facts about a media object that track entries and feed
/// items are built from.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInfo {
    pub reference: EntityRef,
    /// Object whose art represents this track.
    pub art: EntityRef,
    pub title: String,
    pub creator: String,
    pub album: String,
    pub track: Option<u32>,
    pub year: Option<u32>,
    /// Duration in seconds.
    pub time: u32,
    pub size: u64,
    pub mime: String,
    pub description: String,
    pub added: Option<DateTime<Utc>>,
}

fn timestamp(secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.and_then(|secs| DateTime::from_timestamp(secs, 0))
}

impl TrackInfo {
    /// Reduces a media entity. Returns `None` for non-media kinds.
    pub fn from_entity(entity: &Entity, catalog: &dyn Catalog, config: &RenderConfig) -> Option<Self> {
        match entity {
            Entity::Song(song) => Some(Self {
                reference: EntityRef::new(EntityKind::Song, song.id),
                art: if config.show_song_art {
                    EntityRef::new(EntityKind::Song, song.id)
                } else {
                    EntityRef::new(EntityKind::Album, song.album)
                },
                title: song.title.clone(),
                creator: song.artist_name.clone(),
                album: song.album_name.clone(),
                track: Some(song.track),
                year: (song.year > 0).then_some(song.year),
                time: song.time,
                size: song.size,
                mime: song.mime.clone(),
                description: song.comment.clone(),
                added: timestamp(song.addition_time),
            }),
            Entity::Video(video) => Some(Self {
                reference: EntityRef::new(EntityKind::Video, video.id),
                art: EntityRef::new(EntityKind::Video, video.id),
                title: video.title.clone(),
                creator: String::new(),
                album: String::new(),
                track: None,
                year: None,
                time: video.time,
                size: video.size,
                mime: video.mime.clone(),
                description: String::new(),
                added: timestamp(video.addition_time),
            }),
            Entity::PodcastEpisode(episode) => Some(Self {
                reference: EntityRef::new(EntityKind::PodcastEpisode, episode.id),
                art: EntityRef::new(EntityKind::Podcast, episode.podcast),
                title: episode.title.clone(),
                creator: episode.author.clone(),
                album: catalog
                    .podcast(episode.podcast)
                    .map(|podcast| podcast.title)
                    .unwrap_or_default(),
                track: None,
                year: None,
                time: episode.time,
                size: episode.size,
                mime: episode.mime.clone(),
                description: episode.description.clone(),
                added: timestamp(episode.addition_time),
            }),
            _ => None,
        }
    }

    /// Duration as `m:ss`.
    pub fn duration(&self) -> String {
        format!("{}:{:02}", self.time / 60, self.time % 60)
    }
}

/// Writes `track` as an entry of `flavor`. The root flavor has no track
/// form and writes nothing.
pub fn write_track(
    writer: &mut XmlStreamWriter,
    flavor: XmlFlavor,
    track: &TrackInfo,
    urls: &UrlBuilder,
    ctx: &RenderContext,
) -> cadence_serde::Result<()> {
    let url = urls.play(track.reference, ctx.auth.as_deref(), ctx.user_id);
    match flavor {
        XmlFlavor::Root => Ok(()),
        XmlFlavor::Xspf => write_xspf(writer, track, &url, urls, ctx),
        XmlFlavor::Itunes => write_itunes(writer, track, &url),
        XmlFlavor::Rss => write_rss(writer, track, &url, urls),
    }
}

fn write_xspf(
    writer: &mut XmlStreamWriter,
    track: &TrackInfo,
    url: &str,
    urls: &UrlBuilder,
    ctx: &RenderContext,
) -> cadence_serde::Result<()> {
    writer.start("track", &[])?;
    writer.plain_element("location", url)?;
    writer.plain_element("identifier", &urls.link(track.reference))?;
    writer.text_element("title", &[], &track.title)?;
    if !track.creator.is_empty() {
        writer.text_element("creator", &[], &track.creator)?;
    }
    writer.plain_element("image", &urls.art(track.art, ctx.auth.as_deref()))?;
    if !track.album.is_empty() {
        writer.text_element("album", &[], &track.album)?;
    }
    if let Some(number) = track.track.filter(|n| *n > 0) {
        writer.number_element("trackNum", &[], number)?;
    }
    writer.number_element("duration", &[], u64::from(track.time) * 1000)?;
    writer.end("track")
}

fn write_itunes(writer: &mut XmlStreamWriter, track: &TrackInfo, url: &str) -> cadence_serde::Result<()> {
    let id = track.reference.id;
    writer.number_element("key", &[], id)?;
    writer.start("dict", &[])?;
    writer.plain_element("key", "Track ID")?;
    writer.number_element("integer", &[], id)?;
    writer.plain_element("key", "Name")?;
    writer.plain_element("string", &track.title)?;
    writer.plain_element("key", "Artist")?;
    writer.plain_element("string", &track.creator)?;
    writer.plain_element("key", "Album")?;
    writer.plain_element("string", &track.album)?;
    writer.plain_element("key", "Total Time")?;
    writer.number_element("integer", &[], u64::from(track.time) * 1000)?;
    if let Some(number) = track.track.filter(|n| *n > 0) {
        writer.plain_element("key", "Track Number")?;
        writer.number_element("integer", &[], number)?;
    }
    if let Some(year) = track.year {
        writer.plain_element("key", "Year")?;
        writer.number_element("integer", &[], year)?;
    }
    if let Some(added) = track.added {
        writer.plain_element("key", "Date Added")?;
        writer.plain_element("date", &added.format("%Y-%m-%dT%H:%M:%SZ").to_string())?;
    }
    writer.plain_element("key", "Size")?;
    writer.number_element("integer", &[], track.size)?;
    writer.plain_element("key", "Kind")?;
    writer.plain_element("string", &track.mime)?;
    writer.plain_element("key", "Location")?;
    writer.plain_element("string", url)?;
    writer.end("dict")
}

fn write_rss(
    writer: &mut XmlStreamWriter,
    track: &TrackInfo,
    url: &str,
    urls: &UrlBuilder,
) -> cadence_serde::Result<()> {
    writer.start("item", &[])?;
    writer.text_element("title", &[], &track.title)?;
    writer.plain_element("link", url)?;
    let description = if track.description.is_empty() {
        [track.creator.as_str(), track.album.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" - ")
    } else {
        track.description.clone()
    };
    writer.text_element("description", &[], &description)?;
    writer.plain_element("guid", &urls.link(track.reference))?;
    if let Some(added) = track.added {
        writer.plain_element("pubDate", &added.to_rfc2822())?;
    }
    writer.end("item")
}
