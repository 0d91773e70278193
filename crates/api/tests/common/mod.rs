//! Shared fixtures for the rendering integration tests.

#![allow(dead_code)]

use cadence_api::{Format, RenderConfig, RenderContext};
use cadence_model::MemoryLibrary;
use chrono::{DateTime, TimeZone, Utc};

pub const CATALOG: &str = r#"{
    "artists": [
        { "id": 1, "name": "Boards of Canada", "album_count": 1, "song_count": 3,
          "tags": [{ "id": 4, "name": "IDM" }, { "id": 4, "name": "IDM" }] },
        { "id": 2, "name": "Unsigned Hopeful" }
    ],
    "albums": [
        { "id": 10, "name": "Geogaddi", "artist_id": 1, "artist_name": "Boards of Canada",
          "artist_count": 1, "year": 2002, "song_count": 3, "disk": 1 }
    ],
    "songs": [
        { "id": 101, "title": "Ready Lets Go", "artist": 1, "artist_name": "Boards of Canada",
          "album": 10, "album_name": "Geogaddi", "album_artist": 1,
          "album_artist_name": "Boards of Canada", "track": 1, "time": 59, "disk": 1,
          "mime": "audio/mpeg", "size": 1400000, "addition_time": 1700000000 },
        { "id": 102, "title": "Music Is Math", "artist": 1, "artist_name": "Boards of Canada",
          "album": 10, "album_name": "Geogaddi", "album_artist": 1,
          "album_artist_name": "Boards of Canada", "track": 2, "time": 321, "disk": 1,
          "mime": "audio/mpeg", "size": 7700000 },
        { "id": 103, "title": "Beware the Friendly Stranger", "artist": 1,
          "artist_name": "Boards of Canada", "album": 10, "album_name": "Geogaddi",
          "album_artist": 1, "album_artist_name": "Boards of Canada", "track": 3,
          "time": 37, "disk": 1, "mime": "audio/mpeg", "size": 900000 }
    ],
    "playlists": [
        { "id": 4, "name": "Morning", "owner": "ada", "kind": "private",
          "items": [{ "object_type": "song", "object_id": 102 },
                    { "object_type": "song", "object_id": 101 }] }
    ],
    "smart_playlists": [
        { "id": 3, "name": "Recently added", "owner": "ada", "kind": "private" }
    ],
    "podcasts": [
        { "id": 9, "title": "Field Notes", "description": "Recordings", "owner_id": 7,
          "episodes": [90] }
    ],
    "podcast_episodes": [
        { "id": 90, "podcast": 9, "title": "Harbour", "author": "Ada", "mime": "audio/ogg",
          "time": 600, "size": 5000 }
    ],
    "videos": [{ "id": 30, "title": "Live", "mime": "video/mp4", "time": 120 }],
    "shares": [{ "id": 40, "object_name": "Geogaddi", "user_name": "ada",
                 "object_type": "album", "object_id": 10, "allow_stream": true }],
    "labels": [{ "id": 50, "name": "Warp", "artist_count": 1 }],
    "live_streams": [{ "id": 60, "name": "Radio", "url": "http://radio.test/live", "codec": "mp3" }],
    "users": [{ "id": 7, "username": "ada", "fullname": "Ada Lovelace" }],
    "counts": { "song": 250 },
    "ratings": [
        { "object_type": "song", "object_id": 101, "user": 7, "rating": 4 },
        { "object_type": "song", "object_id": 101, "user": 8, "rating": 2 }
    ],
    "flags": [{ "object_type": "song", "object_id": 102, "user": 7 }],
    "art": [{ "object_type": "album", "object_id": 10 }],
    "votes": [{ "object_type": "song", "object_id": 102, "votes": 3 }]
}"#;

pub fn library() -> MemoryLibrary {
    MemoryLibrary::from_json(CATALOG).expect("fixture catalog parses")
}

pub fn config() -> RenderConfig {
    RenderConfig::for_testing()
}

pub fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn context(format: Format) -> RenderContext {
    RenderContext::new(format).with_generated_at(generated_at())
}

/// Every format token the API accepts.
pub const FORMAT_TOKENS: [&str; 5] = ["xml", "rss", "xspf", "itunes", "json"];
