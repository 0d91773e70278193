use cadence_model::{
    Catalog, Entity, EntityKind, EntityRef, LibraryItem, MemoryLibrary, ModelError, PlaylistRef,
    UserActivity,
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const SNAPSHOT: &str = r#"{
    "artists": [{ "id": 1, "name": "Boards of Canada", "album_count": 1, "song_count": 2 }],
    "albums": [{ "id": 5, "name": "Geogaddi", "artist_id": 1, "artist_name": "Boards of Canada", "artist_count": 1 }],
    "songs": [
        { "id": 102, "title": "Music Is Math", "artist": 1, "album": 5, "track": 2 },
        { "id": 101, "title": "Ready Lets Go", "artist": 1, "album": 5, "track": 1 }
    ],
    "smart_playlists": [{ "id": 3, "name": "Recently added", "kind": "public" }],
    "podcasts": [{ "id": 9, "title": "Field Notes", "episodes": [90, 91] }],
    "counts": { "song": 250 },
    "ratings": [{ "object_type": "song", "object_id": 101, "user": 7, "rating": 4 }],
    "flags": [{ "object_type": "song", "object_id": 101, "user": 7 }],
    "art": [{ "object_type": "album", "object_id": 5 }]
}"#;

#[test]
fn test_snapshot_loads_entities_and_activity() -> Result<()> {
    let library = MemoryLibrary::from_json(SNAPSHOT)?;

    assert_eq!(library.count(EntityKind::Song), 250);
    assert_eq!(library.count(EntityKind::Artist), 1);
    assert_eq!(library.songs_by_album(5), vec![101, 102]);
    assert_eq!(library.albums_by_artist(1), vec![5]);
    assert_eq!(library.songs_by_artist(1), vec![101, 102]);

    let song = EntityRef::new(EntityKind::Song, 101);
    assert_eq!(library.user_rating(song, 7), Some(4));
    assert!(library.is_flagged(song, 7));
    assert!(!library.is_flagged(song, 8));
    assert!(library.has_art(EntityRef::new(EntityKind::Album, 5)));
    Ok(())
}

#[test]
fn test_smart_playlist_resolves_through_playlist_ref() -> Result<()> {
    let library = MemoryLibrary::from_json(SNAPSHOT)?;
    let reference: PlaylistRef = "smart_3".parse()?;

    match library.playlist_ref(reference) {
        Some(Entity::SmartPlaylist(playlist)) => assert_eq!(playlist.name, "Recently added"),
        other => panic!("expected smart playlist, got {:?}", other),
    }
    assert!(library.playlist_ref(PlaylistRef::Real(3)).is_none());
    Ok(())
}

#[test]
fn test_library_item_medias() -> Result<()> {
    let library = MemoryLibrary::from_json(SNAPSHOT)?;

    let podcast = library.podcast(9).ok_or("missing podcast")?;
    let episodes: Vec<u64> = podcast.medias(&library).iter().map(|r| r.id).collect();
    assert_eq!(episodes, vec![90, 91]);

    let album = library.album(5).ok_or("missing album")?;
    assert_eq!(album.full_name(), "Geogaddi");
    assert_eq!(album.medias(&library).len(), 2);
    Ok(())
}

#[test]
fn test_malformed_snapshot_is_an_error() {
    let err = MemoryLibrary::from_json("{\"songs\": 3}").unwrap_err();
    assert!(matches!(err, ModelError::Snapshot(_)));
}
