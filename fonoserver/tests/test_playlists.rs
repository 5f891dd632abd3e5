use std::fs;
use std::path::Path;

use fonomodel::ServiceError;
use fonoserver::{PlaylistCatalog, TrackCatalog};
use tempfile::TempDir;

/// Catalogue de trois pistes : a.mp3, b.mp3, c.mp3
fn fixture_catalog() -> (TempDir, TrackCatalog) {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.mp3", "b.mp3", "c.mp3"] {
        fs::write(dir.path().join(name), b"audio").unwrap();
    }
    let catalog = TrackCatalog::load(dir.path()).unwrap();
    (dir, catalog)
}

fn write_descriptor(dir: &Path, filename: &str, json: &str) {
    fs::write(dir.join(filename), json).unwrap();
}

#[test]
fn unknown_track_ids_are_dropped_silently() {
    let (_media, catalog) = fixture_catalog();
    let dir = tempfile::tempdir().unwrap();
    write_descriptor(
        dir.path(),
        "mix.playlist",
        r#"{"id": "mix", "name": "Mix", "created_at": "01-06-2024",
            "track_ids": ["a.mp3", "b.mp3", "x.mp3"]}"#,
    );

    let playlists = PlaylistCatalog::load(dir.path(), &catalog).unwrap();
    let mix = playlists.get("mix").unwrap();
    assert_eq!(mix.track_ids, vec!["a.mp3", "b.mp3"]);
}

#[test]
fn all_invalid_ids_yield_an_empty_playlist() {
    let (_media, catalog) = fixture_catalog();
    let dir = tempfile::tempdir().unwrap();
    write_descriptor(
        dir.path(),
        "ghost.playlist",
        r#"{"id": "ghost", "track_ids": ["x.mp3", "y.mp3"]}"#,
    );

    let playlists = PlaylistCatalog::load(dir.path(), &catalog).unwrap();
    assert!(playlists.get("ghost").unwrap().is_empty());
}

#[test]
fn a_parse_failure_skips_only_that_file() {
    let (_media, catalog) = fixture_catalog();
    let dir = tempfile::tempdir().unwrap();
    write_descriptor(dir.path(), "bad.playlist", "{not json at all");
    write_descriptor(
        dir.path(),
        "good.playlist",
        r#"{"id": "good", "track_ids": ["a.mp3"]}"#,
    );

    let playlists = PlaylistCatalog::load(dir.path(), &catalog).unwrap();
    assert_eq!(playlists.len(), 1);
    assert!(playlists.get("good").is_ok());
}

#[test]
fn id_defaults_to_the_file_stem() {
    let (_media, catalog) = fixture_catalog();
    let dir = tempfile::tempdir().unwrap();
    write_descriptor(
        dir.path(),
        "road-trip.playlist",
        r#"{"name": "Road Trip", "track_ids": ["c.mp3"]}"#,
    );

    let playlists = PlaylistCatalog::load(dir.path(), &catalog).unwrap();
    let playlist = playlists.get("road-trip").unwrap();
    assert_eq!(playlist.name, "Road Trip");
    assert_eq!(playlist.track_ids, vec!["c.mp3"]);
}

#[test]
fn created_at_parses_or_defaults_to_epoch() {
    let (_media, catalog) = fixture_catalog();
    let dir = tempfile::tempdir().unwrap();
    write_descriptor(
        dir.path(),
        "dated.playlist",
        r#"{"id": "dated", "created_at": "02-01-1970", "track_ids": ["a.mp3"]}"#,
    );
    write_descriptor(
        dir.path(),
        "undated.playlist",
        r#"{"id": "undated", "created_at": "June 2024", "track_ids": ["a.mp3"]}"#,
    );

    let playlists = PlaylistCatalog::load(dir.path(), &catalog).unwrap();
    assert_eq!(playlists.get("dated").unwrap().created_at, 86_400);
    // Date invalide : epoch, pas d'erreur.
    assert_eq!(playlists.get("undated").unwrap().created_at, 0);
}

#[test]
fn non_playlist_files_are_ignored() {
    let (_media, catalog) = fixture_catalog();
    let dir = tempfile::tempdir().unwrap();
    write_descriptor(dir.path(), "readme.txt", "not a playlist");
    write_descriptor(
        dir.path(),
        "mix.playlist",
        r#"{"id": "mix", "track_ids": ["a.mp3"]}"#,
    );

    let playlists = PlaylistCatalog::load(dir.path(), &catalog).unwrap();
    assert_eq!(playlists.len(), 1);
}

#[test]
fn get_unknown_playlist_fails_with_playlist_not_found() {
    let (_media, catalog) = fixture_catalog();
    let dir = tempfile::tempdir().unwrap();

    let playlists = PlaylistCatalog::load(dir.path(), &catalog).unwrap();
    let err = playlists.get("nope").unwrap_err();
    assert_eq!(err, ServiceError::PlaylistNotFound("nope".to_string()));
}

#[test]
fn descriptors_load_in_lexicographic_order() {
    let (_media, catalog) = fixture_catalog();
    let dir = tempfile::tempdir().unwrap();
    write_descriptor(dir.path(), "zz.playlist", r#"{"id": "zz", "track_ids": []}"#);
    write_descriptor(dir.path(), "aa.playlist", r#"{"id": "aa", "track_ids": []}"#);

    let playlists = PlaylistCatalog::load(dir.path(), &catalog).unwrap();
    let ids: Vec<&str> = playlists.list().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["aa", "zz"]);
}
