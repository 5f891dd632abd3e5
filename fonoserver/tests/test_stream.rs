use std::fs;

use fonomodel::{ContentService, ServiceError};
use fonoserver::MediaService;
use tempfile::TempDir;

const CLIENT: &str = "render-1";

/// Service complet sur un répertoire média de test
fn fixture(files: &[(&str, &[u8])]) -> (TempDir, TempDir, MediaService) {
    let media = tempfile::tempdir().unwrap();
    for (name, data) in files {
        fs::write(media.path().join(name), data).unwrap();
    }
    let playlists = tempfile::tempdir().unwrap();
    let service = MediaService::new(media.path(), playlists.path()).unwrap();
    (media, playlists, service)
}

#[test]
fn reads_chunks_up_to_exhaustion() {
    let (_media, _playlists, service) = fixture(&[("a.mp3", b"0123456789")]);

    service.open_stream("a.mp3", CLIENT).unwrap();
    assert_eq!(service.audio_chunk(CLIENT, 4).unwrap(), b"0123");
    assert_eq!(service.audio_chunk(CLIENT, 4).unwrap(), b"4567");
    assert_eq!(service.audio_chunk(CLIENT, 4).unwrap(), b"89");
    // Épuisement : chunk vide, session fermée dans le même appel.
    assert!(service.audio_chunk(CLIENT, 4).unwrap().is_empty());

    let err = service.audio_chunk(CLIENT, 4).unwrap_err();
    assert_eq!(err, ServiceError::NoActiveStream(CLIENT.to_string()));
    assert_eq!(service.streams().active_sessions(), 0);
}

#[test]
fn exhaustion_on_exact_chunk_boundary() {
    let (_media, _playlists, service) = fixture(&[("a.mp3", b"01234567")]);

    service.open_stream("a.mp3", CLIENT).unwrap();
    assert_eq!(service.audio_chunk(CLIENT, 4).unwrap().len(), 4);
    assert_eq!(service.audio_chunk(CLIENT, 4).unwrap().len(), 4);
    assert!(service.audio_chunk(CLIENT, 4).unwrap().is_empty());
    assert!(matches!(
        service.audio_chunk(CLIENT, 4),
        Err(ServiceError::NoActiveStream(_))
    ));
}

#[test]
fn open_unknown_track_fails_with_track_not_found() {
    let (_media, _playlists, service) = fixture(&[("a.mp3", b"aaaa")]);

    let err = service.open_stream("zz.mp3", CLIENT).unwrap_err();
    assert_eq!(err, ServiceError::TrackNotFound("zz.mp3".to_string()));
}

#[test]
fn blank_client_identity_is_rejected() {
    let (_media, _playlists, service) = fixture(&[("a.mp3", b"aaaa")]);

    for identity in ["", "   "] {
        let err = service.open_stream("a.mp3", identity).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidClientIdentity(_)));
    }
    // L'identité n'est vérifiée qu'après l'existence de la piste.
    let err = service.open_stream("zz.mp3", "").unwrap_err();
    assert!(matches!(err, ServiceError::TrackNotFound(_)));
}

#[test]
fn open_fails_with_io_when_the_file_is_gone() {
    let (media, _playlists, service) = fixture(&[("a.mp3", b"aaaa")]);
    fs::remove_file(media.path().join("a.mp3")).unwrap();

    let err = service.open_stream("a.mp3", CLIENT).unwrap_err();
    assert!(matches!(err, ServiceError::Io { .. }));
    assert_eq!(service.streams().active_sessions(), 0);
}

#[test]
fn reopen_replaces_the_previous_session() {
    let (_media, _playlists, service) = fixture(&[("a.mp3", b"aaaa"), ("b.mp3", b"bbbb")]);

    service.open_stream("a.mp3", CLIENT).unwrap();
    assert_eq!(service.audio_chunk(CLIENT, 2).unwrap(), b"aa");

    // Réouverture sous la même identité : une seule session, repositionnée
    // au début de la nouvelle piste.
    service.open_stream("b.mp3", CLIENT).unwrap();
    assert_eq!(service.streams().active_sessions(), 1);
    assert_eq!(service.audio_chunk(CLIENT, 4).unwrap(), b"bbbb");
}

#[test]
fn sessions_are_isolated_by_client_identity() {
    let (_media, _playlists, service) = fixture(&[("a.mp3", b"aaaa"), ("b.mp3", b"bbbb")]);

    service.open_stream("a.mp3", "render-1").unwrap();
    service.open_stream("b.mp3", "render-2").unwrap();
    assert_eq!(service.streams().active_sessions(), 2);

    assert_eq!(service.audio_chunk("render-1", 4).unwrap(), b"aaaa");
    assert_eq!(service.audio_chunk("render-2", 4).unwrap(), b"bbbb");
}

#[test]
fn close_is_idempotent() {
    let (_media, _playlists, service) = fixture(&[("a.mp3", b"aaaa")]);

    service.open_stream("a.mp3", CLIENT).unwrap();
    service.close_stream(CLIENT).unwrap();
    assert_eq!(service.streams().active_sessions(), 0);

    // Fermer sans session ouverte : no-op, pas d'erreur.
    service.close_stream(CLIENT).unwrap();
    assert!(matches!(
        service.audio_chunk(CLIENT, 4),
        Err(ServiceError::NoActiveStream(_))
    ));
}
