//! Implémentation locale du contrat [`ContentService`]

use std::path::{Path, PathBuf};
use std::time::Duration;

use fonomodel::{ContentService, Playlist, Result, TrackInfo};
use tracing::debug;

use crate::{PlaylistCatalog, StreamSessionManager, TrackCatalog};

/// The content provider: both catalogs plus the stream session registry,
/// built once from a media directory and a playlists directory.
///
/// Catalogs never change after construction; the session table is the only
/// mutable state and is internally synchronized, so `MediaService` is
/// freely shareable (`Arc<MediaService>`) between render engines.
pub struct MediaService {
    media_dir: PathBuf,
    tracks: TrackCatalog,
    playlists: PlaylistCatalog,
    streams: StreamSessionManager,
}

impl MediaService {
    pub fn new(media_dir: &Path, playlists_dir: &Path) -> Result<Self> {
        let tracks = TrackCatalog::load(media_dir)?;
        let playlists = PlaylistCatalog::load(playlists_dir, &tracks)?;
        Ok(MediaService {
            media_dir: media_dir.to_path_buf(),
            tracks,
            playlists,
            streams: StreamSessionManager::new(),
        })
    }

    pub fn tracks(&self) -> &TrackCatalog {
        &self.tracks
    }

    pub fn playlists(&self) -> &PlaylistCatalog {
        &self.playlists
    }

    pub fn streams(&self) -> &StreamSessionManager {
        &self.streams
    }
}

impl ContentService for MediaService {
    fn ping(&self, _timeout: Duration) -> Result<()> {
        // In-process implementation: reachable by construction.
        Ok(())
    }

    fn all_tracks(&self) -> Result<Vec<TrackInfo>> {
        Ok(self.tracks.list().to_vec())
    }

    fn track_info(&self, track_id: &str) -> Result<TrackInfo> {
        self.tracks.get(track_id).cloned()
    }

    fn all_playlists(&self) -> Result<Vec<Playlist>> {
        Ok(self.playlists.list().to_vec())
    }

    fn playlist(&self, playlist_id: &str) -> Result<Playlist> {
        self.playlists.get(playlist_id).cloned()
    }

    fn open_stream(&self, track_id: &str, client_id: &str) -> Result<()> {
        // Track existence is checked before the identity, so an unknown
        // track reports TrackNotFound even with a malformed identity.
        let track = self.tracks.get(track_id)?.clone();
        self.streams.open(&track, &self.media_dir, client_id)
    }

    fn audio_chunk(&self, client_id: &str, size: usize) -> Result<Vec<u8>> {
        debug!("audio_chunk({}, {})", client_id, size);
        self.streams.read_chunk(client_id, size)
    }

    fn close_stream(&self, client_id: &str) -> Result<()> {
        self.streams.close(client_id);
        Ok(())
    }
}
