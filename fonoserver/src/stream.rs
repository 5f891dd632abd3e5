//! Sessions de streaming : un flux ouvert au plus par identité client

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Mutex;

use fonomodel::{Result, ServiceError, TrackInfo};
use tracing::{error, info};

/// An open read handle positioned within one track's data.
struct StreamedFile {
    track: TrackInfo,
    file: File,
}

impl StreamedFile {
    fn open(track: &TrackInfo, media_dir: &Path) -> Result<Self> {
        let filepath = media_dir.join(&track.filename);
        let file = File::open(&filepath).map_err(|e| {
            error!("Error opening media file '{}': {}", track.filename, e);
            ServiceError::io(&track.filename, e)
        })?;
        Ok(StreamedFile {
            track: track.clone(),
            file,
        })
    }

    /// Reads up to `size` bytes from the current position. A zero-byte
    /// result means the track data is exhausted.
    fn read_chunk(&mut self, size: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; size];
        let n = self
            .file
            .read(&mut buf)
            .map_err(|e| ServiceError::io(&self.track.filename, e))?;
        buf.truncate(n);
        Ok(buf)
    }
}

/// Server-side registry of the open byte streams, keyed by client identity.
///
/// Shared across all concurrently connected clients; sessions are isolated
/// by identity but the total number of open handles is unbounded (no
/// backpressure). Session lifetime is bounded by
/// open → (read-to-exhaustion | explicit close | replacement).
pub struct StreamSessionManager {
    sessions: Mutex<HashMap<String, StreamedFile>>,
}

impl StreamSessionManager {
    pub fn new() -> Self {
        StreamSessionManager {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Opens a stream on `track` for `client_id`.
    ///
    /// Any prior session registered under the same identity is closed as
    /// part of the same insertion, so replacement cannot leak the previous
    /// handle.
    pub fn open(&self, track: &TrackInfo, media_dir: &Path, client_id: &str) -> Result<()> {
        if client_id.trim().is_empty() {
            return Err(ServiceError::InvalidClientIdentity(client_id.to_string()));
        }

        let streamed = StreamedFile::open(track, media_dir)?;
        let replaced = {
            let mut sessions = self.sessions.lock().unwrap();
            sessions.insert(client_id.to_string(), streamed)
        };
        if let Some(prev) = replaced {
            info!(
                "Replacing open stream on '{}' for client '{}'",
                prev.track.id, client_id
            );
        }
        info!("Open stream for track '{}' on client '{}'", track.id, client_id);
        Ok(())
    }

    /// Reads up to `size` bytes from the client's stream.
    ///
    /// When the read hits end-of-data, the session is closed and
    /// deregistered before the empty chunk is returned, so a subsequent
    /// call fails with `NoActiveStream`.
    pub fn read_chunk(&self, client_id: &str, size: usize) -> Result<Vec<u8>> {
        let mut sessions = self.sessions.lock().unwrap();
        let streamed = sessions
            .get_mut(client_id)
            .ok_or_else(|| ServiceError::NoActiveStream(client_id.to_string()))?;

        let chunk = streamed.read_chunk(size)?;
        if chunk.is_empty() {
            info!("Track exhausted: '{}'", streamed.track.id);
            sessions.remove(client_id);
        }
        Ok(chunk)
    }

    /// Releases the client's stream if one is open. No-op otherwise.
    pub fn close(&self, client_id: &str) {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.remove(client_id).is_some() {
            info!("Closed stream for client '{}'", client_id);
        }
    }

    /// Number of currently open sessions.
    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

impl Default for StreamSessionManager {
    fn default() -> Self {
        Self::new()
    }
}
