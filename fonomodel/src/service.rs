use std::time::Duration;

use crate::{Playlist, Result, TrackInfo};

/// Capability contract of the content provider, as consumed by a render
/// engine.
///
/// All calls are synchronous and blocking; only [`ContentService::ping`] is
/// time-bounded. Implementations must be shareable across threads: the
/// render engine issues chunk reads from the player's pull thread while
/// commands run on the dispatcher thread.
///
/// Streaming sessions are keyed by an opaque client identity string; the
/// provider keeps at most one open byte stream per identity.
pub trait ContentService: Send + Sync {
    /// Reachability probe used when a render engine binds to this provider.
    /// Must answer (or fail) within `timeout`.
    fn ping(&self, timeout: Duration) -> Result<()>;

    /// All catalog entries, in load order.
    fn all_tracks(&self) -> Result<Vec<TrackInfo>>;

    /// Metadata for one track. Fails with `TrackNotFound`.
    fn track_info(&self, track_id: &str) -> Result<TrackInfo>;

    /// All successfully loaded playlists, in load order.
    fn all_playlists(&self) -> Result<Vec<Playlist>>;

    /// One playlist by id. Fails with `PlaylistNotFound`.
    fn playlist(&self, playlist_id: &str) -> Result<Playlist>;

    /// Opens a byte stream on `track_id` for `client_id`, replacing any
    /// prior session registered under the same identity.
    ///
    /// Fails with `TrackNotFound`, `InvalidClientIdentity`, or `Io`.
    fn open_stream(&self, track_id: &str, client_id: &str) -> Result<()>;

    /// Reads up to `size` bytes from the client's open stream.
    ///
    /// An empty result signals exhaustion; the provider closes and
    /// deregisters the session before returning it. Fails with
    /// `NoActiveStream` when no session is registered for `client_id`,
    /// or `Io` on a read failure.
    fn audio_chunk(&self, client_id: &str, size: usize) -> Result<Vec<u8>>;

    /// Releases the client's stream if one is open. Idempotent.
    fn close_stream(&self, client_id: &str) -> Result<()>;
}
