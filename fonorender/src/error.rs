//! Types d'erreurs du moteur de lecture

use fonomodel::ServiceError;
use thiserror::Error;

/// Failures reported by [`crate::PlaybackEngine`] operations.
///
/// Every public operation either completes with an observable transition or
/// reports exactly one of these kinds. Catalog and session failures from
/// the provider propagate through the transparent `Service` variant.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No content service bound")]
    NotBound,

    #[error("Already playing")]
    AlreadyPlaying,

    #[error("Not currently playing")]
    NotPlaying,

    #[error("No track loaded")]
    NoTrackLoaded,

    #[error("No playlist loaded")]
    NoPlaylistLoaded,

    #[error("Playlist is empty: {0}")]
    PlaylistEmpty(String),

    #[error("No previous track in history")]
    NoPreviousTrack,

    #[error("Stream setup failed: {0}")]
    StreamSetup(String),

    #[error("Player failed to confirm {0}")]
    PlayerConfirmation(&'static str),

    #[error("Content service not reachable: {0}")]
    Unreachable(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Type Result spécialisé pour le moteur de lecture
pub type Result<T> = std::result::Result<T, RenderError>;
