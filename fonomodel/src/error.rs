//! Types d'erreurs du contrat de service

use thiserror::Error;

/// Failures a [`crate::ContentService`] call can report to its caller.
///
/// Catalog and session lookup failures propagate unchanged to the immediate
/// caller; the render engine wraps them only where its own state machine
/// adds meaning (see `fonorender::RenderError`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    #[error("Invalid client identity: '{0}'")]
    InvalidClientIdentity(String),

    #[error("No open stream for client: {0}")]
    NoActiveStream(String),

    #[error("I/O error on '{file}': {message}")]
    Io { file: String, message: String },

    #[error("Content service unreachable: {0}")]
    Unreachable(String),
}

impl ServiceError {
    pub fn io(file: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ServiceError::Io {
            file: file.into(),
            message: err.to_string(),
        }
    }
}

/// Type Result spécialisé pour le contrat de service
pub type Result<T> = std::result::Result<T, ServiceError>;
