//! # fonomodel - Modèle partagé du service FonoMusic
//!
//! Shared data model and remote-contract types used by both sides of the
//! FonoMusic service:
//!
//! - **fonoserver** implements the [`ContentService`] capability over its
//!   local catalogs and stream sessions,
//! - **fonorender** consumes it through a handle (`Arc<dyn ContentService>`)
//!   without knowing anything about the invocation channel.
//!
//! The transport itself (wire encoding, discovery, authentication) is
//! deliberately absent from this crate: a [`ContentService`] handle is the
//! whole remote contract.

mod error;
mod playlist;
mod service;
mod state;
mod track;

pub use error::{Result, ServiceError};
pub use playlist::Playlist;
pub use service::ContentService;
pub use state::{PlaybackState, PlaybackStatus};
pub use track::TrackInfo;
