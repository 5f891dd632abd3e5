//! # fonoserver - Fournisseur de contenu FonoMusic
//!
//! Content provider side of the FonoMusic service:
//!
//! - **TrackCatalog** : indexes playable files from a media directory,
//! - **PlaylistCatalog** : loads `.playlist` JSON descriptors, validated
//!   against the track catalog,
//! - **StreamSessionManager** : at most one open byte stream per client
//!   identity, shared across all connected clients,
//! - **MediaService** : ties the three together behind the
//!   [`fonomodel::ContentService`] capability contract.
//!
//! Both catalogs are built once at startup and stay immutable for the
//! lifetime of the service; only the session table mutates afterwards.

mod catalog;
mod playlists;
mod service;
mod stream;

pub use catalog::TrackCatalog;
pub use playlists::PlaylistCatalog;
pub use service::MediaService;
pub use stream::StreamSessionManager;
