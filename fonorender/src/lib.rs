//! # fonorender - Machine à états de lecture FonoMusic
//!
//! Client-facing playback state machine. A [`PlaybackEngine`] holds a
//! capability handle on a remote content provider
//! ([`fonomodel::ContentService`]) and drives a local
//! [`AudioPlayer`] by feeding it a pull-based chunk source that forwards
//! each request to the provider's stream session.
//!
//! # Concurrency
//!
//! Commands (load, play, pause, stop, next, previous, ...) may arrive from
//! any thread, and the player's exhaustion notification fires from the
//! player's own pull thread. All mutations of the playback context go
//! through one mutex held for the whole transition, and the exhaustion
//! notification is enqueued as an event consumed by a dedicated worker
//! thread taking that same mutex — command handling and exhaustion handling
//! never interleave mid-transition.

mod engine;
mod error;
mod player;

pub use engine::{EngineOptions, PlaybackEngine};
pub use error::{RenderError, Result};
pub use player::{AudioPlayer, ChunkSource, ExhaustedHook};
