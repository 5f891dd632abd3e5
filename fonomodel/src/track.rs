use serde::{Deserialize, Serialize};

/// A single playable item from the content provider's media directory.
///
/// The identifier is derived from the source filename and is stable for the
/// lifetime of the service; catalog entries are immutable after load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Stable identifier (the source filename).
    pub id: String,
    /// Human-readable title (the filename without its extension).
    pub title: String,
    /// Filename relative to the media directory.
    pub filename: String,
}
