use serde::{Deserialize, Serialize};

/// A named, ordered, owned sequence of track ids.
///
/// Playlists are loaded from descriptor files on the content provider side;
/// `track_ids` has already been filtered against the track catalog by the
/// time a `Playlist` reaches a consumer, so every id it carries resolves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    /// Creation time as unix seconds. 0 when the descriptor carried a date
    /// the provider could not parse (kept for compatibility with existing
    /// descriptor files; the provider logs a warning instead of rejecting).
    pub created_at: i64,
    /// Ordered track ids, all present in the provider's track catalog.
    pub track_ids: Vec<String>,
}

impl Playlist {
    pub fn len(&self) -> usize {
        self.track_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty()
    }
}
