//! Catalogue des pistes disponibles dans le répertoire média

use std::collections::HashMap;
use std::path::Path;

use fonomodel::{Result, ServiceError, TrackInfo};
use tracing::info;

/// File extensions accepted as playable audio.
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "ogg", "flac", "wav"];

/// Immutable index of the playable items found in a media directory.
///
/// Entries are keyed by filename (which doubles as the track id) and kept
/// in lexicographic filename order. The catalog is built once at service
/// startup; there is no hot-reload.
#[derive(Debug)]
pub struct TrackCatalog {
    tracks: Vec<TrackInfo>,
    index: HashMap<String, usize>,
}

impl TrackCatalog {
    /// Scans `media_dir` and indexes every regular file with a known audio
    /// extension. Non-matching entries are skipped without error.
    pub fn load(media_dir: &Path) -> Result<Self> {
        let mut entries: Vec<_> = std::fs::read_dir(media_dir)
            .map_err(|e| ServiceError::io(media_dir.display().to_string(), e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect();
        entries.sort();

        let mut tracks = Vec::new();
        let mut index = HashMap::new();

        for path in entries {
            if !path.is_file() || !is_audio_file(&path) {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let title = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(filename)
                .to_string();

            index.insert(filename.to_string(), tracks.len());
            tracks.push(TrackInfo {
                id: filename.to_string(),
                title,
                filename: filename.to_string(),
            });
        }

        info!("Load media: {} tracks", tracks.len());
        Ok(TrackCatalog { tracks, index })
    }

    /// Metadata for one track. Fails with `TrackNotFound` when absent.
    pub fn get(&self, track_id: &str) -> Result<&TrackInfo> {
        self.index
            .get(track_id)
            .map(|&i| &self.tracks[i])
            .ok_or_else(|| ServiceError::TrackNotFound(track_id.to_string()))
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.index.contains_key(track_id)
    }

    /// All entries, in load (lexicographic filename) order.
    pub fn list(&self) -> &[TrackInfo] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_extension_matching_is_case_insensitive() {
        assert!(is_audio_file(Path::new("a.MP3")));
        assert!(is_audio_file(Path::new("b.flac")));
        assert!(!is_audio_file(Path::new("notes.txt")));
        assert!(!is_audio_file(Path::new("no_extension")));
    }
}
