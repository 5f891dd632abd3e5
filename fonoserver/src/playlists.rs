//! Chargement des playlists depuis les fichiers descripteurs `.playlist`

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use fonomodel::{Playlist, Result, ServiceError};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::TrackCatalog;

/// Date format used by descriptor files, e.g. "25-12-2023".
const CREATED_AT_FORMAT: &str = "%d-%m-%Y";

/// Raw shape of a `.playlist` descriptor file (JSON).
///
/// Every field is optional in the file; `id` falls back to the file stem.
#[derive(Debug, Deserialize)]
struct PlaylistDescriptor {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    owner: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    track_ids: Vec<String>,
}

/// Immutable index of the playlists successfully loaded at startup.
pub struct PlaylistCatalog {
    playlists: Vec<Playlist>,
    index: HashMap<String, usize>,
}

impl PlaylistCatalog {
    /// Parses every `.playlist` file in `playlists_dir`, in lexicographic
    /// order. Each file is parsed independently: a failure is logged and
    /// that file skipped, loading continues with the rest.
    ///
    /// Track ids referencing entries absent from `catalog` are dropped from
    /// the loaded playlist.
    pub fn load(playlists_dir: &Path, catalog: &TrackCatalog) -> Result<Self> {
        let mut entries: Vec<_> = std::fs::read_dir(playlists_dir)
            .map_err(|e| ServiceError::io(playlists_dir.display().to_string(), e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect();
        entries.sort();

        let mut playlists: Vec<Playlist> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for path in entries {
            let is_descriptor = path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("playlist"));
            if !is_descriptor {
                continue;
            }

            let playlist = match load_descriptor(&path, catalog) {
                Ok(playlist) => playlist,
                Err(e) => {
                    error!(
                        "Error loading playlist '{}': {}",
                        path.file_name()
                            .and_then(|n| n.to_str())
                            .unwrap_or("<non-utf8>"),
                        e
                    );
                    continue;
                }
            };

            // Un descripteur portant un id déjà vu remplace le précédent.
            match index.get(&playlist.id) {
                Some(&i) => playlists[i] = playlist,
                None => {
                    index.insert(playlist.id.clone(), playlists.len());
                    playlists.push(playlist);
                }
            }
        }

        info!("Load playlists: {} playlists", playlists.len());
        Ok(PlaylistCatalog { playlists, index })
    }

    /// One playlist by id. Fails with `PlaylistNotFound` when absent.
    pub fn get(&self, playlist_id: &str) -> Result<&Playlist> {
        self.index
            .get(playlist_id)
            .map(|&i| &self.playlists[i])
            .ok_or_else(|| ServiceError::PlaylistNotFound(playlist_id.to_string()))
    }

    /// All successfully loaded playlists, in load order.
    pub fn list(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }
}

fn load_descriptor(path: &Path, catalog: &TrackCatalog) -> std::io::Result<Playlist> {
    let raw = std::fs::read_to_string(path)?;
    let descriptor: PlaylistDescriptor = serde_json::from_str(&raw)?;

    let id = descriptor.id.unwrap_or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string()
    });

    let (kept, dropped): (Vec<String>, Vec<String>) = descriptor
        .track_ids
        .into_iter()
        .partition(|track_id| catalog.contains(track_id));
    for track_id in &dropped {
        debug!("Playlist '{}': dropping unknown track id '{}'", id, track_id);
    }

    Ok(Playlist {
        created_at: parse_created_at(&id, &descriptor.created_at),
        id,
        name: descriptor.name,
        description: descriptor.description,
        owner: descriptor.owner,
        track_ids: kept,
    })
}

/// Parses the textual creation date of a descriptor.
///
/// An unparsable date degrades to 0 (epoch) so that existing descriptor
/// files keep loading; the loss is surfaced as a warning.
fn parse_created_at(playlist_id: &str, raw: &str) -> i64 {
    match NaiveDate::parse_from_str(raw, CREATED_AT_FORMAT) {
        Ok(date) => date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(0),
        Err(_) => {
            warn!(
                "Playlist '{}': unparsable created_at '{}', defaulting to epoch",
                playlist_id, raw
            );
            0
        }
    }
}
