//! Configuration de l'application FonoMusic

use std::path::PathBuf;
use std::{env, fs};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable overriding the configuration file path.
const ENV_CONFIG: &str = "FONOMUSIC_CONFIG";

/// Application configuration, loaded from a YAML file.
///
/// Every field has a default so a missing file (or an empty one) still
/// yields a usable configuration for a local run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FonoConfig {
    /// Directory holding the playable audio files.
    pub media_dir: PathBuf,
    /// Directory holding the `.playlist` descriptor files.
    pub playlists_dir: PathBuf,
    /// Client identity for stream sessions; empty means generate one.
    pub client_id: String,
    /// Bytes pulled per chunk by the sink player.
    pub chunk_size: usize,
    /// Pause between chunk pulls, to keep log output readable.
    pub throttle_ms: u64,
    /// Bound on the bind-time reachability probe.
    pub bind_timeout_ms: u64,
    /// How long the single-track part of the scenario plays.
    pub play_seconds: u64,
    /// Upper bound on the playlist auto-advance run.
    pub max_run_seconds: u64,
}

impl Default for FonoConfig {
    fn default() -> Self {
        FonoConfig {
            media_dir: PathBuf::from("media"),
            playlists_dir: PathBuf::from("playlists"),
            client_id: String::new(),
            chunk_size: 4096,
            throttle_ms: 20,
            bind_timeout_ms: 500,
            play_seconds: 5,
            max_run_seconds: 60,
        }
    }
}

impl FonoConfig {
    /// Loads the configuration from the first argument, falling back to the
    /// `FONOMUSIC_CONFIG` environment variable, then to built-in defaults.
    pub fn load() -> Result<Self> {
        let path = env::args().nth(1).or_else(|| env::var(ENV_CONFIG).ok());
        match path {
            Some(path) => {
                let raw = fs::read_to_string(&path)
                    .with_context(|| format!("cannot read configuration file '{}'", path))?;
                serde_yaml::from_str(&raw)
                    .with_context(|| format!("invalid configuration file '{}'", path))
            }
            None => Ok(FonoConfig::default()),
        }
    }
}
