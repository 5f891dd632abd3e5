//! Scénario de contrôle FonoMusic : serveur + moteur de rendu en local
//!
//! Wires a [`MediaService`] and a [`PlaybackEngine`] together in-process and
//! drives the classic control scenario: list the catalog, bind, play a
//! single track for a few seconds, then load the first playlist and let the
//! auto-advance logic run it to completion.

mod config;
mod sink_player;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use fonomodel::{ContentService, PlaybackState};
use fonorender::{EngineOptions, PlaybackEngine};
use fonoserver::MediaService;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::FonoConfig;
use crate::sink_player::SinkPlayer;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = FonoConfig::load()?;
    info!(
        "FonoMusic starting (media: {}, playlists: {})",
        config.media_dir.display(),
        config.playlists_dir.display()
    );

    let service = Arc::new(
        MediaService::new(&config.media_dir, &config.playlists_dir)
            .context("failed to build the content service")?,
    );

    let tracks = service.all_tracks()?;
    info!("Tracks available: {}", tracks.len());
    for track in tracks.iter().take(5) {
        info!("  - {}", track.title);
    }
    if tracks.is_empty() {
        warn!("No tracks available, nothing to play");
        return Ok(());
    }

    let player = SinkPlayer::new(
        config.chunk_size,
        Duration::from_millis(config.throttle_ms),
    );
    let mut options = EngineOptions {
        bind_timeout: Duration::from_millis(config.bind_timeout_ms),
        ..EngineOptions::default()
    };
    if !config.client_id.is_empty() {
        options.client_id = config.client_id.clone();
    }
    let engine = PlaybackEngine::with_options(Box::new(player), options);

    engine.bind(Arc::clone(&service) as Arc<dyn ContentService>)?;

    // Une piste seule, quelques secondes.
    engine.load_track(&tracks[0].id)?;
    engine.play()?;
    info!("Playing '{}' for {}s", tracks[0].title, config.play_seconds);
    thread::sleep(Duration::from_secs(config.play_seconds));
    engine.stop()?;

    // Puis la première playlist, en laissant l'auto-advance dérouler.
    let playlists = service.all_playlists()?;
    if let Some(playlist) = playlists.first() {
        info!(
            "Running playlist '{}' ({} tracks) to completion",
            playlist.name,
            playlist.len()
        );
        engine.load_playlist(&playlist.id)?;
        engine.play()?;

        let deadline = Instant::now() + Duration::from_secs(config.max_run_seconds);
        while engine.status().state != PlaybackState::Stopped && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(100));
        }
        if engine.status().state != PlaybackState::Stopped {
            warn!("Playlist still running at deadline, stopping");
            engine.stop()?;
        }
    } else {
        info!("No playlists available, skipping the playlist scenario");
    }

    info!("Scenario finished");
    Ok(())
}
