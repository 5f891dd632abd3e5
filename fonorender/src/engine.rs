//! Moteur de lecture : navigation piste/playlist, historique, repeat

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Sender, unbounded};
use fonomodel::{ContentService, Playlist, PlaybackState, PlaybackStatus, TrackInfo};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::player::{AudioPlayer, ChunkSource, ExhaustedHook};
use crate::{RenderError, Result};

/// Tuning knobs of a render instance.
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Identity under which stream sessions are opened on the provider.
    pub client_id: String,
    /// Bound on the reachability probe performed by `bind`.
    pub bind_timeout: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            client_id: format!("fonorender-{}", Uuid::new_v4()),
            bind_timeout: Duration::from_millis(500),
        }
    }
}

/// Events delivered to the engine's worker thread.
enum EngineEvent {
    /// The player reported end-of-data for the current track.
    TrackExhausted,
    /// The engine is being dropped.
    Shutdown,
}

/// Playback state machine over a remote content provider and a local
/// player.
///
/// All playback context (current track, playlist, history, repeat, state)
/// lives behind one mutex; see the crate docs for the serialization model.
pub struct PlaybackEngine {
    state: Arc<Mutex<EngineState>>,
    events_tx: Sender<EngineEvent>,
    worker: Option<JoinHandle<()>>,
}

struct EngineState {
    server: Option<Arc<dyn ContentService>>,
    player: Box<dyn AudioPlayer>,
    client_id: String,
    bind_timeout: Duration,
    current_track: Option<TrackInfo>,
    current_playlist: Option<Playlist>,
    /// Index into `current_playlist.track_ids`; `None` when there is no
    /// position (no playlist, or the current track left the playlist via
    /// `previous`).
    playlist_position: Option<usize>,
    /// Ids of the tracks reached so far; popped by `previous`.
    playback_history: Vec<String>,
    repeat_mode: bool,
    playback_state: PlaybackState,
}

impl PlaybackEngine {
    /// Builds an engine around `player` with default [`EngineOptions`].
    ///
    /// The player is started here and shut down when the engine is dropped.
    pub fn new(player: Box<dyn AudioPlayer>) -> Self {
        Self::with_options(player, EngineOptions::default())
    }

    pub fn with_options(mut player: Box<dyn AudioPlayer>, options: EngineOptions) -> Self {
        player.start();

        let state = Arc::new(Mutex::new(EngineState {
            server: None,
            player,
            client_id: options.client_id,
            bind_timeout: options.bind_timeout,
            current_track: None,
            current_playlist: None,
            playlist_position: None,
            playback_history: Vec::new(),
            repeat_mode: false,
            playback_state: PlaybackState::Stopped,
        }));

        let (events_tx, events_rx) = unbounded();

        // Single-writer worker: exhaustion notifications are handled here,
        // under the same mutex as commands.
        let worker_state = Arc::clone(&state);
        let worker_tx = events_tx.clone();
        let worker = thread::spawn(move || {
            while let Ok(event) = events_rx.recv() {
                match event {
                    EngineEvent::Shutdown => break,
                    EngineEvent::TrackExhausted => {
                        let mut state = worker_state.lock().unwrap();
                        state.on_track_exhausted(&worker_tx);
                    }
                }
            }
        });

        PlaybackEngine {
            state,
            events_tx,
            worker: Some(worker),
        }
    }

    /// Stores the provider handle after probing its reachability within the
    /// configured bind timeout, and clears the playback history.
    ///
    /// Fails with `Unreachable` (the handle is not installed). Does not
    /// change the playback state; valid from any state.
    pub fn bind(&self, server: Arc<dyn ContentService>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        server
            .ping(state.bind_timeout)
            .map_err(|e| RenderError::Unreachable(e.to_string()))?;
        state.server = Some(server);
        state.playback_history.clear();
        info!("Bound to content service");
        Ok(())
    }

    /// Best-effort stop, then clears the provider handle, the playlist
    /// context, and the playback history. The current track is kept.
    pub fn unbind(&self) {
        let mut state = self.state.lock().unwrap();
        if let Err(e) = state.stop() {
            warn!("Ignoring stop failure during unbind: {}", e);
        }
        state.server = None;
        state.current_playlist = None;
        state.playlist_position = None;
        state.playback_history.clear();
        info!("Unbound content service");
    }

    /// Loads a single track, cancelling any playlist context.
    ///
    /// When currently playing, the metadata fetch is bracketed with a
    /// stop-then-resume so the playback state survives the reload.
    /// Propagates `TrackNotFound`; fails with `NotBound` when no provider
    /// is bound.
    pub fn load_track(&self, track_id: &str) -> Result<()> {
        self.state.lock().unwrap().load_track(track_id, &self.events_tx)
    }

    /// Loads a playlist and positions on its first track without starting
    /// playback.
    ///
    /// The history reset and the move to position 0 happen before the
    /// emptiness check: a `PlaylistEmpty` failure leaves the context
    /// partially reset. Propagates `PlaylistNotFound`.
    pub fn load_playlist(&self, playlist_id: &str) -> Result<()> {
        self.state.lock().unwrap().load_playlist(playlist_id)
    }

    /// Starts (or resumes) playback of the current track.
    ///
    /// From `Paused` this only resumes the local player — zero remote
    /// calls. Otherwise it opens a stream session under this engine's
    /// client identity, wires the player's chunk source to the provider,
    /// and confirms the player actually started.
    pub fn play(&self) -> Result<()> {
        self.state.lock().unwrap().play(&self.events_tx)
    }

    /// Stops playback and closes the remote stream session when a provider
    /// is bound. Transitions to `Stopped` regardless of the prior state.
    pub fn stop(&self) -> Result<()> {
        self.state.lock().unwrap().stop()
    }

    /// Pauses the local player. Fails with `NotPlaying` when it is not
    /// active.
    pub fn pause(&self) -> Result<()> {
        self.state.lock().unwrap().pause()
    }

    /// Advances to the next playlist entry, preserving the play/stop state.
    ///
    /// Past the last entry: wraps to the first under repeat mode, otherwise
    /// stays clamped on the last entry and returns without further change.
    pub fn next(&self) -> Result<()> {
        self.state.lock().unwrap().next(&self.events_tx)
    }

    /// Steps back through the playback history, preserving the play/stop
    /// state. Fails with `NoPreviousTrack` when the history holds fewer
    /// than two entries.
    pub fn previous(&self) -> Result<()> {
        self.state.lock().unwrap().previous(&self.events_tx)
    }

    /// Pure toggle of the repeat mode.
    pub fn set_repeat(&self, enabled: bool) {
        let mut state = self.state.lock().unwrap();
        state.repeat_mode = enabled;
        info!("Repeat mode: {}", if enabled { "ON" } else { "OFF" });
    }

    /// Snapshot of the playback state.
    pub fn status(&self) -> PlaybackStatus {
        let state = self.state.lock().unwrap();
        PlaybackStatus {
            state: state.playback_state,
            current_track_id: state
                .current_track
                .as_ref()
                .map(|t| t.id.clone())
                .unwrap_or_default(),
            repeat: state.repeat_mode,
        }
    }

    /// Metadata of the currently loaded track, if any.
    pub fn current_track(&self) -> Option<TrackInfo> {
        self.state.lock().unwrap().current_track.clone()
    }

    /// Id of the currently loaded playlist, if any.
    pub fn current_playlist_id(&self) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.current_playlist.as_ref().map(|p| p.id.clone())
    }

    /// Current index into the loaded playlist, if positioned.
    pub fn playlist_position(&self) -> Option<usize> {
        self.state.lock().unwrap().playlist_position
    }

    /// Snapshot of the playback history (track ids, oldest first).
    pub fn history(&self) -> Vec<String> {
        self.state.lock().unwrap().playback_history.clone()
    }

    /// True when a provider handle is installed.
    pub fn is_bound(&self) -> bool {
        self.state.lock().unwrap().server.is_some()
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        let _ = self.events_tx.send(EngineEvent::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        self.state.lock().unwrap().player.shutdown();
    }
}

impl EngineState {
    fn server(&self) -> Result<Arc<dyn ContentService>> {
        self.server.clone().ok_or(RenderError::NotBound)
    }

    fn remember_in_history(&mut self, track_id: &str) {
        // Whole-history containment, not a tail comparison: replaying a
        // track already seen anywhere leaves the history untouched.
        if !self.playback_history.iter().any(|id| id == track_id) {
            self.playback_history.push(track_id.to_string());
        }
    }

    fn load_track(&mut self, track_id: &str, tx: &Sender<EngineEvent>) -> Result<()> {
        let server = self.server()?;

        // Charger une piste individuelle annule le contexte de playlist.
        self.current_playlist = None;
        self.playlist_position = None;

        let was_playing = self.player.is_playing();
        if was_playing {
            self.stop()?;
        }

        let fetched = server.track_info(track_id);
        if let Ok(track) = &fetched {
            self.current_track = Some(track.clone());
        }

        if was_playing {
            // The resume half of the bracket runs even when the fetch
            // failed, so playback carries on with the previous track.
            if let Err(e) = self.play(tx) {
                if fetched.is_ok() {
                    return Err(e);
                }
                warn!("Failed to resume playback after load error: {}", e);
            }
        }

        let track = fetched?;
        info!("Current track set to: {}", track.title);
        Ok(())
    }

    fn load_playlist(&mut self, playlist_id: &str) -> Result<()> {
        let server = self.server()?;

        let playlist = server.playlist(playlist_id)?;
        let name = playlist.name.clone();
        let track_count = playlist.len();
        let first_id = playlist.track_ids.first().cloned();

        self.current_playlist = Some(playlist);
        self.playback_history.clear();
        // Position moves to 0 before the emptiness check; an empty playlist
        // leaves the context partially reset. Observable and tested.
        self.playlist_position = Some(0);

        let Some(first_id) = first_id else {
            return Err(RenderError::PlaylistEmpty(playlist_id.to_string()));
        };

        // Première piste chargée mais PAS lue.
        let track = server.track_info(&first_id)?;
        self.playback_history.push(track.id.clone());
        info!(
            "Loaded playlist '{}' with {} tracks. First track: {}",
            name, track_count, track.title
        );
        self.current_track = Some(track);
        Ok(())
    }

    fn play(&mut self, tx: &Sender<EngineEvent>) -> Result<()> {
        // En pause : simple reprise locale, aucun appel distant.
        if self.playback_state == PlaybackState::Paused {
            self.player.resume();
            self.playback_state = PlaybackState::Playing;
            info!("Resumed from pause");
            return Ok(());
        }

        if self.player.is_playing() {
            return Err(RenderError::AlreadyPlaying);
        }
        let server = self.server()?;
        let track = self
            .current_track
            .clone()
            .ok_or(RenderError::NoTrackLoaded)?;

        server.open_stream(&track.id, &self.client_id).map_err(|e| {
            error!("Error starting stream: {}", e);
            RenderError::StreamSetup(e.to_string())
        })?;

        let chunk_server = Arc::clone(&server);
        let chunk_client = self.client_id.clone();
        let source: ChunkSource = Box::new(move |size| {
            match chunk_server.audio_chunk(&chunk_client, size) {
                Ok(chunk) => chunk,
                Err(e) => {
                    // Remote read failures degrade to end-of-data locally;
                    // the provider side has already released the session.
                    error!("audio_chunk failed: {}", e);
                    Vec::new()
                }
            }
        });

        let hook_tx = tx.clone();
        let on_exhausted: ExhaustedHook = Box::new(move || {
            // Runs on the player's pull thread: only enqueue the event,
            // never touch the engine state from here.
            let _ = hook_tx.send(EngineEvent::TrackExhausted);
        });

        self.player.configure(source, on_exhausted);
        if !self.player.confirm_play_starts() {
            return Err(RenderError::PlayerConfirmation("play"));
        }

        self.playback_state = PlaybackState::Playing;
        self.remember_in_history(&track.id);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(server) = &self.server {
            if let Err(e) = server.close_stream(&self.client_id) {
                warn!("close_stream failed during stop: {}", e);
            }
        }
        if !self.player.stop() {
            return Err(RenderError::PlayerConfirmation("stop"));
        }
        self.playback_state = PlaybackState::Stopped;
        info!("Stopped");
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if !self.player.is_playing() {
            return Err(RenderError::NotPlaying);
        }
        self.player.pause();
        self.playback_state = PlaybackState::Paused;
        info!("Paused");
        Ok(())
    }

    fn next(&mut self, tx: &Sender<EngineEvent>) -> Result<()> {
        let playlist = self
            .current_playlist
            .clone()
            .ok_or(RenderError::NoPlaylistLoaded)?;

        let was_playing = self.playback_state == PlaybackState::Playing;
        if was_playing {
            self.stop()?;
        }

        // A position of None (current track outside the playlist) advances
        // to the first entry.
        let mut position = self.playlist_position.map_or(0, |p| p + 1);
        if position >= playlist.track_ids.len() {
            if self.repeat_mode {
                info!("Reached end of playlist, restarting (repeat mode)");
                position = 0;
            } else {
                info!("Already at end of playlist, staying at last track");
                self.playlist_position = Some(playlist.track_ids.len() - 1);
                return Ok(());
            }
        }
        self.playlist_position = Some(position);

        let server = self.server()?;
        let track = server.track_info(&playlist.track_ids[position])?;
        info!("Next track: {}", track.title);
        self.remember_in_history(&track.id);
        self.current_track = Some(track);

        if was_playing {
            self.play(tx)?;
        }
        Ok(())
    }

    fn previous(&mut self, tx: &Sender<EngineEvent>) -> Result<()> {
        if self.playback_history.len() < 2 {
            return Err(RenderError::NoPreviousTrack);
        }

        let was_playing = self.playback_state == PlaybackState::Playing;
        if was_playing {
            self.stop()?;
        }

        // Drop the current entry; the new tail is the target.
        self.playback_history.pop();
        let target = self
            .playback_history
            .last()
            .cloned()
            .expect("history holds at least one entry after pop");

        if let Some(playlist) = &self.current_playlist {
            // None when the target came from another playlist or a direct
            // track load.
            self.playlist_position = playlist.track_ids.iter().position(|id| id == &target);
        }

        let server = self.server()?;
        let track = server.track_info(&target)?;
        info!("Previous track: {}", track.title);
        self.current_track = Some(track);

        if was_playing {
            self.play(tx)?;
        }
        Ok(())
    }

    /// Advance/repeat policy applied when the player reports end-of-data.
    ///
    /// Runs on the worker thread under the engine mutex. There is no
    /// synchronous caller to report to: any failure degrades to a hard
    /// `Stopped` transition.
    fn on_track_exhausted(&mut self, tx: &Sender<EngineEvent>) {
        info!("Track exhausted, applying advance/repeat policy");
        if let Err(e) = self.advance_after_exhaustion(tx) {
            error!("Error handling track exhaustion: {}", e);
            self.playback_state = PlaybackState::Stopped;
        }
    }

    fn advance_after_exhaustion(&mut self, tx: &Sender<EngineEvent>) -> Result<()> {
        let Some(playlist) = self.current_playlist.clone() else {
            // Piste individuelle, sans playlist.
            if self.repeat_mode {
                info!("Track finished, repeating (repeat mode)");
                return self.play(tx);
            }
            info!("Track finished, stopping");
            self.playback_state = PlaybackState::Stopped;
            return Ok(());
        };

        let position = self.playlist_position.unwrap_or(0);
        if position + 1 < playlist.track_ids.len() {
            let next_position = position + 1;
            let server = self.server()?;
            let track = server.track_info(&playlist.track_ids[next_position])?;
            info!("Auto-advancing to next track: {}", track.title);
            self.playlist_position = Some(next_position);
            self.current_track = Some(track);
            self.play(tx)
        } else if self.repeat_mode {
            info!("End of playlist reached, restarting (repeat mode)");
            // A playlist left empty by a failed load has no entry to
            // restart from; the outer handler turns this into a stop.
            let first_id = playlist
                .track_ids
                .first()
                .ok_or_else(|| RenderError::PlaylistEmpty(playlist.id.clone()))?;
            let server = self.server()?;
            let track = server.track_info(first_id)?;
            self.playlist_position = Some(0);
            self.current_track = Some(track);
            self.play(tx)
        } else {
            info!("End of playlist reached, stopping");
            self.playback_state = PlaybackState::Stopped;
            Ok(())
        }
    }
}
