//! Contrat du lecteur audio local

/// Pull-based source of audio data handed to the player.
///
/// The player calls it with the number of bytes it wants; an empty result
/// signals end-of-data.
pub type ChunkSource = Box<dyn FnMut(usize) -> Vec<u8> + Send>;

/// Notification fired by the player once the configured source is
/// exhausted. Runs on the player's own execution context.
pub type ExhaustedHook = Box<dyn Fn() + Send + Sync>;

/// Narrow contract of the local decode/output subsystem.
///
/// The real audio pipeline lives outside this crate; the engine only needs
/// lifecycle control, a configuration point for its chunk source and
/// exhaustion hook, and confirmations for the transitions it cannot observe
/// directly.
pub trait AudioPlayer: Send {
    /// Brings the player up. Called once when the engine takes ownership.
    fn start(&mut self);

    /// Tears the player down. Called when the engine is dropped.
    fn shutdown(&mut self);

    /// True while the player is actively consuming its source.
    fn is_playing(&self) -> bool;

    /// Installs the chunk source and exhaustion hook for the next playback.
    fn configure(&mut self, source: ChunkSource, on_exhausted: ExhaustedHook);

    /// Starts playback of the configured source; true when playback
    /// demonstrably started.
    fn confirm_play_starts(&mut self) -> bool;

    /// Resumes after [`AudioPlayer::pause`].
    fn resume(&mut self);

    /// Suspends playback without releasing the source.
    fn pause(&mut self);

    /// Stops playback; true when the stop was confirmed.
    fn stop(&mut self) -> bool;
}
