//! Lecteur "puits" : tire les chunks et les jette, sans sortie audio

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use fonorender::{AudioPlayer, ChunkSource, ExhaustedHook};
use tracing::{debug, info};

/// Flags shared with the pull thread.
struct SinkShared {
    playing: AtomicBool,
    paused: AtomicBool,
    stop_requested: AtomicBool,
    bytes_pulled: AtomicU64,
}

/// [`AudioPlayer`] implementation that drains its chunk source on a pull
/// thread and fires the exhaustion hook at end-of-data.
///
/// Stands in for a real decode/output pipeline: useful for local runs and
/// for exercising the exhaustion path from a genuine player thread.
pub struct SinkPlayer {
    chunk_size: usize,
    throttle: Duration,
    shared: Arc<SinkShared>,
    configured: Option<(ChunkSource, ExhaustedHook)>,
    pull: Option<JoinHandle<()>>,
}

impl SinkPlayer {
    pub fn new(chunk_size: usize, throttle: Duration) -> Self {
        SinkPlayer {
            chunk_size,
            throttle,
            shared: Arc::new(SinkShared {
                playing: AtomicBool::new(false),
                paused: AtomicBool::new(false),
                stop_requested: AtomicBool::new(false),
                bytes_pulled: AtomicU64::new(0),
            }),
            configured: None,
            pull: None,
        }
    }

    fn join_pull_thread(&mut self) {
        self.shared.stop_requested.store(true, Ordering::SeqCst);
        if let Some(handle) = self.pull.take() {
            let _ = handle.join();
        }
    }
}

impl AudioPlayer for SinkPlayer {
    fn start(&mut self) {
        info!("SinkPlayer started");
    }

    fn shutdown(&mut self) {
        self.join_pull_thread();
        info!(
            "SinkPlayer shut down ({} bytes pulled)",
            self.shared.bytes_pulled.load(Ordering::SeqCst)
        );
    }

    fn is_playing(&self) -> bool {
        self.shared.playing.load(Ordering::SeqCst) && !self.shared.paused.load(Ordering::SeqCst)
    }

    fn configure(&mut self, source: ChunkSource, on_exhausted: ExhaustedHook) {
        self.configured = Some((source, on_exhausted));
    }

    fn confirm_play_starts(&mut self) -> bool {
        let Some((mut source, on_exhausted)) = self.configured.take() else {
            return false;
        };

        // A previous pull thread may still be winding down.
        self.join_pull_thread();

        let shared = Arc::clone(&self.shared);
        shared.playing.store(true, Ordering::SeqCst);
        shared.paused.store(false, Ordering::SeqCst);
        shared.stop_requested.store(false, Ordering::SeqCst);

        let chunk_size = self.chunk_size;
        let throttle = self.throttle;
        self.pull = Some(thread::spawn(move || {
            loop {
                if shared.stop_requested.load(Ordering::SeqCst) {
                    break;
                }
                if shared.paused.load(Ordering::SeqCst) {
                    thread::sleep(Duration::from_millis(10));
                    continue;
                }
                let chunk = source(chunk_size);
                if chunk.is_empty() {
                    debug!("Source exhausted");
                    shared.playing.store(false, Ordering::SeqCst);
                    if !shared.stop_requested.load(Ordering::SeqCst) {
                        on_exhausted();
                    }
                    return;
                }
                shared
                    .bytes_pulled
                    .fetch_add(chunk.len() as u64, Ordering::SeqCst);
                if !throttle.is_zero() {
                    thread::sleep(throttle);
                }
            }
            shared.playing.store(false, Ordering::SeqCst);
        }));
        true
    }

    fn resume(&mut self) {
        self.shared.paused.store(false, Ordering::SeqCst);
    }

    fn pause(&mut self) {
        self.shared.paused.store(true, Ordering::SeqCst);
    }

    fn stop(&mut self) -> bool {
        self.join_pull_thread();
        self.shared.playing.store(false, Ordering::SeqCst);
        self.shared.paused.store(false, Ordering::SeqCst);
        true
    }
}
