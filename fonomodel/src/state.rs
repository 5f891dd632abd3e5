use serde::{Deserialize, Serialize};

/// High-level playback state of a render engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    /// Returns a human-readable label for the playback state.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Stopped => "STOPPED",
            PlaybackState::Playing => "PLAYING",
            PlaybackState::Paused => "PAUSED",
        }
    }
}

/// Snapshot returned by `PlaybackEngine::status()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    /// Id of the currently loaded track, empty string when none is loaded.
    pub current_track_id: String,
    pub repeat: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_labels() {
        assert_eq!(PlaybackState::Stopped.as_str(), "STOPPED");
        assert_eq!(PlaybackState::Playing.as_str(), "PLAYING");
        assert_eq!(PlaybackState::Paused.as_str(), "PAUSED");
    }

    #[test]
    fn status_serializes_with_plain_field_names() {
        let status = PlaybackStatus {
            state: PlaybackState::Playing,
            current_track_id: "a.mp3".to_string(),
            repeat: false,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "Playing");
        assert_eq!(json["current_track_id"], "a.mp3");
        assert_eq!(json["repeat"], false);
    }
}
