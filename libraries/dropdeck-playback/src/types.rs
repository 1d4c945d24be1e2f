//! Core types for the playlist player

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Entry in the playlist
///
/// A track pairs a display name with an opaque source handle (object URL,
/// file path, blob id) that only the audio backend knows how to open. The
/// controller never touches the audio data behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Source handle resolved by the audio backend
    pub source: String,

    /// Display name for the track list
    pub name: String,
}

/// Transport state derived by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// Playlist is empty
    Idle,

    /// A decode is in flight
    Loading,

    /// Audio is sounding
    Playing,

    /// Halted mid-track with a resume offset
    Paused,

    /// Halted at the start of the current track
    Stopped,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Initial volume (0-100, default: 100)
    pub volume: u8,

    /// Period between progress reports while playing (default: 900 ms)
    pub progress_interval: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: 100,
            progress_interval: Duration::from_millis(900),
        }
    }
}
