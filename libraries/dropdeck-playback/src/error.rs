//! Error types for the playback controller

use thiserror::Error;

/// Hard failures surfaced by playback operations
///
/// These are reserved for contract violations and host-reported failures.
/// Expected invalid operations (out-of-bounds edits, navigation refused by
/// the loading gate) report through `bool` returns instead.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Gain fraction outside the valid range
    #[error("Gain out of range: {0} (must be within 0.0..=1.0)")]
    GainOutOfRange(f32),

    /// The host failed to decode a track
    #[error("Decode failed: {0}")]
    Decode(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlayerError>;
