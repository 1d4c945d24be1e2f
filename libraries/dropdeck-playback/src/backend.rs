//! Host audio stack contracts
//!
//! The controller drives decoding and output through these traits and
//! never touches raw samples. Decoding is asynchronous and host-completed:
//! the controller calls [`AudioBackend::begin_decode`], the host does the
//! work on its own schedule and reports the outcome through
//! [`PlaybackController::finish_load`](crate::PlaybackController::finish_load).

use crate::error::Result;
use crate::types::Track;
use std::time::Duration;

/// Decoded audio held between load and playback
///
/// The controller reads only the duration, for progress reporting; the
/// samples stay opaque to it.
pub trait SampleBuffer {
    /// Total length of the decoded audio
    fn duration(&self) -> Duration;
}

/// Host audio stack: decode requests, output transport, and gain
///
/// At most one source sounds at a time; starting a buffer replaces any
/// active source. A source that plays to its end must be reported through
/// [`PlaybackController::handle_track_ended`](crate::PlaybackController::handle_track_ended).
pub trait AudioBackend {
    /// Decoded buffer type delivered back through `finish_load`
    type Buffer: SampleBuffer;

    /// Begin an asynchronous decode of `track`
    ///
    /// There is no cancellation; the controller's loading gate guarantees
    /// at most one request is outstanding.
    fn begin_decode(&mut self, track: &Track);

    /// Start sounding `buffer`, `offset` into the audio
    fn play(&mut self, buffer: &Self::Buffer, offset: Duration);

    /// Silence the active source, if any
    fn stop(&mut self);

    /// Set output gain
    ///
    /// # Errors
    /// Implementations reject gains outside `[0, 1]` with
    /// [`PlayerError::GainOutOfRange`](crate::PlayerError::GainOutOfRange).
    fn set_gain(&mut self, gain: f32) -> Result<()>;
}

/// Recording backend for unit tests
///
/// Stores every call so tests can assert on the traffic the controller
/// generated.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    pub decode_requests: Vec<String>,
    pub play_calls: Vec<(Duration, Duration)>,
    pub stop_calls: usize,
    pub gain_calls: Vec<f32>,
}

/// Decoded buffer stand-in carrying only a duration
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct FakeBuffer {
    pub duration: Duration,
}

#[cfg(test)]
impl SampleBuffer for FakeBuffer {
    fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
impl AudioBackend for FakeBackend {
    type Buffer = FakeBuffer;

    fn begin_decode(&mut self, track: &Track) {
        self.decode_requests.push(track.source.clone());
    }

    fn play(&mut self, buffer: &FakeBuffer, offset: Duration) {
        self.play_calls.push((buffer.duration, offset));
    }

    fn stop(&mut self) {
        self.stop_calls += 1;
    }

    fn set_gain(&mut self, gain: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&gain) {
            return Err(crate::error::PlayerError::GainOutOfRange(gain));
        }
        self.gain_calls.push(gain);
        Ok(())
    }
}
