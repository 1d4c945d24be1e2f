//! Playback notifications
//!
//! Deferred communication from the controller to its host UI. Commands
//! never call into the presentation layer directly; they push events here
//! and the host drains the queue on its next scheduling turn. Delivery is
//! FIFO and at-most-once per event, so a track-changed notification is
//! always observed before the track-started notification of the same load.

use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// The current track slot changed (a load began or the list emptied)
    TrackChanged {
        /// Index that was current before the change
        old_index: usize,
        /// New current index, `None` when the playlist emptied
        new_index: Option<usize>,
        /// Display name of the new track, empty when the playlist emptied
        name: String,
    },

    /// A freshly loaded track began sounding (once per load)
    TrackStarted {
        /// Index of the track that started
        index: usize,
    },

    /// Elapsed/duration report in whole seconds
    ///
    /// Periodic while playing, emitted once immediately when playback
    /// starts, and emitted as `(0, 0)` on a full stop.
    Progress {
        /// Seconds played so far, rounded down
        elapsed_secs: u64,
        /// Total track length in seconds, rounded down
        duration_secs: u64,
    },

    /// UI cue that playback halted mid-track (blink the time display)
    BlinkToggle,

    /// A track failed to decode; the loading gate reopened
    LoadFailed {
        /// Index of the track that failed
        index: usize,
        /// Host-reported failure description
        message: String,
    },
}

/// FIFO queue of pending notifications
///
/// Commands push, the host drains. Draining hands over every queued event
/// exactly once.
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    pending: Vec<PlayerEvent>,
}

impl EventQueue {
    /// Queue an event for the next drain
    pub fn push(&mut self, event: PlayerEvent) {
        self.pending.push(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Check if any events are waiting
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
