//! Playback state machine
//!
//! [`PlaybackController`] owns the playlist, the transport state and the
//! progress timer, and drives a host [`AudioBackend`] and [`Scheduler`].
//! It is single-threaded and host-driven: the host calls command methods
//! in response to user input and reports backend outcomes back through
//! [`finish_load`](PlaybackController::finish_load),
//! [`handle_track_ended`](PlaybackController::handle_track_ended) and
//! [`tick`](PlaybackController::tick). Every observable consequence is
//! queued as a [`PlayerEvent`] and handed to the host on the next
//! [`drain_events`](PlaybackController::drain_events).
//!
//! Two rules anchor the design. At most one decode is in flight: while it
//! is, every track change is refused. And the progress timer runs exactly
//! while audio sounds: every path that halts playback also cancels it.

use std::time::Duration;

use tracing::{debug, warn};

use crate::backend::{AudioBackend, SampleBuffer};
use crate::error::Result;
use crate::events::{EventQueue, PlayerEvent};
use crate::playlist::{Playlist, Removal};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::types::{PlayerConfig, PlayerState, Track};
use crate::volume::Volume;

/// How playback is being interrupted
#[derive(Debug, Clone, Copy)]
enum HaltKind {
    /// Discard the resume offset; the next start plays from zero
    Stop,

    /// Keep the elapsed time as the resume offset
    Pause,
}

/// Playlist playback state machine
///
/// Generic over the host audio stack and timer source so the same logic
/// runs against a real output device or the hand-cranked fakes used in
/// tests.
pub struct PlaybackController<B: AudioBackend, S: Scheduler> {
    backend: B,
    scheduler: S,
    playlist: Playlist,
    volume: Volume,

    // Replaced only by a completed load, so it survives failed decodes.
    buffer: Option<B::Buffer>,

    // Loading gate. While a decode is in flight every track change is
    // refused, which keeps at most one request outstanding.
    loading: bool,

    // Transport. `paused_offset` is where the next start resumes from;
    // `started_at` anchors elapsed-time math while audio sounds.
    stopped: bool,
    paused_offset: Duration,
    started_at: Option<Duration>,

    // Armed by a completed load, consumed by the first start after it.
    announce_start: bool,

    progress_timer: Option<TimerHandle>,
    progress_interval: Duration,

    pending: EventQueue,
}

impl<B: AudioBackend, S: Scheduler> PlaybackController<B, S> {
    /// Create a controller around a host audio stack and timer source
    pub fn new(backend: B, scheduler: S, config: PlayerConfig) -> Self {
        Self {
            backend,
            scheduler,
            playlist: Playlist::new(),
            volume: Volume::new(config.volume),
            buffer: None,
            loading: false,
            stopped: true,
            paused_offset: Duration::ZERO,
            started_at: None,
            announce_start: false,
            progress_timer: None,
            progress_interval: config.progress_interval,
            pending: EventQueue::default(),
        }
    }

    // ===== Track list =====

    /// Append tracks to the end of the playlist
    ///
    /// Appending to an empty playlist auto-loads the first track; appending
    /// to a populated one leaves playback untouched.
    pub fn add_tracks(&mut self, tracks: Vec<Track>) {
        let first_drop = self.playlist.is_empty();
        let count = tracks.len();

        for track in tracks {
            self.playlist.push(track);
        }
        debug!(count, total = self.playlist.len(), "tracks appended");

        if first_drop {
            self.bump(0);
        }
    }

    /// Remove the track at `index`
    ///
    /// Returns `false` if `index` is out of bounds. Removing the current
    /// track re-resolves the same position, which now names the following
    /// track (wrapping past the end). Removing the last remaining track
    /// emits a track change to nothing; audio that is already sounding is
    /// not interrupted.
    pub fn remove_track(&mut self, index: usize) -> bool {
        match self.playlist.remove(index) {
            None => false,
            Some(Removal::Emptied) => {
                debug!(index, "playlist emptied");
                self.emit_track_changed(index);
                true
            }
            Some(Removal::Kept { was_current }) => {
                debug!(index, total = self.playlist.len(), "track removed");
                if was_current {
                    self.bump(0);
                }
                true
            }
        }
    }

    /// Move the track at `from` so it sits at `to`
    ///
    /// Returns `false` if either index is out of bounds or they are equal.
    /// The current track stays current and playback is untouched.
    pub fn move_track(&mut self, from: usize, to: usize) -> bool {
        let moved = self.playlist.relocate(from, to);
        if moved {
            debug!(from, to, "track moved");
        }
        moved
    }

    // ===== Navigation =====

    /// Jump to an arbitrary position and start loading it
    ///
    /// `target` may lie outside the playlist; it wraps circularly, so one
    /// past the end is the first track and -1 is the last. Returns `false`
    /// without touching anything when a load is already in flight or the
    /// playlist is empty. Otherwise playback stops, the resume offset
    /// resets to zero and a decode of the new current track begins.
    pub fn change_track(&mut self, target: i64) -> bool {
        if self.loading {
            debug!(index = target, "track change refused, load in flight");
            return false;
        }
        if self.playlist.is_empty() {
            return false;
        }

        self.halt(HaltKind::Stop);

        let old_index = self.playlist.cursor();
        let new_index = self.playlist.wrap(target);
        self.playlist.set_cursor(new_index);
        self.loading = true;

        if let Some(track) = self.playlist.current() {
            self.backend.begin_decode(track);
        }
        debug!(from = old_index, to = new_index, "track change");

        self.emit_track_changed(old_index);
        true
    }

    /// Stop and jump to the following track, wrapping at the end
    pub fn next(&mut self) -> bool {
        self.halt(HaltKind::Stop);
        self.bump(1)
    }

    /// Stop and jump to the previous track, wrapping at the start
    pub fn prev(&mut self) -> bool {
        self.halt(HaltKind::Stop);
        self.bump(-1)
    }

    /// Change to the track `delta` positions from the cursor
    fn bump(&mut self, delta: i64) -> bool {
        self.change_track(self.playlist.cursor() as i64 + delta)
    }

    // ===== Transport =====

    /// Toggle between playing and paused
    ///
    /// Starting requires a loaded buffer and resumes from the stored
    /// offset. Pausing keeps the elapsed time for the next start and emits
    /// a blink cue.
    pub fn toggle(&mut self) {
        if self.stopped {
            self.begin_playback();
        } else {
            self.halt(HaltKind::Pause);
        }
    }

    /// Stop playback and reset the resume offset to zero
    pub fn stop(&mut self) {
        self.halt(HaltKind::Stop);
    }

    /// Report the outcome of the decode requested by the last track change
    ///
    /// The host calls this exactly once per decode request. Success stores
    /// the buffer and starts playback immediately; failure reopens the
    /// loading gate and emits [`PlayerEvent::LoadFailed`], keeping any
    /// previously loaded buffer.
    pub fn finish_load(&mut self, result: Result<B::Buffer>) {
        self.loading = false;

        match result {
            Ok(buffer) => {
                self.buffer = Some(buffer);
                self.announce_start = true;
                debug!(index = ?self.playlist.current_index(), "decode complete");
                self.begin_playback();
            }
            Err(err) => {
                warn!(error = %err, "decode failed");
                self.pending.push(PlayerEvent::LoadFailed {
                    index: self.playlist.current_index().unwrap_or(0),
                    message: err.to_string(),
                });
            }
        }
    }

    /// Report that the active source played to its end
    ///
    /// Advances to the following track, wrapping at the end of the
    /// playlist. Ignored when playback was already halted, so a stop that
    /// races the end of the audio does not trigger a spurious advance.
    pub fn handle_track_ended(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        if !self.bump(1) {
            // Nothing to advance to; the timer must not outlive playback.
            self.halt(HaltKind::Stop);
        }
    }

    /// Report a progress-timer firing
    ///
    /// Emits the current elapsed/duration reading. Firings that race a
    /// halt (the interval triggered before the host saw the cancel) are
    /// ignored.
    pub fn tick(&mut self) {
        if self.stopped || self.progress_timer.is_none() {
            return;
        }
        let Some(buffer) = self.buffer.as_ref() else {
            return;
        };

        let duration_secs = buffer.duration().as_secs();
        self.emit_progress(duration_secs);
    }

    /// Start the loaded buffer from the stored offset
    fn begin_playback(&mut self) {
        let Some(buffer) = self.buffer.as_ref() else {
            return;
        };
        let duration_secs = buffer.duration().as_secs();

        let now = self.scheduler.now();
        self.started_at = Some(now.saturating_sub(self.paused_offset));
        self.stopped = false;
        self.backend.play(buffer, self.paused_offset);

        if let Some(handle) = self.progress_timer.take() {
            self.scheduler.cancel_interval(handle);
        }

        self.emit_progress(duration_secs);
        self.progress_timer = Some(self.scheduler.start_interval(self.progress_interval));

        if self.announce_start {
            self.announce_start = false;
            self.pending.push(PlayerEvent::TrackStarted {
                index: self.playlist.current_index().unwrap_or(0),
            });
        }
    }

    /// Halt playback, keeping or discarding the resume offset
    fn halt(&mut self, kind: HaltKind) {
        if !self.stopped {
            self.backend.stop();
        }

        self.paused_offset = match kind {
            HaltKind::Stop => Duration::ZERO,
            HaltKind::Pause => self.elapsed(),
        };
        self.stopped = true;
        self.started_at = None;

        if let Some(handle) = self.progress_timer.take() {
            self.scheduler.cancel_interval(handle);
        }

        match kind {
            HaltKind::Stop => self.pending.push(PlayerEvent::Progress {
                elapsed_secs: 0,
                duration_secs: 0,
            }),
            HaltKind::Pause => self.pending.push(PlayerEvent::BlinkToggle),
        }
    }

    /// Time played since the last start, zero while halted
    fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started_at) => self.scheduler.now().saturating_sub(started_at),
            None => Duration::ZERO,
        }
    }

    // ===== Volume =====

    /// Set the volume as a percent (0-100)
    ///
    /// Forwards the matching gain fraction to the backend and stores the
    /// value as the new last volume, clearing any mute. Fails without
    /// changing anything when the backend rejects the gain.
    ///
    /// # Errors
    /// Returns [`PlayerError::GainOutOfRange`](crate::PlayerError::GainOutOfRange)
    /// when `percent` exceeds 100.
    pub fn set_volume(&mut self, percent: u8) -> Result<()> {
        let gain = f32::from(percent) / 100.0;
        self.backend.set_gain(gain)?;
        self.volume.set_percent(percent);
        Ok(())
    }

    /// Toggle mute and return the volume percent now in effect
    ///
    /// Muting returns 0 and silences the backend without forgetting the
    /// stored volume; unmuting restores it exactly and returns it.
    ///
    /// # Errors
    /// Returns an error when the backend rejects the gain.
    pub fn toggle_mute(&mut self) -> Result<u8> {
        let gain = self.volume.toggle_mute();
        self.backend.set_gain(gain)?;

        Ok(if self.volume.is_muted() {
            0
        } else {
            self.volume.percent()
        })
    }

    // ===== Observation =====

    /// Transport state derived from the internal flags
    pub fn state(&self) -> PlayerState {
        if self.playlist.is_empty() {
            return PlayerState::Idle;
        }
        if self.loading {
            return PlayerState::Loading;
        }
        if !self.stopped {
            return PlayerState::Playing;
        }
        if self.paused_offset > Duration::ZERO {
            return PlayerState::Paused;
        }
        PlayerState::Stopped
    }

    /// All tracks in playlist order
    pub fn tracks(&self) -> &[Track] {
        self.playlist.tracks()
    }

    /// Index of the current track, `None` while the playlist is empty
    pub fn current_index(&self) -> Option<usize> {
        self.playlist.current_index()
    }

    /// Check whether a decode is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Check whether output is muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Stored volume percent, unaffected by mute
    pub fn volume_percent(&self) -> u8 {
        self.volume.percent()
    }

    /// Take every pending notification, oldest first
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        self.pending.drain()
    }

    /// Check whether notifications are waiting to be drained
    pub fn has_pending_events(&self) -> bool {
        self.pending.has_pending()
    }

    /// The host audio stack
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The host audio stack, mutably
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The host timer source
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The host timer source, mutably
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // ===== Event helpers =====

    /// Queue a track-changed notification for the current cursor
    fn emit_track_changed(&mut self, old_index: usize) {
        let (new_index, name) = match self.playlist.current() {
            Some(track) => (self.playlist.current_index(), track.name.clone()),
            None => (None, String::new()),
        };

        self.pending.push(PlayerEvent::TrackChanged {
            old_index,
            new_index,
            name,
        });
    }

    /// Queue a progress reading against the given duration
    fn emit_progress(&mut self, duration_secs: u64) {
        let elapsed_secs = self.elapsed().as_secs();
        self.pending.push(PlayerEvent::Progress {
            elapsed_secs,
            duration_secs,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FakeBackend, FakeBuffer};
    use crate::error::PlayerError;
    use crate::scheduler::ManualScheduler;

    fn track(name: &str) -> Track {
        Track {
            source: format!("blob:{}", name),
            name: name.to_string(),
        }
    }

    fn controller() -> PlaybackController<FakeBackend, ManualScheduler> {
        PlaybackController::new(
            FakeBackend::default(),
            ManualScheduler::default(),
            PlayerConfig::default(),
        )
    }

    /// Controller with tracks added and the first load completed
    fn playing(names: &[&str], secs: u64) -> PlaybackController<FakeBackend, ManualScheduler> {
        let mut player = controller();
        player.add_tracks(names.iter().map(|name| track(name)).collect());
        player.finish_load(Ok(FakeBuffer {
            duration: Duration::from_secs(secs),
        }));
        player.drain_events();
        player
    }

    #[test]
    fn first_drop_begins_loading() {
        let mut player = controller();
        player.add_tracks(vec![track("a"), track("b")]);

        assert_eq!(player.state(), PlayerState::Loading);
        assert_eq!(player.backend().decode_requests, vec!["blob:a"]);
        assert_eq!(
            player.drain_events(),
            vec![
                PlayerEvent::Progress {
                    elapsed_secs: 0,
                    duration_secs: 0,
                },
                PlayerEvent::TrackChanged {
                    old_index: 0,
                    new_index: Some(0),
                    name: "a".to_string(),
                },
            ]
        );
    }

    #[test]
    fn adding_to_populated_list_leaves_playback_alone() {
        let mut player = playing(&["a"], 30);
        player.add_tracks(vec![track("b")]);

        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.backend().decode_requests.len(), 1);
        assert!(!player.has_pending_events());
    }

    #[test]
    fn finish_load_starts_playback_and_announces_once() {
        let mut player = controller();
        player.add_tracks(vec![track("a")]);
        player.drain_events();

        player.finish_load(Ok(FakeBuffer {
            duration: Duration::from_secs(61),
        }));

        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.backend().play_calls.len(), 1);
        assert_eq!(player.backend().play_calls[0].1, Duration::ZERO);
        assert_eq!(player.scheduler().active.len(), 1);
        assert_eq!(
            player.drain_events(),
            vec![
                PlayerEvent::Progress {
                    elapsed_secs: 0,
                    duration_secs: 61,
                },
                PlayerEvent::TrackStarted { index: 0 },
            ]
        );
    }

    #[test]
    fn pause_keeps_offset_and_blinks() {
        let mut player = playing(&["a"], 30);
        player.scheduler_mut().advance(Duration::from_secs(5));

        player.toggle();

        assert_eq!(player.state(), PlayerState::Paused);
        assert_eq!(player.drain_events(), vec![PlayerEvent::BlinkToggle]);
        assert!(player.scheduler().active.is_empty());

        player.toggle();

        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.backend().play_calls[1].1, Duration::from_secs(5));
        // Resume reports the offset immediately and does not re-announce.
        assert_eq!(
            player.drain_events(),
            vec![PlayerEvent::Progress {
                elapsed_secs: 5,
                duration_secs: 30,
            }]
        );
    }

    #[test]
    fn stop_discards_offset() {
        let mut player = playing(&["a"], 30);
        player.scheduler_mut().advance(Duration::from_secs(5));

        player.stop();

        assert_eq!(player.state(), PlayerState::Stopped);
        assert_eq!(
            player.drain_events(),
            vec![PlayerEvent::Progress {
                elapsed_secs: 0,
                duration_secs: 0,
            }]
        );

        player.toggle();
        assert_eq!(player.backend().play_calls[1].1, Duration::ZERO);
    }

    #[test]
    fn change_refused_while_loading() {
        let mut player = controller();
        player.add_tracks(vec![track("a"), track("b")]);
        player.drain_events();

        assert!(!player.change_track(1));

        assert_eq!(player.state(), PlayerState::Loading);
        assert_eq!(player.current_index(), Some(0));
        assert_eq!(player.backend().decode_requests.len(), 1);
        assert!(!player.has_pending_events());
    }

    #[test]
    fn change_on_empty_playlist_is_refused() {
        let mut player = controller();
        assert!(!player.change_track(0));
        assert!(!player.has_pending_events());
    }

    #[test]
    fn natural_end_advances_without_stopping_backend() {
        let mut player = playing(&["a", "b"], 30);

        player.handle_track_ended();

        // The source already ended on its own, so the backend is not told
        // to stop again.
        assert_eq!(player.backend().stop_calls, 0);
        assert_eq!(player.state(), PlayerState::Loading);
        assert_eq!(player.backend().decode_requests, vec!["blob:a", "blob:b"]);
        assert_eq!(
            player.drain_events(),
            vec![
                PlayerEvent::Progress {
                    elapsed_secs: 0,
                    duration_secs: 0,
                },
                PlayerEvent::TrackChanged {
                    old_index: 0,
                    new_index: Some(1),
                    name: "b".to_string(),
                },
            ]
        );
    }

    #[test]
    fn natural_end_on_single_track_replays_it() {
        let mut player = playing(&["a"], 30);

        player.handle_track_ended();

        assert_eq!(player.backend().decode_requests, vec!["blob:a", "blob:a"]);
        assert_eq!(player.current_index(), Some(0));
    }

    #[test]
    fn natural_end_after_stop_is_ignored() {
        let mut player = playing(&["a", "b"], 30);
        player.stop();
        player.drain_events();

        player.handle_track_ended();

        assert_eq!(player.backend().decode_requests.len(), 1);
        assert!(!player.has_pending_events());
    }

    #[test]
    fn natural_end_with_emptied_playlist_tears_down_timer() {
        let mut player = playing(&["a"], 30);
        player.remove_track(0);
        player.drain_events();

        player.handle_track_ended();

        assert!(player.scheduler().active.is_empty());
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(
            player.drain_events(),
            vec![PlayerEvent::Progress {
                elapsed_secs: 0,
                duration_secs: 0,
            }]
        );
    }

    #[test]
    fn removing_current_track_reloads_the_position() {
        let mut player = playing(&["a", "b", "c"], 30);

        assert!(player.remove_track(0));

        // The position re-resolves to the track that slid into it.
        assert_eq!(player.backend().stop_calls, 1);
        assert_eq!(player.backend().decode_requests, vec!["blob:a", "blob:b"]);
        assert_eq!(player.current_index(), Some(0));
    }

    #[test]
    fn removing_last_track_reports_none_and_keeps_audio() {
        let mut player = playing(&["a"], 30);

        assert!(player.remove_track(0));

        assert_eq!(player.backend().stop_calls, 0);
        assert_eq!(player.scheduler().active.len(), 1);
        assert_eq!(
            player.drain_events(),
            vec![PlayerEvent::TrackChanged {
                old_index: 0,
                new_index: None,
                name: String::new(),
            }]
        );
    }

    #[test]
    fn set_volume_forwards_gain() {
        let mut player = controller();

        player.set_volume(70).unwrap();

        assert_eq!(player.volume_percent(), 70);
        assert_eq!(player.backend().gain_calls, vec![0.7]);
    }

    #[test]
    fn rejected_volume_changes_nothing() {
        let mut player = controller();

        let err = player.set_volume(150).unwrap_err();

        assert!(matches!(err, PlayerError::GainOutOfRange(_)));
        assert_eq!(player.volume_percent(), 100);
        assert!(player.backend().gain_calls.is_empty());
    }

    #[test]
    fn mute_roundtrip_restores_volume() {
        let mut player = controller();
        player.set_volume(37).unwrap();

        assert_eq!(player.toggle_mute().unwrap(), 0);
        assert!(player.is_muted());
        assert_eq!(player.volume_percent(), 37);

        assert_eq!(player.toggle_mute().unwrap(), 37);
        assert!(!player.is_muted());
        assert_eq!(player.backend().gain_calls, vec![0.37, 0.0, 0.37]);
    }

    #[test]
    fn tick_reports_whole_seconds() {
        let mut player = playing(&["a"], 61);
        player.scheduler_mut().advance(Duration::from_millis(2500));

        player.tick();

        assert_eq!(
            player.drain_events(),
            vec![PlayerEvent::Progress {
                elapsed_secs: 2,
                duration_secs: 61,
            }]
        );
    }

    #[test]
    fn stray_tick_after_halt_is_ignored() {
        let mut player = playing(&["a"], 30);
        player.stop();
        player.drain_events();

        player.tick();

        assert!(!player.has_pending_events());
    }

    #[test]
    fn state_follows_the_transport() {
        let mut player = controller();
        assert_eq!(player.state(), PlayerState::Idle);

        player.add_tracks(vec![track("a")]);
        assert_eq!(player.state(), PlayerState::Loading);

        player.finish_load(Ok(FakeBuffer {
            duration: Duration::from_secs(30),
        }));
        assert_eq!(player.state(), PlayerState::Playing);

        player.scheduler_mut().advance(Duration::from_secs(3));
        player.toggle();
        assert_eq!(player.state(), PlayerState::Paused);

        player.stop();
        assert_eq!(player.state(), PlayerState::Stopped);
    }

    #[test]
    fn failed_load_reopens_gate_and_keeps_buffer() {
        let mut player = playing(&["a", "b"], 30);

        assert!(player.next());
        player.drain_events();
        player.finish_load(Err(PlayerError::Decode("unsupported codec".to_string())));

        assert!(!player.is_loading());
        assert_eq!(
            player.drain_events(),
            vec![PlayerEvent::LoadFailed {
                index: 1,
                message: "Decode failed: unsupported codec".to_string(),
            }]
        );

        // The previous buffer is still loaded; toggling replays it from zero.
        player.toggle();
        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.backend().play_calls.len(), 2);
    }
}
