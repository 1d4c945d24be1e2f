//! Dropdeck - Playlist Playback
//!
//! Host-driven playback core for Dropdeck.
//!
//! This crate provides:
//! - Ordered playlist with append, remove and reorder
//! - Circular track navigation (next/prev/jump, wrapping at both ends)
//! - Load/play/pause/stop transitions with resume offsets
//! - At-most-one-in-flight track loading
//! - Volume control (0-100%, mute/unmute)
//! - Periodic progress reporting driven by a host timer
//! - Deferred notifications the host drains on its own schedule
//!
//! # Architecture
//!
//! `dropdeck-playback` is completely platform-agnostic:
//! - No dependency on any web or audio API
//! - No timers or clocks of its own
//! - Single-threaded, no interior mutability
//!
//! The host supplies the audio stack through [`AudioBackend`] and timing
//! through [`Scheduler`], calls command methods in response to user input,
//! and reports outcomes back through
//! [`finish_load`](PlaybackController::finish_load),
//! [`handle_track_ended`](PlaybackController::handle_track_ended) and
//! [`tick`](PlaybackController::tick). State changes surface as
//! [`PlayerEvent`]s collected with
//! [`drain_events`](PlaybackController::drain_events).
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use dropdeck_playback::{
//!     AudioBackend, PlaybackController, PlayerConfig, PlayerEvent, Result, SampleBuffer,
//!     Scheduler, TimerHandle, Track,
//! };
//! use std::time::Duration;
//!
//! // Decoded audio as the host represents it
//! struct Buffer {
//!     duration: Duration,
//! }
//!
//! impl SampleBuffer for Buffer {
//!     fn duration(&self) -> Duration {
//!         self.duration
//!     }
//! }
//!
//! // Minimal host audio stack
//! #[derive(Default)]
//! struct Backend {
//!     requested: Vec<String>,
//! }
//!
//! impl AudioBackend for Backend {
//!     type Buffer = Buffer;
//!
//!     fn begin_decode(&mut self, track: &Track) {
//!         self.requested.push(track.source.clone());
//!     }
//!
//!     fn play(&mut self, _buffer: &Buffer, _offset: Duration) {}
//!
//!     fn stop(&mut self) {}
//!
//!     fn set_gain(&mut self, _gain: f32) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! // Timers the host event loop would drive
//! #[derive(Default)]
//! struct Timers {
//!     now: Duration,
//!     next_id: u64,
//! }
//!
//! impl Scheduler for Timers {
//!     fn now(&self) -> Duration {
//!         self.now
//!     }
//!
//!     fn start_interval(&mut self, _period: Duration) -> TimerHandle {
//!         self.next_id += 1;
//!         TimerHandle(self.next_id)
//!     }
//!
//!     fn cancel_interval(&mut self, _handle: TimerHandle) {}
//! }
//!
//! let mut player = PlaybackController::new(
//!     Backend::default(),
//!     Timers::default(),
//!     PlayerConfig::default(),
//! );
//!
//! // Dropping files onto an empty playlist auto-loads the first one.
//! player.add_tracks(vec![Track {
//!     source: "blob:song".to_string(),
//!     name: "song.mp3".to_string(),
//! }]);
//! assert_eq!(player.backend().requested, vec!["blob:song"]);
//!
//! // The host decodes and reports back; playback starts immediately.
//! player.finish_load(Ok(Buffer {
//!     duration: Duration::from_secs(180),
//! }));
//!
//! for event in player.drain_events() {
//!     match event {
//!         PlayerEvent::TrackChanged { name, .. } => println!("now on {}", name),
//!         PlayerEvent::TrackStarted { index } => println!("track {} started", index),
//!         PlayerEvent::Progress {
//!             elapsed_secs,
//!             duration_secs,
//!         } => println!("{}/{}s", elapsed_secs, duration_secs),
//!         _ => {}
//!     }
//! }
//! ```

mod backend;
mod controller;
mod error;
mod events;
mod playlist;
mod scheduler;
pub mod types;
mod volume;

// Public exports
pub use backend::{AudioBackend, SampleBuffer};
pub use controller::PlaybackController;
pub use error::{PlayerError, Result};
pub use events::PlayerEvent;
pub use scheduler::{Scheduler, TimerHandle};
pub use types::{PlayerConfig, PlayerState, Track};
