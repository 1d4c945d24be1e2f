//! Ordered track list with current-track bookkeeping
//!
//! The playlist owns every index rule of the player: which entry is
//! current, how the cursor moves when entries are removed or relocated,
//! and how out-of-range jump targets wrap onto valid positions. The
//! controller layers transport behavior on top; nothing here touches
//! audio.

use crate::types::Track;

/// What a successful `remove` did to the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Removal {
    /// Entries remain; `was_current` marks whether the removed entry was
    /// the current one (the caller re-resolves the cursor position)
    Kept { was_current: bool },

    /// The list is now empty
    Emptied,
}

/// Ordered tracks plus the cursor of the current track
#[derive(Debug, Default)]
pub(crate) struct Playlist {
    tracks: Vec<Track>,

    // Position of the current track. Meaningful only while `tracks` is
    // non-empty; may sit one past the end between removing the current
    // entry and the follow-up track change that renormalizes it.
    cursor: usize,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track at the end
    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// All tracks in order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Raw cursor position (may transiently sit one past the end)
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor clamped into range for presentation, `None` when empty
    pub fn current_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            None
        } else {
            Some(self.cursor.min(self.tracks.len() - 1))
        }
    }

    /// The current track, if the cursor points at one
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.cursor)
    }

    pub fn set_cursor(&mut self, index: usize) {
        self.cursor = index;
    }

    /// Normalize an arbitrary jump target onto a valid position
    ///
    /// Navigation is circular: one past the end wraps to 0 and -1 wraps to
    /// the last entry. Must not be called on an empty list.
    pub fn wrap(&self, target: i64) -> usize {
        debug_assert!(!self.tracks.is_empty());
        target.rem_euclid(self.tracks.len() as i64) as usize
    }

    /// Remove the entry at `index`, sliding the cursor back when an entry
    /// before it goes away so the current track stays current
    ///
    /// Returns `None` if `index` is out of bounds. When the removed entry
    /// was the current one the cursor is left in place, pointing at the
    /// entry that slid into the vacated position (or one past the end).
    pub fn remove(&mut self, index: usize) -> Option<Removal> {
        if index >= self.tracks.len() {
            return None;
        }

        let was_current = index == self.cursor;
        self.tracks.remove(index);

        if self.tracks.is_empty() {
            return Some(Removal::Emptied);
        }

        if index < self.cursor {
            self.cursor -= 1;
        }

        Some(Removal::Kept { was_current })
    }

    /// Move the entry at `from` so it sits at `to`, carrying the cursor
    /// with whichever entry it pointed at
    ///
    /// Returns `false` (list untouched) if either index is out of bounds
    /// or `from == to`.
    pub fn relocate(&mut self, from: usize, to: usize) -> bool {
        let len = self.tracks.len();
        if from >= len || to >= len || from == to {
            return false;
        }

        let track = self.tracks.remove(from);
        self.tracks.insert(to, track);

        if self.cursor == from {
            self.cursor = to;
        } else if from < self.cursor && to >= self.cursor {
            self.cursor -= 1;
        } else if from > self.cursor && to <= self.cursor {
            self.cursor += 1;
        }

        true
    }
}
