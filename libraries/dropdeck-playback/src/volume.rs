//! Volume and mute state
//!
//! Stores the last chosen volume as a whole percent together with an
//! explicit mute flag. The two never share an encoding: muting does not
//! alter the stored volume, so unmuting restores it exactly. The gain
//! handed to the backend is the plain linear fraction (browser gain nodes
//! and most output stacks take `0.0..=1.0` directly).

/// Volume state with explicit mute
#[derive(Debug, Clone)]
pub(crate) struct Volume {
    /// Last chosen volume (0-100)
    percent: u8,

    /// Mute state (preserves the stored volume)
    muted: bool,
}

impl Volume {
    /// Create volume state
    ///
    /// # Arguments
    /// * `percent` - Initial volume (0-100, clamped)
    pub fn new(percent: u8) -> Self {
        Self {
            percent: percent.min(100),
            muted: false,
        }
    }

    /// Store a newly chosen volume and clear the mute flag
    ///
    /// Callers validate the corresponding gain with the backend first;
    /// values above 100 are clamped.
    pub fn set_percent(&mut self, percent: u8) {
        self.percent = percent.min(100);
        self.muted = false;
    }

    /// Stored volume (0-100), unaffected by mute
    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Flip the mute flag and return the gain the backend should apply
    pub fn toggle_mute(&mut self) -> f32 {
        self.muted = !self.muted;
        self.gain()
    }

    /// Gain fraction currently in effect
    ///
    /// Returns 0.0 while muted, otherwise the stored volume as a fraction
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            f32::from(self.percent) / 100.0
        }
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}
