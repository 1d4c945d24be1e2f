//! Timer and clock contract
//!
//! The controller owns no clock of its own. A [`Scheduler`] supplies a
//! monotonic reading for elapsed-time math and repeating intervals for
//! progress reporting; the host calls
//! [`PlaybackController::tick`](crate::PlaybackController::tick) each time
//! an interval fires.

use std::time::Duration;

/// Opaque identifier for a running interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(pub u64);

/// Host clock and interval timers
pub trait Scheduler {
    /// Current monotonic reading
    ///
    /// Only differences between readings are meaningful.
    fn now(&self) -> Duration;

    /// Start a repeating interval firing every `period`
    fn start_interval(&mut self, period: Duration) -> TimerHandle;

    /// Cancel a running interval
    ///
    /// Cancelling a handle that already stopped is a no-op.
    fn cancel_interval(&mut self, handle: TimerHandle);
}

/// Hand-cranked scheduler for unit tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ManualScheduler {
    now: Duration,
    next_id: u64,
    pub active: Vec<(TimerHandle, Duration)>,
}

#[cfg(test)]
impl ManualScheduler {
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

#[cfg(test)]
impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn start_interval(&mut self, period: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.active.push((handle, period));
        handle
    }

    fn cancel_interval(&mut self, handle: TimerHandle) {
        self.active.retain(|(h, _)| *h != handle);
    }
}
