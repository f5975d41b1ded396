//! Display inactivity power-down

use std::time::Duration;
use studybox_api::SessionPhase;
use studybox_util::MonotonicInstant;

use crate::ElapsedClock;

/// Tracks button activity and decides when the display should sleep
///
/// The display only sleeps while the session is idle, after `timeout`
/// without button activity. Any activity wakes it and restarts the timeout.
#[derive(Debug, Clone)]
pub struct DisplayPower {
    timeout: Duration,
    last_activity: MonotonicInstant,
    on: bool,
}

impl DisplayPower {
    pub fn new(timeout: Duration, now: MonotonicInstant) -> Self {
        Self {
            timeout,
            last_activity: now,
            on: true,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Record button activity. Returns true if this woke the display.
    pub fn note_activity(&mut self, now: MonotonicInstant) -> bool {
        self.last_activity = now;
        let woke = !self.on;
        self.on = true;
        woke
    }

    /// Returns the new power state if it changed
    pub fn update(&mut self, now: MonotonicInstant, phase: SessionPhase) -> Option<bool> {
        if self.on
            && phase == SessionPhase::Idle
            && ElapsedClock::between(self.last_activity, now) >= self.timeout
        {
            self.on = false;
            return Some(false);
        }
        None
    }
}
