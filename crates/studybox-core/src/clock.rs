//! Monotonic elapsed-time helper

use std::time::Duration;
use studybox_util::MonotonicInstant;

/// Converts monotonic instants into elapsed durations relative to boot
#[derive(Debug, Clone, Copy)]
pub struct ElapsedClock {
    boot: MonotonicInstant,
}

impl ElapsedClock {
    pub fn new(boot: MonotonicInstant) -> Self {
        Self { boot }
    }

    pub fn boot(&self) -> MonotonicInstant {
        self.boot
    }

    /// Time since boot
    pub fn uptime(&self, now: MonotonicInstant) -> Duration {
        Self::between(self.boot, now)
    }

    /// Time from `start` to `now`, zero if `now` is not after `start`
    pub fn between(start: MonotonicInstant, now: MonotonicInstant) -> Duration {
        now.saturating_duration_since(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_and_between() {
        let boot = MonotonicInstant::now();
        let clock = ElapsedClock::new(boot);
        let later = boot + Duration::from_millis(2500);

        assert_eq!(clock.uptime(later), Duration::from_millis(2500));
        assert_eq!(ElapsedClock::between(later, boot), Duration::ZERO);
    }
}
