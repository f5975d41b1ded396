//! Session timer state machine

use std::time::Duration;
use studybox_api::{SessionPhase, Subject, TotalsTable};
use studybox_util::MonotonicInstant;

use crate::ElapsedClock;

/// Result of a start/pause toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Idle -> Running, resuming from the frozen session time
    Started { resumed_from: Duration },
    /// Running -> Idle, with the amount added to the subject total
    Paused { elapsed: Duration, committed: Duration },
}

/// Result of a stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stopped {
    pub was_running: bool,
    /// Session time at the moment of the stop
    pub elapsed: Duration,
    /// Amount added to the subject total, zero if nothing was pending
    pub committed: Duration,
}

/// The study session for the selected subject
///
/// `elapsed` covers only the current session. `committed` is the part of
/// `elapsed` already added to the totals; every commit adds the difference
/// and catches `committed` up. While Idle the two are equal.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    subject: Subject,
    phase: SessionPhase,
    /// Session time, recomputed on every tick while running
    elapsed: Duration,
    /// Session time banked when the current run began
    base: Duration,
    /// Start of the current run, set only while running
    resumed_at: Option<MonotonicInstant>,
    committed: Duration,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    pub fn new() -> Self {
        Self {
            subject: Subject::default(),
            phase: SessionPhase::Idle,
            elapsed: Duration::ZERO,
            base: Duration::ZERO,
            resumed_at: None,
            committed: Duration::ZERO,
        }
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Session time as of the last tick or transition
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Session time not yet added to the totals
    pub fn uncommitted(&self) -> Duration {
        self.elapsed.saturating_sub(self.committed)
    }

    /// Advance to the next subject. Ignored while running.
    pub fn select_next(&mut self) -> Option<Subject> {
        if self.is_running() {
            return None;
        }

        self.subject = self.subject.next();
        self.clear();
        Some(self.subject)
    }

    pub fn toggle_start_pause(&mut self, now: MonotonicInstant, totals: &mut TotalsTable) -> Toggle {
        match self.phase {
            SessionPhase::Idle => {
                self.base = self.elapsed;
                self.resumed_at = Some(now);
                self.phase = SessionPhase::Running;
                Toggle::Started {
                    resumed_from: self.elapsed,
                }
            }
            SessionPhase::Running => {
                self.tick(now);
                let committed = self.commit(totals);
                self.base = self.elapsed;
                self.resumed_at = None;
                self.phase = SessionPhase::Idle;
                Toggle::Paused {
                    elapsed: self.elapsed,
                    committed,
                }
            }
        }
    }

    /// End the session from either state, committing whatever is pending
    pub fn stop(&mut self, now: MonotonicInstant, totals: &mut TotalsTable) -> Stopped {
        let was_running = self.is_running();
        if was_running {
            self.tick(now);
        }

        let elapsed = self.elapsed;
        let committed = self.commit(totals);
        self.phase = SessionPhase::Idle;
        self.clear();

        Stopped {
            was_running,
            elapsed,
            committed,
        }
    }

    /// Recompute the session time. Never touches the totals.
    pub fn tick(&mut self, now: MonotonicInstant) -> Duration {
        if let Some(resumed_at) = self.resumed_at {
            self.elapsed = self
                .base
                .saturating_add(ElapsedClock::between(resumed_at, now));
        }
        self.elapsed
    }

    /// Commit the pending part of a running session without changing state
    pub fn checkpoint(&mut self, now: MonotonicInstant, totals: &mut TotalsTable) -> Duration {
        if !self.is_running() {
            return Duration::ZERO;
        }
        self.tick(now);
        self.commit(totals)
    }

    fn commit(&mut self, totals: &mut TotalsTable) -> Duration {
        let delta = self.uncommitted();
        totals.add(self.subject, delta);
        self.committed = self.elapsed;
        delta
    }

    fn clear(&mut self) {
        self.elapsed = Duration::ZERO;
        self.base = Duration::ZERO;
        self.resumed_at = None;
        self.committed = Duration::ZERO;
    }
}
