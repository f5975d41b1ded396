//! Core events emitted by the engine

use std::time::Duration;
use studybox_api::{LogRow, Subject};

/// Events emitted by the study engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// A new subject was selected
    SubjectSelected { subject: Subject },

    /// Session started or resumed
    SessionStarted {
        subject: Subject,
        resumed_from: Duration,
    },

    /// Session paused, pending time committed
    SessionPaused {
        subject: Subject,
        elapsed: Duration,
        committed: Duration,
    },

    /// Session stopped and cleared
    SessionStopped {
        subject: Subject,
        elapsed: Duration,
        committed: Duration,
    },

    /// Totals flushed to the activity log and reset
    RolloverFired { row: LogRow },

    /// Display switched on or off
    DisplayPowerChanged { on: bool },
}
