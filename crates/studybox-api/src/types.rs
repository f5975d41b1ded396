//! Shared types for studybox

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::time::Duration;
use studybox_util::{format_hms, CalendarTime};

/// Number of subjects tracked by the device
pub const SUBJECT_COUNT: usize = 3;

/// Header row of the activity log
pub const LOG_HEADER: [&str; SUBJECT_COUNT + 2] =
    ["Date & Time", "Physics", "Chemistry", "Math", "PCM Total"];

/// A study subject. The set is fixed for the lifetime of the device.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    #[default]
    Physics,
    Chemistry,
    Maths,
}

impl Subject {
    /// All subjects in selection order
    pub const ALL: [Subject; SUBJECT_COUNT] = [Subject::Physics, Subject::Chemistry, Subject::Maths];

    pub fn index(self) -> usize {
        match self {
            Subject::Physics => 0,
            Subject::Chemistry => 1,
            Subject::Maths => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Next subject in cyclic order
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % SUBJECT_COUNT]
    }

    /// Short name shown on the display
    pub fn display_name(self) -> &'static str {
        match self {
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chem",
            Subject::Maths => "Maths",
        }
    }

    /// Key of this subject's counter in durable storage
    pub fn storage_key(self) -> &'static str {
        match self {
            Subject::Physics => "phy",
            Subject::Chemistry => "chem",
            Subject::Maths => "math",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Whether the session timer is accumulating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Running,
}

/// Cumulative study time per subject since the last rollover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TotalsTable {
    totals: [Duration; SUBJECT_COUNT],
}

impl TotalsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, subject: Subject) -> Duration {
        self.totals[subject.index()]
    }

    pub fn set(&mut self, subject: Subject, total: Duration) {
        self.totals[subject.index()] = total;
    }

    /// Add `amount` to a subject's total, saturating
    pub fn add(&mut self, subject: Subject, amount: Duration) {
        let slot = &mut self.totals[subject.index()];
        *slot = slot.saturating_add(amount);
    }

    /// Sum across all subjects
    pub fn sum(&self) -> Duration {
        self.totals
            .iter()
            .fold(Duration::ZERO, |acc, d| acc.saturating_add(*d))
    }

    pub fn is_zero(&self) -> bool {
        self.totals.iter().all(Duration::is_zero)
    }

    pub fn reset(&mut self) {
        self.totals = [Duration::ZERO; SUBJECT_COUNT];
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subject, Duration)> + '_ {
        Subject::ALL.iter().map(move |s| (*s, self.get(*s)))
    }
}

impl Index<Subject> for TotalsTable {
    type Output = Duration;

    fn index(&self, subject: Subject) -> &Duration {
        &self.totals[subject.index()]
    }
}

/// One row of the activity log, written at each rollover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRow {
    pub timestamp: CalendarTime,
    pub totals: TotalsTable,
}

impl LogRow {
    pub fn new(timestamp: CalendarTime, totals: TotalsTable) -> Self {
        Self { timestamp, totals }
    }

    pub fn sum(&self) -> Duration {
        self.totals.sum()
    }

    /// Row fields in log column order
    pub fn fields(&self) -> [String; SUBJECT_COUNT + 2] {
        [
            self.timestamp.log_stamp(),
            format_hms(self.totals[Subject::Physics]),
            format_hms(self.totals[Subject::Chemistry]),
            format_hms(self.totals[Subject::Maths]),
            format_hms(self.sum()),
        ]
    }
}

/// What the display should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub subject_name: String,
    /// Current session time, `HH:MM:SS`
    pub session_elapsed: String,
    /// Subject total, `HH:MM:SS`
    pub subject_total: String,
}

impl RenderRequest {
    pub fn new(subject: Subject, session_elapsed: Duration, subject_total: Duration) -> Self {
        Self {
            subject_name: subject.display_name().to_string(),
            session_elapsed: format_hms(session_elapsed),
            subject_total: format_hms(subject_total),
        }
    }
}
