//! Daily rollover of totals into the activity log

use studybox_api::{LogRow, TotalsTable};
use studybox_store::ActivityLog;
use studybox_util::CalendarTime;
use tracing::{info, warn};

use crate::PersistentAccumulator;

/// Flushes the totals to the activity log once per calendar day
///
/// The last fired day is volatile: after a restart the first trigger hour
/// seen fires again, and a trigger hour missed while powered off does not
/// fire retroactively.
#[derive(Debug, Clone)]
pub struct DailyRollover {
    trigger_hour: u8,
    last_fired_day: Option<u8>,
}

impl DailyRollover {
    pub fn new(trigger_hour: u8) -> Self {
        Self {
            trigger_hour,
            last_fired_day: None,
        }
    }

    pub fn trigger_hour(&self) -> u8 {
        self.trigger_hour
    }

    /// Day of the month of the last rollover, if any since boot
    pub fn last_fired_day(&self) -> Option<u8> {
        self.last_fired_day
    }

    /// Whether a rollover should fire at `now`
    pub fn is_due(&self, now: &CalendarTime) -> bool {
        now.hour == self.trigger_hour && self.last_fired_day != Some(now.day_of_month())
    }

    /// Fire the rollover if it is due: append the totals to `log`, reset
    /// them and persist the reset.
    ///
    /// Returns the appended row. If the append fails the totals are kept
    /// so they carry into the next row, and the day is still marked.
    pub fn check_and_maybe_fire(
        &mut self,
        now: Option<CalendarTime>,
        totals: &mut TotalsTable,
        accumulator: &PersistentAccumulator,
        log: &dyn ActivityLog,
    ) -> Option<LogRow> {
        let now = now?;
        if !self.is_due(&now) {
            return None;
        }
        self.last_fired_day = Some(now.day_of_month());

        let row = LogRow::new(now, *totals);
        if let Err(e) = log.append(&row) {
            warn!(
                timestamp = %now,
                error = %e,
                "Failed to append activity row, carrying totals forward"
            );
            return None;
        }

        totals.reset();
        if let Err(e) = accumulator.save(totals) {
            warn!(error = %e, "Failed to persist totals reset");
        }

        info!(
            timestamp = %now,
            total_secs = row.sum().as_secs(),
            "Daily rollover"
        );
        Some(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use studybox_api::Subject;
    use studybox_store::{CounterStore, MemoryActivityLog, MemoryCounterStore};

    fn at(day: u8, hour: u8, minute: u8) -> Option<CalendarTime> {
        CalendarTime::new(2025, 12, day, hour, minute, 0)
    }

    fn setup() -> (PersistentAccumulator, Arc<MemoryCounterStore>, MemoryActivityLog) {
        let store = Arc::new(MemoryCounterStore::new());
        (
            PersistentAccumulator::new(store.clone()),
            store,
            MemoryActivityLog::new(),
        )
    }

    fn sample_totals() -> TotalsTable {
        let mut totals = TotalsTable::new();
        totals.set(Subject::Physics, Duration::from_millis(3_600_000));
        totals.set(Subject::Chemistry, Duration::from_millis(1_800_000));
        totals.set(Subject::Maths, Duration::from_millis(900_000));
        totals
    }

    #[test]
    fn fires_at_trigger_hour_and_resets() {
        let (acc, store, log) = setup();
        let mut rollover = DailyRollover::new(2);
        let mut totals = sample_totals();
        acc.save(&totals).unwrap();

        let row = rollover
            .check_and_maybe_fire(at(26, 2, 0), &mut totals, &acc, &log)
            .unwrap();

        assert_eq!(
            row.fields(),
            [
                "2025-12-26 02:00".to_string(),
                "01:00:00".to_string(),
                "00:30:00".to_string(),
                "00:15:00".to_string(),
                "01:45:00".to_string(),
            ]
        );
        assert!(totals.is_zero());
        assert!(acc.load().is_zero());
        assert_eq!(store.get("phy").unwrap(), 0);
        assert_eq!(log.rows(), vec![row]);
        assert_eq!(rollover.last_fired_day(), Some(26));
    }

    #[test]
    fn fires_once_per_day() {
        let (acc, _store, log) = setup();
        let mut rollover = DailyRollover::new(2);
        let mut totals = sample_totals();

        assert!(rollover
            .check_and_maybe_fire(at(26, 2, 0), &mut totals, &acc, &log)
            .is_some());

        totals.add(Subject::Maths, Duration::from_secs(60));
        for minute in [0, 1, 30, 59] {
            assert!(rollover
                .check_and_maybe_fire(at(26, 2, minute), &mut totals, &acc, &log)
                .is_none());
        }
        assert_eq!(totals[Subject::Maths], Duration::from_secs(60));

        // Next day fires again
        assert!(rollover
            .check_and_maybe_fire(at(27, 2, 0), &mut totals, &acc, &log)
            .is_some());
        assert_eq!(log.rows().len(), 2);
    }

    #[test]
    fn never_fires_outside_trigger_hour_or_unsynced() {
        let (acc, _store, log) = setup();
        let mut rollover = DailyRollover::new(2);
        let mut totals = sample_totals();

        for now in [None, at(26, 1, 59), at(26, 3, 0), at(26, 14, 0)] {
            assert!(rollover
                .check_and_maybe_fire(now, &mut totals, &acc, &log)
                .is_none());
        }
        assert_eq!(totals, sample_totals());
        assert!(log.rows().is_empty());
        assert_eq!(rollover.last_fired_day(), None);
    }

    #[test]
    fn failed_append_carries_totals_forward() {
        let (acc, _store, log) = setup();
        let mut rollover = DailyRollover::new(2);
        let mut totals = sample_totals();

        log.set_fail_append(true);
        assert!(rollover
            .check_and_maybe_fire(at(26, 2, 0), &mut totals, &acc, &log)
            .is_none());
        assert_eq!(totals, sample_totals());
        assert_eq!(rollover.last_fired_day(), Some(26));

        // Not retried on the same day
        log.set_fail_append(false);
        assert!(rollover
            .check_and_maybe_fire(at(26, 2, 5), &mut totals, &acc, &log)
            .is_none());
        assert!(log.rows().is_empty());

        // The next day's row includes the carried totals
        let row = rollover
            .check_and_maybe_fire(at(27, 2, 0), &mut totals, &acc, &log)
            .unwrap();
        assert_eq!(row.totals, sample_totals());
    }

    #[test]
    fn fresh_rollover_fires_again_on_the_same_day() {
        let (acc, _store, log) = setup();
        let mut totals = sample_totals();

        DailyRollover::new(2).check_and_maybe_fire(at(26, 2, 0), &mut totals, &acc, &log);

        // After a restart only the time since the first row remains
        totals.add(Subject::Chemistry, Duration::from_secs(90));
        let mut rebooted = DailyRollover::new(2);
        let row = rebooted
            .check_and_maybe_fire(at(26, 2, 40), &mut totals, &acc, &log)
            .unwrap();

        assert_eq!(row.fields()[2], "00:01:30");
        assert_eq!(row.fields()[4], "00:01:30");
        assert_eq!(log.rows().len(), 2);
        assert!(totals.is_zero());
    }

    #[test]
    fn fires_across_month_change() {
        let (acc, _store, log) = setup();
        let mut rollover = DailyRollover::new(2);
        let mut totals = TotalsTable::new();

        rollover.check_and_maybe_fire(at(26, 2, 0), &mut totals, &acc, &log);
        let next_month = CalendarTime::new(2026, 1, 27, 2, 0, 0);
        assert!(rollover
            .check_and_maybe_fire(next_month, &mut totals, &acc, &log)
            .is_some());
    }
}
