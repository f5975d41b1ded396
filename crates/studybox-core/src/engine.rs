//! Study engine

use std::sync::Arc;
use std::time::Duration;
use studybox_api::{InputEvent, RenderRequest, SessionPhase, Subject, TotalsTable};
use studybox_config::Settings;
use studybox_store::{ActivityLog, CounterStore};
use studybox_util::{duration_to_millis, CalendarTime, MonotonicInstant};
use tracing::{debug, info, warn};

use crate::{
    CoreEvent, DailyRollover, DisplayPower, ElapsedClock, PersistentAccumulator, SessionTimer,
    Stopped, Toggle,
};

/// Owns all device state and turns inputs and ticks into events
pub struct StudyEngine {
    clock: ElapsedClock,
    accumulator: PersistentAccumulator,
    log: Arc<dyn ActivityLog>,
    timer: SessionTimer,
    totals: TotalsTable,
    rollover: DailyRollover,
    display: DisplayPower,
}

impl StudyEngine {
    /// Create the engine, loading the persisted totals
    pub fn new(
        settings: &Settings,
        store: Arc<dyn CounterStore>,
        log: Arc<dyn ActivityLog>,
        now: MonotonicInstant,
    ) -> Self {
        let accumulator = PersistentAccumulator::new(store);
        let totals = accumulator.load();

        info!(
            physics_ms = duration_to_millis(totals[Subject::Physics]),
            chemistry_ms = duration_to_millis(totals[Subject::Chemistry]),
            maths_ms = duration_to_millis(totals[Subject::Maths]),
            trigger_hour = settings.trigger_hour,
            "Study engine initialized"
        );

        Self {
            clock: ElapsedClock::new(now),
            accumulator,
            log,
            timer: SessionTimer::new(),
            totals,
            rollover: DailyRollover::new(settings.trigger_hour),
            display: DisplayPower::new(settings.display_timeout, now),
        }
    }

    /// Record raw button activity, debounced or not. Wakes the display and
    /// restarts its inactivity timeout.
    pub fn note_activity(&mut self, now: MonotonicInstant) -> Vec<CoreEvent> {
        if self.display.note_activity(now) {
            debug!("Display woken by input");
            return vec![CoreEvent::DisplayPowerChanged { on: true }];
        }
        Vec::new()
    }

    /// Apply a debounced button press
    pub fn handle_input(&mut self, event: InputEvent, now: MonotonicInstant) -> Vec<CoreEvent> {
        let mut events = self.note_activity(now);

        match event {
            InputEvent::SelectNext => match self.timer.select_next() {
                Some(subject) => {
                    info!(subject = %subject, "Subject selected");
                    events.push(CoreEvent::SubjectSelected { subject });
                }
                None => debug!("Subject change ignored while running"),
            },

            InputEvent::ToggleStartPause => {
                let subject = self.timer.subject();
                match self.timer.toggle_start_pause(now, &mut self.totals) {
                    Toggle::Started { resumed_from } => {
                        info!(
                            subject = %subject,
                            resumed_from_ms = duration_to_millis(resumed_from),
                            "Session started"
                        );
                        events.push(CoreEvent::SessionStarted {
                            subject,
                            resumed_from,
                        });
                    }
                    Toggle::Paused { elapsed, committed } => {
                        self.persist_if_changed(committed);
                        info!(
                            subject = %subject,
                            elapsed_ms = duration_to_millis(elapsed),
                            committed_ms = duration_to_millis(committed),
                            "Session paused"
                        );
                        events.push(CoreEvent::SessionPaused {
                            subject,
                            elapsed,
                            committed,
                        });
                    }
                }
            }

            InputEvent::Stop => {
                let subject = self.timer.subject();
                let Stopped {
                    was_running,
                    elapsed,
                    committed,
                } = self.timer.stop(now, &mut self.totals);
                self.persist_if_changed(committed);
                info!(
                    subject = %subject,
                    was_running,
                    elapsed_ms = duration_to_millis(elapsed),
                    committed_ms = duration_to_millis(committed),
                    "Session stopped"
                );
                events.push(CoreEvent::SessionStopped {
                    subject,
                    elapsed,
                    committed,
                });
            }
        }

        events
    }

    /// Periodic tick: refresh the session time, check the daily rollover
    /// against the wall clock and update display power
    pub fn tick(
        &mut self,
        now_mono: MonotonicInstant,
        calendar: Option<CalendarTime>,
    ) -> Vec<CoreEvent> {
        let mut events = Vec::new();

        self.timer.tick(now_mono);

        if let Some(now) = calendar
            && self.rollover.is_due(&now)
        {
            // Time studied up to the trigger belongs to the day being closed
            let checkpointed = self.timer.checkpoint(now_mono, &mut self.totals);
            if !checkpointed.is_zero() {
                debug!(
                    subject = %self.timer.subject(),
                    committed_ms = duration_to_millis(checkpointed),
                    "Running session checkpointed before rollover"
                );
            }

            if let Some(row) = self.rollover.check_and_maybe_fire(
                calendar,
                &mut self.totals,
                &self.accumulator,
                self.log.as_ref(),
            ) {
                info!(
                    uptime_secs = self.clock.uptime(now_mono).as_secs(),
                    "Activity row written"
                );
                events.push(CoreEvent::RolloverFired { row });
            } else {
                // Append failed; keep the checkpointed time durable
                self.persist_if_changed(checkpointed);
            }
        }

        if let Some(on) = self.display.update(now_mono, self.timer.phase()) {
            info!(on, "Display power changed");
            events.push(CoreEvent::DisplayPowerChanged { on });
        }

        events
    }

    /// Commit and persist the pending part of a running session without
    /// pausing it. Used before a graceful shutdown.
    pub fn checkpoint(&mut self, now: MonotonicInstant) -> Duration {
        let committed = self.timer.checkpoint(now, &mut self.totals);
        self.persist_if_changed(committed);
        if !committed.is_zero() {
            info!(
                subject = %self.timer.subject(),
                committed_ms = duration_to_millis(committed),
                "Session checkpointed"
            );
        }
        committed
    }

    /// What the display should show right now
    ///
    /// The subject total includes the part of a running session not yet
    /// committed, so it counts up live.
    pub fn render_request(&self) -> RenderRequest {
        let subject = self.timer.subject();
        RenderRequest::new(
            subject,
            self.timer.elapsed(),
            self.totals[subject].saturating_add(self.timer.uncommitted()),
        )
    }

    pub fn subject(&self) -> Subject {
        self.timer.subject()
    }

    pub fn phase(&self) -> SessionPhase {
        self.timer.phase()
    }

    pub fn session_elapsed(&self) -> Duration {
        self.timer.elapsed()
    }

    /// Committed totals since the last rollover
    pub fn totals(&self) -> &TotalsTable {
        &self.totals
    }

    pub fn display_on(&self) -> bool {
        self.display.is_on()
    }

    pub fn last_fired_day(&self) -> Option<u8> {
        self.rollover.last_fired_day()
    }

    pub fn uptime(&self, now: MonotonicInstant) -> Duration {
        self.clock.uptime(now)
    }

    pub fn store_healthy(&self) -> bool {
        self.accumulator.is_healthy()
    }

    fn persist_if_changed(&self, committed: Duration) {
        if committed.is_zero() {
            return;
        }
        if let Err(e) = self.accumulator.save(&self.totals) {
            warn!(error = %e, "Failed to persist totals, keeping them in memory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studybox_store::{MemoryActivityLog, MemoryCounterStore, SqliteCounterStore};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn at(day: u8, hour: u8) -> Option<CalendarTime> {
        CalendarTime::new(2025, 12, day, hour, 0, 0)
    }

    struct Harness {
        engine: StudyEngine,
        store: Arc<MemoryCounterStore>,
        log: MemoryActivityLog,
        t0: MonotonicInstant,
    }

    fn harness(values: &[(&str, u64)]) -> Harness {
        let store = Arc::new(MemoryCounterStore::with_values(values));
        let log = MemoryActivityLog::new();
        let t0 = MonotonicInstant::now();
        let engine = StudyEngine::new(
            &Settings::default(),
            store.clone(),
            Arc::new(log.clone()),
            t0,
        );
        Harness {
            engine,
            store,
            log,
            t0,
        }
    }

    #[test]
    fn test_loads_persisted_totals() {
        let h = harness(&[("chem", 1_800_000)]);
        assert_eq!(h.engine.totals()[Subject::Chemistry], ms(1_800_000));
        assert_eq!(h.engine.subject(), Subject::Physics);
        assert_eq!(h.engine.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_pause_persists_committed_time() {
        let mut h = harness(&[]);

        h.engine.handle_input(InputEvent::ToggleStartPause, h.t0);
        assert_eq!(h.store.get("phy").unwrap(), 0);

        let events = h
            .engine
            .handle_input(InputEvent::ToggleStartPause, h.t0 + ms(1500));
        assert_eq!(
            events,
            vec![CoreEvent::SessionPaused {
                subject: Subject::Physics,
                elapsed: ms(1500),
                committed: ms(1500),
            }]
        );
        assert_eq!(h.store.get("phy").unwrap(), 1500);
    }

    #[test]
    fn test_render_shows_live_total() {
        let mut h = harness(&[("phy", 60_000)]);

        h.engine.handle_input(InputEvent::ToggleStartPause, h.t0);
        h.engine.tick(h.t0 + ms(5_000), None);

        let req = h.engine.render_request();
        assert_eq!(req.subject_name, "Physics");
        assert_eq!(req.session_elapsed, "00:00:05");
        assert_eq!(req.subject_total, "00:01:05");

        // Committed total is unchanged until a pause or stop
        assert_eq!(h.engine.totals()[Subject::Physics], ms(60_000));
    }

    #[test]
    fn test_select_next_ignored_while_running() {
        let mut h = harness(&[]);

        h.engine.handle_input(InputEvent::ToggleStartPause, h.t0);
        let events = h.engine.handle_input(InputEvent::SelectNext, h.t0 + ms(10));
        assert!(events.is_empty());
        assert_eq!(h.engine.subject(), Subject::Physics);
    }

    #[test]
    fn test_rollover_checkpoints_running_session() {
        let mut h = harness(&[("math", 900_000)]);

        h.engine.handle_input(InputEvent::SelectNext, h.t0);
        h.engine.handle_input(InputEvent::ToggleStartPause, h.t0);

        let events = h.engine.tick(h.t0 + ms(1000), at(26, 2));
        let row = match &events[..] {
            [CoreEvent::RolloverFired { row }] => row.clone(),
            other => panic!("unexpected events: {other:?}"),
        };
        assert_eq!(row.totals[Subject::Chemistry], ms(1000));
        assert_eq!(row.totals[Subject::Maths], ms(900_000));
        assert_eq!(h.log.rows(), vec![row]);

        assert!(h.engine.totals().is_zero());
        assert_eq!(h.engine.phase(), SessionPhase::Running);
        assert_eq!(h.engine.session_elapsed(), ms(1000));

        // Only time after the trigger counts toward the new day
        h.engine.handle_input(InputEvent::Stop, h.t0 + ms(1600));
        assert_eq!(h.engine.totals()[Subject::Chemistry], ms(600));
        assert_eq!(h.store.get("chem").unwrap(), 600);

        // Later ticks in the same hour do not fire again
        assert!(h.engine.tick(h.t0 + ms(2000), at(26, 2)).is_empty());
        assert_eq!(h.engine.last_fired_day(), Some(26));
    }

    #[test]
    fn test_rollover_append_failure_keeps_totals() {
        let mut h = harness(&[("phy", 1000)]);

        h.engine.handle_input(InputEvent::ToggleStartPause, h.t0);
        h.log.set_fail_append(true);

        let events = h.engine.tick(h.t0 + ms(500), at(26, 2));
        assert!(events.is_empty());
        assert_eq!(h.engine.totals()[Subject::Physics], ms(1500));
        assert_eq!(h.store.get("phy").unwrap(), 1500);
        assert_eq!(h.engine.last_fired_day(), Some(26));
    }

    #[test]
    fn test_unsynced_clock_defers_rollover() {
        let mut h = harness(&[("phy", 1000)]);

        assert!(h.engine.tick(h.t0 + ms(100), None).is_empty());
        assert_eq!(h.engine.totals()[Subject::Physics], ms(1000));
        assert!(h.log.rows().is_empty());
    }

    #[test]
    fn test_save_failure_is_not_fatal() {
        let mut h = harness(&[]);
        h.store.set_fail_commit(true);

        h.engine.handle_input(InputEvent::ToggleStartPause, h.t0);
        h.engine
            .handle_input(InputEvent::ToggleStartPause, h.t0 + ms(700));
        assert_eq!(h.engine.totals()[Subject::Physics], ms(700));
        assert_eq!(h.store.get("phy").unwrap(), 0);
        assert!(!h.engine.store_healthy());

        // The next mutation rewrites the full table
        h.store.set_fail_commit(false);
        h.engine
            .handle_input(InputEvent::ToggleStartPause, h.t0 + ms(1000));
        h.engine.handle_input(InputEvent::Stop, h.t0 + ms(1100));
        assert_eq!(h.store.get("phy").unwrap(), 800);
    }

    #[test]
    fn test_display_sleeps_and_wakes() {
        let mut h = harness(&[]);
        let timeout = Settings::default().display_timeout;

        let events = h.engine.tick(h.t0 + timeout, None);
        assert_eq!(events, vec![CoreEvent::DisplayPowerChanged { on: false }]);
        assert!(!h.engine.display_on());

        let events = h
            .engine
            .handle_input(InputEvent::SelectNext, h.t0 + timeout + ms(1));
        assert_eq!(
            events,
            vec![
                CoreEvent::DisplayPowerChanged { on: true },
                CoreEvent::SubjectSelected {
                    subject: Subject::Chemistry
                },
            ]
        );
        assert!(h.engine.display_on());
    }

    #[test]
    fn test_note_activity_wakes_without_input() {
        let mut h = harness(&[]);
        let timeout = Settings::default().display_timeout;

        h.engine.tick(h.t0 + timeout, None);
        let events = h.engine.note_activity(h.t0 + timeout + ms(1));
        assert_eq!(events, vec![CoreEvent::DisplayPowerChanged { on: true }]);
        assert_eq!(h.engine.subject(), Subject::Physics);

        // Already on, and the timeout restarted
        assert!(h.engine.note_activity(h.t0 + timeout + ms(2)).is_empty());
        assert!(h.engine.tick(h.t0 + timeout * 2, None).is_empty());
        assert!(h.engine.display_on());
    }

    #[test]
    fn test_display_stays_on_while_running() {
        let mut h = harness(&[]);
        let timeout = Settings::default().display_timeout;

        h.engine.handle_input(InputEvent::ToggleStartPause, h.t0);
        assert!(h.engine.tick(h.t0 + timeout * 3, None).is_empty());
        assert!(h.engine.display_on());
    }

    #[test]
    fn test_checkpoint_persists_running_time() {
        let mut h = harness(&[]);

        h.engine.handle_input(InputEvent::ToggleStartPause, h.t0);
        assert_eq!(h.engine.checkpoint(h.t0 + ms(900)), ms(900));
        assert_eq!(h.store.get("phy").unwrap(), 900);
        assert_eq!(h.engine.phase(), SessionPhase::Running);

        // Nothing new to commit at the same instant
        assert_eq!(h.engine.checkpoint(h.t0 + ms(900)), Duration::ZERO);
    }

    #[test]
    fn test_with_sqlite_store() {
        let store = Arc::new(SqliteCounterStore::in_memory().unwrap());
        let t0 = MonotonicInstant::now();
        let mut engine = StudyEngine::new(
            &Settings::default(),
            store.clone(),
            Arc::new(MemoryActivityLog::new()),
            t0,
        );

        engine.handle_input(InputEvent::ToggleStartPause, t0);
        engine.handle_input(InputEvent::Stop, t0 + ms(2500));

        assert_eq!(store.get("phy").unwrap(), 2500);
        assert_eq!(store.staged_len(), 0);
    }

    #[test]
    fn test_restart_in_trigger_hour_logs_only_new_time() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("counters.db");
        let log = MemoryActivityLog::new();

        {
            let store = Arc::new(SqliteCounterStore::open(&db_path).unwrap());
            let t0 = MonotonicInstant::now();
            let mut engine =
                StudyEngine::new(&Settings::default(), store, Arc::new(log.clone()), t0);

            engine.handle_input(InputEvent::ToggleStartPause, t0);
            assert_eq!(engine.tick(t0 + ms(1000), at(26, 2)).len(), 1);
            engine.handle_input(InputEvent::Stop, t0 + ms(1600));
        }

        // Reboot within the same hour: the fired day was not persisted
        let store = Arc::new(SqliteCounterStore::open(&db_path).unwrap());
        let t0 = MonotonicInstant::now();
        let mut engine = StudyEngine::new(
            &Settings::default(),
            store.clone(),
            Arc::new(log.clone()),
            t0,
        );
        assert_eq!(engine.totals()[Subject::Physics], ms(600));
        assert_eq!(engine.last_fired_day(), None);

        let events = engine.tick(t0 + ms(100), at(26, 2));
        let row = match &events[..] {
            [CoreEvent::RolloverFired { row }] => row.clone(),
            other => panic!("unexpected events: {other:?}"),
        };
        assert_eq!(row.totals[Subject::Physics], ms(600));
        assert_eq!(row.totals[Subject::Chemistry], Duration::ZERO);
        assert_eq!(row.totals[Subject::Maths], Duration::ZERO);
        assert_eq!(row.sum(), ms(600));

        let rows = log.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].totals[Subject::Physics], ms(1000));
        assert_eq!(rows[1], row);

        assert!(engine.totals().is_zero());
        assert_eq!(store.get("phy").unwrap(), 0);
        assert!(engine.tick(t0 + ms(200), at(26, 2)).is_empty());
    }
}
