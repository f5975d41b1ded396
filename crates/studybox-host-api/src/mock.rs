//! Mock host collaborators for testing

use std::sync::{Arc, Mutex};
use studybox_api::RenderRequest;
use studybox_util::CalendarTime;

use crate::{Display, DisplayError, DisplayResult, WallClockSource};

/// What the mock display has been asked to do
#[derive(Debug, Clone, Default)]
pub struct MockDisplayState {
    pub initialized: bool,
    pub powered: bool,
    pub frames: Vec<RenderRequest>,
    /// Every `set_powered` call, in order
    pub power_changes: Vec<bool>,
}

/// Mock display for unit/integration testing
///
/// Clones share state, so a test can keep one handle while the engine or
/// service owns another.
#[derive(Debug, Clone, Default)]
pub struct MockDisplay {
    state: Arc<Mutex<MockDisplayState>>,

    /// Configure init to fail
    pub fail_init: Arc<Mutex<bool>>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let display = Self::new();
        *display.fail_init.lock().unwrap() = true;
        display
    }

    pub fn snapshot(&self) -> MockDisplayState {
        self.state.lock().unwrap().clone()
    }

    pub fn last_frame(&self) -> Option<RenderRequest> {
        self.state.lock().unwrap().frames.last().cloned()
    }

    pub fn is_powered(&self) -> bool {
        self.state.lock().unwrap().powered
    }
}

impl Display for MockDisplay {
    fn init(&mut self) -> DisplayResult<()> {
        if *self.fail_init.lock().unwrap() {
            return Err(DisplayError::InitFailed("Mock display failure".into()));
        }
        let mut state = self.state.lock().unwrap();
        state.initialized = true;
        state.powered = true;
        Ok(())
    }

    fn render(&mut self, request: &RenderRequest) {
        self.state.lock().unwrap().frames.push(request.clone());
    }

    fn set_powered(&mut self, on: bool) {
        let mut state = self.state.lock().unwrap();
        state.powered = on;
        state.power_changes.push(on);
    }
}

/// Mock wall clock with a settable reading
#[derive(Debug, Clone, Default)]
pub struct MockWallClock {
    now: Arc<Mutex<Option<CalendarTime>>>,
}

impl MockWallClock {
    /// A clock that has not synced yet
    pub fn unsynced() -> Self {
        Self::default()
    }

    pub fn at(time: CalendarTime) -> Self {
        let clock = Self::default();
        clock.set(Some(time));
        clock
    }

    pub fn set(&self, time: Option<CalendarTime>) {
        *self.now.lock().unwrap() = time;
    }
}

impl WallClockSource for MockWallClock {
    fn calendar_now(&self) -> Option<CalendarTime> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use studybox_api::Subject;

    #[test]
    fn mock_display_records_frames_and_power() {
        let mut display = MockDisplay::new();
        let observer = display.clone();

        display.init().unwrap();
        assert!(observer.is_powered());

        let frame = RenderRequest::new(Subject::Maths, Duration::ZERO, Duration::from_secs(5));
        display.render(&frame);
        display.set_powered(false);

        let state = observer.snapshot();
        assert!(state.initialized);
        assert!(!state.powered);
        assert_eq!(state.frames, vec![frame.clone()]);
        assert_eq!(state.power_changes, vec![false]);
        assert_eq!(observer.last_frame(), Some(frame));
    }

    #[test]
    fn mock_display_init_failure() {
        let mut display = MockDisplay::failing();
        assert!(matches!(display.init(), Err(DisplayError::InitFailed(_))));
        assert!(!display.snapshot().initialized);
    }

    #[test]
    fn mock_clock_sync() {
        let clock = MockWallClock::unsynced();
        assert_eq!(clock.calendar_now(), None);

        let t = CalendarTime::new(2025, 12, 26, 2, 0, 0).unwrap();
        clock.set(Some(t));
        assert_eq!(clock.calendar_now(), Some(t));
    }
}
