//! The device: engine, panel, clock and buttons in one loop body

use studybox_api::Button;
use studybox_config::Settings;
use studybox_core::{CoreEvent, StudyEngine};
use studybox_host_api::{Display, WallClockSource};
use studybox_util::{Debouncer, MonotonicInstant, Result, StudyboxError};
use tracing::{debug, info};

/// One iteration's worth of work for the control loop
///
/// Every handler runs to completion and leaves the panel showing the
/// current state.
pub struct Device<D, C> {
    engine: StudyEngine,
    display: D,
    clock: C,
    debouncer: Debouncer<Button>,
}

impl<D: Display, C: WallClockSource> Device<D, C> {
    pub fn new(settings: &Settings, engine: StudyEngine, display: D, clock: C) -> Self {
        Self {
            engine,
            display,
            clock,
            debouncer: Debouncer::new(settings.debounce),
        }
    }

    /// Bring up the panel and draw the initial frame
    pub fn boot(&mut self) -> Result<()> {
        self.display
            .init()
            .map_err(|e| StudyboxError::display(e.to_string()))?;
        self.display.render(&self.engine.render_request());
        info!(subject = %self.engine.subject(), "Device booted");
        Ok(())
    }

    /// Whether the wall clock has synced
    pub fn clock_synced(&self) -> bool {
        self.clock.calendar_now().is_some()
    }

    /// Feed a raw "pressed" sample for `button`
    ///
    /// Any raw press wakes the panel, even one the debouncer rejects.
    pub fn press(&mut self, button: Button, now: MonotonicInstant) -> Vec<CoreEvent> {
        if !self.debouncer.sample(button, true, now) {
            debug!(button = %button, "Press ignored by debouncer");
            let events = self.engine.note_activity(now);
            if !events.is_empty() {
                self.present(&events);
            }
            return events;
        }

        debug!(button = %button, "Button pressed");
        let events = self.engine.handle_input(button.event(), now);
        self.present(&events);
        events
    }

    /// Periodic tick. Also samples every button as released, since the
    /// keyboard only reports presses.
    pub fn tick(&mut self, now: MonotonicInstant) -> Vec<CoreEvent> {
        for button in Button::ALL {
            self.debouncer.sample(button, false, now);
        }

        let events = self.engine.tick(now, self.clock.calendar_now());
        self.present(&events);
        events
    }

    /// Persist any running time before the process exits
    pub fn shutdown(&mut self, now: MonotonicInstant) {
        self.engine.checkpoint(now);
        self.display.render(&self.engine.render_request());
    }

    pub fn engine(&self) -> &StudyEngine {
        &self.engine
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    fn present(&mut self, events: &[CoreEvent]) {
        for event in events {
            if let CoreEvent::DisplayPowerChanged { on } = event {
                self.display.set_powered(*on);
            }
        }
        self.display.render(&self.engine.render_request());
    }
}
