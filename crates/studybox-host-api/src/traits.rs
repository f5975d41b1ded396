//! Host collaborator traits

use studybox_api::RenderRequest;
use studybox_util::CalendarTime;
use thiserror::Error;

/// Errors from display operations
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("Display initialization failed: {0}")]
    InitFailed(String),
}

pub type DisplayResult<T> = Result<T, DisplayError>;

/// The device's status panel
pub trait Display {
    /// Bring up the panel. A failure here is fatal at boot.
    fn init(&mut self) -> DisplayResult<()>;

    /// Draw the current frame. Rendering while powered down is allowed and
    /// takes effect when the panel is powered back on.
    fn render(&mut self, request: &RenderRequest);

    /// Switch the panel (or its backlight) on or off
    fn set_powered(&mut self, on: bool);
}

/// Source of synchronized calendar time
pub trait WallClockSource {
    /// Current local calendar time, or `None` until the clock has synced
    fn calendar_now(&self) -> Option<CalendarTime>;
}
