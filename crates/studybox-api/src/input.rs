//! Physical inputs and the events they map to

use serde::{Deserialize, Serialize};
use std::fmt;

/// A physical push button on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    /// Cycles through subjects
    Scroll,
    StartPause,
    Stop,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Scroll, Button::StartPause, Button::Stop];

    /// The event a debounced press of this button produces
    pub fn event(self) -> InputEvent {
        match self {
            Button::Scroll => InputEvent::SelectNext,
            Button::StartPause => InputEvent::ToggleStartPause,
            Button::Stop => InputEvent::Stop,
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Button::Scroll => "scroll",
            Button::StartPause => "start_pause",
            Button::Stop => "stop",
        };
        f.write_str(name)
    }
}

/// Clean input events consumed by the session timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    SelectNext,
    ToggleStartPause,
    Stop,
}
