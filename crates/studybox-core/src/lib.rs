//! Core state machine for studybox
//!
//! This crate is the heart of the device, containing:
//! - Session timer state machine (Idle <-> Running)
//! - Persistent per-subject totals over a durable counter store
//! - Daily rollover of totals into the activity log
//! - Display inactivity power-down
//! - Time accounting using monotonic time only

mod accumulator;
mod clock;
mod display;
mod engine;
mod events;
mod rollover;
mod session;

pub use accumulator::*;
pub use clock::*;
pub use display::*;
pub use engine::*;
pub use events::*;
pub use rollover::*;
pub use session::*;
