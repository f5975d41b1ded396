//! Desktop host for the studybox device
//!
//! Wires the core engine to a terminal panel, the system clock and
//! keyboard input standing in for the three push buttons.

mod clock;
mod device;
mod input;
mod store;
mod terminal;

pub use clock::*;
pub use device::*;
pub use input::*;
pub use store::*;
pub use terminal::*;
