//! Host collaborator interfaces for studybox
//!
//! This crate defines the boundary between the core state machine and the
//! device it runs on: the display panel and the synchronized wall clock.
//! It contains no platform code itself.

mod mock;
mod traits;

pub use mock::*;
pub use traits::*;
