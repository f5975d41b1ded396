//! Shared utilities for studybox
//!
//! This crate provides:
//! - Time utilities (monotonic instants, calendar time, HH:MM:SS formatting)
//! - Per-input button debouncing
//! - Error types
//! - Default paths for config and data directories

mod debounce;
mod error;
mod paths;
mod time;

pub use debounce::*;
pub use error::*;
pub use paths::*;
pub use time::*;
