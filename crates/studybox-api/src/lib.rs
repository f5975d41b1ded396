//! Domain types shared across studybox crates
//!
//! This crate defines the vocabulary between the core engine and its
//! collaborators:
//! - Subjects and per-subject totals
//! - Button inputs and the events they produce
//! - Activity log rows
//! - Display render requests

mod input;
mod types;

pub use input::*;
pub use types::*;
