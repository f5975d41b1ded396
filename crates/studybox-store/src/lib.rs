//! Persistence layer for studybox
//!
//! Provides:
//! - Durable key/value counters with explicit commit (SQLite)
//! - Append-only activity log (CSV)
//! - In-memory doubles for tests

mod csv_log;
mod memory;
mod sqlite;
mod traits;

pub use csv_log::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        StoreError::Csv(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
