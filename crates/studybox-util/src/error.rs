//! Error types for studybox

use thiserror::Error;

/// Boot-time failures of the device
#[derive(Debug, Error)]
pub enum StudyboxError {
    /// The device keeps running on in-memory totals
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The device cannot run without its panel
    #[error("Display initialization failed: {0}")]
    DisplayInitFailure(String),
}

impl StudyboxError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    pub fn display(msg: impl Into<String>) -> Self {
        Self::DisplayInitFailure(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, StudyboxError>;
