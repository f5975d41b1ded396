//! Configuration validation

use crate::schema::RawConfig;
use thiserror::Error;

/// Longest accepted fixed UTC offset (exclusive)
const MAX_UTC_OFFSET_SECONDS: i32 = 86_400;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("rollover.trigger_hour must be 0-23, got {0}")]
    InvalidTriggerHour(u8),

    #[error("{field} must be greater than zero")]
    ZeroInterval { field: &'static str },

    #[error("clock.utc_offset_seconds out of range: {0}")]
    InvalidUtcOffset(i32),

    #[error("device.log_file must name a file")]
    EmptyLogFile,
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(hour) = config.rollover.trigger_hour
        && hour >= 24
    {
        errors.push(ValidationError::InvalidTriggerHour(hour));
    }

    let intervals = [
        ("timer.tick_interval_ms", config.timer.tick_interval_ms),
        ("input.debounce_ms", config.input.debounce_ms),
        (
            "display.inactivity_timeout_seconds",
            config.display.inactivity_timeout_seconds,
        ),
        ("clock.sync_retry_ms", config.clock.sync_retry_ms),
    ];
    for (field, value) in intervals {
        if value == Some(0) {
            errors.push(ValidationError::ZeroInterval { field });
        }
    }

    if let Some(offset) = config.clock.utc_offset_seconds
        && offset.unsigned_abs() >= MAX_UTC_OFFSET_SECONDS as u32
    {
        errors.push(ValidationError::InvalidUtcOffset(offset));
    }

    if let Some(log_file) = &config.device.log_file
        && log_file.as_os_str().is_empty()
    {
        errors.push(ValidationError::EmptyLogFile);
    }

    errors
}
