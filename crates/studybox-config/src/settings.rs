//! Validated settings structures

use crate::schema::RawConfig;
use std::path::PathBuf;
use std::time::Duration;
use studybox_util::{default_data_dir, DEFAULT_DEBOUNCE};

/// Local hour at which the daily rollover fires by default
pub const DEFAULT_TRIGGER_HOUR: u8 = 2;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

pub const DEFAULT_DISPLAY_TIMEOUT: Duration = Duration::from_secs(5 * 60);

pub const DEFAULT_SYNC_RETRY: Duration = Duration::from_millis(500);

const DEFAULT_LOG_FILE: &str = "logs.csv";

const DB_FILE: &str = "studybox.db";

/// Validated settings ready for use by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub device: DeviceSettings,
    pub tick_interval: Duration,
    pub debounce: Duration,
    pub display_timeout: Duration,
    pub trigger_hour: u8,
    pub clock: ClockSettings,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            device: DeviceSettings {
                data_dir: raw.device.data_dir.unwrap_or_else(default_data_dir),
                log_file: raw
                    .device
                    .log_file
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            },
            tick_interval: raw
                .timer
                .tick_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TICK_INTERVAL),
            debounce: raw
                .input
                .debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_DEBOUNCE),
            display_timeout: raw
                .display
                .inactivity_timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_DISPLAY_TIMEOUT),
            trigger_hour: raw.rollover.trigger_hour.unwrap_or(DEFAULT_TRIGGER_HOUR),
            clock: ClockSettings {
                utc_offset_seconds: raw.clock.utc_offset_seconds,
                sync_retry: raw
                    .clock
                    .sync_retry_ms
                    .map(Duration::from_millis)
                    .unwrap_or(DEFAULT_SYNC_RETRY),
            },
        }
    }

    /// Path of the durable counter database
    pub fn db_path(&self) -> PathBuf {
        self.device.data_dir.join(DB_FILE)
    }

    /// Path of the activity log
    pub fn log_path(&self) -> PathBuf {
        if self.device.log_file.is_absolute() {
            self.device.log_file.clone()
        } else {
            self.device.data_dir.join(&self.device.log_file)
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_raw(RawConfig {
            config_version: crate::CURRENT_CONFIG_VERSION,
            device: Default::default(),
            timer: Default::default(),
            input: Default::default(),
            display: Default::default(),
            rollover: Default::default(),
            clock: Default::default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSettings {
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockSettings {
    /// None means the host's local time zone
    pub utc_offset_seconds: Option<i32>,
    pub sync_retry: Duration,
}
