//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    #[serde(default)]
    pub device: RawDeviceConfig,

    #[serde(default)]
    pub timer: RawTimerConfig,

    #[serde(default)]
    pub input: RawInputConfig,

    #[serde(default)]
    pub display: RawDisplayConfig,

    #[serde(default)]
    pub rollover: RawRolloverConfig,

    #[serde(default)]
    pub clock: RawClockConfig,
}

/// Device-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDeviceConfig {
    /// Directory holding the counter database and the activity log
    pub data_dir: Option<PathBuf>,

    /// Activity log file, relative to `data_dir` unless absolute
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTimerConfig {
    /// Control loop tick interval in milliseconds
    pub tick_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawInputConfig {
    /// Button debounce window in milliseconds
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDisplayConfig {
    /// Idle time after which the display powers down
    pub inactivity_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRolloverConfig {
    /// Local hour (0-23) at which the daily log row is written
    pub trigger_hour: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawClockConfig {
    /// Fixed offset from UTC; the host's local zone is used when absent
    pub utc_offset_seconds: Option<i32>,

    /// Retry interval while waiting for the wall clock at boot
    pub sync_retry_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
            config_version = 1

            [device]
            data_dir = "/var/lib/studybox"
            log_file = "logs.csv"

            [timer]
            tick_interval_ms = 50

            [input]
            debounce_ms = 80

            [display]
            inactivity_timeout_seconds = 300

            [rollover]
            trigger_hour = 2

            [clock]
            utc_offset_seconds = 19800
            sync_retry_ms = 500
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.device.data_dir, Some(PathBuf::from("/var/lib/studybox")));
        assert_eq!(config.timer.tick_interval_ms, Some(50));
        assert_eq!(config.rollover.trigger_hour, Some(2));
        assert_eq!(config.clock.utc_offset_seconds, Some(19800));
    }

    #[test]
    fn sections_are_optional() {
        let config: RawConfig = toml::from_str("config_version = 1").unwrap();
        assert!(config.device.data_dir.is_none());
        assert!(config.rollover.trigger_hour.is_none());
    }
}
