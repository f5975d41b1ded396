//! Config validation CLI tool
//!
//! Checks a studybox configuration file and prints the settings the device
//! would run with. Without an argument, checks `$STUDYBOX_CONFIG` or the
//! default config path.

use std::path::PathBuf;
use std::process::ExitCode;
use studybox_config::{ConfigError, Settings, CURRENT_CONFIG_VERSION};
use studybox_util::{default_config_path, format_hms, STUDYBOX_CONFIG_ENV};

fn config_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(STUDYBOX_CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

fn print_settings(settings: &Settings) {
    let rows = [
        ("Counter store", settings.db_path().display().to_string()),
        ("Activity log", settings.log_path().display().to_string()),
        ("Rollover at", format!("{:02}:00 local", settings.trigger_hour)),
        ("Tick", format!("{} ms", settings.tick_interval.as_millis())),
        ("Debounce", format!("{} ms", settings.debounce.as_millis())),
        ("Display sleep", format_hms(settings.display_timeout)),
        (
            "Time zone",
            settings
                .clock
                .utc_offset_seconds
                .map(|secs| format!("UTC{:+}s", secs))
                .unwrap_or_else(|| "system local".into()),
        ),
    ];

    for (label, value) in rows {
        println!("  {:<14} {}", label, value);
    }
}

fn explain(error: &ConfigError) {
    match error {
        ConfigError::ValidationFailed { errors } => {
            for err in errors {
                eprintln!("  - {}", err);
            }
        }
        ConfigError::UnsupportedVersion(found) => {
            eprintln!("  config_version = {} (this build reads {})", found, CURRENT_CONFIG_VERSION);
        }
        other => eprintln!("  {}", other),
    }
}

fn main() -> ExitCode {
    let path = config_path();
    if !path.exists() {
        eprintln!("{}: not found (the device would run with defaults)", path.display());
        return ExitCode::from(2);
    }

    match studybox_config::load_config(&path) {
        Ok(settings) => {
            println!("{}: ok", path.display());
            print_settings(&settings);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: invalid", path.display());
            explain(&e);
            ExitCode::FAILURE
        }
    }
}
