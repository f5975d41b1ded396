//! studyboxd - The studybox device service
//!
//! This is the main entry point for the device. It wires together:
//! - Configuration loading
//! - Counter store and activity log
//! - Study engine
//! - Terminal panel, system clock and keyboard buttons

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use studybox_config::{load_config_or_default, Settings};
use studybox_core::StudyEngine;
use studybox_store::{ActivityLog, CsvActivityLog};
use studybox_util::{default_config_path, is_mock_time_active, MonotonicInstant};
use studyboxd::{
    counter_store_or_memory, parse_line, Device, KeyCommand, SystemWallClock, TerminalDisplay,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// studyboxd - Study session tracker
#[derive(Parser, Debug)]
#[command(name = "studyboxd")]
#[command(about = "Study session tracker with per-subject totals and a daily activity log", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/studybox/config.toml)
    #[arg(short, long, env = "STUDYBOX_CONFIG", default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set STUDYBOX_DATA_DIR env var)
    #[arg(short, long, env = "STUDYBOX_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

type HostDevice = Device<TerminalDisplay<Stdout>, SystemWallClock>;

/// Main service state
struct Service {
    device: HostDevice,
    settings: Settings,
}

impl Service {
    fn new(args: &Args) -> Result<Self> {
        let mut settings = load_config_or_default(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?;

        if let Some(data_dir) = &args.data_dir {
            settings.device.data_dir = data_dir.clone();
        }

        info!(
            config_path = %args.config.display(),
            data_dir = %settings.device.data_dir.display(),
            trigger_hour = settings.trigger_hour,
            "Configuration loaded"
        );

        std::fs::create_dir_all(&settings.device.data_dir).with_context(|| {
            format!(
                "Failed to create data directory {:?}",
                settings.device.data_dir
            )
        })?;

        let store = counter_store_or_memory(&settings.db_path());

        let log_path = settings.log_path();
        let log: Arc<dyn ActivityLog> = Arc::new(
            CsvActivityLog::open(&log_path)
                .with_context(|| format!("Failed to open activity log {:?}", log_path))?,
        );
        info!(log_path = %log_path.display(), "Activity log initialized");

        if is_mock_time_active() {
            warn!("Mock time is active, the rollover follows the shifted wall clock");
        }

        let engine = StudyEngine::new(&settings, store, log, MonotonicInstant::now());
        let clock = SystemWallClock::new(settings.clock.utc_offset_seconds);
        let mut device = Device::new(&settings, engine, TerminalDisplay::stdout(), clock);

        // No panel, no device
        device.boot().context("Failed to initialize display")?;

        Ok(Self { device, settings })
    }

    async fn run(mut self) -> Result<()> {
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;

        // Rollover needs calendar time, so wait for the clock before running
        if !self.device.clock_synced() {
            warn!(
                retry_ms = self.settings.clock.sync_retry.as_millis() as u64,
                "Waiting for wall clock synchronization"
            );
            let mut retry = tokio::time::interval(self.settings.clock.sync_retry);
            loop {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM before clock sync, exiting");
                        return Ok(());
                    }
                    _ = sigint.recv() => {
                        info!("Received SIGINT before clock sync, exiting");
                        return Ok(());
                    }
                    _ = retry.tick() => {
                        if self.device.clock_synced() {
                            break;
                        }
                    }
                }
            }
            info!("Wall clock synchronized");
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut input_open = true;

        let mut tick_timer = tokio::time::interval(self.settings.tick_interval);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            tick_ms = self.settings.tick_interval.as_millis() as u64,
            "Service running"
        );

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully");
                    break;
                }

                _ = tick_timer.tick() => {
                    self.device.tick(MonotonicInstant::now());
                }

                line = lines.next_line(), if input_open => {
                    match line {
                        Ok(Some(line)) => {
                            if self.handle_line(&line) {
                                info!("Quit requested");
                                break;
                            }
                        }
                        Ok(None) => {
                            info!("Input closed, buttons unavailable");
                            input_open = false;
                        }
                        Err(e) => {
                            warn!(error = %e, "Failed to read input, buttons unavailable");
                            input_open = false;
                        }
                    }
                }
            }
        }

        info!("Shutting down studyboxd");
        self.device.shutdown(MonotonicInstant::now());
        info!("Shutdown complete");

        Ok(())
    }

    /// Returns true when the line asks to quit
    fn handle_line(&mut self, line: &str) -> bool {
        for command in parse_line(line) {
            match command {
                KeyCommand::Press(button) => {
                    self.device.press(button, MonotonicInstant::now());
                }
                KeyCommand::Quit => return true,
            }
        }
        false
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr, the panel owns stdout
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "studyboxd starting");

    let service = Service::new(&args)?;
    service.run().await
}
