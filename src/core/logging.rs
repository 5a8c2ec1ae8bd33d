//! File-based logging for TUI mode.
//!
//! No stdout layer - the TUI owns the terminal, so all output goes to a
//! daily-rolling JSON log file under the data directory. The `log` macro
//! family is bridged into `tracing` so both work throughout the crate.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize logging. The returned guard must be held for the process
/// lifetime or buffered log lines are lost on exit.
pub fn init(data_dir: &Path) -> WorkerGuard {
    let log_dir = data_dir.join("logs");
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, "metrodoc.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(file_layer).init();

    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }

    log::info!(
        "Logging initialized. Writing to {:?} (daily rolling)",
        log_dir.join("metrodoc.log")
    );

    guard
}
