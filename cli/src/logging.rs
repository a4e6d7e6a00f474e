//! Logging configuration with file-based output and size-based rotation.
//!
//! Writes logs to `~/.config/telop/telop.log` (or platform equivalent) with
//! 10 MB size-based rotation. Set `DEBUG_LOGGING=1` to enable debug output
//! for telop crates.

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Initialize logging with dual-output (file + stdout).
///
/// Returns a `WorkerGuard` that must be held for the application lifetime so
/// buffered logs flush on shutdown. Falls back to stdout-only logging when
/// the log directory cannot be created.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let log_dir = match dirs::config_dir() {
        Some(config) => config.join("telop"),
        None => {
            init_stdout_only(debug_logging);
            return None;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        // Can't use tracing yet since the subscriber is not initialized
        eprintln!("Failed to create log directory {log_dir:?}: {e}, using stdout only");
        init_stdout_only(debug_logging);
        return None;
    }

    let log_path = log_dir.join("telop.log");
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(10 * 1024 * 1024),
        1, // Keep only the latest rotated file
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {log_path:?}: {e}");
            init_stdout_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let filter_directive = if debug_logging {
        "info,telop_cli=debug,telop_core=debug"
    } else {
        "info"
    };

    let filter = EnvFilter::new(filter_directive);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .with(filter)
        .init();

    tracing::info!(log_file = ?log_path, debug_logging, "telop logging initialized");

    Some(guard)
}

/// Fallback: stdout-only logging when file logging fails.
fn init_stdout_only(debug_logging: bool) {
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let filter_directive = if debug_logging {
        "info,telop_cli=debug,telop_core=debug"
    } else {
        "info"
    };

    let filter = EnvFilter::new(filter_directive);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(filter)
        .init();

    tracing::info!(debug_logging, "telop logging initialized (stdout only)");
}
