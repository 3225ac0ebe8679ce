//! Global `tracing` subscriber setup for binaries.

use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;

/// Local wall-clock timestamps for log lines (`YYYY-MM-DD HH:MM:SS`).
#[derive(Debug, Clone, Copy, Default)]
pub struct LingoTimer;

impl tracing_subscriber::fmt::time::FormatTime for LingoTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// What: Install the global tracing subscriber.
///
/// Inputs:
/// - `default_filter`: Filter directive used when `RUST_LOG` is unset (e.g. `"info"`)
/// - `log_file`: Append logs to this file instead of stderr
///
/// Output:
/// - Worker guard that must be kept alive while logging to a file; `None` for stderr
///
/// Details:
/// - `RUST_LOG` always takes precedence over `default_filter`.
/// - If the log file cannot be opened the subscriber falls back to stderr and a
///   warning is logged.
/// - Calling this twice is harmless; the second installation is ignored.
pub fn init_tracing(default_filter: &str, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter))
    };

    let Some(path) = log_file else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_timer(LingoTimer)
            .try_init();
        return None;
    };

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(LingoTimer)
                .try_init();
            tracing::info!(path = %path.display(), "logging initialized");
            Some(guard)
        }
        Err(e) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_timer(LingoTimer)
                .try_init();
            tracing::warn!(error = %e, path = %path.display(), "failed to open log file; using stderr");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    /// What: `LingoTimer` writes a non-empty timestamp without panicking.
    #[test]
    fn lingo_timer_formats_time_without_panic() {
        use tracing_subscriber::fmt::time::FormatTime;
        let mut buf = String::new();
        let mut writer = tracing_subscriber::fmt::format::Writer::new(&mut buf);
        let _ = super::LingoTimer.format_time(&mut writer);
        assert_eq!(buf.len(), "2026-01-01 00:00:00".len());
    }
}
