//! Tracing setup for the `sitelang` binary.

use std::fmt;
use std::sync::OnceLock;

use sitelang::settings::paths::logs_dir;

/// Timestamp format for log lines.
struct SitelangTimer;

impl tracing_subscriber::fmt::time::FormatTime for SitelangTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d-T %H:%M:%S"))
    }
}

/// Keeps the non-blocking writer flushing until the process exits.
static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// What: Install the global tracing subscriber.
///
/// Inputs:
/// - `level`: Default filter when `RUST_LOG` is not set
///
/// Details:
/// - Writes to `~/.local/state/sitelang/logs/sitelang.log`
/// - Falls back to stderr when the log file cannot be opened
pub fn init(level: &str) {
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level))
    };

    let opened = logs_dir().map(|dir| dir.join("sitelang.log")).map(|path| {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path);
        (path, file)
    });

    match opened {
        Some((path, Ok(file))) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(SitelangTimer)
                .init();
            let _ = LOG_GUARD.set(guard);
            tracing::info!(path = %path.display(), "logging initialized");
        }
        other => {
            // Fallback: stderr keeps stdout clean for the translated page
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_timer(SitelangTimer)
                .init();
            match other {
                Some((path, Err(e))) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to open log file; using stderr");
                }
                _ => tracing::warn!("no writable log directory; using stderr"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    /// What: `FormatTime` impl writes a non-empty timestamp without panicking
    ///
    /// - Input: Tracing writer buffer
    /// - Output: Buffer receives a date-time string
    #[test]
    fn timer_formats_time() {
        use tracing_subscriber::fmt::time::FormatTime;
        let mut buf = String::new();
        let mut writer = tracing_subscriber::fmt::format::Writer::new(&mut buf);
        let _ = super::SitelangTimer.format_time(&mut writer);
        assert!(buf.contains("-T "));
    }
}
