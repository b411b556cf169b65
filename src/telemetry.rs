//! Logging setup.
//!
//! Call sites use the `log` macros; the tracing subscriber installed here
//! picks those records up and formats them. While frames are being drawn
//! stderr shares the screen, so playback sessions should log to a file.

use std::io::IsTerminal;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configured level filter.
pub const LOG_ENV: &str = "TUBETERM_LOG";

/// Keeps the non-blocking file writer alive; drop it last.
#[derive(Debug)]
pub struct TelemetryGuard {
    _guard: Option<WorkerGuard>,
}

impl TelemetryGuard {
    fn disabled() -> Self {
        Self { _guard: None }
    }
}

/// Install the global subscriber.
///
/// `level` is an `EnvFilter` directive such as `"warn"` or
/// `"tubeterm=debug"`. With `file` set, output is appended there;
/// otherwise it goes to stderr.
pub fn init(level: &str, file: Option<&Path>) -> TelemetryGuard {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let (writer, guard, ansi) = match file {
        Some(path) => match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(f);
                (BoxMakeWriter::new(non_blocking), Some(guard), false)
            }
            Err(err) => {
                eprintln!(
                    "Warning: failed to open log file {}: {}",
                    path.display(),
                    err
                );
                stderr_writer()
            }
        },
        None => stderr_writer(),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer);

    if subscriber.try_init().is_err() {
        return TelemetryGuard::disabled();
    }

    TelemetryGuard { _guard: guard }
}

fn stderr_writer() -> (BoxMakeWriter, Option<WorkerGuard>, bool) {
    (
        BoxMakeWriter::new(std::io::stderr),
        None,
        std::io::stderr().is_terminal(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tubeterm.log");
        let _first = init("debug", Some(&path));
        let second = init("debug", Some(&path));
        // Second subscriber cannot be installed; guard is empty
        assert!(second._guard.is_none());
        assert!(path.exists());
    }
}
