// Tracing setup
//
// Console output goes to stderr so stdout stays clean for the host
// protocol. When file logging is enabled a second layer writes JSON lines
// through a non-blocking rolling appender; the returned guard has to live
// until shutdown or buffered lines are lost.
//
// Precedence for the filter: RUST_LOG > [logging].level > "info"

use crate::config::{LogRotation, LoggingConfig};
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when RUST_LOG is not set
pub fn default_filter(level: &str) -> String {
    format!("blipdesk={}", level)
}

fn file_appender(config: &LoggingConfig) -> RollingFileAppender {
    let dir = &config.file_dir;
    let prefix = &config.file_prefix;
    match config.file_rotation {
        LogRotation::Hourly => tracing_appender::rolling::hourly(dir, prefix),
        LogRotation::Daily => tracing_appender::rolling::daily(dir, prefix),
        LogRotation::Never => tracing_appender::rolling::never(dir, prefix),
    }
}

/// Install the global subscriber. Keep the guard alive for the whole run.
pub fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.level)));

    let console = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = if config.file_enabled {
        match std::fs::create_dir_all(&config.file_dir) {
            Ok(()) => {
                let (writer, guard) = tracing_appender::non_blocking(file_appender(config));
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                // Subscriber is not up yet, so this has to go straight to stderr
                eprintln!(
                    "Warning: Could not create log directory {}: {}",
                    config.file_dir.display(),
                    e
                );
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_scopes_to_crate() {
        assert_eq!(default_filter("debug"), "blipdesk=debug");
    }

    #[test]
    fn test_appender_writes_into_configured_dir() {
        let temp = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            file_enabled: true,
            file_dir: temp.path().to_path_buf(),
            file_rotation: LogRotation::Never,
            ..Default::default()
        };

        use std::io::Write;
        let mut appender = file_appender(&config);
        appender.write_all(b"{}\n").unwrap();
        appender.flush().unwrap();

        assert!(temp.path().join("blipdesk").exists());
    }
}
