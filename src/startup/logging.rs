//! Logging startup
//!
//! Console output plus an optional daily-rolling log file. The `RUST_LOG`
//! environment variable overrides the configured level.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Logging configuration for the server process.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Base log directory (default: `./logs`)
    pub log_dir: PathBuf,
    /// Enable console output
    pub console_output: bool,
    /// Enable file logging
    pub file_logging: bool,
    /// Default log level
    pub level: Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            console_output: true,
            file_logging: true,
            level: Level::INFO,
        }
    }
}

impl LoggingConfig {
    /// Create from environment variables (`YUCCA_LOG_DIR`,
    /// `YUCCA_LOG_CONSOLE`, `YUCCA_LOG_FILE`, `YUCCA_LOG_LEVEL`).
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let log_dir = std::env::var("YUCCA_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);
        let console_output = std::env::var("YUCCA_LOG_CONSOLE")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(defaults.console_output);
        let file_logging = std::env::var("YUCCA_LOG_FILE")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(defaults.file_logging);
        let level = std::env::var("YUCCA_LOG_LEVEL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.level);

        Self {
            log_dir,
            console_output,
            file_logging,
            level,
        }
    }
}

/// Keeps the file appender worker alive; dropping it flushes buffered
/// output.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the global tracing subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, Box<dyn std::error::Error>> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    let mut file_guard = None;

    if config.console_output {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));
        let console_layer = fmt::layer()
            .with_target(true)
            .with_filter(filter);
        layers.push(Box::new(console_layer));
    }

    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)?;
        let appender = RollingFileAppender::new(
            tracing_appender::rolling::Rotation::DAILY,
            &config.log_dir,
            "yucca.log",
        );
        let (writer, guard) = tracing_appender::non_blocking(appender);
        file_guard = Some(guard);

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));
        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .with_filter(filter);
        layers.push(Box::new(file_layer));
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| format!("failed to initialize logging: {e}"))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(config.console_output);
        assert!(config.file_logging);
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }
}
