#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging utilities for Resolute.
//!
//! Library crates only emit `tracing` events; installing a subscriber is
//! the application's call, made once through [`init`].

use std::fs::OpenOptions;
use std::str::FromStr;
use std::sync::Mutex;

use config::LoggingConfig;
use thiserror::Error;
use tracing::Level;

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The configured level is not one of trace/debug/info/warn/error.
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
    /// The configured log file could not be opened.
    #[error("Failed to open log file: {0}")]
    File(#[from] std::io::Error),
    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    Install(String),
}

/// Emits a trace event tagged with a module prefix.
pub fn trace(module: &str, msg: &str) {
    tracing::trace!(module = module, "{}", msg);
}

/// Parses a configured level name, case-insensitively.
pub fn parse_level(level: &str) -> Result<Level, LoggingError> {
    Level::from_str(level.trim()).map_err(|_| LoggingError::InvalidLevel(level.to_string()))
}

/// Installs a `tracing-subscriber` fmt subscriber as described by `config`.
///
/// Events go to the configured file (appended, no ANSI colors) or to stderr.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let level = parse_level(&config.level)?;
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(true);

    let installed = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| LoggingError::Install(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").expect("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN ").expect("warn"), Level::WARN);
        match parse_level("loud").expect_err("not a level") {
            LoggingError::InvalidLevel(l) => assert_eq!(l, "loud"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_init_rejects_bad_level_before_installing() {
        let config = LoggingConfig { level: "chatty".to_string(), file: None };
        assert!(matches!(init(&config), Err(LoggingError::InvalidLevel(_))));
    }

    #[test]
    fn test_init_to_file_then_second_install_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("resolute.log");
        let config = LoggingConfig { level: "trace".to_string(), file: Some(path.clone()) };

        init(&config).expect("first install succeeds");
        trace("TEST", "hello from the test");
        assert!(path.exists());

        let again = LoggingConfig { level: "info".to_string(), file: None };
        assert!(matches!(init(&again), Err(LoggingError::Install(_))));
    }
}
