#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Resolute Configuration
//!
//! This crate provides configuration management for Resolute.
//! It handles loading, saving, and locating configuration files that specify:
//! - Default contexts used when a failure is normalized
//! - The fallback status carried by raise-able error adapters
//! - Logging configuration
//!
//! Configuration is stored in TOML format. Every section is optional; a
//! missing section or key takes the value of [`Config::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Context of a pipeline's initialization step when the caller names none.
pub const DEFAULT_PIPELINE_CONTEXT: &str = "Pipeline initialization";

/// Context of a single-step resolution failure when the caller names none.
pub const DEFAULT_RESOLVE_CONTEXT: &str = "Promise resolution failed";

/// Context of a failed post-processing step.
pub const DEFAULT_POST_PROCESS_CONTEXT: &str = "post-processing failed";

/// Status reported by raise-able adapters whose descriptor carries none.
pub const DEFAULT_STATUS: u16 = 500;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "RESOLUTE_CONFIG";

/// Failures while locating, reading or writing a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("I/O error on config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// The file is not valid TOML for [`Config`]
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// [`Config`] could not be rendered as TOML
    #[error("Could not render config as TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// `RESOLUTE_CONFIG` names a file that does not exist
    #[error("Config file named by RESOLUTE_CONFIG not found: {0}")]
    NotFound(PathBuf),
    /// The platform reports no per-user configuration directory
    #[error("No user configuration directory on this platform")]
    ConfigDirUnavailable,
}

/// Everything read from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults applied by the resolver and the pipeline engine
    pub defaults: Defaults,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Defaults applied when a caller does not supply its own values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Context of a pipeline's initialization step
    pub pipeline_context: String,
    /// Context of a single-step resolution failure
    pub resolve_context: String,
    /// Context of a failed post-processing step
    pub post_process_context: String,
    /// Fallback status for raise-able adapters
    pub default_status: u16,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            pipeline_context: DEFAULT_PIPELINE_CONTEXT.to_string(),
            resolve_context: DEFAULT_RESOLVE_CONTEXT.to_string(),
            post_process_context: DEFAULT_POST_PROCESS_CONTEXT.to_string(),
            default_status: DEFAULT_STATUS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log file path (optional); stderr when absent
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string(), file: None } }
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/resolute/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("resolute");
        Ok(config_dir.join("config.toml"))
    }

    /// Locate and load the active configuration.
    ///
    /// `RESOLUTE_CONFIG` names an explicit file, which must exist. Otherwise
    /// the file at [`Config::default_path`] is used when present, and the
    /// built-in defaults when it is not.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_internal(std::env::var(CONFIG_ENV_VAR).ok(), Self::default_path().ok())
    }

    fn load_internal(
        explicit: Option<String>,
        default_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(explicit) = explicit {
            let path = PathBuf::from(explicit);
            if !path.exists() {
                return Err(ConfigError::NotFound(path));
            }
            return Self::from_file(path);
        }

        match default_path {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_from_file() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        let toml_content = r#"
            [defaults]
            pipeline_context = "checkout flow"
            resolve_context = "fetch failed"
            post_process_context = "decode failed"
            default_status = 502

            [logging]
            level = "debug"
            file = "debug.log"
        "#;
        fs::write(&temp_file, toml_content)
            .expect("Failed to write TOML content to temporary file");

        let loaded =
            Config::from_file(&temp_file).expect("Failed to load config from temporary file");
        assert_eq!(loaded.defaults.pipeline_context, "checkout flow");
        assert_eq!(loaded.defaults.resolve_context, "fetch failed");
        assert_eq!(loaded.defaults.post_process_context, "decode failed");
        assert_eq!(loaded.defaults.default_status, 502);
        assert_eq!(loaded.logging.level, "debug");
        assert_eq!(loaded.logging.file, Some(PathBuf::from("debug.log")));

        // Test file not found error
        let result = Config::from_file("nonexistent_file.toml");
        match result.expect_err("Expected error for nonexistent file") {
            ConfigError::FileRead(_) => {}
            _ => panic!("Expected FileRead error"),
        }

        // Test parse error
        let temp_file =
            NamedTempFile::new().expect("Failed to create temporary file for parse error test");
        fs::write(&temp_file, "invalid toml content")
            .expect("Failed to write invalid TOML content");

        match Config::from_file(&temp_file).expect_err("Expected parse error for invalid TOML") {
            ConfigError::Parse(_) => {}
            _ => panic!("Expected Parse error"),
        }
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        fs::write(&temp_file, "[defaults]\ndefault_status = 503\n")
            .expect("Failed to write TOML content");

        let loaded = Config::from_file(&temp_file).expect("partial config should load");
        assert_eq!(loaded.defaults.default_status, 503);
        assert_eq!(loaded.defaults.pipeline_context, DEFAULT_PIPELINE_CONTEXT);
        assert_eq!(loaded.logging, LoggingConfig::default());
    }

    #[test]
    fn test_save() {
        let config = Config::default();
        let temp_file =
            NamedTempFile::new().expect("Failed to create temporary file for save test");

        config.save(&temp_file).expect("save should succeed");

        let contents = fs::read_to_string(&temp_file).expect("Failed to read saved config file");
        assert!(contents.contains("Pipeline initialization"));
        assert!(contents.contains("500"));
        assert_eq!(Config::from_file(&temp_file).expect("reload"), config);

        // Test file write error - try to save to a non-existent directory
        let temp_dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let non_existent_subdir = temp_dir.path().join("nonexistent").join("config.toml");

        match config.save(&non_existent_subdir).expect_err("Expected file write error") {
            ConfigError::FileRead(_) => (),
            other => panic!("Expected FileRead error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_path() {
        let path = Config::default_path().expect("Failed to get default config path");
        let path_str = path.to_str().expect("Path should be valid UTF-8");
        assert!(path_str.contains("resolute"));
        assert!(path_str.ends_with("config.toml"));
    }

    #[test]
    fn test_load_internal() {
        // Nothing configured: built-in defaults
        let config = Config::load_internal(None, None).expect("defaults");
        assert_eq!(config, Config::default());

        // Default path that does not exist: built-in defaults
        let temp_dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let missing = temp_dir.path().join("config.toml");
        let config = Config::load_internal(None, Some(missing.clone())).expect("defaults");
        assert_eq!(config, Config::default());

        // Explicit path that does not exist is an error
        let explicit = missing.to_str().expect("utf-8").to_string();
        match Config::load_internal(Some(explicit.clone()), None).expect_err("missing") {
            ConfigError::NotFound(p) => assert_eq!(p, missing),
            other => panic!("Expected NotFound, got {:?}", other),
        }

        // Explicit path wins over the default path
        fs::write(&missing, "[logging]\nlevel = \"warn\"\n").expect("write");
        let config = Config::load_internal(Some(explicit), None).expect("explicit");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_default() {
        let config = Config::default();
        assert_eq!(config.defaults.pipeline_context, "Pipeline initialization");
        assert_eq!(config.defaults.resolve_context, "Promise resolution failed");
        assert_eq!(config.defaults.post_process_context, "post-processing failed");
        assert_eq!(config.defaults.default_status, 500);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, None);
    }
}
