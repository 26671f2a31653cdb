//! Configuration for tracing and instrumentation

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main instrumentation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentationConfig {
    /// Service name recorded in the startup event
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Log level filter (e.g., "info", "debug", "trace"); `RUST_LOG` wins when set
    pub log_level: String,
    /// Optional file output in addition to (or instead of) stderr
    #[serde(default)]
    pub log_file: Option<LogFileConfig>,
}

/// File-based logging configuration
///
/// The file is truncated on every start; one file per component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFileConfig {
    /// Directory where log files should be written
    pub directory: PathBuf,
    /// Prefix for log file names (e.g., "cli" creates "cli.log")
    pub file_prefix: String,
    /// Whether to also output logs to stderr
    pub console_enabled: bool,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            service_name: "storefront".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl LogFileConfig {
    /// Log file under `directory` named after `component`
    pub fn new(directory: impl Into<PathBuf>, component: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_prefix: component.into(),
            console_enabled: true,
        }
    }

    /// Full path of the log file
    pub fn path(&self) -> PathBuf {
        self.directory.join(format!("{}.log", self.file_prefix))
    }
}

impl InstrumentationConfig {
    /// Configuration with the given level filter
    pub fn with_level(log_level: impl Into<String>) -> Self {
        Self {
            log_level: log_level.into(),
            ..Self::default()
        }
    }

    /// Also write logs to `log_file`
    #[must_use]
    pub fn with_log_file(mut self, log_file: LogFileConfig) -> Self {
        self.log_file = Some(log_file);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_path() {
        let file = LogFileConfig::new("/var/lib/storefront", "cli");
        assert_eq!(file.path(), PathBuf::from("/var/lib/storefront/cli.log"));
        assert!(file.console_enabled);
    }

    #[test]
    fn test_with_level_keeps_defaults() {
        let config = InstrumentationConfig::with_level("debug");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.service_name, "storefront");
        assert!(config.log_file.is_none());
    }
}
