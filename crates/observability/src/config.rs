//! Configuration for logging output

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ObservabilityError;

/// How log lines are rendered on the console
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ObservabilityError::Config(format!(
                "unknown log format '{}'",
                other
            ))),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Service name attached to the root span (e.g. "parley-cli")
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable console output
    #[serde(default = "default_true")]
    pub enable_console: bool,

    /// Log level filter (e.g., "info", "parley_aix=debug")
    /// Defaults to "info" if not set
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub format: LogFormat,

    /// Write log lines to stderr so stdout stays clean for command output
    #[serde(default = "default_true")]
    pub to_stderr: bool,
}

fn default_service_name() -> String {
    "parley".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            enable_console: true,
            log_level: None,
            format: LogFormat::default(),
            to_stderr: true,
        }
    }
}

impl ObservabilityConfig {
    /// Create a new configuration with service name
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enable: bool) -> Self {
        self.enable_console = enable;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_stderr(mut self, to_stderr: bool) -> Self {
        self.to_stderr = to_stderr;
        self
    }

    /// Build from environment variables
    ///
    /// Reads:
    /// - `PARLEY_SERVICE_NAME` → service_name
    /// - `PARLEY_LOG` or `RUST_LOG` → log_level
    /// - `PARLEY_LOG_FORMAT` → format (unknown values fall back to text)
    pub fn from_env() -> Self {
        let service_name =
            std::env::var("PARLEY_SERVICE_NAME").unwrap_or_else(|_| default_service_name());

        let log_level = std::env::var("PARLEY_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok();

        let format = std::env::var("PARLEY_LOG_FORMAT")
            .ok()
            .and_then(|f| f.parse().ok())
            .unwrap_or_default();

        Self {
            service_name,
            log_level,
            format,
            ..Default::default()
        }
    }
}
