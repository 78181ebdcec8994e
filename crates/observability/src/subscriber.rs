//! Global tracing subscriber setup.

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::error::ObservabilityError;

fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    config
        .log_level
        .as_ref()
        .map(|level| EnvFilter::new(level.as_str()))
        .unwrap_or_else(|| {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        })
}

/// Install the global subscriber described by `config`.
///
/// Fails if a global subscriber is already installed.
pub fn init(config: ObservabilityConfig) -> Result<(), ObservabilityError> {
    let filter = env_filter(&config);

    // Layers are built as Options so the subscriber type stays the same
    // whichever combination is enabled.
    let console = config.enable_console;
    let text_layer = (console && config.format == LogFormat::Text).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(stderr_or_stdout(config.to_stderr))
    });
    let json_layer = (console && config.format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(stderr_or_stdout(config.to_stderr))
    });

    Registry::default()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .try_init()
        .map_err(|e| ObservabilityError::InitFailed(e.to_string()))?;

    tracing::debug!(
        service.name = %config.service_name,
        format = ?config.format,
        "logging initialized"
    );

    Ok(())
}

fn stderr_or_stdout(to_stderr: bool) -> tracing_subscriber::fmt::writer::BoxMakeWriter {
    if to_stderr {
        tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stderr)
    } else {
        tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stdout)
    }
}

/// Initialize with configuration from environment variables
pub fn init_from_env() -> Result<(), ObservabilityError> {
    init(ObservabilityConfig::from_env())
}
