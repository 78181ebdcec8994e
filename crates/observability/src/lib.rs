//! parley observability: logging setup and tracing helpers shared by the
//! parley crates.
//!
//! # Quick Start
//!
//! ```no_run
//! use parley_observability::{ObservabilityConfig, init};
//!
//! let config = ObservabilityConfig::new("parley-cli").with_log_level("debug");
//! init(config)?;
//!
//! tracing::info!("converter ready");
//! # Ok::<(), parley_observability::ObservabilityError>(())
//! ```
//!
//! # Environment Variables
//!
//! - `PARLEY_SERVICE_NAME` - Service name recorded on every event
//! - `PARLEY_LOG` or `RUST_LOG` - Log level filter
//! - `PARLEY_LOG_FORMAT` - `text` (default) or `json`

pub mod config;
pub mod error;
pub mod spans;
pub mod subscriber;

pub use config::{LogFormat, ObservabilityConfig};
pub use error::ObservabilityError;
pub use spans::{record_duration, record_error};
pub use subscriber::{init, init_from_env};
