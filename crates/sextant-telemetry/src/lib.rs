//! Observability for Sextant.
//!
//! - **Logging**: structured JSON or pretty output via `tracing-subscriber`
//! - **Metrics**: action call counts, latency and in-flight calls via the
//!   `metrics` facade
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `sextant_action_calls_total` | Counter | `action`, `outcome` | Total call count |
//! | `sextant_action_duration_seconds` | Histogram | `action` | Call latency |
//! | `sextant_actions_in_flight` | Gauge | - | Calls in progress |
//!
//! # Example
//!
//! ```rust,ignore
//! use sextant_config::ConfigLoader;
//! use sextant_telemetry::logging::{init_logging, LogConfig};
//!
//! let config = ConfigLoader::new().with_env_prefix("SEXTANT").load()?;
//! init_logging(&LogConfig::from(&config.logging))?;
//! sextant_telemetry::metrics::describe_metrics();
//! ```

#![doc(html_root_url = "https://docs.rs/sextant-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
