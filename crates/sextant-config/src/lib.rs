//! Typed configuration for Sextant.
//!
//! This crate configures the built-in middleware stages and log output,
//! with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`SextantConfig`] holds one section per concern:
//!
//! - [`LoggingConfig`] - Log level, format and service name
//! - [`ValidationConfig`] - Failure code and fallback message of the validation stage
//! - [`MaskingConfig`] - Replacement message, code and exposed codes of the masking stage
//!
//! # Configuration File Format
//!
//! ```toml
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! service_name = "orders"
//!
//! [validation]
//! error_code = "VALIDATION_ERROR"
//! default_message = "Validation failed"
//!
//! [masking]
//! enabled = true
//! message = "An internal error occurred"
//! code = "INTERNAL_ERROR"
//! exposed_codes = ["VALIDATION_ERROR", "UNAUTHORIZED"]
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY` variables:
//!
//! - `SEXTANT__LOGGING__LEVEL=debug`
//! - `SEXTANT__MASKING__ENABLED=false`
//! - `SEXTANT__MASKING__EXPOSED_CODES=NOT_FOUND,CONFLICT`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::SextantConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{LogFormat, LoggingConfig, MaskingConfig, ValidationConfig};
