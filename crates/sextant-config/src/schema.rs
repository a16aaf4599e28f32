//! Configuration schema types.
//!
//! This module defines the structure of every configuration section.

use serde::{Deserialize, Serialize};

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON, one object per line.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// Logging configuration section.
///
/// # Example
///
/// ```
/// use sextant_config::{LogFormat, LoggingConfig};
///
/// let config = LoggingConfig {
///     level: "debug".to_string(),
///     format: LogFormat::Pretty,
///     ..Default::default()
/// };
/// assert!(config.enabled);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Install a log subscriber at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Default filter directive (e.g. "info" or "sextant_middleware=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Service name attached to log output.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            service_name: default_service_name(),
        }
    }
}

/// Validation stage configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Code attached to validation failures.
    #[serde(default = "default_validation_code")]
    pub error_code: String,

    /// Message used when a schema error carries no detail.
    #[serde(default = "default_validation_message")]
    pub default_message: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            error_code: default_validation_code(),
            default_message: default_validation_message(),
        }
    }
}

/// Error masking stage configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MaskingConfig {
    /// Mask failures at all. When `false` every failure passes through.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Replacement message for masked failures.
    #[serde(default = "default_masking_message")]
    pub message: String,

    /// Replacement code for masked failures.
    #[serde(default = "default_masking_code")]
    pub code: String,

    /// Codes that pass through unmasked.
    #[serde(default = "default_exposed_codes")]
    pub exposed_codes: Vec<String>,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            message: default_masking_message(),
            code: default_masking_code(),
            exposed_codes: default_exposed_codes(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "sextant".to_string()
}

fn default_validation_code() -> String {
    "VALIDATION_ERROR".to_string()
}

fn default_validation_message() -> String {
    "Validation failed".to_string()
}

fn default_masking_message() -> String {
    "An internal error occurred".to_string()
}

fn default_masking_code() -> String {
    "INTERNAL_ERROR".to_string()
}

fn default_exposed_codes() -> Vec<String> {
    vec!["VALIDATION_ERROR".to_string(), "UNAUTHORIZED".to_string()]
}
