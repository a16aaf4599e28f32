//! Main configuration type.
//!
//! This module provides the top-level [`SextantConfig`] struct.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, LoggingConfig, MaskingConfig, ValidationConfig};

/// Complete Sextant configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use sextant_config::SextantConfig;
///
/// let config = SextantConfig::default();
/// assert_eq!(config.validation.error_code, "VALIDATION_ERROR");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct SextantConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Validation stage configuration.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Error masking stage configuration.
    #[serde(default)]
    pub masking: MaskingConfig,
}

impl SextantConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The log level is empty while logging is enabled
    /// - The service name is empty
    /// - A failure code or replacement message is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.enabled && self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "logging.level",
                "must not be empty when logging is enabled",
            ));
        }

        if self.logging.service_name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "logging.service_name",
                "must not be empty",
            ));
        }

        if self.validation.error_code.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "validation.error_code",
                "must not be empty",
            ));
        }

        if self.masking.enabled {
            if self.masking.code.trim().is_empty() {
                return Err(ConfigError::invalid_value("masking.code", "must not be empty"));
            }
            if self.masking.message.trim().is_empty() {
                return Err(ConfigError::invalid_value(
                    "masking.message",
                    "must not be empty",
                ));
            }
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// - Pretty log formatting
    /// - Debug log level
    /// - Error masking disabled, so failure details stay visible
    ///
    /// # Example
    ///
    /// ```
    /// use sextant_config::{LogFormat, SextantConfig};
    ///
    /// let config = SextantConfig::development();
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// assert!(!config.masking.enabled);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                ..LoggingConfig::default()
            },
            masking: MaskingConfig {
                enabled: false,
                ..MaskingConfig::default()
            },
            ..Self::default()
        }
    }

    /// Create a production configuration preset.
    ///
    /// - JSON log formatting at info level
    /// - Error masking enabled
    #[must_use]
    pub fn production() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Json,
                ..LoggingConfig::default()
            },
            masking: MaskingConfig {
                enabled: true,
                ..MaskingConfig::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SextantConfig::default().validate().is_ok());
        assert!(SextantConfig::development().validate().is_ok());
        assert!(SextantConfig::production().validate().is_ok());
    }

    #[test]
    fn test_presets_differ() {
        let dev = SextantConfig::development();
        let prod = SextantConfig::production();
        assert_eq!(dev.logging.level, "debug");
        assert_eq!(prod.logging.format, LogFormat::Json);
        assert!(prod.masking.enabled);
        assert_ne!(dev, prod);
    }

    #[test]
    fn test_empty_error_code_rejected() {
        let mut config = SextantConfig::default();
        config.validation.error_code = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("validation.error_code"));
    }

    #[test]
    fn test_masking_fields_only_checked_when_enabled() {
        let mut config = SextantConfig::default();
        config.masking.code = String::new();
        assert!(config.validate().is_err());

        config.masking.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result = toml::from_str::<SextantConfig>("[server]\nport = 1");
        assert!(result.is_err());
    }
}
