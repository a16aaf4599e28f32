//! File-based loader tests.

use sextant_config::{ConfigError, ConfigLoader, LogFormat};
use std::io::Write;
use tempfile::Builder;

#[test]
fn test_loads_toml_file() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
        [logging]
        level = "warn"
        format = "pretty"
        service_name = "orders"

        [masking]
        exposed_codes = ["NOT_FOUND"]
        "#
    )
    .unwrap();

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert_eq!(config.logging.service_name, "orders");
    assert_eq!(config.masking.exposed_codes, vec!["NOT_FOUND"]);
    assert_eq!(config.validation.error_code, "VALIDATION_ERROR");
}

#[test]
fn test_loads_json_file() {
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"masking": {{"enabled": false}}}}"#).unwrap();

    let config = ConfigLoader::new()
        .with_optional_file(file.path())
        .unwrap()
        .load()
        .unwrap();
    assert!(!config.masking.enabled);
}

#[test]
fn test_rejects_unknown_extension() {
    let file = Builder::new().suffix(".yaml").tempfile().unwrap();
    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
}

#[test]
fn test_rejects_malformed_file() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[logging\nlevel = ").unwrap();
    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::TomlError(_))));
}
