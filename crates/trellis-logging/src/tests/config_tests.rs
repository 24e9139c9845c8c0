use crate::{LogFormat, LoggingConfig, LoggingError, init};

#[test]
fn test_default_config() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Plain);
    assert!(!config.with_target);
}

#[test]
fn test_config_from_toml() {
    let config = LoggingConfig::from_toml_str("level = \"trellis_core=debug,warn\"\nformat = \"json\"\n")
        .expect("parse");
    assert_eq!(config.level, "trellis_core=debug,warn");
    assert_eq!(config.format, LogFormat::Json);
    assert!(!config.ignore_env, "Missing keys take defaults");
}

#[test]
fn test_config_rejects_unknown_format() {
    let result = LoggingConfig::from_toml_str("format = \"xml\"");
    assert!(matches!(result, Err(LoggingError::Config(_))));
}

#[test]
fn test_log_format_from_str() {
    assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
    assert_eq!("plain".parse::<LogFormat>(), Ok(LogFormat::Plain));
    assert!("yaml".parse::<LogFormat>().is_err());
}

#[test]
fn test_invalid_filter_is_reported() {
    let config = LoggingConfig {
        ignore_env: true,
        ..LoggingConfig::default()
    }
    .with_level("trellis_core=notalevel");
    match config.filter() {
        Err(LoggingError::Filter { filter, .. }) => assert_eq!(filter, "trellis_core=notalevel"),
        other => panic!("Expected filter error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_init_installs_once() {
    let config = LoggingConfig {
        ignore_env: true,
        ..LoggingConfig::default()
    }
    .with_level("debug");
    assert!(init(&config).is_ok());
    log::info!("bridged through tracing");
    assert!(matches!(init(&config), Err(LoggingError::Install(_))));
}
