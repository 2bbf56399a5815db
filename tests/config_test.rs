//! Configuration file tests

use hand_gesture_control::{
    config::{Config, EXAMPLE_CONFIG},
    geometry::ExtensionStrategy,
    gesture::ControlMode,
    Error,
};
use tempfile::TempDir;

#[test]
fn test_yaml_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");

    let mut config = Config::default();
    config.default_mode = ControlMode::Presentation;
    config.gesture.debounce_time_ms = 450;
    config.gesture.extension_strategy = ExtensionStrategy::JointAngle;
    config.mouse.filter = "moving_average".to_string();
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.default_mode, ControlMode::Presentation);
    assert_eq!(loaded.gesture.debounce_time_ms, 450);
    assert_eq!(loaded.gesture.extension_strategy, ExtensionStrategy::JointAngle);
    assert_eq!(loaded.mouse.filter, "moving_average");
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_example_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("example.yaml");
    std::fs::write(&path, EXAMPLE_CONFIG).unwrap();

    let config = Config::from_file(&path).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.calibration.required_samples, 30);
    assert_eq!(config.mouse.scroll_speed, 3);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = Config::from_file(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_malformed_yaml_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "gesture: [unclosed").unwrap();

    match Config::from_file(&path) {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("parse")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_unknown_mode_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("default_mode: gaming\n");
    assert!(result.is_err());
}

#[test]
fn test_validation_messages() {
    let mut config = Config::default();
    config.gesture.debounce_time_ms = 0;
    match config.validate() {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("Debounce")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }

    let mut config = Config::default();
    config.mouse.smoothing_factor = 0.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.gesture.scroll_split_y = 1.5;
    assert!(config.validate().is_err());
}
