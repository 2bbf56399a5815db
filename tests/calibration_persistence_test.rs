//! Calibration file persistence tests


use hand_gesture_control::{
    calibration::{AdaptiveThresholds, CalibrationFile, CalibrationStore, ThresholdKind},
    config::{CalibrationConfig, GestureConfig},
    hand_state::HandState,
};
use std::fs;
use tempfile::TempDir;
use test_helpers::{hand, pointing_at};

fn store_config(dir: &TempDir, auto_save: bool) -> CalibrationConfig {
    CalibrationConfig {
        required_samples: 4,
        file: dir.path().join("calibration_data.json"),
        auto_save,
    }
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("thresholds.json");

    let mut store = CalibrationStore::default();
    store.set_threshold(ThresholdKind::AngleExtended, 72.5);
    store.set_threshold(ThresholdKind::DistanceClose, 0.04);
    store.save_to(&path).unwrap();

    let file: CalibrationFile = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(file.thresholds["angle_extended"], 72.5);
    assert_eq!(file.thresholds.len(), 4);
    assert!(file.saved_at > 0.0);

    let mut loaded = CalibrationStore::default();
    loaded.load_from(&path).unwrap();
    assert_eq!(loaded.thresholds(), store.thresholds());
}

#[test]
fn test_save_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("calibration_data.json");

    CalibrationStore::default().save_to(&path).unwrap();
    let entries: Vec<_> = fs::read_dir(path.parent().unwrap()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_failed_save_removes_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("calibration_data.json");
    // A directory in the way makes the final rename fail
    fs::create_dir(&path).unwrap();

    assert!(CalibrationStore::default().save_to(&path).is_err());
    assert!(!path.with_extension("json.tmp").exists());
    assert!(path.is_dir());
}

#[test]
fn test_missing_file_falls_back_to_initial() {
    let dir = TempDir::new().unwrap();
    let initial = AdaptiveThresholds {
        angle_curled: 45.0,
        ..AdaptiveThresholds::default()
    };
    let store = CalibrationStore::load_or_default(&store_config(&dir, true), initial);
    assert_eq!(store.thresholds(), initial);
}

#[test]
fn test_corrupt_file_falls_back_to_initial() {
    let dir = TempDir::new().unwrap();
    let config = store_config(&dir, true);
    fs::write(&config.file, "{ this is not json").unwrap();

    let store = CalibrationStore::load_or_default(&config, AdaptiveThresholds::default());
    assert_eq!(store.thresholds(), AdaptiveThresholds::default());

    let mut explicit = CalibrationStore::default();
    assert!(explicit.load_from(&config.file).is_err());
}

#[test]
fn test_partial_file_merges_known_keys() {
    let dir = TempDir::new().unwrap();
    let config = store_config(&dir, false);
    fs::write(
        &config.file,
        r#"{"thresholds": {"angle_curled": 35.0, "wobble": 3.0}, "saved_at": 1700000000.0}"#,
    )
    .unwrap();

    let store = CalibrationStore::load_or_default(&config, AdaptiveThresholds::default());
    assert_eq!(store.thresholds().angle_curled, 35.0);
    assert_eq!(store.thresholds().angle_extended, AdaptiveThresholds::default().angle_extended);
}

#[test]
fn test_completed_session_auto_saves() {
    let dir = TempDir::new().unwrap();
    let config = store_config(&dir, true);
    let mut store = CalibrationStore::load_or_default(&config, AdaptiveThresholds::default());
    let params = GestureConfig::default().extension_params();

    store.start_calibration("point");
    let frames = [pointing_at(0.4, 0.3), hand([false; 5]), pointing_at(0.5, 0.35), hand([false; 5])];
    let mut learned = None;
    for points in &frames {
        let state = HandState::build(points, &params, &store.thresholds()).unwrap();
        learned = store.add_hand_state(&state);
    }

    let learned = learned.expect("fourth sample completes the session");
    assert!(config.file.exists());

    let reloaded = CalibrationStore::load_or_default(&config, AdaptiveThresholds::default());
    assert_eq!(reloaded.thresholds(), learned);
}

#[test]
fn test_no_auto_save_when_disabled() {
    let dir = TempDir::new().unwrap();
    let config = store_config(&dir, false);
    let mut store = CalibrationStore::load_or_default(&config, AdaptiveThresholds::default());
    let params = GestureConfig::default().extension_params();

    store.start_calibration("fist");
    for _ in 0..4 {
        let state = HandState::build(&hand([false; 5]), &params, &store.thresholds()).unwrap();
        store.add_hand_state(&state);
    }
    assert!(!store.is_calibrating());
    assert!(!config.file.exists());

    store.save().unwrap();
    assert!(config.file.exists());
}

#[test]
fn test_export_import() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.json");

    let mut source = CalibrationStore::default();
    source.set_threshold(ThresholdKind::DistanceFar, 0.3);
    source.export(&path).unwrap();

    let mut target = CalibrationStore::default();
    target.import(&path).unwrap();
    assert_eq!(target.thresholds().distance_far, 0.3);

    target.reset_thresholds();
    assert_eq!(target.thresholds(), AdaptiveThresholds::default());
}

#[test]
fn test_save_without_file_is_error() {
    assert!(CalibrationStore::default().save().is_err());
}
