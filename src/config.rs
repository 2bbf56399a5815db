//! Configuration management for the gesture control application

use crate::{
    calibration::AdaptiveThresholds,
    constants::{
        DEFAULT_CONSISTENCY_WINDOW, DEFAULT_DEBOUNCE_MS, DEFAULT_FINGER_EXTENSION_THRESHOLD, DEFAULT_HISTORY_CAPACITY,
        DEFAULT_REQUIRED_SAMPLES, DEFAULT_SCROLL_DOWN_MIN_Y, DEFAULT_SCROLL_SPLIT_Y, DEFAULT_SMOOTHING_FACTOR,
        DEFAULT_THUMB_EXTENSION_THRESHOLD, MOVEMENT_SPEED_MAX, MOVEMENT_SPEED_MIN,
    },
    geometry::{ExtensionParams, ExtensionStrategy},
    gesture::ControlMode,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gesture recognition configuration
    pub gesture: GestureConfig,

    /// Calibration configuration
    pub calibration: CalibrationConfig,

    /// Pointer and action configuration
    pub mouse: MouseConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Control mode active at startup
    pub default_mode: ControlMode,
}

/// Gesture recognition parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum milliseconds between two accepted occurrences of one gesture
    pub debounce_time_ms: u64,

    /// Gesture history ring capacity
    pub history_capacity: usize,

    /// Number of recent history entries used for consistency scoring
    pub consistency_window: usize,

    /// Lateral tip-to-MCP separation for thumb extension
    pub thumb_extension_threshold: f64,

    /// Vertical MCP-to-tip rise for finger extension
    pub finger_extension_threshold: f64,

    /// Extension test used for the four long fingers
    pub extension_strategy: ExtensionStrategy,

    /// Mouse mode: middle tip must be below this y for SCROLL_DOWN
    pub scroll_down_min_y: f64,

    /// Scroll mode: middle tip above this y scrolls up
    pub scroll_split_y: f64,

    /// Thresholds in effect before any calibration
    pub thresholds: AdaptiveThresholds,
}

/// Calibration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Samples collected before a session completes
    pub required_samples: usize,

    /// Persisted threshold file
    pub file: PathBuf,

    /// Save thresholds whenever a session completes
    pub auto_save: bool,
}

/// Pointer mapping and action parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseConfig {
    /// Screen width in pixels
    pub screen_width: u32,

    /// Screen height in pixels
    pub screen_height: u32,

    /// Movement speed multiplier (0.1 to 2.0)
    pub movement_speed: f64,

    /// Scroll steps per scroll gesture
    pub scroll_speed: i32,

    /// Smooth pointer movement
    pub smoothing: bool,

    /// Smoothing factor (0.0 to 1.0, lower = smoother)
    pub smoothing_factor: f64,

    /// Pointer smoothing filter name
    pub filter: String,
}

/// Logging parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Record session events
    pub enabled: bool,

    /// Log level (error, warn, info, debug, trace)
    pub level: String,

    /// Optional log file; stderr when unset
    pub log_file: Option<PathBuf>,

    /// Record detected gestures
    pub log_gestures: bool,

    /// Record dispatched actions
    pub log_actions: bool,

    /// Keep a JSON event list for export
    pub log_to_json: bool,

    /// Destination of the JSON export
    pub json_export_path: PathBuf,

    /// Seconds between periodic statistics reports
    pub stats_interval_secs: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            debounce_time_ms: DEFAULT_DEBOUNCE_MS,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            consistency_window: DEFAULT_CONSISTENCY_WINDOW,
            thumb_extension_threshold: DEFAULT_THUMB_EXTENSION_THRESHOLD,
            finger_extension_threshold: DEFAULT_FINGER_EXTENSION_THRESHOLD,
            extension_strategy: ExtensionStrategy::Displacement,
            scroll_down_min_y: DEFAULT_SCROLL_DOWN_MIN_Y,
            scroll_split_y: DEFAULT_SCROLL_SPLIT_Y,
            thresholds: AdaptiveThresholds::default(),
        }
    }
}

impl GestureConfig {
    /// Parameters for the finger-extension test
    #[must_use]
    pub const fn extension_params(&self) -> ExtensionParams {
        ExtensionParams {
            strategy: self.extension_strategy,
            thumb_threshold: self.thumb_extension_threshold,
            finger_threshold: self.finger_extension_threshold,
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            required_samples: DEFAULT_REQUIRED_SAMPLES,
            file: PathBuf::from("calibration_data.json"),
            auto_save: true,
        }
    }
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            screen_width: 1920,
            screen_height: 1080,
            movement_speed: 1.0,
            scroll_speed: 3,
            smoothing: true,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            filter: "exponential".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            log_file: None,
            log_gestures: true,
            log_actions: true,
            log_to_json: false,
            json_export_path: PathBuf::from("logs/gesture_log.json"),
            stats_interval_secs: 60,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let gesture = &self.gesture;
        if gesture.debounce_time_ms == 0 {
            return Err(Error::ConfigError("Debounce time must be greater than 0".to_string()));
        }
        if gesture.history_capacity == 0 {
            return Err(Error::ConfigError("History capacity must be greater than 0".to_string()));
        }
        if gesture.consistency_window == 0 || gesture.consistency_window > gesture.history_capacity {
            return Err(Error::ConfigError(
                "Consistency window must be between 1 and the history capacity".to_string(),
            ));
        }
        if gesture.thumb_extension_threshold <= 0.0 || gesture.finger_extension_threshold <= 0.0 {
            return Err(Error::ConfigError(
                "Extension thresholds must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&gesture.scroll_down_min_y) || !(0.0..=1.0).contains(&gesture.scroll_split_y) {
            return Err(Error::ConfigError(
                "Scroll split positions must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.calibration.required_samples == 0 {
            return Err(Error::ConfigError(
                "Required calibration samples must be greater than 0".to_string(),
            ));
        }

        let mouse = &self.mouse;
        if mouse.screen_width == 0 || mouse.screen_height == 0 {
            return Err(Error::ConfigError("Screen size must be non-zero".to_string()));
        }
        if !(MOVEMENT_SPEED_MIN..=MOVEMENT_SPEED_MAX).contains(&mouse.movement_speed) {
            return Err(Error::ConfigError(format!(
                "Movement speed must be between {MOVEMENT_SPEED_MIN} and {MOVEMENT_SPEED_MAX}"
            )));
        }
        if mouse.smoothing_factor <= 0.0 || mouse.smoothing_factor > 1.0 {
            return Err(Error::ConfigError(
                "Smoothing factor must be in (0.0, 1.0]".to_string(),
            ));
        }

        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            return Err(Error::ConfigError(format!("Unknown log level: {}", self.logging.level)));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Hand Gesture Control Configuration

# Gesture recognition
gesture:
  debounce_time_ms: 300
  history_capacity: 30
  consistency_window: 5
  thumb_extension_threshold: 0.08
  finger_extension_threshold: 0.02
  extension_strategy: "displacement"
  scroll_down_min_y: 0.6
  scroll_split_y: 0.5
  thresholds:
    angle_curled: 50.0
    angle_extended: 90.0
    distance_close: 50.0
    distance_far: 100.0

# Calibration
calibration:
  required_samples: 30
  file: "calibration_data.json"
  auto_save: true

# Pointer mapping and actions
mouse:
  screen_width: 1920
  screen_height: 1080
  movement_speed: 1.0
  scroll_speed: 3
  smoothing: true
  smoothing_factor: 0.3
  filter: "exponential"

# Logging
logging:
  enabled: true
  level: "info"
  log_gestures: true
  log_actions: true
  log_to_json: false
  json_export_path: "logs/gesture_log.json"
  stats_interval_secs: 60

# Control mode at startup
default_mode: "mouse"
"#;
