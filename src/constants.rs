//! Constants used throughout the crate

/// Number of landmarks in one hand observation
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Numeric precision epsilon added to vector-norm denominators
pub const EPSILON: f64 = 1e-10;

/// Lateral tip-to-MCP separation above which the thumb counts as extended
pub const DEFAULT_THUMB_EXTENSION_THRESHOLD: f64 = 0.08;

/// Vertical MCP-to-tip rise above which a finger counts as extended
pub const DEFAULT_FINGER_EXTENSION_THRESHOLD: f64 = 0.02;

/// Default adaptive thresholds
pub const DEFAULT_ANGLE_CURLED: f64 = 50.0;
pub const DEFAULT_ANGLE_EXTENDED: f64 = 90.0;
pub const DEFAULT_DISTANCE_CLOSE: f64 = 50.0;
pub const DEFAULT_DISTANCE_FAR: f64 = 100.0;

/// Minimum interval between two accepted occurrences of one gesture kind
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Gesture history ring capacity
pub const DEFAULT_HISTORY_CAPACITY: usize = 30;

/// Number of most recent history entries used for consistency scoring
pub const DEFAULT_CONSISTENCY_WINDOW: usize = 5;

/// Consistency score reported while the history is empty
pub const EMPTY_HISTORY_CONSISTENCY: f64 = 0.5;

/// Confidence blend weights
pub const WEIGHT_ANGLE_MATCH: f64 = 0.4;
pub const WEIGHT_DISTANCE_MATCH: f64 = 0.3;
pub const WEIGHT_CONSISTENCY: f64 = 0.3;

/// Mouse-mode SCROLL_DOWN requires the middle tip below this y
pub const DEFAULT_SCROLL_DOWN_MIN_Y: f64 = 0.6;

/// Scroll mode splits up/down at this middle-tip y
pub const DEFAULT_SCROLL_SPLIT_Y: f64 = 0.5;

/// Samples collected before a calibration session completes
pub const DEFAULT_REQUIRED_SAMPLES: usize = 30;

/// Calibrated distance thresholds as multiples of the mean thumb-index distance
pub const DISTANCE_CLOSE_FACTOR: f64 = 0.6;
pub const DISTANCE_FAR_FACTOR: f64 = 1.2;

/// Bounded event histories kept by the session log
pub const SESSION_LOG_CAPACITY: usize = 1000;

/// Default pointer smoothing factor (lower = smoother)
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.3;

/// Default moving-average window for pointer smoothing
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 5;

/// Movement speed bounds
pub const MOVEMENT_SPEED_MIN: f64 = 0.1;
pub const MOVEMENT_SPEED_MAX: f64 = 2.0;
