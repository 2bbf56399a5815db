//! Hand gesture recognition for controlling a desktop with one hand.
//!
//! This library turns the 21 landmarks of a tracked hand into discrete
//! gesture decisions:
//! - Per-finger geometry (joint angles, fingertip distances, extension)
//! - Mode-specific rule sets for mouse, scroll and presentation control
//! - Debouncing and history-weighted confidence
//! - Calibration of adaptive thresholds, persisted as JSON
//!
//! The pipeline for each frame is:
//! 1. Validate the landmark set and build a [`hand_state::HandState`]
//! 2. Run the active mode's rules to get a candidate gesture
//! 3. Score its confidence and apply the per-gesture debounce window
//! 4. Record accepted gestures in the history and counters
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use hand_gesture_control::{
//!     classifier::GestureClassifier, config::GestureConfig, gesture::ControlMode, landmarks::Landmark,
//! };
//!
//! let mut classifier = GestureClassifier::new(GestureConfig::default());
//! classifier.set_mode(ControlMode::Mouse);
//!
//! // Landmarks as delivered by a hand tracker, normalized to the frame
//! let landmarks: Vec<Landmark> = (0..21).map(|i| Landmark::new(0.5, 0.9 - 0.02 * f64::from(i), 0.0)).collect();
//!
//! let decision = classifier.classify(&landmarks, None);
//! if decision.is_actionable() {
//!     println!("{} ({:.2})", decision.kind, decision.confidence());
//! }
//! ```
//!
//! ## Calibration
//!
//! ```no_run
//! use hand_gesture_control::{calibration::CalibrationStore, config::GestureConfig, hand_state::HandState};
//! # use hand_gesture_control::landmarks::Landmark;
//! # let frames: Vec<Vec<Landmark>> = Vec::new();
//!
//! let config = GestureConfig::default();
//! let mut store = CalibrationStore::default();
//! store.start_calibration("open_palm");
//!
//! for points in &frames {
//!     let state = HandState::build(points, &config.extension_params(), &store.thresholds())?;
//!     if let Some(thresholds) = store.add_hand_state(&state) {
//!         println!("Calibrated: {thresholds:?}");
//!     }
//! }
//! store.save_to("calibration_data.json")?;
//! # Ok::<(), hand_gesture_control::Error>(())
//! ```

/// Hand landmark data model and finger indexing
pub mod landmarks;

/// Planar angle, distance and finger-extension primitives
pub mod geometry;

/// Per-frame derived hand description
pub mod hand_state;

/// Gesture kinds, control modes and decisions
pub mod gesture;

/// Mode-specific gesture rules
pub mod modes;

/// Gesture history, debounce ledger and occurrence counters
pub mod history;

/// Adaptive thresholds and calibration sessions
pub mod calibration;

/// Per-frame classification orchestrator
pub mod classifier;

/// Session event recording and statistics
pub mod session_log;

/// Pointer smoothing filters
pub mod filters;

/// Mapping decisions to desktop actions
pub mod actions;

/// Main application module
pub mod app;

/// Coordinate helpers and checked casts
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::{Error, Result};
