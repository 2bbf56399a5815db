//! Mode-specific gesture rules.
//!
//! Each control mode maps a [`HandState`] to at most one candidate gesture
//! through an ordered cascade of mutually exclusive rules: the first rule
//! that matches wins. Rules are pure; the history-dependent part of the
//! confidence is resolved by the orchestrator from the returned
//! [`ConfidenceRecipe`].

/// Pointer, click and scroll rules
pub mod mouse;

/// Two-finger scrolling rules
pub mod scroll;

/// Slide navigation rules
pub mod presentation;

use crate::{
    config::GestureConfig,
    constants::{WEIGHT_ANGLE_MATCH, WEIGHT_CONSISTENCY, WEIGHT_DISTANCE_MATCH},
    gesture::{ControlMode, GestureKind, GesturePayload},
    hand_state::HandState,
};

/// How a candidate's confidence is obtained
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfidenceRecipe {
    /// Constant confidence
    Fixed(f64),
    /// Weighted blend of per-rule match scores and history consistency
    Blend { angle_match: f64, distance_match: f64 },
}

impl ConfidenceRecipe {
    /// Resolve to a raw confidence given the candidate's consistency score
    #[must_use]
    pub fn resolve(&self, consistency: f64) -> f64 {
        match *self {
            Self::Fixed(confidence) => confidence,
            Self::Blend {
                angle_match,
                distance_match,
            } => blend_confidence(angle_match, distance_match, consistency),
        }
    }
}

/// `angle_match * 0.4 + distance_match * 0.3 + consistency * 0.3`
#[must_use]
pub fn blend_confidence(angle_match: f64, distance_match: f64, consistency: f64) -> f64 {
    angle_match * WEIGHT_ANGLE_MATCH + distance_match * WEIGHT_DISTANCE_MATCH + consistency * WEIGHT_CONSISTENCY
}

/// Raw output of a mode rule cascade
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub kind: GestureKind,
    pub recipe: ConfidenceRecipe,
    pub position: Option<(f64, f64)>,
    pub payload: Option<GesturePayload>,
}

impl Candidate {
    #[must_use]
    pub const fn none() -> Self {
        Self::fixed(GestureKind::None, 0.0)
    }

    #[must_use]
    pub const fn fixed(kind: GestureKind, confidence: f64) -> Self {
        Self {
            kind,
            recipe: ConfidenceRecipe::Fixed(confidence),
            position: None,
            payload: None,
        }
    }

    #[must_use]
    pub const fn blended(kind: GestureKind, angle_match: f64, distance_match: f64) -> Self {
        Self {
            kind,
            recipe: ConfidenceRecipe::Blend {
                angle_match,
                distance_match,
            },
            position: None,
            payload: None,
        }
    }

    #[must_use]
    pub const fn at(mut self, position: (f64, f64)) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: GesturePayload) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Trait for all mode rule sets
pub trait ModeClassifier: Send + Sync {
    /// Map one frame's hand state to a candidate gesture.
    ///
    /// `index_tip` is the externally resolved index fingertip, if any.
    fn classify(&self, state: &HandState, index_tip: Option<(f64, f64)>) -> Candidate;

    /// Get rule set name
    fn name(&self) -> &str;
}

/// Custom mode has no built-in rules; every frame is NONE
pub struct CustomMode;

impl ModeClassifier for CustomMode {
    fn classify(&self, _state: &HandState, _index_tip: Option<(f64, f64)>) -> Candidate {
        Candidate::none()
    }

    fn name(&self) -> &str {
        "CustomMode"
    }
}

/// Create the built-in rule set for a control mode
#[must_use]
pub fn create_mode_classifier(mode: ControlMode, config: &GestureConfig) -> Box<dyn ModeClassifier> {
    match mode {
        ControlMode::Mouse => Box::new(mouse::MouseMode::new(config.scroll_down_min_y)),
        ControlMode::Scroll => Box::new(scroll::ScrollMode::new(config.scroll_split_y)),
        ControlMode::Presentation => Box::new(presentation::PresentationMode),
        ControlMode::Custom => Box::new(CustomMode),
    }
}
