//! Gesture kinds, control modes and the per-frame decision value.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Every gesture the system can name.
///
/// Only a subset is produced by the built-in mode rules; the rest exist so
/// custom rules and action dispatch share one vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    MouseMove,
    LeftClick,
    RightClick,
    DoubleClick,
    Screenshot,
    ScrollUp,
    ScrollDown,
    DragStart,
    DragEnd,
    ZoomIn,
    ZoomOut,
    NextSlide,
    /// No detection rule exists for this kind yet
    PrevSlide,
    PresentationMode,
    PalmOpen,
    Fist,
    PeaceSign,
    ThumbsUp,
    Exit,
    Calibrate,
    ModeSwitch,
    None,
}

impl GestureKind {
    pub const ALL: [Self; 22] = [
        Self::MouseMove,
        Self::LeftClick,
        Self::RightClick,
        Self::DoubleClick,
        Self::Screenshot,
        Self::ScrollUp,
        Self::ScrollDown,
        Self::DragStart,
        Self::DragEnd,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::NextSlide,
        Self::PrevSlide,
        Self::PresentationMode,
        Self::PalmOpen,
        Self::Fist,
        Self::PeaceSign,
        Self::ThumbsUp,
        Self::Exit,
        Self::Calibrate,
        Self::ModeSwitch,
        Self::None,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Dense index for per-kind arrays
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MouseMove => "mouse_move",
            Self::LeftClick => "left_click",
            Self::RightClick => "right_click",
            Self::DoubleClick => "double_click",
            Self::Screenshot => "screenshot",
            Self::ScrollUp => "scroll_up",
            Self::ScrollDown => "scroll_down",
            Self::DragStart => "drag_start",
            Self::DragEnd => "drag_end",
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::NextSlide => "next_slide",
            Self::PrevSlide => "prev_slide",
            Self::PresentationMode => "presentation_mode",
            Self::PalmOpen => "palm_open",
            Self::Fist => "fist",
            Self::PeaceSign => "peace_sign",
            Self::ThumbsUp => "thumbs_up",
            Self::Exit => "exit",
            Self::Calibrate => "calibrate",
            Self::ModeSwitch => "mode_switch",
            Self::None => "none",
        }
    }

    /// Whether some built-in mode rule can produce this kind
    #[must_use]
    pub const fn has_builtin_rule(self) -> bool {
        matches!(
            self,
            Self::MouseMove | Self::LeftClick | Self::RightClick | Self::ScrollUp | Self::ScrollDown | Self::NextSlide
        )
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GestureKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown gesture kind: {s}")))
    }
}

/// Named decision table selecting the active gesture mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    #[default]
    Mouse,
    Scroll,
    Presentation,
    /// No built-in rules; the host application may install its own
    Custom,
}

impl ControlMode {
    pub const ALL: [Self; 4] = [Self::Mouse, Self::Scroll, Self::Presentation, Self::Custom];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mouse => "mouse",
            Self::Scroll => "scroll",
            Self::Presentation => "presentation",
            Self::Custom => "custom",
        }
    }

    /// Next mode in cycling order, wrapping back to `Mouse`
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Mouse => Self::Scroll,
            Self::Scroll => Self::Presentation,
            Self::Presentation => Self::Custom,
            Self::Custom => Self::Mouse,
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mouse" => Ok(Self::Mouse),
            "scroll" => Ok(Self::Scroll),
            "presentation" => Ok(Self::Presentation),
            "custom" => Ok(Self::Custom),
            _ => Err(Error::InvalidInput(format!("Unknown control mode: {s}"))),
        }
    }
}

/// Gesture-specific data attached to a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GesturePayload {
    /// Named numeric values attached by custom rules
    Values(BTreeMap<String, f64>),
}

/// Outcome of classifying one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GestureDecision {
    pub kind: GestureKind,
    confidence: f64,
    /// Normalized (x, y), present only for movement gestures
    pub position: Option<(f64, f64)>,
    pub payload: Option<GesturePayload>,
    /// Set when the kind repeated inside its debounce window
    pub debounce_suppressed: bool,
}

impl GestureDecision {
    /// Create a decision, clamping `confidence` into [0, 1] (NaN becomes 0)
    #[must_use]
    pub fn new(kind: GestureKind, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) };
        Self {
            kind,
            confidence,
            position: None,
            payload: None,
            debounce_suppressed: false,
        }
    }

    /// The "no gesture this frame" decision
    #[must_use]
    pub fn none() -> Self {
        Self::new(GestureKind::None, 0.0)
    }

    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some((x, y));
        self
    }

    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.kind == GestureKind::None
    }

    /// Whether the decision should reach action dispatch
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        !self.is_none() && !self.debounce_suppressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_kind_index_is_dense() {
        for (i, kind) in GestureKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(GestureKind::COUNT, 22);
    }

    #[test]
    fn test_kind_round_trips_through_name() {
        for kind in GestureKind::ALL {
            assert_eq!(kind.as_str().parse::<GestureKind>().unwrap(), kind);
        }
        assert!("wave".parse::<GestureKind>().is_err());
    }

    #[test]
    fn test_prev_slide_has_no_rule() {
        assert!(!GestureKind::PrevSlide.has_builtin_rule());
        assert!(GestureKind::NextSlide.has_builtin_rule());
    }

    #[test]
    fn test_mode_cycle() {
        let mut mode = ControlMode::Mouse;
        for _ in 0..ControlMode::ALL.len() {
            mode = mode.next();
        }
        assert_eq!(mode, ControlMode::Mouse);
        assert_eq!("Presentation".parse::<ControlMode>().unwrap(), ControlMode::Presentation);
        assert!("gaming".parse::<ControlMode>().is_err());
    }

    #[test]
    fn test_decision_clamps_confidence() {
        assert_eq!(GestureDecision::new(GestureKind::LeftClick, 1.7).confidence(), 1.0);
        assert_eq!(GestureDecision::new(GestureKind::LeftClick, -0.2).confidence(), 0.0);
        assert_eq!(GestureDecision::new(GestureKind::LeftClick, f64::NAN).confidence(), 0.0);
        assert!(!GestureDecision::none().is_actionable());
    }

    proptest! {
        #[test]
        fn prop_confidence_always_in_unit_range(raw in any::<f64>()) {
            let decision = GestureDecision::new(GestureKind::ScrollUp, raw);
            prop_assert!((0.0..=1.0).contains(&decision.confidence()));
        }
    }
}
