use super::{Candidate, ModeClassifier};
use crate::{
    constants::DEFAULT_SCROLL_DOWN_MIN_Y,
    gesture::GestureKind,
    hand_state::HandState,
    landmarks::Finger,
};

/// Pointer, click and scroll rules.
///
/// In priority order:
/// 1. only index extended: MOUSE_MOVE at the index tip
/// 2. index curled, middle extended: LEFT_CLICK
/// 3. index extended, middle curled: RIGHT_CLICK
/// 4. index, middle, ring extended: SCROLL_UP
/// 5. index and middle extended, middle tip low in frame: SCROLL_DOWN
///
/// Rules 2-5 also require ring/pinky as listed in `classify`. The thumb is
/// only constrained by rule 1.
pub struct MouseMode {
    scroll_down_min_y: f64,
}

impl MouseMode {
    #[must_use]
    pub const fn new(scroll_down_min_y: f64) -> Self {
        Self { scroll_down_min_y }
    }
}

impl Default for MouseMode {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_DOWN_MIN_Y)
    }
}

impl ModeClassifier for MouseMode {
    fn classify(&self, state: &HandState, index_tip: Option<(f64, f64)>) -> Candidate {
        let index = state.extended(Finger::Index);
        let middle = state.extended(Finger::Middle);
        let ring = state.extended(Finger::Ring);
        let pinky = state.extended(Finger::Pinky);

        if index && state.extended_count() == 1 {
            let position = index_tip.unwrap_or_else(|| state.tip(Finger::Index).xy());
            return Candidate::fixed(GestureKind::MouseMove, 0.90).at(position);
        }

        if !index && middle && !ring && !pinky {
            return Candidate::blended(GestureKind::LeftClick, 0.85, 0.90);
        }

        if index && !middle && !ring && !pinky {
            return Candidate::blended(GestureKind::RightClick, 0.85, 0.90);
        }

        if index && middle && ring && !pinky {
            return Candidate::blended(GestureKind::ScrollUp, 0.75, 0.80);
        }

        if index && middle && !ring && !pinky && state.tip(Finger::Middle).y > self.scroll_down_min_y {
            return Candidate::blended(GestureKind::ScrollDown, 0.75, 0.80);
        }

        Candidate::none()
    }

    fn name(&self) -> &str {
        "MouseMode"
    }
}
