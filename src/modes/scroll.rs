use super::{Candidate, ModeClassifier};
use crate::{constants::DEFAULT_SCROLL_SPLIT_Y, gesture::GestureKind, hand_state::HandState, landmarks::Finger};

/// Two extended fingers scroll; the middle tip's height picks the direction
pub struct ScrollMode {
    split_y: f64,
}

impl ScrollMode {
    #[must_use]
    pub const fn new(split_y: f64) -> Self {
        Self { split_y }
    }
}

impl Default for ScrollMode {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_SPLIT_Y)
    }
}

impl ModeClassifier for ScrollMode {
    fn classify(&self, state: &HandState, _index_tip: Option<(f64, f64)>) -> Candidate {
        if !(state.extended(Finger::Index) && state.extended(Finger::Middle)) {
            return Candidate::none();
        }

        let kind = if state.tip(Finger::Middle).y < self.split_y {
            GestureKind::ScrollUp
        } else {
            GestureKind::ScrollDown
        };
        Candidate::fixed(kind, 0.80)
    }

    fn name(&self) -> &str {
        "ScrollMode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{modes::ConfidenceRecipe, test_fixtures::Pose};

    #[test]
    fn test_direction_follows_middle_tip() {
        let mode = ScrollMode::default();

        let up = mode.classify(&Pose::new([false, true, true, false, false]).state(), None);
        assert_eq!(up.kind, GestureKind::ScrollUp);
        assert_eq!(up.recipe, ConfidenceRecipe::Fixed(0.80));

        let pose = Pose::new([false, true, true, false, false]).tip_at(Finger::Middle, true, 0.50, 0.55);
        assert_eq!(mode.classify(&pose.state(), None).kind, GestureKind::ScrollDown);

        // Split point itself scrolls down
        let pose = Pose::new([false, true, true, false, false]).tip_at(Finger::Middle, true, 0.50, 0.50);
        assert_eq!(mode.classify(&pose.state(), None).kind, GestureKind::ScrollDown);
    }

    #[test]
    fn test_other_fingers_do_not_matter() {
        let mode = ScrollMode::default();
        assert_eq!(mode.classify(&Pose::new([true; 5]).state(), None).kind, GestureKind::ScrollUp);
    }

    #[test]
    fn test_needs_both_fingers() {
        let mode = ScrollMode::default();
        assert_eq!(mode.classify(&Pose::new([false, true, false, false, false]).state(), None).kind, GestureKind::None);
        assert_eq!(mode.classify(&Pose::new([false, false, true, false, false]).state(), None).kind, GestureKind::None);
    }
}
