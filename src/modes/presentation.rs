use super::{Candidate, ModeClassifier};
use crate::{gesture::GestureKind, hand_state::HandState, landmarks::Finger};

/// Pointing with the index alone advances the slide.
///
/// There is no rule for PREV_SLIDE; every other shape is NONE.
pub struct PresentationMode;

impl ModeClassifier for PresentationMode {
    fn classify(&self, state: &HandState, _index_tip: Option<(f64, f64)>) -> Candidate {
        if state.extended(Finger::Index) && !state.extended(Finger::Middle) {
            Candidate::fixed(GestureKind::NextSlide, 0.85)
        } else {
            Candidate::none()
        }
    }

    fn name(&self) -> &str {
        "PresentationMode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{modes::ConfidenceRecipe, test_fixtures::Pose};

    #[test]
    fn test_next_slide() {
        let candidate = PresentationMode.classify(&Pose::new([false, true, false, false, false]).state(), None);
        assert_eq!(candidate.kind, GestureKind::NextSlide);
        assert_eq!(candidate.recipe, ConfidenceRecipe::Fixed(0.85));

        let with_others = PresentationMode.classify(&Pose::new([true, true, false, true, true]).state(), None);
        assert_eq!(with_others.kind, GestureKind::NextSlide);
    }

    #[test]
    fn test_never_previous_slide() {
        for mask in 0u8..32 {
            let extended = std::array::from_fn(|i| mask & (1 << i) != 0);
            let kind = PresentationMode.classify(&Pose::new(extended).state(), None).kind;
            assert_ne!(kind, GestureKind::PrevSlide);
        }
    }
}
