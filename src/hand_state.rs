//! Per-frame hand snapshot built from one landmark observation.

use crate::{
    calibration::AdaptiveThresholds,
    geometry::{finger_angle, is_extended, planar_distance, ExtensionParams},
    landmarks::{validate_landmarks, Finger, FingerMap, HandLandmarks, Landmark, INDEX_TIP, MIDDLE_TIP, THUMB_TIP},
    Result,
};

/// Planar distances between fingertip pairs
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FingerDistances {
    pub thumb_index: f64,
    pub thumb_middle: f64,
}

/// Immutable analysis of a single frame.
///
/// Rebuilt from scratch for every frame and dropped once the frame's
/// decision is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct HandState {
    landmarks: HandLandmarks,
    pub fingers_extended: FingerMap<bool>,
    pub finger_angles: FingerMap<f64>,
    pub finger_distances: FingerDistances,
}

impl HandState {
    /// Analyze one detector frame.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` unless `points` holds exactly 21 landmarks.
    pub fn build(points: &[Landmark], params: &ExtensionParams, thresholds: &AdaptiveThresholds) -> Result<Self> {
        let landmarks = *validate_landmarks(points)?;

        let fingers_extended = FingerMap::from_fn(|finger| is_extended(finger, &landmarks, params, thresholds));
        let finger_angles = FingerMap::from_fn(|finger| finger_angle(finger, &landmarks));
        let finger_distances = FingerDistances {
            thumb_index: planar_distance(&landmarks[THUMB_TIP], &landmarks[INDEX_TIP]),
            thumb_middle: planar_distance(&landmarks[THUMB_TIP], &landmarks[MIDDLE_TIP]),
        };

        Ok(Self {
            landmarks,
            fingers_extended,
            finger_angles,
            finger_distances,
        })
    }

    #[must_use]
    pub const fn landmarks(&self) -> &HandLandmarks {
        &self.landmarks
    }

    #[must_use]
    pub fn tip(&self, finger: Finger) -> &Landmark {
        &self.landmarks[finger.tip()]
    }

    #[must_use]
    pub fn extended(&self, finger: Finger) -> bool {
        self.fingers_extended[finger]
    }

    #[must_use]
    pub fn extended_count(&self) -> usize {
        self.fingers_extended.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{MIDDLE_MCP, THUMB_MCP, INDEX_MCP};

    #[test]
    fn test_build_rejects_wrong_length() {
        let params = ExtensionParams::default();
        let thresholds = AdaptiveThresholds::default();
        let short = vec![Landmark::default(); 20];
        assert!(HandState::build(&short, &params, &thresholds).is_err());
        assert!(HandState::build(&[], &params, &thresholds).is_err());
    }

    #[test]
    fn test_build_flags_and_distances() {
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); 21];
        points[THUMB_MCP] = Landmark::new(0.40, 0.60, 0.0);
        points[THUMB_TIP] = Landmark::new(0.43, 0.60, 0.0);
        points[INDEX_MCP] = Landmark::new(0.50, 0.60, 0.0);
        points[INDEX_TIP] = Landmark::new(0.43, 0.20, 0.0);
        points[MIDDLE_MCP] = Landmark::new(0.55, 0.60, 0.0);
        points[MIDDLE_TIP] = Landmark::new(0.43, 0.65, 0.0);

        let state = HandState::build(&points, &ExtensionParams::default(), &AdaptiveThresholds::default()).unwrap();

        assert!(!state.extended(Finger::Thumb));
        assert!(state.extended(Finger::Index));
        assert!(!state.extended(Finger::Middle));
        assert_eq!(state.extended_count(), 1);
        assert!((state.finger_distances.thumb_index - 0.40).abs() < 1e-12);
        assert!((state.finger_distances.thumb_middle - 0.05).abs() < 1e-12);
        assert_eq!(state.tip(Finger::Index).xy(), (0.43, 0.20));
    }
}
