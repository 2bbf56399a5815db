//! Planar geometry over hand landmarks.
//!
//! All functions here are pure. Angles and distances are taken in the
//! (x, y) image plane; the detector's relative depth is ignored.

use crate::{
    calibration::AdaptiveThresholds,
    constants::{DEFAULT_FINGER_EXTENSION_THRESHOLD, DEFAULT_THUMB_EXTENSION_THRESHOLD, EPSILON},
    landmarks::{Finger, HandLandmarks, Landmark},
};
use serde::{Deserialize, Serialize};

/// Angle in degrees at vertex `b` between the rays `b -> a` and `b -> c`.
///
/// The cosine is clamped to [-1, 1] before `acos`. The denominator is
/// floored at `EPSILON` so a ray of zero length (`a` or `c` on top of `b`)
/// yields 90 degrees instead of NaN. Range is [0, 180].
#[must_use]
pub fn angle_at(a: &Landmark, b: &Landmark, c: &Landmark) -> f64 {
    let ba = (a.x - b.x, a.y - b.y);
    let bc = (c.x - b.x, c.y - b.y);

    let dot = ba.0 * bc.0 + ba.1 * bc.1;
    let norms = ba.0.hypot(ba.1) * bc.0.hypot(bc.1);

    let cos_angle = (dot / norms.max(EPSILON)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Euclidean distance in the image plane
#[must_use]
pub fn planar_distance(p: &Landmark, q: &Landmark) -> f64 {
    (q.x - p.x).hypot(q.y - p.y)
}

/// Joint angle of one finger (MCP-IP-TIP for the thumb, PIP-DIP-TIP otherwise)
#[must_use]
pub fn finger_angle(finger: Finger, landmarks: &HandLandmarks) -> f64 {
    let (a, b, c) = finger.angle_joints();
    angle_at(&landmarks[a], &landmarks[b], &landmarks[c])
}

/// Signal used to decide whether the four long fingers are extended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionStrategy {
    /// Tip rises above the MCP by more than `finger_threshold`
    #[default]
    Displacement,
    /// PIP-DIP-TIP angle reaches the adaptive `angle_extended` threshold
    JointAngle,
}

/// Fixed parameters of the finger-extension test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtensionParams {
    pub strategy: ExtensionStrategy,
    /// Minimum |tip.x - mcp.x| for the thumb
    pub thumb_threshold: f64,
    /// Minimum mcp.y - tip.y for index, middle, ring and pinky
    pub finger_threshold: f64,
}

impl Default for ExtensionParams {
    fn default() -> Self {
        Self {
            strategy: ExtensionStrategy::Displacement,
            thumb_threshold: DEFAULT_THUMB_EXTENSION_THRESHOLD,
            finger_threshold: DEFAULT_FINGER_EXTENSION_THRESHOLD,
        }
    }
}

/// Extended/curled decision for one finger.
///
/// The thumb sticks out sideways, so it is judged on horizontal separation
/// between tip and MCP whatever the strategy. The other fingers point up in
/// a mirrored upright view: smaller y means higher in the frame.
#[must_use]
pub fn is_extended(
    finger: Finger,
    landmarks: &HandLandmarks,
    params: &ExtensionParams,
    thresholds: &AdaptiveThresholds,
) -> bool {
    let mcp = &landmarks[finger.mcp()];
    let tip = &landmarks[finger.tip()];

    if finger == Finger::Thumb {
        return (tip.x - mcp.x).abs() > params.thumb_threshold;
    }

    match params.strategy {
        ExtensionStrategy::Displacement => mcp.y - tip.y > params.finger_threshold,
        ExtensionStrategy::JointAngle => finger_angle(finger, landmarks) >= thresholds.angle_extended,
    }
}
