//! Synthetic hand poses for unit tests.

use crate::{
    calibration::AdaptiveThresholds,
    geometry::ExtensionParams,
    hand_state::HandState,
    landmarks::{Finger, Landmark, WRIST},
};

/// Upright mirrored hand with each finger extended or curled
pub struct Pose {
    points: Vec<Landmark>,
}

impl Pose {
    pub fn new(extended: [bool; 5]) -> Self {
        let mut pose = Self {
            points: vec![Landmark::default(); 21],
        };
        pose.points[WRIST] = Landmark::new(0.5, 0.9, 0.0);
        for (finger, ext) in Finger::ALL.into_iter().zip(extended) {
            pose.place(finger, ext, default_tip(finger, ext));
        }
        pose
    }

    /// Move a finger's tip, keeping its extended/curled shape
    pub fn tip_at(mut self, finger: Finger, extended: bool, x: f64, y: f64) -> Self {
        self.place(finger, extended, (x, y));
        self
    }

    fn place(&mut self, finger: Finger, extended: bool, (x, y): (f64, f64)) {
        let (a, b, c) = finger.angle_joints();
        if finger == Finger::Thumb {
            let mcp = (x + if extended { 0.12 } else { 0.03 }, y + 0.02);
            self.points[1] = Landmark::new(mcp.0 + 0.03, mcp.1 + 0.05, 0.0);
            self.points[a] = Landmark::new(mcp.0, mcp.1, 0.0);
            self.points[b] = Landmark::new((mcp.0 + x) / 2.0, (mcp.1 + y) / 2.0, 0.0);
            self.points[c] = Landmark::new(x, y, 0.0);
            return;
        }

        let mcp = finger.mcp();
        if extended {
            let base = y + 0.15;
            self.points[mcp] = Landmark::new(x, base, 0.0);
            self.points[a] = Landmark::new(x, base - 0.07, 0.0);
            self.points[b] = Landmark::new(x, base - 0.11, 0.0);
        } else {
            let base = y - 0.04;
            self.points[mcp] = Landmark::new(x, base, 0.0);
            self.points[a] = Landmark::new(x, base - 0.06, 0.0);
            self.points[b] = Landmark::new(x + 0.06, base + 0.03, 0.0);
        }
        self.points[c] = Landmark::new(x, y, 0.0);
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn state(&self) -> HandState {
        HandState::build(&self.points, &ExtensionParams::default(), &AdaptiveThresholds::default())
            .expect("fixture has 21 landmarks")
    }
}

fn default_tip(finger: Finger, extended: bool) -> (f64, f64) {
    match (finger, extended) {
        (Finger::Thumb, true) => (0.30, 0.65),
        (Finger::Thumb, false) => (0.42, 0.68),
        (Finger::Index, e) => (0.45, if e { 0.40 } else { 0.64 }),
        (Finger::Middle, e) => (0.50, if e { 0.38 } else { 0.64 }),
        (Finger::Ring, e) => (0.55, if e { 0.40 } else { 0.64 }),
        (Finger::Pinky, e) => (0.60, if e { 0.45 } else { 0.66 }),
    }
}
