//! Hand landmark types and the fixed 21-point anatomical index schema.

use crate::{constants::NUM_HAND_LANDMARKS, Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// A single hand landmark.
///
/// `x` and `y` are normalized to the frame (0.0 to 1.0); `z` is relative
/// depth with detector-defined sign and scale. Deserializes from either an
/// `{x, y, z}` object or an `[x, y, z]` triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "LandmarkRepr")]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LandmarkRepr {
    Triple(f64, f64, f64),
    Object { x: f64, y: f64, #[serde(default)] z: f64 },
}

impl From<LandmarkRepr> for Landmark {
    fn from(repr: LandmarkRepr) -> Self {
        match repr {
            LandmarkRepr::Triple(x, y, z) | LandmarkRepr::Object { x, y, z } => Self { x, y, z },
        }
    }
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar (x, y) projection
    #[must_use]
    pub const fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl From<(f64, f64, f64)> for Landmark {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

/// One complete hand observation
pub type HandLandmarks = [Landmark; NUM_HAND_LANDMARKS];

/// Check that a detector frame is exactly one 21-point hand.
///
/// # Errors
///
/// Returns `InvalidInput` when the sequence length is not 21. Malformed
/// frames are rejected, never padded or truncated.
pub fn validate_landmarks(points: &[Landmark]) -> Result<&HandLandmarks> {
    points.try_into().map_err(|_| {
        Error::InvalidInput(format!(
            "expected {NUM_HAND_LANDMARKS} landmarks, got {}",
            points.len()
        ))
    })
}

/// The five named fingers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Self; 5] = [Self::Thumb, Self::Index, Self::Middle, Self::Ring, Self::Pinky];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Base joint used by the extension test (MCP for every finger)
    #[must_use]
    pub const fn mcp(self) -> usize {
        match self {
            Self::Thumb => THUMB_MCP,
            Self::Index => INDEX_MCP,
            Self::Middle => MIDDLE_MCP,
            Self::Ring => RING_MCP,
            Self::Pinky => PINKY_MCP,
        }
    }

    #[must_use]
    pub const fn tip(self) -> usize {
        match self {
            Self::Thumb => THUMB_TIP,
            Self::Index => INDEX_TIP,
            Self::Middle => MIDDLE_TIP,
            Self::Ring => RING_TIP,
            Self::Pinky => PINKY_TIP,
        }
    }

    /// The three landmarks whose middle vertex carries the finger's joint
    /// angle: MCP-IP-TIP for the thumb, PIP-DIP-TIP for the others.
    #[must_use]
    pub const fn angle_joints(self) -> (usize, usize, usize) {
        match self {
            Self::Thumb => (THUMB_MCP, THUMB_IP, THUMB_TIP),
            Self::Index => (INDEX_PIP, INDEX_DIP, INDEX_TIP),
            Self::Middle => (MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP),
            Self::Ring => (RING_PIP, RING_DIP, RING_TIP),
            Self::Pinky => (PINKY_PIP, PINKY_DIP, PINKY_TIP),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
        }
    }
}

/// Fixed-size per-finger storage indexed by [`Finger`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FingerMap<T>([T; 5]);

impl<T: Copy> FingerMap<T> {
    #[must_use]
    pub const fn splat(value: T) -> Self {
        Self([value; 5])
    }

    /// Build a map by evaluating `f` once per finger
    pub fn from_fn(mut f: impl FnMut(Finger) -> T) -> Self {
        Self(Finger::ALL.map(&mut f))
    }

    /// `(finger, value)` pairs in anatomical order
    pub fn iter(&self) -> impl Iterator<Item = (Finger, T)> + '_ {
        Finger::ALL.iter().map(move |&finger| (finger, self.0[finger.index()]))
    }
}

impl<T> FingerMap<T> {
    #[must_use]
    pub const fn new(values: [T; 5]) -> Self {
        Self(values)
    }
}

impl FingerMap<bool> {
    /// Number of fingers flagged `true`
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&flag| flag).count()
    }
}

impl<T> Index<Finger> for FingerMap<T> {
    type Output = T;

    fn index(&self, finger: Finger) -> &T {
        &self.0[finger.index()]
    }
}

impl<T> IndexMut<Finger> for FingerMap<T> {
    fn index_mut(&mut self, finger: Finger) -> &mut T {
        &mut self.0[finger.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_landmarks_length() {
        let points = vec![Landmark::default(); NUM_HAND_LANDMARKS];
        assert!(validate_landmarks(&points).is_ok());

        assert!(validate_landmarks(&points[..20]).is_err());
        assert!(validate_landmarks(&[]).is_err());

        let too_many = vec![Landmark::default(); 22];
        match validate_landmarks(&too_many) {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("22")),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_finger_schema() {
        assert_eq!(Finger::Thumb.angle_joints(), (2, 3, 4));
        assert_eq!(Finger::Index.angle_joints(), (6, 7, 8));
        assert_eq!(Finger::Pinky.tip(), 20);
        assert_eq!(Finger::Ring.mcp(), 13);
    }

    #[test]
    fn test_finger_map_count() {
        let mut flags = FingerMap::splat(false);
        flags[Finger::Index] = true;
        flags[Finger::Ring] = true;
        assert_eq!(flags.count(), 2);
        assert!(flags[Finger::Index]);
        assert!(!flags[Finger::Thumb]);
    }

    #[test]
    fn test_landmark_deserialize_forms() {
        let triple: Landmark = serde_json::from_str("[0.1, 0.2, -0.3]").unwrap();
        assert_eq!(triple, Landmark::new(0.1, 0.2, -0.3));

        let object: Landmark = serde_json::from_str(r#"{"x": 0.5, "y": 0.25}"#).unwrap();
        assert_eq!(object, Landmark::new(0.5, 0.25, 0.0));
    }
}
