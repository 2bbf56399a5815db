//! Adaptive thresholds and the sample-averaging calibration procedure.
//!
//! A calibration session collects per-frame finger angles, fingertip
//! distances and extension flags. Once enough samples are in, the session
//! closes itself and recomputes the thresholds by linear averaging:
//!
//! - `angle_curled` becomes the mean angle of every finger observed curled
//! - `angle_extended` becomes the midpoint of the extended and curled means
//! - `distance_close` / `distance_far` become 0.6x / 1.2x the mean
//!   thumb-index distance
//!
//! Angle thresholds stay unchanged when either bucket is empty. The
//! threshold set persists as `{"thresholds": {name: value}, "saved_at": secs}`.

use crate::{
    config::CalibrationConfig,
    constants::{
        DEFAULT_ANGLE_CURLED, DEFAULT_ANGLE_EXTENDED, DEFAULT_DISTANCE_CLOSE, DEFAULT_DISTANCE_FAR,
        DEFAULT_REQUIRED_SAMPLES, DISTANCE_CLOSE_FACTOR, DISTANCE_FAR_FACTOR,
    },
    hand_state::{FingerDistances, HandState},
    landmarks::FingerMap,
    Error, Result,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

/// Names of the adaptive thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKind {
    AngleCurled,
    AngleExtended,
    DistanceClose,
    DistanceFar,
}

impl ThresholdKind {
    pub const ALL: [Self; 4] = [Self::AngleCurled, Self::AngleExtended, Self::DistanceClose, Self::DistanceFar];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AngleCurled => "angle_curled",
            Self::AngleExtended => "angle_extended",
            Self::DistanceClose => "distance_close",
            Self::DistanceFar => "distance_far",
        }
    }
}

impl fmt::Display for ThresholdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThresholdKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown threshold: {s}")))
    }
}

/// Partial threshold update, keyed by name
pub type ThresholdOverrides = BTreeMap<ThresholdKind, f64>;

/// Thresholds learned by calibration or set explicitly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveThresholds {
    pub angle_curled: f64,
    pub angle_extended: f64,
    pub distance_close: f64,
    pub distance_far: f64,
}

impl Default for AdaptiveThresholds {
    fn default() -> Self {
        Self {
            angle_curled: DEFAULT_ANGLE_CURLED,
            angle_extended: DEFAULT_ANGLE_EXTENDED,
            distance_close: DEFAULT_DISTANCE_CLOSE,
            distance_far: DEFAULT_DISTANCE_FAR,
        }
    }
}

impl AdaptiveThresholds {
    #[must_use]
    pub const fn get(&self, kind: ThresholdKind) -> f64 {
        match kind {
            ThresholdKind::AngleCurled => self.angle_curled,
            ThresholdKind::AngleExtended => self.angle_extended,
            ThresholdKind::DistanceClose => self.distance_close,
            ThresholdKind::DistanceFar => self.distance_far,
        }
    }

    pub fn set(&mut self, kind: ThresholdKind, value: f64) {
        match kind {
            ThresholdKind::AngleCurled => self.angle_curled = value,
            ThresholdKind::AngleExtended => self.angle_extended = value,
            ThresholdKind::DistanceClose => self.distance_close = value,
            ThresholdKind::DistanceFar => self.distance_far = value,
        }
    }

    /// Copy of `self` with `overrides` applied
    #[must_use]
    pub fn merged(&self, overrides: &ThresholdOverrides) -> Self {
        let mut merged = *self;
        for (&kind, &value) in overrides {
            merged.set(kind, value);
        }
        merged
    }

    /// All four thresholds as an override set
    #[must_use]
    pub fn to_overrides(&self) -> ThresholdOverrides {
        ThresholdKind::ALL.into_iter().map(|kind| (kind, self.get(kind))).collect()
    }

    /// Name-keyed form used by the persisted file
    #[must_use]
    pub fn to_named_map(&self) -> BTreeMap<String, f64> {
        ThresholdKind::ALL
            .into_iter()
            .map(|kind| (kind.as_str().to_string(), self.get(kind)))
            .collect()
    }

    /// Merge a name-keyed map; unknown names and non-finite values are skipped
    fn merge_named(&mut self, named: &BTreeMap<String, f64>) {
        for (name, &value) in named {
            match name.parse::<ThresholdKind>() {
                Ok(kind) if value.is_finite() => self.set(kind, value),
                Ok(kind) => warn!("Ignoring non-finite value for threshold {kind}: {value}"),
                Err(_) => warn!("Ignoring unknown threshold '{name}' in calibration file"),
            }
        }
    }
}

/// One observed frame during calibration
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationSample {
    pub gesture_label: String,
    /// Seconds since the Unix epoch
    pub timestamp: f64,
    pub angles: FingerMap<f64>,
    pub distances: FingerDistances,
    pub finger_states: FingerMap<bool>,
}

/// In-progress sample collection for one gesture label
#[derive(Debug, Clone)]
pub struct CalibrationSession {
    pub gesture_label: String,
    pub samples: Vec<CalibrationSample>,
    pub required_samples: usize,
}

impl CalibrationSession {
    #[must_use]
    pub fn new(gesture_label: &str, required_samples: usize) -> Self {
        Self {
            gesture_label: gesture_label.to_string(),
            samples: Vec::with_capacity(required_samples),
            required_samples,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.samples.len() >= self.required_samples
    }
}

/// Snapshot of calibration progress
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationStatus {
    pub is_calibrating: bool,
    pub current_gesture: Option<String>,
    pub samples_collected: usize,
    pub samples_required: usize,
    pub progress: f64,
    pub thresholds: AdaptiveThresholds,
}

/// On-disk layout of the persisted threshold set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationFile {
    pub thresholds: BTreeMap<String, f64>,
    #[serde(default)]
    pub saved_at: f64,
}

/// Recompute thresholds from a finished session's samples
#[must_use]
pub fn derive_thresholds(samples: &[CalibrationSample], current: &AdaptiveThresholds) -> AdaptiveThresholds {
    let mut derived = *current;
    if samples.is_empty() {
        return derived;
    }

    let (mut extended, mut curled) = (Vec::new(), Vec::new());
    for sample in samples {
        for (finger, is_extended) in sample.finger_states.iter() {
            let angle = sample.angles[finger];
            if is_extended {
                extended.push(angle);
            } else {
                curled.push(angle);
            }
        }
    }

    if let (Some(avg_extended), Some(avg_curled)) = (mean(&extended), mean(&curled)) {
        derived.angle_extended = (avg_extended + avg_curled) / 2.0;
        derived.angle_curled = avg_curled;
    }

    // Every sample counts toward the distance mean regardless of label
    let distances: Vec<f64> = samples.iter().map(|s| s.distances.thumb_index).collect();
    if let Some(avg_distance) = mean(&distances) {
        derived.distance_close = avg_distance * DISTANCE_CLOSE_FACTOR;
        derived.distance_far = avg_distance * DISTANCE_FAR_FACTOR;
    }

    derived
}

#[allow(clippy::cast_precision_loss)] // Sample counts are far below 2^52
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn now_epoch_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

/// Owner of the adaptive thresholds and the optional live session
#[derive(Debug, Clone)]
pub struct CalibrationStore {
    thresholds: AdaptiveThresholds,
    session: Option<CalibrationSession>,
    required_samples: usize,
    path: Option<PathBuf>,
    auto_save: bool,
}

impl Default for CalibrationStore {
    fn default() -> Self {
        Self::new(DEFAULT_REQUIRED_SAMPLES)
    }
}

impl CalibrationStore {
    /// In-memory store with default thresholds and no backing file
    #[must_use]
    pub fn new(required_samples: usize) -> Self {
        Self {
            thresholds: AdaptiveThresholds::default(),
            session: None,
            required_samples,
            path: None,
            auto_save: false,
        }
    }

    /// Store backed by the configured file, seeded from it when readable.
    ///
    /// A missing or corrupt file is reported and the defaults are kept.
    #[must_use]
    pub fn load_or_default(config: &CalibrationConfig, initial: AdaptiveThresholds) -> Self {
        let mut store = Self {
            thresholds: initial,
            session: None,
            required_samples: config.required_samples,
            path: Some(config.file.clone()),
            auto_save: config.auto_save,
        };

        if config.file.exists() {
            if let Err(e) = store.load_from(&config.file) {
                warn!("Failed to load calibration from {}: {e}. Using defaults.", config.file.display());
            }
        } else {
            debug!("No calibration file at {}, using defaults", config.file.display());
        }

        store
    }

    /// Begin collecting samples for `gesture_label`, discarding any open session
    pub fn start_calibration(&mut self, gesture_label: &str) {
        info!(
            "Started calibration for gesture: {gesture_label} ({} samples required)",
            self.required_samples
        );
        self.session = Some(CalibrationSession::new(gesture_label, self.required_samples));
    }

    /// Record one sample.
    ///
    /// Does nothing outside a session. Returns the new thresholds when this
    /// sample completes the session.
    pub fn add_sample(
        &mut self,
        angles: &FingerMap<f64>,
        distances: &FingerDistances,
        finger_states: &FingerMap<bool>,
    ) -> Option<AdaptiveThresholds> {
        let session = self.session.as_mut()?;

        session.samples.push(CalibrationSample {
            gesture_label: session.gesture_label.clone(),
            timestamp: now_epoch_secs(),
            angles: *angles,
            distances: *distances,
            finger_states: *finger_states,
        });
        debug!(
            "Calibration sample {}/{}",
            session.samples.len(),
            session.required_samples
        );

        if session.is_complete() {
            Some(self.finish_session())
        } else {
            None
        }
    }

    /// Record the angles, distances and flags of an analyzed frame
    pub fn add_hand_state(&mut self, state: &HandState) -> Option<AdaptiveThresholds> {
        self.add_sample(&state.finger_angles, &state.finger_distances, &state.fingers_extended)
    }

    fn finish_session(&mut self) -> AdaptiveThresholds {
        let Some(session) = self.session.take() else {
            return self.thresholds;
        };

        info!(
            "Processing {} calibration samples for {}",
            session.samples.len(),
            session.gesture_label
        );
        self.thresholds = derive_thresholds(&session.samples, &self.thresholds);
        info!("Calibration complete, learned thresholds: {:?}", self.thresholds);

        if self.auto_save {
            if let Some(path) = self.path.clone() {
                if let Err(e) = self.save_to(&path) {
                    warn!("Failed to save calibration to {}: {e}", path.display());
                }
            }
        }

        self.thresholds
    }

    /// Drop the open session; thresholds are untouched
    pub fn cancel_calibration(&mut self) {
        if self.session.take().is_some() {
            info!("Calibration cancelled");
        }
    }

    #[must_use]
    pub const fn is_calibrating(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub const fn thresholds(&self) -> AdaptiveThresholds {
        self.thresholds
    }

    pub fn set_threshold(&mut self, kind: ThresholdKind, value: f64) {
        self.thresholds.set(kind, value);
    }

    pub fn reset_thresholds(&mut self) {
        self.thresholds = AdaptiveThresholds::default();
        info!("Thresholds reset to defaults");
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn status(&self) -> CalibrationStatus {
        let (current_gesture, samples_collected) = self
            .session
            .as_ref()
            .map_or((None, 0), |s| (Some(s.gesture_label.clone()), s.samples.len()));

        let progress = if self.required_samples > 0 {
            samples_collected as f64 / self.required_samples as f64
        } else {
            0.0
        };

        CalibrationStatus {
            is_calibrating: self.is_calibrating(),
            current_gesture,
            samples_collected,
            samples_required: self.required_samples,
            progress,
            thresholds: self.thresholds,
        }
    }

    /// Persist the thresholds to the configured file
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError` when no file is configured, or the
    /// underlying I/O or encoding error.
    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| Error::CalibrationError("No calibration file configured".to_string()))?;
        self.save_to(path)
    }

    /// Write the thresholds to `path`.
    ///
    /// The content goes to a sibling temp file first and is renamed into
    /// place, so readers never see a partial threshold set.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, writing or renaming fails.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = CalibrationFile {
            thresholds: self.thresholds.to_named_map(),
            saved_at: now_epoch_secs(),
        };
        let content = serde_json::to_string_pretty(&file)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        if let Err(e) = fs::write(&tmp, content).and_then(|()| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        info!("Calibration saved to {}", path.display());
        Ok(())
    }

    /// Merge thresholds from `path` into the current set
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a calibration file.
    pub fn load_from<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let file: CalibrationFile = serde_json::from_str(&content)?;

        self.thresholds.merge_named(&file.thresholds);
        info!("Calibration loaded from {}: {:?}", path.display(), self.thresholds);
        Ok(())
    }

    /// Write the thresholds to an arbitrary location
    ///
    /// # Errors
    ///
    /// See [`CalibrationStore::save_to`].
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_to(path)
    }

    /// Merge thresholds from an arbitrary location
    ///
    /// # Errors
    ///
    /// See [`CalibrationStore::load_from`].
    pub fn import<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.load_from(path)
    }
}
