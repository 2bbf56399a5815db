//! Main application module for gesture control.
//!
//! [`GestureApp`] drives the classifier from a stream of landmark frames,
//! one JSON document per line, feeding calibration, dispatching actions
//! and recording the session.

use crate::{
    actions::{ActionMapper, ActionSink},
    calibration::{AdaptiveThresholds, CalibrationStore},
    classifier::GestureClassifier,
    config::Config,
    gesture::{ControlMode, GestureDecision, GestureKind},
    hand_state::HandState,
    landmarks::Landmark,
    session_log::{SessionLog, SessionStatistics},
    Result,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

/// Frame spacing assumed when a frame carries no timestamp (about 30 fps)
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 33;

/// Cooperative stop flag checked before every frame
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One captured frame
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "FrameRepr")]
pub struct Frame {
    /// Capture time in milliseconds
    pub t_ms: Option<u64>,
    /// Detected hand landmarks; empty when no hand was found
    pub landmarks: Vec<Landmark>,
    /// Index fingertip resolved by the tracker, if any
    pub index_tip: Option<(f64, f64)>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FrameRepr {
    Bare(Vec<Landmark>),
    Stamped {
        #[serde(default)]
        t_ms: Option<u64>,
        #[serde(default)]
        landmarks: Vec<Landmark>,
        #[serde(default)]
        index_tip: Option<(f64, f64)>,
    },
}

impl From<FrameRepr> for Frame {
    fn from(repr: FrameRepr) -> Self {
        match repr {
            FrameRepr::Bare(landmarks) => Self {
                landmarks,
                ..Self::default()
            },
            FrameRepr::Stamped {
                t_ms,
                landmarks,
                index_tip,
            } => Self {
                t_ms,
                landmarks,
                index_tip,
            },
        }
    }
}

impl Frame {
    /// Parse one JSON line
    ///
    /// # Errors
    ///
    /// Returns a JSON error if the line is not a frame
    pub fn parse(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Totals for one replay
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub frames: usize,
    pub skipped_lines: usize,
    pub hands: usize,
    pub accepted: BTreeMap<GestureKind, usize>,
    pub suppressed: usize,
    pub actions: usize,
    pub failed_actions: usize,
    pub cancelled: bool,
    pub final_mode: ControlMode,
    pub thresholds: AdaptiveThresholds,
    pub session: SessionStatistics,
}

/// Main application struct
pub struct GestureApp {
    config: Config,
    classifier: GestureClassifier,
    calibration: CalibrationStore,
    mapper: ActionMapper,
    sink: Box<dyn ActionSink>,
    log: SessionLog,
    cancel: CancellationToken,
    frame_interval_ms: u64,
    summary: RunSummary,
}

impl GestureApp {
    /// Create a new gesture control application
    ///
    /// # Errors
    ///
    /// Returns an error if the pointer filter cannot be built
    pub fn new(config: Config, sink: Box<dyn ActionSink>) -> Result<Self> {
        info!("Initializing gesture control (action sink: {})", sink.name());

        let log = SessionLog::new(config.logging.clone());
        let mut classifier = GestureClassifier::with_log(config.gesture.clone(), log.clone());
        classifier.set_mode(config.default_mode);

        let calibration = CalibrationStore::load_or_default(&config.calibration, config.gesture.thresholds);
        classifier.update_thresholds(&calibration.thresholds().to_overrides());

        let mapper = ActionMapper::new(&config.mouse)?;

        Ok(Self {
            config,
            classifier,
            calibration,
            mapper,
            sink,
            log,
            cancel: CancellationToken::new(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            summary: RunSummary::default(),
        })
    }

    /// Token that stops [`GestureApp::run`] before its next frame
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spacing used for frames without a timestamp
    pub fn set_frame_interval(&mut self, interval_ms: u64) {
        self.frame_interval_ms = interval_ms;
    }

    pub fn set_mode(&mut self, mode: ControlMode) {
        self.classifier.set_mode(mode);
    }

    /// Start collecting calibration samples from the next hand frames
    pub fn start_calibration(&mut self, gesture_label: &str) {
        self.calibration.start_calibration(gesture_label);
        self.log.log_calibration(gesture_label, "started");
    }

    #[must_use]
    pub const fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    #[must_use]
    pub const fn calibration(&self) -> &CalibrationStore {
        &self.calibration
    }

    #[must_use]
    pub const fn session_log(&self) -> &SessionLog {
        &self.log
    }

    /// Run one frame through calibration, classification and dispatch
    pub fn process_frame(&mut self, frame: &Frame, now_ms: u64) -> GestureDecision {
        self.summary.frames += 1;
        if frame.landmarks.len() == crate::constants::NUM_HAND_LANDMARKS {
            self.summary.hands += 1;
        }

        self.feed_calibration(frame);

        let decision = self.classifier.classify_at(&frame.landmarks, frame.index_tip, now_ms);
        if decision.debounce_suppressed {
            self.summary.suppressed += 1;
        } else if !decision.is_none() {
            *self.summary.accepted.entry(decision.kind).or_insert(0) += 1;
        }

        self.dispatch(&decision);
        self.handle_control(&decision);
        decision
    }

    fn feed_calibration(&mut self, frame: &Frame) {
        if !self.calibration.is_calibrating() {
            return;
        }
        let Ok(state) = HandState::build(
            &frame.landmarks,
            &self.config.gesture.extension_params(),
            &self.classifier.thresholds(),
        ) else {
            return;
        };

        let label = self.calibration.status().current_gesture.unwrap_or_default();
        if let Some(thresholds) = self.calibration.add_hand_state(&state) {
            self.classifier.update_thresholds(&thresholds.to_overrides());
            self.log.log_calibration(&label, "completed");
        }
    }

    fn dispatch(&mut self, decision: &GestureDecision) {
        let Some(action) = self.mapper.map(decision) else {
            return;
        };

        self.summary.actions += 1;
        match self.sink.execute(&action) {
            Ok(()) => self.log.log_action(action.name(), true, None),
            Err(e) => {
                self.summary.failed_actions += 1;
                self.log.log_action(action.name(), false, Some(e.to_string()));
            }
        }
    }

    fn handle_control(&mut self, decision: &GestureDecision) {
        if !decision.is_actionable() {
            return;
        }
        match decision.kind {
            GestureKind::ModeSwitch => self.classifier.set_mode(self.classifier.mode().next()),
            GestureKind::Exit => {
                info!("Exit gesture received");
                self.cancel.cancel();
            }
            _ => {}
        }
    }

    /// Replay frames from a JSON-lines file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read
    pub fn run_file<P: AsRef<Path>>(&mut self, path: P) -> Result<RunSummary> {
        let path = path.as_ref();
        info!("Replaying frames from {}", path.display());
        let file = File::open(path)?;
        self.run(BufReader::new(file))
    }

    /// Replay frames until the input ends or the token is cancelled.
    ///
    /// Blank lines and lines starting with `#` are ignored; lines that do
    /// not parse are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from `reader` fails
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<RunSummary> {
        info!("Starting main application loop in {} mode", self.classifier.mode());
        let mut clock_ms = 0u64;

        for (line_no, line) in reader.lines().enumerate() {
            if self.cancel.is_cancelled() {
                info!("Cancellation requested, stopping");
                self.summary.cancelled = true;
                break;
            }

            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let frame = match Frame::parse(trimmed) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("Skipping line {}: {e}", line_no + 1);
                    self.summary.skipped_lines += 1;
                    continue;
                }
            };

            let now_ms = frame.t_ms.unwrap_or(clock_ms);
            clock_ms = now_ms.saturating_add(self.frame_interval_ms);

            let decision = self.process_frame(&frame, now_ms);
            debug!("Frame {} at {now_ms} ms: {}", line_no + 1, decision.kind);

            if self.log.stats_due() {
                info!("Session statistics:\n{}", self.log.statistics());
            }
        }

        Ok(self.finish())
    }

    fn finish(&mut self) -> RunSummary {
        if let Err(e) = self.sink.release_all() {
            warn!("Failed to release input state: {e}");
        }
        self.mapper.reset();

        if self.calibration.is_calibrating() {
            warn!(
                "Input ended with calibration incomplete ({}/{} samples)",
                self.calibration.status().samples_collected,
                self.calibration.status().samples_required
            );
        }

        let logging = &self.config.logging;
        if logging.enabled && logging.log_to_json {
            if let Err(e) = self.log.export_json(&logging.json_export_path) {
                warn!("Failed to export session log: {e}");
            }
        }

        let mut summary = std::mem::take(&mut self.summary);
        summary.final_mode = self.classifier.mode();
        summary.thresholds = self.classifier.thresholds();
        summary.session = self.log.statistics();

        info!(
            "Application shutting down: {} frames, {} actions ({} failed)",
            summary.frames, summary.actions, summary.failed_actions
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{actions::RecordingSink, test_fixtures::Pose};

    fn frame_line(pose: &Pose, t_ms: u64) -> String {
        let points: Vec<[f64; 3]> = pose.points().iter().map(|p| [p.x, p.y, p.z]).collect();
        serde_json::json!({ "t_ms": t_ms, "landmarks": points }).to_string()
    }

    fn test_config() -> Config {
        let dir = std::env::temp_dir().join("hand-gesture-control-app-tests-missing");
        let mut config = Config::default();
        config.calibration.file = dir.join("calibration_data.json");
        config.calibration.auto_save = false;
        config.mouse.smoothing = false;
        config
    }

    #[test]
    fn test_frame_parse_forms() {
        let bare = Frame::parse("[[0.1, 0.2, 0.0], [0.3, 0.4, 0.0]]").unwrap();
        assert_eq!(bare.landmarks.len(), 2);
        assert!(bare.t_ms.is_none());

        let stamped = Frame::parse(r#"{"t_ms": 120, "landmarks": [], "index_tip": [0.5, 0.5]}"#).unwrap();
        assert_eq!(stamped.t_ms, Some(120));
        assert!(stamped.landmarks.is_empty());
        assert_eq!(stamped.index_tip, Some((0.5, 0.5)));

        assert!(Frame::parse("{not json").is_err());
    }

    #[test]
    fn test_cancellation_token() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_run_replays_and_skips_bad_lines() {
        let click = Pose::new([false, false, true, false, false]);
        let input = [
            "# recorded session".to_string(),
            frame_line(&click, 0),
            frame_line(&click, 100),
            "garbage".to_string(),
            "[]".to_string(),
            frame_line(&click, 400),
        ]
        .join("\n");

        let mut app = GestureApp::new(test_config(), Box::new(RecordingSink::new())).unwrap();
        let summary = app.run(input.as_bytes()).unwrap();

        assert_eq!(summary.frames, 4);
        assert_eq!(summary.skipped_lines, 1);
        assert_eq!(summary.hands, 3);
        assert_eq!(summary.accepted[&GestureKind::LeftClick], 2);
        assert_eq!(summary.suppressed, 1);
        assert_eq!(summary.actions, 2);
        assert!(!summary.cancelled);
    }

    #[test]
    fn test_cancelled_before_first_frame() {
        let click = Pose::new([false, false, true, false, false]);
        let mut app = GestureApp::new(test_config(), Box::new(RecordingSink::new())).unwrap();
        app.cancellation_token().cancel();

        let summary = app.run(frame_line(&click, 0).as_bytes()).unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.frames, 0);
    }

    #[test]
    fn test_failed_actions_do_not_stop_classification() {
        let click = Pose::new([false, false, true, false, false]);
        let input = [frame_line(&click, 0), frame_line(&click, 1_000)].join("\n");

        let mut app = GestureApp::new(test_config(), Box::new(RecordingSink::rejecting())).unwrap();
        let summary = app.run(input.as_bytes()).unwrap();
        assert_eq!(summary.actions, 2);
        assert_eq!(summary.failed_actions, 2);
        assert_eq!(summary.accepted[&GestureKind::LeftClick], 2);
        assert_eq!(summary.session.action_success_rates["left_click"], 0.0);
    }

    #[test]
    fn test_calibration_updates_classifier() {
        let mut config = test_config();
        config.calibration.required_samples = 3;
        let mut app = GestureApp::new(config, Box::new(RecordingSink::new())).unwrap();
        app.start_calibration("point");

        let pose = Pose::new([false, true, false, false, false]);
        let input: Vec<String> = (0..3).map(|i| frame_line(&pose, i * 100)).collect();
        let summary = app.run(input.join("\n").as_bytes()).unwrap();

        assert!(!app.calibration().is_calibrating());
        assert_eq!(summary.thresholds, app.calibration().thresholds());
        assert_ne!(summary.thresholds, AdaptiveThresholds::default());
    }

    #[test]
    fn test_untimed_frames_use_frame_interval() {
        let click = Pose::new([false, false, true, false, false]);
        let points: Vec<[f64; 3]> = click.points().iter().map(|p| [p.x, p.y, p.z]).collect();
        let line = serde_json::to_string(&points).unwrap();
        let input = [line.clone(), line].join("\n");

        let mut app = GestureApp::new(test_config(), Box::new(RecordingSink::new())).unwrap();
        app.set_frame_interval(500);
        let summary = app.run(input.as_bytes()).unwrap();
        assert_eq!(summary.suppressed, 0);
        assert_eq!(summary.accepted[&GestureKind::LeftClick], 2);
    }
}
