//! Per-frame gesture classification.
//!
//! [`GestureClassifier`] owns every piece of state that persists across
//! frames: the active control mode, adaptive thresholds, the debounce
//! ledger, gesture history and occurrence counters. Each call to
//! [`GestureClassifier::classify`] runs the whole pipeline for one frame:
//! landmarks to hand state, hand state to mode candidate, candidate to
//! confidence, then the debounce filter and history update.

use crate::{
    calibration::{AdaptiveThresholds, ThresholdOverrides},
    config::GestureConfig,
    gesture::{ControlMode, GestureDecision, GestureKind},
    hand_state::HandState,
    history::{DebounceLedger, GestureHistory, OccurrenceCounters},
    landmarks::{Finger, Landmark},
    modes::{create_mode_classifier, ModeClassifier},
    session_log::SessionLog,
};
use log::{debug, info};
use std::{collections::BTreeMap, time::Instant};

/// Stateful gesture classifier for a single hand stream
pub struct GestureClassifier {
    config: GestureConfig,
    mode: ControlMode,
    rules: Box<dyn ModeClassifier>,
    custom_rules: Option<Box<dyn ModeClassifier>>,
    thresholds: AdaptiveThresholds,
    history: GestureHistory,
    ledger: DebounceLedger,
    counters: OccurrenceCounters,
    last_index_tip: Option<(f64, f64)>,
    log: Option<SessionLog>,
    epoch: Instant,
}

impl GestureClassifier {
    /// Create a classifier in mouse mode from a configuration snapshot
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        let mode = ControlMode::default();
        Self {
            rules: create_mode_classifier(mode, &config),
            custom_rules: None,
            thresholds: config.thresholds,
            history: GestureHistory::new(config.history_capacity),
            ledger: DebounceLedger::default(),
            counters: OccurrenceCounters::default(),
            last_index_tip: None,
            log: None,
            epoch: Instant::now(),
            mode,
            config,
        }
    }

    /// Create a classifier that reports decisions to `log`
    #[must_use]
    pub fn with_log(config: GestureConfig, log: SessionLog) -> Self {
        Self {
            log: Some(log),
            ..Self::new(config)
        }
    }

    /// Classify one frame, timestamped by the classifier's own monotonic clock
    pub fn classify(&mut self, points: &[Landmark], index_tip: Option<(f64, f64)>) -> GestureDecision {
        let now_ms = u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.classify_at(points, index_tip, now_ms)
    }

    /// Classify one frame captured at `now_ms` milliseconds.
    ///
    /// Input with the wrong number of landmarks yields a NONE decision with
    /// zero confidence and leaves all state untouched. A repeat of a kind
    /// inside its debounce window is returned with `debounce_suppressed` set
    /// and is not recorded in the ledger, history or counters.
    pub fn classify_at(
        &mut self,
        points: &[Landmark],
        index_tip: Option<(f64, f64)>,
        now_ms: u64,
    ) -> GestureDecision {
        let Ok(state) = HandState::build(points, &self.config.extension_params(), &self.thresholds) else {
            return GestureDecision::none();
        };

        self.last_index_tip = Some(index_tip.unwrap_or_else(|| state.tip(Finger::Index).xy()));

        let candidate = self.active_rules().classify(&state, index_tip);
        let consistency = self.history.consistency(candidate.kind, self.config.consistency_window);
        let mut decision = GestureDecision::new(candidate.kind, candidate.recipe.resolve(consistency));
        decision.position = candidate.position;
        decision.payload = candidate.payload;

        if !decision.is_none() {
            if self
                .ledger
                .is_suppressed(decision.kind, now_ms, self.config.debounce_time_ms)
            {
                decision.debounce_suppressed = true;
                self.report(&decision);
                return decision;
            }
            self.ledger.record(decision.kind, now_ms);
            self.report(&decision);
        }

        self.history.push(decision.kind);
        self.counters.increment(decision.kind);
        decision
    }

    fn active_rules(&self) -> &dyn ModeClassifier {
        match (self.mode, &self.custom_rules) {
            (ControlMode::Custom, Some(custom)) => custom.as_ref(),
            _ => self.rules.as_ref(),
        }
    }

    fn report(&self, decision: &GestureDecision) {
        debug!(
            "{} {:.2}{}",
            decision.kind,
            decision.confidence(),
            if decision.debounce_suppressed { " (debounced)" } else { "" }
        );
        if let Some(log) = &self.log {
            log.log_gesture(decision.kind, decision.confidence(), decision.debounce_suppressed);
        }
    }

    /// Switch the active rule set.
    ///
    /// History and the debounce ledger carry over, so a kind fired just
    /// before the switch stays debounced after it.
    pub fn set_mode(&mut self, mode: ControlMode) {
        if mode == self.mode {
            return;
        }

        let previous = self.mode;
        self.mode = mode;
        self.rules = create_mode_classifier(mode, &self.config);
        info!("Control mode: {previous} -> {mode} ({})", self.active_rules().name());
        if let Some(log) = &self.log {
            log.log_mode_change(previous.as_str(), mode.as_str());
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Install rules used while in custom mode
    pub fn set_custom_rules(&mut self, rules: Box<dyn ModeClassifier>) {
        info!("Custom rules installed: {}", rules.name());
        self.custom_rules = Some(rules);
    }

    /// Merge threshold overrides; they apply from the next frame on.
    ///
    /// Returns the new effective thresholds.
    pub fn update_thresholds(&mut self, overrides: &ThresholdOverrides) -> AdaptiveThresholds {
        self.thresholds = self.thresholds.merged(overrides);
        debug!("Thresholds updated: {:?}", self.thresholds);
        self.thresholds
    }

    #[must_use]
    pub const fn thresholds(&self) -> AdaptiveThresholds {
        self.thresholds
    }

    /// Replace the configuration snapshot.
    ///
    /// Thresholds reset to the new configuration's initial values and the
    /// history is resized; the debounce ledger and counters are kept.
    pub fn reconfigure(&mut self, config: GestureConfig) {
        let mut history = GestureHistory::new(config.history_capacity);
        for kind in self.history.iter() {
            history.push(kind);
        }
        self.history = history;
        self.thresholds = config.thresholds;
        self.rules = create_mode_classifier(self.mode, &config);
        self.config = config;
    }

    #[must_use]
    pub const fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Share of each kind among accepted decisions
    #[must_use]
    pub fn gesture_statistics(&self) -> BTreeMap<GestureKind, f64> {
        self.counters.shares()
    }

    #[must_use]
    pub fn occurrences(&self, kind: GestureKind) -> u64 {
        self.counters.get(kind)
    }

    /// Clear counters, history and the debounce ledger
    pub fn reset_statistics(&mut self) {
        self.counters.clear();
        self.history.clear();
        self.ledger.clear();
    }

    /// Index fingertip of the most recent valid frame
    #[must_use]
    pub const fn last_index_tip(&self) -> Option<(f64, f64)> {
        self.last_index_tip
    }

    #[must_use]
    pub const fn history(&self) -> &GestureHistory {
        &self.history
    }
}
