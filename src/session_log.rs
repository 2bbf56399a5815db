//! Per-session event recording.
//!
//! [`SessionLog`] is a cloneable handle shared by the classifier and the
//! application loop. It keeps bounded gesture and action histories, derives
//! session statistics from them and can export a JSON event list.

use crate::{config::LoggingConfig, constants::SESSION_LOG_CAPACITY, gesture::GestureKind, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::{
    collections::{BTreeMap, VecDeque},
    fmt,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

/// One recorded event, as written to the JSON export
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEvent {
    Gesture {
        timestamp: f64,
        gesture: GestureKind,
        confidence: f64,
        debounce_suppressed: bool,
    },
    Action {
        timestamp: f64,
        action: String,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    ModeChange {
        timestamp: f64,
        from: String,
        to: String,
    },
    Calibration {
        timestamp: f64,
        gesture: String,
        status: String,
    },
}

/// Aggregate view of a session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStatistics {
    pub session_duration_secs: f64,
    pub total_gestures: usize,
    pub total_actions: usize,
    pub gesture_counts: BTreeMap<GestureKind, usize>,
    pub action_counts: BTreeMap<String, usize>,
    pub action_success_rates: BTreeMap<String, f64>,
}

impl fmt::Display for SessionStatistics {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.session_duration_secs.max(0.0) as u64;
        writeln!(f, "Session duration: {}m {}s", secs / 60, secs % 60)?;
        writeln!(f, "Gestures detected: {}", self.total_gestures)?;
        for (kind, count) in &self.gesture_counts {
            writeln!(f, "  {kind}: {count}")?;
        }
        write!(f, "Actions executed: {}", self.total_actions)?;
        for (action, count) in &self.action_counts {
            let rate = self.action_success_rates.get(action).copied().unwrap_or(0.0);
            write!(f, "\n  {action}: {count} (success rate {:.1}%)", rate * 100.0)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct GestureEntry {
    kind: GestureKind,
}

#[derive(Debug)]
struct ActionEntry {
    action: String,
    success: bool,
}

#[derive(Debug)]
struct Inner {
    settings: LoggingConfig,
    session_start: Instant,
    last_stats: Instant,
    gestures: VecDeque<GestureEntry>,
    actions: VecDeque<ActionEntry>,
    events: Vec<LogEvent>,
}

impl Inner {
    fn push_event(&mut self, event: LogEvent) {
        if self.settings.log_to_json {
            self.events.push(event);
        }
    }
}

/// Shared session recorder
#[derive(Debug, Clone)]
pub struct SessionLog {
    inner: Arc<Mutex<Inner>>,
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new(LoggingConfig::default())
    }
}

fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64())
}

fn push_bounded<T>(queue: &mut VecDeque<T>, item: T) {
    if queue.len() >= SESSION_LOG_CAPACITY {
        queue.pop_front();
    }
    queue.push_back(item);
}

impl SessionLog {
    #[must_use]
    pub fn new(settings: LoggingConfig) -> Self {
        let now = Instant::now();
        Self {
            inner: Arc::new(Mutex::new(Inner {
                settings,
                session_start: now,
                last_stats: now,
                gestures: VecDeque::new(),
                actions: VecDeque::new(),
                events: Vec::new(),
            })),
        }
    }

    // A panic while holding the lock leaves plain data behind; keep using it
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a detected gesture
    pub fn log_gesture(&self, kind: GestureKind, confidence: f64, debounce_suppressed: bool) {
        let mut inner = self.lock();
        if !(inner.settings.enabled && inner.settings.log_gestures) {
            return;
        }

        push_bounded(&mut inner.gestures, GestureEntry { kind });
        inner.push_event(LogEvent::Gesture {
            timestamp: unix_timestamp(),
            gesture: kind,
            confidence,
            debounce_suppressed,
        });
        debug!("Gesture detected: {kind} (confidence: {confidence:.2})");
    }

    /// Record a dispatched action and whether the sink accepted it
    pub fn log_action(&self, action: &str, success: bool, details: Option<String>) {
        let mut inner = self.lock();
        if !(inner.settings.enabled && inner.settings.log_actions) {
            return;
        }

        push_bounded(
            &mut inner.actions,
            ActionEntry {
                action: action.to_string(),
                success,
            },
        );
        inner.push_event(LogEvent::Action {
            timestamp: unix_timestamp(),
            action: action.to_string(),
            success,
            details,
        });
        if success {
            debug!("Action: {action} - SUCCESS");
        } else {
            warn!("Action: {action} - FAILED");
        }
    }

    pub fn log_mode_change(&self, from: &str, to: &str) {
        let mut inner = self.lock();
        if !inner.settings.enabled {
            return;
        }
        inner.push_event(LogEvent::ModeChange {
            timestamp: unix_timestamp(),
            from: from.to_string(),
            to: to.to_string(),
        });
        info!("Mode changed: {from} -> {to}");
    }

    pub fn log_calibration(&self, gesture: &str, status: &str) {
        let mut inner = self.lock();
        if !inner.settings.enabled {
            return;
        }
        inner.push_event(LogEvent::Calibration {
            timestamp: unix_timestamp(),
            gesture: gesture.to_string(),
            status: status.to_string(),
        });
        info!("Calibration: {gesture} - {status}");
    }

    /// Statistics over the retained histories
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn statistics(&self) -> SessionStatistics {
        let inner = self.lock();

        let mut gesture_counts = BTreeMap::new();
        for entry in &inner.gestures {
            *gesture_counts.entry(entry.kind).or_insert(0) += 1;
        }

        let mut action_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut action_successes: BTreeMap<String, usize> = BTreeMap::new();
        for entry in &inner.actions {
            *action_counts.entry(entry.action.clone()).or_insert(0) += 1;
            if entry.success {
                *action_successes.entry(entry.action.clone()).or_insert(0) += 1;
            }
        }

        let action_success_rates = action_counts
            .iter()
            .map(|(action, &count)| {
                let ok = action_successes.get(action).copied().unwrap_or(0);
                (action.clone(), ok as f64 / count as f64)
            })
            .collect();

        SessionStatistics {
            session_duration_secs: inner.session_start.elapsed().as_secs_f64(),
            total_gestures: inner.gestures.len(),
            total_actions: inner.actions.len(),
            gesture_counts,
            action_counts,
            action_success_rates,
        }
    }

    /// Whether the periodic statistics interval has elapsed; restarts it if so
    pub fn stats_due(&self) -> bool {
        let mut inner = self.lock();
        let interval = Duration::from_secs(inner.settings.stats_interval_secs);
        if interval.is_zero() || inner.last_stats.elapsed() < interval {
            return false;
        }
        inner.last_stats = Instant::now();
        true
    }

    /// Events collected so far (empty unless `log_to_json` is set)
    #[must_use]
    pub fn events(&self) -> Vec<LogEvent> {
        self.lock().events.clone()
    }

    /// Write the collected events as pretty JSON, creating parent directories.
    ///
    /// Returns the number of events written; nothing is written when there
    /// are none.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let events = self.events();
        if events.is_empty() {
            warn!("No session events to export");
            return Ok(0);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&events)?;
        std::fs::write(path, content)?;

        info!("Exported {} session events to {}", events.len(), path.display());
        Ok(events.len())
    }

    /// Drop all histories and events and restart the session clock
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.gestures.clear();
        inner.actions.clear();
        inner.events.clear();
        inner.session_start = Instant::now();
        inner.last_stats = inner.session_start;
    }
}
