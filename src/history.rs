//! Temporal state carried across frames: gesture history, debounce ledger
//! and per-kind occurrence counters.

use crate::{constants::EMPTY_HISTORY_CONSISTENCY, gesture::GestureKind};
use std::collections::{BTreeMap, VecDeque};

/// Bounded ring buffer of accepted gesture kinds, oldest evicted first
#[derive(Debug, Clone)]
pub struct GestureHistory {
    capacity: usize,
    entries: VecDeque<GestureKind>,
}

impl GestureHistory {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, kind: GestureKind) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(kind);
    }

    /// Fraction of the last `window` entries equal to `kind`.
    ///
    /// An empty history scores 0.5.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn consistency(&self, kind: GestureKind, window: usize) -> f64 {
        let recent = self.entries.iter().rev().take(window);
        let (matches, total) = recent.fold((0usize, 0usize), |(m, t), &k| (m + usize::from(k == kind), t + 1));

        if total == 0 {
            EMPTY_HISTORY_CONSISTENCY
        } else {
            matches as f64 / total as f64
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest-first view of the stored kinds
    pub fn iter(&self) -> impl Iterator<Item = GestureKind> + '_ {
        self.entries.iter().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Last accepted timestamp (milliseconds) per gesture kind
#[derive(Debug, Clone)]
pub struct DebounceLedger {
    last_trigger: [Option<u64>; GestureKind::COUNT],
}

impl Default for DebounceLedger {
    fn default() -> Self {
        Self {
            last_trigger: [None; GestureKind::COUNT],
        }
    }
}

impl DebounceLedger {
    #[must_use]
    pub fn last_trigger(&self, kind: GestureKind) -> Option<u64> {
        self.last_trigger[kind.index()]
    }

    /// Whether `kind` fired less than `debounce_ms` before `now_ms`.
    ///
    /// A kind that never fired is never suppressed.
    #[must_use]
    pub fn is_suppressed(&self, kind: GestureKind, now_ms: u64, debounce_ms: u64) -> bool {
        self.last_trigger(kind)
            .is_some_and(|last| now_ms.saturating_sub(last) < debounce_ms)
    }

    pub fn record(&mut self, kind: GestureKind, now_ms: u64) {
        self.last_trigger[kind.index()] = Some(now_ms);
    }

    /// Number of kinds with a recorded trigger
    #[must_use]
    pub fn len(&self) -> usize {
        self.last_trigger.iter().filter(|t| t.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.last_trigger = [None; GestureKind::COUNT];
    }
}

/// Accepted-decision counts per gesture kind
#[derive(Debug, Clone)]
pub struct OccurrenceCounters {
    counts: [u64; GestureKind::COUNT],
}

impl Default for OccurrenceCounters {
    fn default() -> Self {
        Self {
            counts: [0; GestureKind::COUNT],
        }
    }
}

impl OccurrenceCounters {
    pub fn increment(&mut self, kind: GestureKind) {
        self.counts[kind.index()] += 1;
    }

    #[must_use]
    pub fn get(&self, kind: GestureKind) -> u64 {
        self.counts[kind.index()]
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Share of each observed kind among all counted decisions
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn shares(&self) -> BTreeMap<GestureKind, f64> {
        let total = self.total();
        if total == 0 {
            return BTreeMap::new();
        }

        GestureKind::ALL
            .into_iter()
            .filter(|&kind| self.get(kind) > 0)
            .map(|kind| (kind, self.get(kind) as f64 / total as f64))
            .collect()
    }

    pub fn clear(&mut self) {
        self.counts = [0; GestureKind::COUNT];
    }
}
