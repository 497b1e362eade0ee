//! Per-frame session summary handed to the host

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::DetectorResult;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionStats {
    /// Sum of every loaded detector's rep count
    pub total_reps: u32,
    /// Frames each exercise has been active this session
    pub exercise_durations: BTreeMap<&'static str, u32>,
    /// Exercise that most recently became active
    pub last_active: Option<&'static str>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DetectionSnapshot {
    pub active_exercises: BTreeSet<&'static str>,
    pub counts: BTreeMap<&'static str, u32>,
    pub session_stats: SessionStats,
}

impl DetectionSnapshot {
    /// Zeroed snapshot covering the given exercises
    pub fn for_exercises<'a>(names: impl IntoIterator<Item = &'a &'static str>) -> Self {
        let mut snapshot = Self::default();
        for &name in names {
            snapshot.track(name);
        }
        snapshot
    }

    pub(crate) fn track(&mut self, name: &'static str) {
        self.counts.insert(name, 0);
        self.session_stats.exercise_durations.insert(name, 0);
    }

    pub(crate) fn untrack(&mut self, name: &str) {
        self.counts.remove(name);
        self.session_stats.exercise_durations.remove(name);
        self.active_exercises.remove(name);
        if self.session_stats.last_active == Some(name) {
            self.session_stats.last_active = None;
        }
        self.recount();
    }

    /// Fold one detector's result for the current frame into the snapshot
    pub(crate) fn record(&mut self, name: &'static str, detected: bool, rep_count: u32) {
        if detected {
            if self.active_exercises.insert(name) {
                self.session_stats.last_active = Some(name);
            }
            *self.session_stats.exercise_durations.entry(name).or_insert(0) += 1;
        } else {
            self.active_exercises.remove(name);
        }
        self.counts.insert(name, rep_count);
    }

    pub(crate) fn recount(&mut self) {
        self.session_stats.total_reps = self.counts.values().sum();
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active_exercises.contains(name)
    }

    pub fn count(&self, name: &str) -> Option<u32> {
        self.counts.get(name).copied()
    }

    pub fn to_json(&self) -> DetectorResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
