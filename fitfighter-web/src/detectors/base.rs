//! Shared detector contract and base state
//!
//! Every exercise detector owns a [`DetectorCore`] holding its static
//! configuration, rep counter, active flag, cooldown and debug metrics.
//! The [`ExerciseDetector`] trait exposes the common surface the manager
//! drives once per frame.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::geometry::Point;
use crate::pose::{PoseFrame, PoseHistory};

use super::tracking::Cooldown;

/// Capability interface implemented by every exercise detector
pub trait ExerciseDetector {
    /// Registry name, e.g. `"squat"`
    fn name(&self) -> &'static str;

    /// Process the newest frame of `history`; true while the exercise is being performed
    fn detect(&mut self, history: &PoseHistory) -> bool;

    /// Clear counters and phase state, keep configuration
    fn reset(&mut self);

    fn core(&self) -> &DetectorCore;

    fn core_mut(&mut self) -> &mut DetectorCore;

    fn rep_count(&self) -> u32 {
        self.core().rep_count()
    }

    fn is_active(&self) -> bool {
        self.core().is_active()
    }

    fn debug_info(&self) -> DebugInfo {
        self.core().debug_info(self.name())
    }

    fn set_confidence_threshold(&mut self, threshold: f64) {
        self.core_mut().config.confidence_threshold = threshold;
    }
}

/// Static per-detector configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Minimum landmark visibility, inclusive
    pub confidence_threshold: f64,
    /// Frames suppressed after a counted rep
    pub cooldown_frames: u32,
}

impl DetectorConfig {
    pub fn new(confidence_threshold: f64, cooldown_frames: u32) -> Self {
        Self {
            confidence_threshold,
            cooldown_frames,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CONFIDENCE_THRESHOLD, 0)
    }
}

/// One debug metric value
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetricValue::Flag(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetricValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Number(v)
    }
}

impl From<u32> for MetricValue {
    fn from(v: u32) -> Self {
        MetricValue::Number(f64::from(v))
    }
}

impl From<bool> for MetricValue {
    fn from(v: bool) -> Self {
        MetricValue::Flag(v)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        MetricValue::Text(v.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(v: String) -> Self {
        MetricValue::Text(v)
    }
}

/// Per-detector debug map: `{name, is_active, rep_count, ...metrics}`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DebugInfo {
    pub name: String,
    pub is_active: bool,
    pub rep_count: u32,
    #[serde(flatten)]
    pub metrics: BTreeMap<String, MetricValue>,
}

impl DebugInfo {
    pub fn metric(&self, key: &str) -> Option<&MetricValue> {
        self.metrics.get(key)
    }
}

/// Base state shared by all detectors
#[derive(Clone, Debug)]
pub struct DetectorCore {
    pub config: DetectorConfig,
    rep_count: u32,
    is_active: bool,
    cooldown: Cooldown,
    metrics: BTreeMap<&'static str, MetricValue>,
}

impl DetectorCore {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            rep_count: 0,
            is_active: false,
            cooldown: Cooldown::new(config.cooldown_frames),
            metrics: BTreeMap::new(),
        }
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Record the detection result for this frame and hand it back
    pub fn set_active(&mut self, active: bool) -> bool {
        self.is_active = active;
        active
    }

    /// True iff every id is present with confidence at or above the threshold
    pub fn landmarks_visible(&self, frame: &PoseFrame, ids: &[usize]) -> bool {
        frame.all_visible(ids, self.config.confidence_threshold)
    }

    /// Position of a landmark that passes the confidence gate
    pub fn position(&self, frame: &PoseFrame, id: usize) -> Option<Point> {
        frame.visible_position(id, self.config.confidence_threshold)
    }

    /// Positions of several landmarks, or `None` if any fails the gate
    pub fn positions<const N: usize>(&self, frame: &PoseFrame, ids: [usize; N]) -> Option<[Point; N]> {
        let mut out = [Point::zeros(); N];
        for (slot, id) in out.iter_mut().zip(ids) {
            *slot = self.position(frame, id)?;
        }
        Some(out)
    }

    /// Consume one cooldown frame; true while reps are still suppressed
    pub fn cooling_down(&mut self) -> bool {
        self.cooldown.tick()
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown.remaining()
    }

    /// Count one repetition and start the cooldown
    pub fn commit_rep(&mut self, name: &'static str) {
        self.rep_count += 1;
        self.cooldown.start();
        tracing::debug!(exercise = name, reps = self.rep_count, "rep counted");
    }

    pub fn set_metric(&mut self, key: &'static str, value: impl Into<MetricValue>) {
        self.metrics.insert(key, value.into());
    }

    pub fn metric(&self, key: &str) -> Option<&MetricValue> {
        self.metrics.get(key)
    }

    /// Zero the counter, flags, cooldown and metrics; keep `config`
    pub fn reset(&mut self) {
        self.rep_count = 0;
        self.is_active = false;
        self.cooldown = Cooldown::new(self.config.cooldown_frames);
        self.metrics.clear();
    }

    pub fn debug_info(&self, name: &str) -> DebugInfo {
        DebugInfo {
            name: name.to_string(),
            is_active: self.is_active,
            rep_count: self.rep_count,
            metrics: self
                .metrics
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }
}
