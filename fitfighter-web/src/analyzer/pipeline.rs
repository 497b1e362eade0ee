//! Motion analyzer - a self-contained pipeline over its own history
//!
//! Runs the punch, hip-range squat and steady plank strategies and reports
//! a name → detected map per frame.

use std::collections::BTreeMap;

use crate::detectors::ExerciseDetector;
use crate::pose::{PoseFrame, PoseHistory, DEFAULT_HISTORY_SIZE};

use super::hip_range_squat::HipRangeSquatDetector;
use super::punch::PunchDetector;
use super::steady_plank::SteadyPlankDetector;

pub struct MotionAnalyzer {
    history: PoseHistory,
    strategies: Vec<Box<dyn ExerciseDetector>>,
    states: BTreeMap<&'static str, bool>,
}

impl MotionAnalyzer {
    pub fn new() -> Self {
        Self::with_history_length(DEFAULT_HISTORY_SIZE)
    }

    pub fn with_history_length(length: usize) -> Self {
        let strategies: Vec<Box<dyn ExerciseDetector>> = vec![
            Box::new(PunchDetector::new()),
            Box::new(HipRangeSquatDetector::new()),
            Box::new(SteadyPlankDetector::new()),
        ];
        let states = strategies.iter().map(|s| (s.name(), false)).collect();
        Self {
            history: PoseHistory::with_capacity(length),
            strategies,
            states,
        }
    }

    /// Buffer one frame; empty frames are dropped
    pub fn add_landmarks(&mut self, frame: PoseFrame) {
        if !frame.is_empty() {
            self.history.push(frame);
        }
    }

    /// Run every strategy on the buffered frames
    ///
    /// Below two frames the previous states are returned unchanged.
    pub fn analyze(&mut self) -> BTreeMap<&'static str, bool> {
        if self.history.len() >= 2 {
            for strategy in &mut self.strategies {
                let detected = strategy.detect(&self.history);
                self.states.insert(strategy.name(), detected);
            }
        }
        self.states.clone()
    }

    pub fn strategy(&self, name: &str) -> Option<&dyn ExerciseDetector> {
        self.strategies.iter().find(|s| s.name() == name).map(|s| s.as_ref())
    }

    pub fn history(&self) -> &PoseHistory {
        &self.history
    }

    pub fn reset(&mut self) {
        self.history.clear();
        for strategy in &mut self.strategies {
            strategy.reset();
        }
        for state in self.states.values_mut() {
            *state = false;
        }
    }
}

impl Default for MotionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
