//! Detector manager - owns the history and fans each frame to every detector

use std::collections::BTreeMap;

use crate::config::ManagerConfig;
use crate::detectors::{DebugInfo, ExerciseDetector};
use crate::error::{DetectorError, DetectorResult};
use crate::pose::{PoseFrame, PoseHistory};

use super::registry::ExerciseKind;
use super::snapshot::DetectionSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManagerState {
    /// No frame received yet
    Idle,
    /// Fewer than two frames buffered; snapshots are returned unchanged
    Warming,
    Running,
}

pub struct DetectorManager {
    config: ManagerConfig,
    history: PoseHistory,
    detectors: Vec<Box<dyn ExerciseDetector>>,
    snapshot: DetectionSnapshot,
    load_errors: Vec<DetectorError>,
    state: ManagerState,
}

impl DetectorManager {
    /// Load the configured exercises; unknown or repeated names are
    /// collected in [`load_errors`](Self::load_errors) instead of failing.
    pub fn new(config: ManagerConfig) -> Self {
        let mut manager = Self {
            history: PoseHistory::with_capacity(config.history_size),
            detectors: Vec::new(),
            snapshot: DetectionSnapshot::default(),
            load_errors: Vec::new(),
            state: ManagerState::Idle,
            config,
        };

        let names: Vec<String> = match &manager.config.exercises {
            Some(names) => names.clone(),
            None => ExerciseKind::DEFAULT_SET.iter().map(|k| k.name().to_string()).collect(),
        };
        for name in names {
            if let Err(e) = manager.try_add_exercise(&name) {
                tracing::warn!(exercise = %name, error = %e, "detector unavailable");
                manager.load_errors.push(e);
            }
        }
        tracing::info!(loaded = manager.detectors.len(), "detector manager ready");
        manager
    }

    /// Push one frame and run every detector on the updated history
    pub fn process_frame(&mut self, frame: PoseFrame) -> &DetectionSnapshot {
        self.history.push(frame);
        if self.history.len() < 2 {
            self.state = ManagerState::Warming;
            return &self.snapshot;
        }
        self.state = ManagerState::Running;

        for detector in &mut self.detectors {
            let detected = detector.detect(&self.history);
            self.snapshot.record(detector.name(), detected, detector.rep_count());
        }
        self.snapshot.recount();
        &self.snapshot
    }

    /// Reset every detector and the session stats, keeping the loaded set
    pub fn reset_session(&mut self) {
        for detector in &mut self.detectors {
            detector.reset();
        }
        self.history.clear();
        self.snapshot = DetectionSnapshot::for_exercises(&self.available_exercises());
        self.state = ManagerState::Warming;
        tracing::info!("session reset");
    }

    /// Build and load a registered exercise by name
    pub fn try_add_exercise(&mut self, name: &str) -> DetectorResult<()> {
        let kind: ExerciseKind = name.parse()?;
        let detector = kind.build(self.config.confidence_for(kind.name()), self.config.frame_rate);
        self.add_detector(detector)
    }

    /// Load a ready-made detector under its own name
    pub fn add_detector(&mut self, detector: Box<dyn ExerciseDetector>) -> DetectorResult<()> {
        let name = detector.name();
        if self.detector(name).is_some() {
            return Err(DetectorError::DuplicateExercise(name.to_string()));
        }
        self.detectors.push(detector);
        self.snapshot.track(name);
        tracing::info!(exercise = name, "added detector");
        Ok(())
    }

    /// Unload a detector and purge its count, duration and active entries
    pub fn remove_detector(&mut self, name: &str) -> bool {
        let Some(index) = self.detectors.iter().position(|d| d.name() == name) else {
            tracing::warn!(exercise = name, "detector not found");
            return false;
        };
        self.detectors.remove(index);
        self.snapshot.untrack(name);
        tracing::info!(exercise = name, "removed detector");
        true
    }

    /// Loaded exercise names, in load order
    pub fn available_exercises(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    pub fn detector(&self, name: &str) -> Option<&dyn ExerciseDetector> {
        self.detectors.iter().find(|d| d.name() == name).map(|d| d.as_ref())
    }

    pub fn debug_info(&self) -> BTreeMap<&'static str, DebugInfo> {
        self.detectors.iter().map(|d| (d.name(), d.debug_info())).collect()
    }

    pub fn snapshot(&self) -> &DetectionSnapshot {
        &self.snapshot
    }

    pub fn history(&self) -> &PoseHistory {
        &self.history
    }

    pub fn state(&self) -> ManagerState {
        self.state
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Names that failed to load at construction
    pub fn load_errors(&self) -> &[DetectorError] {
        &self.load_errors
    }
}

impl Default for DetectorManager {
    fn default() -> Self {
        Self::new(ManagerConfig::default())
    }
}
