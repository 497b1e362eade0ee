//! Steady plank
//!
//! Stateless apart from its rising edge: the body must be still over the
//! last few frames, shoulders level with hips and the left
//! shoulder-hip-ankle line close to straight.

use crate::detectors::{DetectorConfig, DetectorCore, ExerciseDetector, StrikeDebounce};
use crate::geometry::{angle_2d, distance};
use crate::pose::*;

const REQUIRED: [usize; 6] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_HIP,
    RIGHT_HIP,
    LEFT_ANKLE,
    RIGHT_ANKLE,
];

const TRACKED: [usize; 4] = [LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteadyPlankThresholds {
    /// Maximum average per-frame movement of shoulders and hips
    pub stability: f64,
    /// Maximum vertical offset between paired landmarks
    pub alignment: f64,
    /// Target shoulder-hip-ankle angle (degrees)
    pub line_angle: f64,
    pub line_tolerance: f64,
    /// Frames compared for stability
    pub window: usize,
}

impl Default for SteadyPlankThresholds {
    fn default() -> Self {
        Self {
            stability: 0.02,
            alignment: 0.1,
            line_angle: 170.0,
            line_tolerance: 20.0,
            window: 5,
        }
    }
}

pub struct SteadyPlankDetector {
    core: DetectorCore,
    thresholds: SteadyPlankThresholds,
    edge: StrikeDebounce,
}

impl SteadyPlankDetector {
    pub const NAME: &'static str = "steady_plank";

    pub fn new() -> Self {
        Self::with_settings(DetectorConfig::default(), SteadyPlankThresholds::default())
    }

    pub fn with_settings(config: DetectorConfig, thresholds: SteadyPlankThresholds) -> Self {
        Self {
            core: DetectorCore::new(config),
            thresholds,
            edge: StrikeDebounce::new(1),
        }
    }

    /// Mean shoulder/hip displacement over the window's frame pairs
    ///
    /// Pairs with a missing landmark are skipped; `None` if none remain.
    fn movement(&self, history: &PoseHistory) -> Option<f64> {
        let frames: Vec<&PoseFrame> = history.recent(self.thresholds.window).collect();
        let per_pair: Vec<f64> = frames
            .windows(2)
            .filter_map(|pair| {
                let prev = self.core.positions(pair[0], TRACKED)?;
                let cur = self.core.positions(pair[1], TRACKED)?;
                let total: f64 = prev
                    .iter()
                    .zip(cur.iter())
                    .map(|(p, c)| distance(Some(p), Some(c)))
                    .sum();
                Some(total / TRACKED.len() as f64)
            })
            .collect();
        if per_pair.is_empty() {
            None
        } else {
            Some(per_pair.iter().sum::<f64>() / per_pair.len() as f64)
        }
    }
}

impl Default for SteadyPlankDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseDetector for SteadyPlankDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn detect(&mut self, history: &PoseHistory) -> bool {
        if history.len() < self.thresholds.window.max(2) {
            return self.core.set_active(false);
        }
        let Some([ls, rs, lh, rh, la, _]) = history.latest().and_then(|f| self.core.positions(f, REQUIRED))
        else {
            self.edge.clear();
            return self.core.set_active(false);
        };

        let t = &self.thresholds;
        let movement = self.movement(history).unwrap_or(f64::INFINITY);
        let stable = movement < t.stability;
        let aligned = (ls.y - lh.y).abs() < t.alignment
            && (rs.y - rh.y).abs() < t.alignment
            && (lh.y - rh.y).abs() < t.alignment;
        let line = angle_2d(&ls, &lh, &la);
        let straight = (line - t.line_angle).abs() < t.line_tolerance;

        let (active, rising) = self.edge.update(stable && aligned && straight);
        if rising {
            self.core.commit_rep(Self::NAME);
        }
        self.core.set_metric("movement", movement);
        self.core.set_metric("body_line", line);
        self.core.set_metric("aligned", aligned);
        self.core.set_active(active)
    }

    fn reset(&mut self) {
        self.core.reset();
        self.edge.clear();
    }

    fn core(&self) -> &DetectorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DetectorCore {
        &mut self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::fixtures::{self, Feed};

    fn run(detector: &mut SteadyPlankDetector, frames: &[PoseFrame]) -> Vec<bool> {
        let mut feed = Feed::new();
        frames.iter().map(|f| detector.detect(feed.push(f))).collect()
    }

    #[test]
    fn test_still_plank_after_five_frames() {
        let mut detector = SteadyPlankDetector::new();
        let results = run(&mut detector, &vec![fixtures::plank(0.0); 6]);
        assert_eq!(results, vec![false, false, false, false, true, true]);
        assert_eq!(detector.rep_count(), 1);
    }

    #[test]
    fn test_standing_is_not_plank() {
        let mut detector = SteadyPlankDetector::new();
        let results = run(&mut detector, &vec![fixtures::standing(); 6]);
        assert!(results.iter().all(|&r| !r));
    }

    #[test]
    fn test_moving_body_is_not_steady() {
        let mut detector = SteadyPlankDetector::new();
        let frames: Vec<_> = (0..6)
            .map(|k| fixtures::shifted(&fixtures::plank(0.0), 0.05 * k as f64, 0.0))
            .collect();
        let results = run(&mut detector, &frames);
        assert!(results.iter().all(|&r| !r));
    }

    #[test]
    fn test_hold_broken_and_resumed_counts_twice() {
        let mut detector = SteadyPlankDetector::new();
        let mut frames = vec![fixtures::plank(0.0); 5];
        frames.push(fixtures::standing());
        frames.extend(vec![fixtures::plank(0.0); 5]);
        run(&mut detector, &frames);
        assert_eq!(detector.rep_count(), 2);
    }

    #[test]
    fn test_reset() {
        let mut detector = SteadyPlankDetector::new();
        run(&mut detector, &vec![fixtures::plank(0.0); 5]);
        detector.reset();
        assert_eq!(detector.rep_count(), 0);
        assert!(!detector.is_active());
    }
}
