//! Kick detector
//!
//! A kick is a fast, nearly straight leg. Speed is the ankle's motion
//! relative to the knee, with depth weighted up for front kicks. The flag
//! must hold for two frames; the rep lands on the rising edge.

use crate::pose::*;

use super::base::{DetectorConfig, DetectorCore, ExerciseDetector};
use super::limb::{AxisWeights, Limb, StrikeDebounce, LEFT_LEG, RIGHT_LEG};

const REQUIRED: [usize; 6] = [LEFT_HIP, RIGHT_HIP, LEFT_KNEE, RIGHT_KNEE, LEFT_ANKLE, RIGHT_ANKLE];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KickThresholds {
    /// Relative ankle displacement per frame
    pub velocity: f64,
    /// Minimum hip-knee-ankle angle (degrees)
    pub extension: f64,
    pub consecutive_frames: u32,
    pub weights: AxisWeights,
}

impl Default for KickThresholds {
    fn default() -> Self {
        Self {
            velocity: 0.05,
            extension: 140.0,
            consecutive_frames: 2,
            weights: AxisWeights::new(1.0, 1.0, 1.5),
        }
    }
}

pub struct KickDetector {
    core: DetectorCore,
    thresholds: KickThresholds,
    debounce: StrikeDebounce,
}

impl KickDetector {
    pub const NAME: &'static str = "kick";

    pub fn new() -> Self {
        Self::with_settings(DetectorConfig::new(0.6, 15), KickThresholds::default())
    }

    pub fn with_settings(config: DetectorConfig, thresholds: KickThresholds) -> Self {
        Self {
            core: DetectorCore::new(config),
            debounce: StrikeDebounce::new(thresholds.consecutive_frames),
            thresholds,
        }
    }

    /// Frames in a row the current kick has been flagged
    pub fn streak(&self) -> u32 {
        self.debounce.consecutive()
    }

    /// (extension, velocity) of one leg; extension 0 when unmeasurable
    fn measure(&self, leg: Limb, previous: &PoseFrame, current: &PoseFrame) -> (f64, f64) {
        let threshold = self.core.config.confidence_threshold;
        let extension = leg.extension(current, threshold).unwrap_or(0.0);
        let velocity = leg.end_velocity(previous, current, threshold, self.thresholds.weights);
        (extension, velocity)
    }

    fn is_kicking(&self, extension: f64, velocity: f64) -> bool {
        velocity > self.thresholds.velocity && extension > self.thresholds.extension
    }
}

impl Default for KickDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseDetector for KickDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn detect(&mut self, history: &PoseHistory) -> bool {
        if self.core.cooling_down() {
            self.debounce.clear();
            return self.core.set_active(false);
        }
        if history.len() < 2 {
            return self.core.set_active(false);
        }
        let (Some(current), Some(previous)) = (history.latest(), history.back(1)) else {
            return self.core.set_active(false);
        };
        if !self.core.landmarks_visible(current, &REQUIRED) {
            self.debounce.clear();
            self.core.set_metric("state", "invalid");
            return self.core.set_active(false);
        }

        let (left_extension, left_velocity) = self.measure(LEFT_LEG, previous, current);
        let (right_extension, right_velocity) = self.measure(RIGHT_LEG, previous, current);
        let flagged = self.is_kicking(left_extension, left_velocity)
            || self.is_kicking(right_extension, right_velocity);

        let (confirmed, rising) = self.debounce.update(flagged);
        if rising {
            self.core.commit_rep(Self::NAME);
        }

        self.core.set_metric("left_extension", left_extension);
        self.core.set_metric("right_extension", right_extension);
        self.core.set_metric("left_leg_vel", left_velocity);
        self.core.set_metric("right_leg_vel", right_velocity);
        self.core.set_metric("consecutive", self.debounce.consecutive());
        self.core.set_active(confirmed)
    }

    fn reset(&mut self) {
        self.core.reset();
        self.debounce.clear();
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

    /// Standing with the straight left leg swung forward by `degrees`
    fn swing(degrees: f64) -> PoseFrame {
        let (sin, cos) = degrees.to_radians().sin_cos();
        fixtures::standing()
            .with(LEFT_KNEE, Landmark::new(0.45, 0.6 + 0.15 * cos, -0.15 * sin, 1.0))
            .with(LEFT_ANKLE, Landmark::new(0.45, 0.6 + 0.3 * cos, -0.3 * sin, 1.0))
    }

    /// Knee raised forward, shin hanging
    fn tuck() -> PoseFrame {
        fixtures::standing()
            .with(LEFT_KNEE, Landmark::new(0.45, 0.6, -0.15, 1.0))
            .with(LEFT_ANKLE, Landmark::new(0.45, 0.75, -0.15, 1.0))
    }

    fn run(detector: &mut KickDetector, frames: &[PoseFrame]) -> Vec<bool> {
        let mut feed = Feed::new();
        frames.iter().map(|f| detector.detect(feed.push(f))).collect()
    }

    #[test]
    fn test_fast_straight_kick() {
        let mut detector = KickDetector::new();
        let frames = [swing(0.0), swing(0.0), swing(30.0), swing(60.0), swing(60.0)];
        let results = run(&mut detector, &frames);
        assert_eq!(results, vec![false, false, false, true, false]);
        assert_eq!(detector.rep_count(), 1);
    }

    #[test]
    fn test_single_fast_frame_is_not_enough() {
        let mut detector = KickDetector::new();
        let frames = [swing(0.0), swing(0.0), swing(30.0), swing(30.0)];
        run(&mut detector, &frames);
        assert_eq!(detector.rep_count(), 0);
    }

    #[test]
    fn test_slow_swing_ignored() {
        let mut detector = KickDetector::new();
        let frames: Vec<_> = (0..=9).map(|k| swing(k as f64 * 10.0)).collect();
        run(&mut detector, &frames);
        assert_eq!(detector.rep_count(), 0);
    }

    #[test]
    fn test_bent_leg_ignored() {
        let mut detector = KickDetector::new();
        let frames = [fixtures::standing(), tuck(), fixtures::standing(), tuck()];
        run(&mut detector, &frames);
        assert_eq!(detector.rep_count(), 0);
    }

    #[test]
    fn test_cooldown_blocks_second_kick() {
        let mut detector = KickDetector::new();
        let mut frames = vec![swing(0.0), swing(0.0), swing(30.0), swing(60.0)];
        frames.extend([swing(0.0), swing(30.0), swing(60.0)]);
        run(&mut detector, &frames);
        assert_eq!(detector.rep_count(), 1);
        assert_eq!(detector.core().cooldown_remaining(), 12);
    }

    #[test]
    fn test_kick_right_after_cooldown() {
        let mut detector = KickDetector::new();
        let mut frames = vec![swing(0.0), swing(0.0), swing(30.0), swing(60.0)];
        frames.extend(vec![swing(0.0); 15]);
        frames.extend([swing(30.0), swing(60.0)]);
        let results = run(&mut detector, &frames);
        assert!(!results[19]);
        assert!(results[20]);
        assert_eq!(detector.rep_count(), 2);
    }

    #[test]
    fn test_hidden_ankle() {
        let mut detector = KickDetector::new();
        let hidden = fixtures::with_confidence(&swing(60.0), &[LEFT_ANKLE], 0.2);
        let frames = [swing(0.0), swing(30.0), hidden];
        let results = run(&mut detector, &frames);
        assert!(!results[2]);
        assert_eq!(detector.streak(), 0);
        assert_eq!(detector.rep_count(), 0);
    }

    #[test]
    fn test_reset() {
        let mut detector = KickDetector::new();
        run(&mut detector, &[swing(0.0), swing(0.0), swing(30.0), swing(60.0)]);
        detector.reset();
        assert_eq!(detector.rep_count(), 0);
        assert!(!detector.is_active());
        assert_eq!(detector.core().cooldown_remaining(), 0);
    }
}
