//! Lunge detector
//!
//! The forward leg is the one with the smaller knee angle. Down needs the
//! forward knee deeply bent, the rear knee bent and the hips not rising;
//! up needs both legs straight. The smoothed phase counts a rep on down → up.

use crate::geometry::{angle_2d, midpoint};
use crate::pose::*;

use super::base::{DetectorConfig, DetectorCore, ExerciseDetector};
use super::tracking::{BandCounter, BandPhase};

const REQUIRED: [usize; 8] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_HIP,
    RIGHT_HIP,
    LEFT_KNEE,
    RIGHT_KNEE,
    LEFT_ANKLE,
    RIGHT_ANKLE,
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LungeThresholds {
    /// Forward knee angle below which the lunge is deep enough (degrees)
    pub forward_knee_down: f64,
    /// Rear knee angle below which the back leg counts as bent (degrees)
    pub rear_knee_down: f64,
    /// Both knees above this angle read as standing (degrees)
    pub knee_standing: f64,
    /// Forward knee angle below which the lunge reads as active
    pub forward_knee_active: f64,
    /// Hip rise over the lookback tolerated when entering down
    pub max_hip_rise: f64,
    /// Frames between the compared hip heights
    pub hip_lookback: usize,
    /// Minimum hip travel (normalized image height) for a counted rep
    pub min_vertical_range: f64,
    pub vote_window: usize,
}

impl Default for LungeThresholds {
    fn default() -> Self {
        Self {
            forward_knee_down: 110.0,
            rear_knee_down: 150.0,
            knee_standing: 160.0,
            forward_knee_active: 130.0,
            max_hip_rise: 0.01,
            hip_lookback: 4,
            min_vertical_range: 0.1,
            vote_window: 5,
        }
    }
}

pub struct LungeDetector {
    core: DetectorCore,
    thresholds: LungeThresholds,
    band: BandCounter,
}

impl LungeDetector {
    pub const NAME: &'static str = "lunge";

    pub fn new() -> Self {
        Self::with_settings(DetectorConfig::new(0.6, 15), LungeThresholds::default())
    }

    pub fn with_settings(config: DetectorConfig, thresholds: LungeThresholds) -> Self {
        Self {
            core: DetectorCore::new(config),
            band: BandCounter::new(BandPhase::Up, thresholds.vote_window, thresholds.min_vertical_range),
            thresholds,
        }
    }

    pub fn phase(&self) -> BandPhase {
        self.band.phase()
    }

    /// Hip height now minus the hip height `hip_lookback` frames ago
    ///
    /// Negative means the hips rose. Zero until the history is long enough.
    fn hip_movement(&self, history: &PoseHistory, hip_y: f64) -> f64 {
        let lookback = self.thresholds.hip_lookback;
        if history.len() <= lookback + 1 {
            return 0.0;
        }
        history
            .back(lookback)
            .and_then(|f| self.core.positions(f, [LEFT_HIP, RIGHT_HIP]))
            .map_or(0.0, |[lh, rh]| hip_y - midpoint(&lh, &rh).y)
    }

    fn classify(&self, forward: f64, rear: f64, hip_movement: f64) -> BandPhase {
        let t = &self.thresholds;
        if forward < t.forward_knee_down && rear < t.rear_knee_down && hip_movement >= -t.max_hip_rise {
            BandPhase::Down
        } else if forward > t.knee_standing && rear > t.knee_standing {
            BandPhase::Up
        } else {
            BandPhase::Transitioning
        }
    }
}

impl Default for LungeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseDetector for LungeDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn detect(&mut self, history: &PoseHistory) -> bool {
        if history.len() < 2 {
            return self.core.set_active(false);
        }
        let cooling = self.core.cooling_down();
        let Some([_, _, lh, rh, lk, rk, la, ra]) =
            history.latest().and_then(|f| self.core.positions(f, REQUIRED))
        else {
            self.band.clear();
            self.core.set_metric("state", "invalid");
            return self.core.set_active(false);
        };

        let left_knee = angle_2d(&lh, &lk, &la);
        let right_knee = angle_2d(&rh, &rk, &ra);
        let forward = left_knee.min(right_knee);
        let rear = left_knee.max(right_knee);
        let hip_y = midpoint(&lh, &rh).y;
        let hip_movement = self.hip_movement(history, hip_y);
        self.band.observe(hip_y);

        let raw = self.classify(forward, rear, hip_movement);
        let completed = self.band.update(raw);

        self.core.set_metric("state", self.band.phase().name());
        self.core.set_metric("forward_knee_angle", forward);
        self.core.set_metric("rear_knee_angle", rear);
        self.core.set_metric("hip_y_position", hip_y);
        self.core.set_metric("hip_movement", hip_movement);
        self.core.set_metric("vertical_range", self.band.range());

        if completed && !cooling {
            self.core.commit_rep(Self::NAME);
            return self.core.set_active(true);
        }
        self.core.set_active(forward < self.thresholds.forward_knee_active)
    }

    fn reset(&mut self) {
        self.core.reset();
        self.band.clear();
    }

    fn core(&self) -> &DetectorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DetectorCore {
        &mut self.core
    }
}
