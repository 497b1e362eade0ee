//! Squat detector
//!
//! Knee and hip angles plus the hip height normalized against its range
//! this session. Down needs bent joints and a low hip, up needs straight
//! joints and a high hip; the smoothed phase counts a rep on down → up.

use crate::geometry::angle_2d;
use crate::pose::*;

use super::base::{DetectorConfig, DetectorCore, ExerciseDetector};
use super::tracking::{BandCounter, BandPhase};

const REQUIRED: [usize; 6] = [LEFT_HIP, RIGHT_HIP, LEFT_KNEE, RIGHT_KNEE, LEFT_ANKLE, RIGHT_ANKLE];

/// Hip angle estimate from the knee angle when the shoulders are out of frame
const HIP_FROM_KNEE: f64 = 1.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquatThresholds {
    pub knee_standing: f64,
    pub knee_squat: f64,
    pub hip_standing: f64,
    pub hip_squat: f64,
    /// Minimum hip travel (normalized image height) for a counted rep
    pub min_vertical_range: f64,
    pub vote_window: usize,
}

impl Default for SquatThresholds {
    fn default() -> Self {
        Self {
            knee_standing: 160.0,
            knee_squat: 100.0,
            hip_standing: 170.0,
            hip_squat: 90.0,
            min_vertical_range: 0.15,
            vote_window: 5,
        }
    }
}

pub struct SquatDetector {
    core: DetectorCore,
    thresholds: SquatThresholds,
    band: BandCounter,
}

impl SquatDetector {
    pub const NAME: &'static str = "squat";

    pub fn new() -> Self {
        Self::with_settings(DetectorConfig::new(0.6, 10), SquatThresholds::default())
    }

    pub fn with_settings(config: DetectorConfig, thresholds: SquatThresholds) -> Self {
        Self {
            core: DetectorCore::new(config),
            band: BandCounter::new(BandPhase::Up, thresholds.vote_window, thresholds.min_vertical_range),
            thresholds,
        }
    }

    pub fn phase(&self) -> BandPhase {
        self.band.phase()
    }

    fn classify(&self, knee: f64, hip: f64, position: f64) -> BandPhase {
        let t = &self.thresholds;
        if knee > t.knee_standing && hip > t.hip_standing && position < 0.3 {
            BandPhase::Up
        } else if knee < t.knee_squat && hip < t.hip_squat && position > 0.7 {
            BandPhase::Down
        } else {
            BandPhase::Transitioning
        }
    }
}

impl Default for SquatDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseDetector for SquatDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn detect(&mut self, history: &PoseHistory) -> bool {
        if history.len() < 2 {
            return self.core.set_active(false);
        }
        if self.core.cooling_down() {
            return self.core.set_active(false);
        }
        let Some(frame) = history.latest() else {
            return self.core.set_active(false);
        };
        let Some([lh, rh, lk, rk, la, ra]) = self.core.positions(frame, REQUIRED) else {
            self.band.clear();
            self.core.set_metric("position_state", "invalid");
            return self.core.set_active(false);
        };

        let knee = (angle_2d(&lh, &lk, &la) + angle_2d(&rh, &rk, &ra)) / 2.0;
        let hip = match self.core.positions(frame, [LEFT_SHOULDER, RIGHT_SHOULDER]) {
            Some([ls, rs]) => (angle_2d(&ls, &lh, &lk) + angle_2d(&rs, &rh, &rk)) / 2.0,
            None => knee * HIP_FROM_KNEE,
        };
        let position = self.band.observe((lh.y + rh.y) / 2.0);

        let raw = self.classify(knee, hip, position);
        if self.band.update(raw) {
            self.core.commit_rep(Self::NAME);
        }

        let phase = self.band.phase();
        self.core.set_metric("knee_angle", knee);
        self.core.set_metric("hip_angle", hip);
        self.core.set_metric("vertical_position", position);
        self.core.set_metric("vertical_range", self.band.range());
        self.core.set_metric("position_state", phase.name());
        self.core
            .set_active(matches!(phase, BandPhase::Down | BandPhase::Transitioning))
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
