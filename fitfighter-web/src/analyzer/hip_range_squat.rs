//! Hip-range squat
//!
//! Active while the knees are bent and the hips have travelled far enough
//! within a short window. Each rising edge counts one rep.

use crate::detectors::{DetectorConfig, DetectorCore, ExerciseDetector, RingBuffer, StrikeDebounce};
use crate::geometry::angle_2d;
use crate::pose::*;

const REQUIRED: [usize; 6] = [LEFT_HIP, RIGHT_HIP, LEFT_KNEE, RIGHT_KNEE, LEFT_ANKLE, RIGHT_ANKLE];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HipRangeThresholds {
    /// Minimum hip travel within the window
    pub hip_range: f64,
    /// Knee angle below which the legs count as bent (degrees)
    pub knee_angle: f64,
    pub window: usize,
    pub min_samples: usize,
}

impl Default for HipRangeThresholds {
    fn default() -> Self {
        Self {
            hip_range: 0.1,
            knee_angle: 120.0,
            window: 10,
            min_samples: 5,
        }
    }
}

pub struct HipRangeSquatDetector {
    core: DetectorCore,
    thresholds: HipRangeThresholds,
    hip_heights: RingBuffer<f64>,
    edge: StrikeDebounce,
}

impl HipRangeSquatDetector {
    pub const NAME: &'static str = "hip_range_squat";

    pub fn new() -> Self {
        Self::with_settings(DetectorConfig::default(), HipRangeThresholds::default())
    }

    pub fn with_settings(config: DetectorConfig, thresholds: HipRangeThresholds) -> Self {
        Self {
            core: DetectorCore::new(config),
            hip_heights: RingBuffer::new(thresholds.window),
            thresholds,
            edge: StrikeDebounce::new(1),
        }
    }

    /// Max minus min hip height over the window
    pub fn hip_range(&self) -> f64 {
        let (lo, hi) = self
            .hip_heights
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &y| (lo.min(y), hi.max(y)));
        if self.hip_heights.is_empty() {
            0.0
        } else {
            hi - lo
        }
    }
}

impl Default for HipRangeSquatDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseDetector for HipRangeSquatDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn detect(&mut self, history: &PoseHistory) -> bool {
        if history.len() < 2 {
            return self.core.set_active(false);
        }
        let Some([lh, rh, lk, rk, la, ra]) = history.latest().and_then(|f| self.core.positions(f, REQUIRED))
        else {
            self.hip_heights.clear();
            self.edge.clear();
            return self.core.set_active(false);
        };

        self.hip_heights.push((lh.y + rh.y) / 2.0);
        let knee = (angle_2d(&lh, &lk, &la) + angle_2d(&rh, &rk, &ra)) / 2.0;
        let range = self.hip_range();
        let squatting = self.hip_heights.len() >= self.thresholds.min_samples
            && range > self.thresholds.hip_range
            && knee < self.thresholds.knee_angle;

        let (active, rising) = self.edge.update(squatting);
        if rising {
            self.core.commit_rep(Self::NAME);
        }
        self.core.set_metric("knee_angle", knee);
        self.core.set_metric("hip_range", range);
        self.core.set_active(active)
    }

    fn reset(&mut self) {
        self.core.reset();
        self.hip_heights.clear();
        self.edge.clear();
    }

    fn core(&self) -> &DetectorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DetectorCore {
        &mut self.core
    }
}
