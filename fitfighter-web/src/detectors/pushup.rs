//! Push-up detector
//!
//! Counts down → up elbow cycles while the body stays horizontal. Leaving
//! the horizontal drops the partial rep and the observed shoulder range.

use crate::geometry::{angle_3d, body_line_angle, midpoint};
use crate::pose::*;

use super::base::{DetectorConfig, DetectorCore, ExerciseDetector};
use super::tracking::{BandPhase, RangeTracker};

const REQUIRED: [usize; 8] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_ELBOW,
    RIGHT_ELBOW,
    LEFT_WRIST,
    RIGHT_WRIST,
    LEFT_HIP,
    RIGHT_HIP,
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PushupThresholds {
    /// Elbow angle below which the arms are bent (degrees)
    pub elbow_down: f64,
    /// Elbow angle above which the arms are straight (degrees)
    pub elbow_up: f64,
    /// Maximum shoulder-hip line deviation from horizontal (degrees)
    pub body_angle: f64,
    /// Minimum shoulder travel (normalized image height) for a counted rep
    pub min_vertical_range: f64,
}

impl Default for PushupThresholds {
    fn default() -> Self {
        Self {
            elbow_down: 90.0,
            elbow_up: 160.0,
            body_angle: 30.0,
            min_vertical_range: 0.15,
        }
    }
}

pub struct PushupDetector {
    core: DetectorCore,
    thresholds: PushupThresholds,
    phase: BandPhase,
    armed: bool,
    shoulder_range: RangeTracker,
}

impl PushupDetector {
    pub const NAME: &'static str = "pushup";

    pub fn new() -> Self {
        Self::with_settings(DetectorConfig::new(0.6, 0), PushupThresholds::default())
    }

    pub fn with_settings(config: DetectorConfig, thresholds: PushupThresholds) -> Self {
        Self {
            core: DetectorCore::new(config),
            thresholds,
            phase: BandPhase::Up,
            armed: false,
            shoulder_range: RangeTracker::new(),
        }
    }

    pub fn phase(&self) -> BandPhase {
        self.phase
    }

    fn clear_tracking(&mut self) {
        self.phase = BandPhase::Up;
        self.armed = false;
        self.shoulder_range.clear();
    }
}

impl Default for PushupDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseDetector for PushupDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn detect(&mut self, history: &PoseHistory) -> bool {
        if history.len() < 2 || self.core.cooling_down() {
            return self.core.set_active(false);
        }
        let Some([ls, rs, le, re, lw, rw, lh, rh]) =
            history.latest().and_then(|f| self.core.positions(f, REQUIRED))
        else {
            self.clear_tracking();
            self.core.set_metric("state", "invalid");
            return self.core.set_active(false);
        };

        let shoulders = midpoint(&ls, &rs);
        let elbow = (angle_3d(&lw, &le, &ls) + angle_3d(&rw, &re, &rs)) / 2.0;
        let body_angle = body_line_angle(&shoulders, &midpoint(&lh, &rh));
        let t = self.thresholds;
        let horizontal = body_angle < t.body_angle;
        let position = self.shoulder_range.observe(shoulders.y);

        self.phase = if elbow < t.elbow_down && position > 0.7 {
            BandPhase::Down
        } else if elbow > t.elbow_up && position < 0.3 {
            BandPhase::Up
        } else {
            BandPhase::Transitioning
        };

        match self.phase {
            BandPhase::Down if horizontal => self.armed = true,
            BandPhase::Up => {
                if self.armed && horizontal && self.shoulder_range.range() > t.min_vertical_range {
                    self.core.commit_rep(Self::NAME);
                }
                self.armed = false;
            }
            _ => {}
        }
        if !horizontal {
            self.armed = false;
            self.shoulder_range.clear();
        }

        self.core.set_metric("body_angle", body_angle);
        self.core.set_metric("elbow_angle", elbow);
        self.core.set_metric("position_state", self.phase.name());
        self.core.set_metric("is_horizontal", horizontal);
        self.core.set_active(horizontal)
    }

    fn reset(&mut self) {
        self.core.reset();
        self.clear_tracking();
    }

    fn core(&self) -> &DetectorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DetectorCore {
        &mut self.core
    }
}
