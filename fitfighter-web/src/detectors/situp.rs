//! Sit-up detector
//!
//! Hip angle between the torso and thighs plus the shoulder height
//! normalized against its range this session. Lying flat is down, curled
//! up is up; the smoothed phase counts a rep on down → up.

use crate::geometry::{angle_3d, midpoint};
use crate::pose::*;

use super::base::{DetectorConfig, DetectorCore, ExerciseDetector};
use super::tracking::{BandCounter, BandPhase};

const REQUIRED: [usize; 6] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_HIP,
    RIGHT_HIP,
    LEFT_KNEE,
    RIGHT_KNEE,
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SitupThresholds {
    /// Hip angle above which the torso is lying back (degrees)
    pub hip_down: f64,
    /// Hip angle below which the torso is curled up (degrees)
    pub hip_up: f64,
    /// Minimum shoulder travel (normalized image height) for a counted rep
    pub min_vertical_range: f64,
    pub vote_window: usize,
}

impl Default for SitupThresholds {
    fn default() -> Self {
        Self {
            hip_down: 120.0,
            hip_up: 70.0,
            min_vertical_range: 0.15,
            vote_window: 5,
        }
    }
}

pub struct SitupDetector {
    core: DetectorCore,
    thresholds: SitupThresholds,
    band: BandCounter,
}

impl SitupDetector {
    pub const NAME: &'static str = "situp";

    pub fn new() -> Self {
        Self::with_settings(DetectorConfig::new(0.6, 10), SitupThresholds::default())
    }

    pub fn with_settings(config: DetectorConfig, thresholds: SitupThresholds) -> Self {
        Self {
            core: DetectorCore::new(config),
            band: BandCounter::new(
                BandPhase::Down,
                thresholds.vote_window,
                thresholds.min_vertical_range,
            ),
            thresholds,
        }
    }

    pub fn phase(&self) -> BandPhase {
        self.band.phase()
    }
}

impl Default for SitupDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseDetector for SitupDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn detect(&mut self, history: &PoseHistory) -> bool {
        if history.len() < 2 || self.core.cooling_down() {
            return self.core.set_active(false);
        }
        let Some([ls, rs, lh, rh, lk, rk]) =
            history.latest().and_then(|f| self.core.positions(f, REQUIRED))
        else {
            self.band.clear();
            self.core.set_metric("position_state", "invalid");
            return self.core.set_active(false);
        };

        let shoulders = midpoint(&ls, &rs);
        let hip_angle = angle_3d(&shoulders, &midpoint(&lh, &rh), &midpoint(&lk, &rk));
        let position = self.band.observe(shoulders.y);

        let t = &self.thresholds;
        let raw = if hip_angle > t.hip_down && position > 0.7 {
            BandPhase::Down
        } else if hip_angle < t.hip_up && position < 0.3 {
            BandPhase::Up
        } else {
            BandPhase::Transitioning
        };
        if self.band.update(raw) {
            self.core.commit_rep(Self::NAME);
        }

        let phase = self.band.phase();
        self.core.set_metric("hip_angle", hip_angle);
        self.core.set_metric("vertical_position", position);
        self.core.set_metric("position_state", phase.name());
        self.core
            .set_active(matches!(phase, BandPhase::Up | BandPhase::Transitioning))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::fixtures::{self, Feed};

    /// Side-on sit-up; `lift` 0 lies flat (hip ≈ 146°), 1 is curled up (≈ 35°)
    fn situp(lift: f64) -> PoseFrame {
        let (sx, sy) = (0.3 + 0.35 * lift, 0.7 - 0.25 * lift);
        fixtures::frame_from(&[
            (LEFT_SHOULDER, sx, sy, -0.02),
            (RIGHT_SHOULDER, sx, sy, 0.02),
            (LEFT_HIP, 0.55, 0.7, -0.02),
            (RIGHT_HIP, 0.55, 0.7, 0.02),
            (LEFT_KNEE, 0.7, 0.6, -0.02),
            (RIGHT_KNEE, 0.7, 0.6, 0.02),
            (LEFT_ANKLE, 0.85, 0.7, -0.02),
            (RIGHT_ANKLE, 0.85, 0.7, 0.02),
        ])
    }

    fn cycle(up: &PoseFrame) -> Vec<PoseFrame> {
        let mut frames = vec![situp(0.0); 8];
        frames.extend(vec![situp(0.5); 2]);
        frames.extend(vec![up.clone(); 8]);
        frames.extend(vec![situp(0.5); 2]);
        frames
    }

    fn run(detector: &mut SitupDetector, frames: &[PoseFrame]) -> Vec<bool> {
        let mut feed = Feed::new();
        frames.iter().map(|f| detector.detect(feed.push(f))).collect()
    }

    #[test]
    fn test_first_situp_from_lying() {
        let mut detector = SitupDetector::new();
        let results = run(&mut detector, &cycle(&situp(1.0)));
        assert_eq!(detector.rep_count(), 1);
        assert!(results[12], "curling up is active");
    }

    #[test]
    fn test_two_situps() {
        let mut detector = SitupDetector::new();
        let mut frames = cycle(&situp(1.0));
        frames.extend(cycle(&situp(1.0)));
        run(&mut detector, &frames);
        assert_eq!(detector.rep_count(), 2);
    }

    #[test]
    fn test_small_curl_not_counted() {
        let mut detector = SitupDetector::new();
        // Curled up but the shoulders only rise 0.1
        let low = fixtures::shifted(&situp(1.0), 0.0, 0.15);
        run(&mut detector, &cycle(&low));
        assert_eq!(detector.rep_count(), 0);
    }

    #[test]
    fn test_lying_still_inactive() {
        let mut detector = SitupDetector::new();
        let mut frames = cycle(&situp(1.0));
        frames.extend(vec![situp(0.0); 12]);
        let results = run(&mut detector, &frames);
        assert_eq!(detector.phase(), BandPhase::Down);
        assert!(!results[results.len() - 1]);
    }

    #[test]
    fn test_reset() {
        let mut detector = SitupDetector::new();
        run(&mut detector, &cycle(&situp(1.0)));
        detector.reset();
        assert_eq!(detector.rep_count(), 0);
        assert!(!detector.is_active());
        assert_eq!(detector.phase(), BandPhase::Down);
    }
}
