//! Burpee detector
//!
//! Classifies each frame into a coarse phase and logs every phase change.
//! A rep is the ordered subsequence standing → squat → plank → squat →
//! jump appearing anywhere in the log.

use crate::geometry::{angle_3d, body_line_angle, midpoint};
use crate::pose::*;

use super::base::{DetectorConfig, DetectorCore, ExerciseDetector};
use super::tracking::{RangeTracker, RingBuffer};

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

const PHASE_LOG: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BurpeePhase {
    Standing,
    Squat,
    Plank,
    Jump,
    Transitioning,
}

impl BurpeePhase {
    pub fn name(&self) -> &'static str {
        match self {
            BurpeePhase::Standing => "standing",
            BurpeePhase::Squat => "squat",
            BurpeePhase::Plank => "plank",
            BurpeePhase::Jump => "jump",
            BurpeePhase::Transitioning => "transitioning",
        }
    }
}

/// One full burpee, in order
const SEQUENCE: [BurpeePhase; 5] = [
    BurpeePhase::Standing,
    BurpeePhase::Squat,
    BurpeePhase::Plank,
    BurpeePhase::Squat,
    BurpeePhase::Jump,
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurpeeThresholds {
    /// Upward hip speed per frame that reads as a jump
    pub jump_velocity: f64,
    pub standing_knee: f64,
    /// Normalized hip height (1 = highest seen) needed for standing
    pub standing_hip_height: f64,
    pub squat_knee: f64,
    /// Maximum shoulder-hip line deviation from horizontal for a plank (degrees)
    pub plank_body_angle: f64,
    /// Maximum bend at the hips for a plank (degrees from straight)
    pub plank_torso_bend: f64,
}

impl Default for BurpeeThresholds {
    fn default() -> Self {
        Self {
            jump_velocity: 0.05,
            standing_knee: 160.0,
            standing_hip_height: 0.5,
            squat_knee: 100.0,
            plank_body_angle: 30.0,
            plank_torso_bend: 30.0,
        }
    }
}

pub struct BurpeeDetector {
    core: DetectorCore,
    thresholds: BurpeeThresholds,
    phase: Option<BurpeePhase>,
    log: RingBuffer<BurpeePhase>,
    hip_range: RangeTracker,
}

impl BurpeeDetector {
    pub const NAME: &'static str = "burpee";

    pub fn new() -> Self {
        Self::with_settings(DetectorConfig::new(0.6, 15), BurpeeThresholds::default())
    }

    pub fn with_settings(config: DetectorConfig, thresholds: BurpeeThresholds) -> Self {
        Self {
            core: DetectorCore::new(config),
            thresholds,
            phase: None,
            log: RingBuffer::new(PHASE_LOG),
            hip_range: RangeTracker::new(),
        }
    }

    pub fn phase(&self) -> Option<BurpeePhase> {
        self.phase
    }

    /// Logged phase changes, oldest first
    pub fn phase_log(&self) -> Vec<BurpeePhase> {
        self.log.iter().copied().collect()
    }

    fn clear_tracking(&mut self) {
        self.phase = None;
        self.log.clear();
        self.hip_range.clear();
    }

    /// Single forward pass over the log looking for the full sequence
    fn sequence_complete(&self) -> bool {
        let matched = self.log.iter().fold(0, |next, phase| {
            if next < SEQUENCE.len() && *phase == SEQUENCE[next] {
                next + 1
            } else {
                next
            }
        });
        matched == SEQUENCE.len()
    }

    fn classify(&self, knee: f64, torso: f64, body_angle: f64, hip_height: f64, velocity: f64) -> BurpeePhase {
        let t = &self.thresholds;
        let horizontal = body_angle < t.plank_body_angle;
        if velocity > t.jump_velocity {
            BurpeePhase::Jump
        } else if !horizontal && knee > t.standing_knee && hip_height > t.standing_hip_height {
            BurpeePhase::Standing
        } else if !horizontal && knee < t.squat_knee {
            BurpeePhase::Squat
        } else if horizontal && (torso - 180.0).abs() < t.plank_torso_bend {
            BurpeePhase::Plank
        } else {
            BurpeePhase::Transitioning
        }
    }
}

impl Default for BurpeeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseDetector for BurpeeDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn detect(&mut self, history: &PoseHistory) -> bool {
        if history.len() < 2 || self.core.cooling_down() {
            return self.core.set_active(false);
        }
        let Some([ls, rs, lh, rh, lk, rk, la, ra]) =
            history.latest().and_then(|f| self.core.positions(f, REQUIRED))
        else {
            self.clear_tracking();
            self.core.set_metric("state", "invalid");
            return self.core.set_active(false);
        };

        let shoulders = midpoint(&ls, &rs);
        let hips = midpoint(&lh, &rh);
        let knee = (angle_3d(&lh, &lk, &la) + angle_3d(&rh, &rk, &ra)) / 2.0;
        let torso = angle_3d(&shoulders, &hips, &midpoint(&lk, &rk));
        let body_angle = body_line_angle(&shoulders, &hips);
        let hip_height = 1.0 - self.hip_range.observe(hips.y);
        let velocity = history
            .back(1)
            .and_then(|f| self.core.positions(f, [LEFT_HIP, RIGHT_HIP]))
            .map_or(0.0, |[plh, prh]| midpoint(&plh, &prh).y - hips.y);

        let next = self.classify(knee, torso, body_angle, hip_height, velocity);
        if self.phase != Some(next) {
            self.log.push(next);
        }
        self.phase = Some(next);

        let completed = self.sequence_complete();
        if completed {
            self.core.commit_rep(Self::NAME);
            self.log.clear();
        }

        self.core.set_metric("knee_angle", knee);
        self.core.set_metric("torso_angle", torso);
        self.core.set_metric("body_angle", body_angle);
        self.core.set_metric("norm_hip_height", hip_height);
        self.core.set_metric("vertical_velocity", velocity);
        self.core.set_metric("current_phase", next.name());
        self.core.set_metric(
            "phase_sequence",
            self.log.iter().map(|p| p.name()).collect::<Vec<_>>().join(","),
        );
        self.core.set_active(next != BurpeePhase::Standing || completed)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::fixtures::{self, Feed};
    use BurpeePhase::*;

    // Hip heights: stand 0.55, crouch 0.7, plank 0.8, jump 0.45
    fn stand() -> PoseFrame {
        fixtures::squat(0.0)
    }

    fn crouch(dy: f64) -> PoseFrame {
        fixtures::shifted(&fixtures::squat(1.0), 0.0, -0.05 + dy)
    }

    fn plank() -> PoseFrame {
        fixtures::shifted(&fixtures::plank(0.0), 0.0, 0.3)
    }

    fn jump() -> PoseFrame {
        fixtures::shifted(&stand(), 0.0, -0.1)
    }

    fn burpee() -> Vec<PoseFrame> {
        let mut frames = vec![stand(); 3];
        frames.extend(vec![crouch(0.0); 3]);
        frames.extend(vec![plank(); 3]);
        // Hips come back up slowly enough not to read as a jump
        frames.extend([crouch(0.06), crouch(0.03), crouch(0.0), crouch(0.0)]);
        frames.push(jump());
        frames
    }

    fn run(detector: &mut BurpeeDetector, frames: &[PoseFrame]) -> Vec<bool> {
        let mut feed = Feed::new();
        frames.iter().map(|f| detector.detect(feed.push(f))).collect()
    }

    #[test]
    fn test_full_burpee() {
        let mut detector = BurpeeDetector::new();
        let frames = burpee();
        let results = run(&mut detector, &frames);
        assert_eq!(detector.rep_count(), 1);
        assert!(results[results.len() - 1], "rep frame is active");
        assert!(detector.phase_log().is_empty());
        assert_eq!(detector.core().cooldown_remaining(), 15);
    }

    #[test]
    fn test_phase_log_order() {
        let mut detector = BurpeeDetector::new();
        let mut frames = burpee();
        frames.pop();
        run(&mut detector, &frames);
        assert_eq!(detector.phase_log(), vec![Standing, Squat, Plank, Squat]);
        assert_eq!(detector.rep_count(), 0);
    }

    #[test]
    fn test_no_plank_no_rep() {
        let mut detector = BurpeeDetector::new();
        let mut frames = vec![stand(); 3];
        frames.extend(vec![crouch(0.0); 3]);
        frames.push(jump());
        frames.extend(vec![stand(); 3]);
        run(&mut detector, &frames);
        assert_eq!(detector.rep_count(), 0);
        assert_eq!(detector.phase_log(), vec![Standing, Squat, Jump, Standing]);
    }

    #[test]
    fn test_two_burpees() {
        let mut detector = BurpeeDetector::new();
        let mut frames = burpee();
        frames.extend(vec![stand(); 16]);
        frames.extend(burpee());
        run(&mut detector, &frames);
        assert_eq!(detector.rep_count(), 2);
    }

    #[test]
    fn test_standing_is_inactive() {
        let mut detector = BurpeeDetector::new();
        let results = run(&mut detector, &vec![stand(); 4]);
        assert!(results.iter().all(|&r| !r));
        assert_eq!(detector.phase(), Some(Standing));
    }

    #[test]
    fn test_reset() {
        let mut detector = BurpeeDetector::new();
        run(&mut detector, &burpee());
        detector.reset();
        assert_eq!(detector.rep_count(), 0);
        assert_eq!(detector.phase(), None);
        assert!(detector.phase_log().is_empty());
        assert_eq!(detector.core().cooldown_remaining(), 0);
    }
}
