//! Jumping-jack detector
//!
//! Each frame is classified open (arms raised, feet wide), closed (arms
//! down, feet together) or neither. The phase follows the last five
//! classifications and a rep is counted on open → closing → closed.

use crate::geometry::{angle_2d, distance};
use crate::pose::*;

use super::base::{DetectorConfig, DetectorCore, ExerciseDetector};

const REQUIRED: [usize; 12] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_ELBOW,
    RIGHT_ELBOW,
    LEFT_WRIST,
    RIGHT_WRIST,
    LEFT_HIP,
    RIGHT_HIP,
    LEFT_KNEE,
    RIGHT_KNEE,
    LEFT_ANKLE,
    RIGHT_ANKLE,
];

/// Frames needed in the position window before the phase can move
const MIN_WINDOW: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpingJackThresholds {
    /// Hip-shoulder-wrist angle above which an arm counts as raised (degrees)
    pub arm_angle: f64,
    /// Ankle spread beyond hip width, in shoulder widths, for open legs
    pub leg_spread: f64,
    /// Recent frames considered when settling the phase
    pub window: usize,
}

impl Default for JumpingJackThresholds {
    fn default() -> Self {
        Self {
            arm_angle: 60.0,
            leg_spread: 0.15,
            window: 5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JackPhase {
    Unknown,
    Closed,
    Opening,
    Open,
    Closing,
}

impl JackPhase {
    pub fn name(&self) -> &'static str {
        match self {
            JackPhase::Unknown => "unknown",
            JackPhase::Closed => "closed",
            JackPhase::Opening => "opening",
            JackPhase::Open => "open",
            JackPhase::Closing => "closing",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    Open,
    Closed,
    Neither,
}

/// Body measurements of one frame
#[derive(Clone, Copy, Debug)]
struct JackPose {
    left_arm: f64,
    right_arm: f64,
    leg_spread: f64,
    hip_height: f64,
}

pub struct JumpingJackDetector {
    core: DetectorCore,
    thresholds: JumpingJackThresholds,
    phase: JackPhase,
    /// Set on open → closing, consumed by the closing → closed rep
    armed: bool,
}

impl JumpingJackDetector {
    pub const NAME: &'static str = "jumping_jack";

    pub fn new() -> Self {
        Self::with_settings(DetectorConfig::new(0.6, 10), JumpingJackThresholds::default())
    }

    pub fn with_settings(config: DetectorConfig, thresholds: JumpingJackThresholds) -> Self {
        Self {
            core: DetectorCore::new(config),
            thresholds,
            phase: JackPhase::Unknown,
            armed: false,
        }
    }

    pub fn phase(&self) -> JackPhase {
        self.phase
    }

    pub fn thresholds(&self) -> &JumpingJackThresholds {
        &self.thresholds
    }

    fn measure(&self, frame: &PoseFrame) -> Option<JackPose> {
        if !self.core.landmarks_visible(frame, &REQUIRED) {
            return None;
        }
        let [ls, rs, lw, rw, lh, rh, la, ra] = self.core.positions(
            frame,
            [
                LEFT_SHOULDER,
                RIGHT_SHOULDER,
                LEFT_WRIST,
                RIGHT_WRIST,
                LEFT_HIP,
                RIGHT_HIP,
                LEFT_ANKLE,
                RIGHT_ANKLE,
            ],
        )?;

        let shoulder_width = distance(Some(&ls), Some(&rs));
        let spread = distance(Some(&la), Some(&ra)) - distance(Some(&lh), Some(&rh));
        let leg_spread = if shoulder_width > 0.0 {
            spread / shoulder_width
        } else {
            0.0
        };

        Some(JackPose {
            left_arm: angle_2d(&lh, &ls, &lw),
            right_arm: angle_2d(&rh, &rs, &rw),
            leg_spread,
            hip_height: (lh.y + rh.y) / 2.0,
        })
    }

    fn classify(&self, pose: &JackPose) -> Position {
        let t = &self.thresholds;
        if pose.left_arm > t.arm_angle && pose.right_arm > t.arm_angle && pose.leg_spread > t.leg_spread {
            Position::Open
        } else if pose.left_arm < t.arm_angle / 2.0
            && pose.right_arm < t.arm_angle / 2.0
            && pose.leg_spread < t.leg_spread / 2.0
        {
            Position::Closed
        } else {
            Position::Neither
        }
    }

    fn next_phase(&self, window: &[Position]) -> JackPhase {
        let newest = window[window.len() - 1];
        let settled = |p: Position| {
            newest == p && window.iter().filter(|&&w| w == p).count() + 1 >= window.len()
        };

        if settled(Position::Open) {
            JackPhase::Open
        } else if settled(Position::Closed) {
            JackPhase::Closed
        } else {
            // Transitional phases follow the last stable one
            match self.phase {
                JackPhase::Closed => JackPhase::Opening,
                JackPhase::Open => JackPhase::Closing,
                other => other,
            }
        }
    }
}

impl Default for JumpingJackDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseDetector for JumpingJackDetector {
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
        let Some(current) = history.latest().and_then(|f| self.measure(f)) else {
            self.phase = JackPhase::Unknown;
            self.armed = false;
            self.core.set_metric("phase", self.phase.name());
            return self.core.set_active(false);
        };

        self.core.set_metric("left_arm_angle", current.left_arm);
        self.core.set_metric("right_arm_angle", current.right_arm);
        self.core.set_metric("leg_spread", current.leg_spread);
        self.core.set_metric("hip_height", current.hip_height);

        let window: Vec<Position> = history
            .recent(self.thresholds.window)
            .map(|f| self.measure(f).map_or(Position::Neither, |p| self.classify(&p)))
            .collect();

        if window.len() >= MIN_WINDOW {
            let next = self.next_phase(&window);
            match (self.phase, next) {
                (JackPhase::Open, JackPhase::Closing) => self.armed = true,
                (JackPhase::Closing, JackPhase::Closed) if self.armed => {
                    self.core.commit_rep(Self::NAME);
                    self.armed = false;
                }
                _ => {}
            }
            self.phase = next;
        }

        self.core.set_metric("phase", self.phase.name());
        self.core.set_active(self.armed)
    }

    fn reset(&mut self) {
        self.core.reset();
        self.phase = JackPhase::Unknown;
        self.armed = false;
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
    use crate::pose::fixtures::{self, history_of, jack_open, standing};

    #[test]
    fn test_initial_state() {
        let detector = JumpingJackDetector::new();
        assert_eq!(detector.name(), "jumping_jack");
        assert_eq!(detector.rep_count(), 0);
        assert!(!detector.is_active());
        assert_eq!(detector.phase(), JackPhase::Unknown);
    }

    #[test]
    fn test_insufficient_history() {
        let mut detector = JumpingJackDetector::new();
        assert!(!detector.detect(&PoseHistory::new()));
        assert!(!detector.detect(&history_of(&[standing()])));
        assert_eq!(detector.phase(), JackPhase::Unknown);
    }

    #[test]
    fn test_missing_landmarks() {
        let mut detector = JumpingJackDetector::new();
        let partial = fixtures::frame_from(&[
            (LEFT_SHOULDER, 0.4, 0.3, 0.0),
            (RIGHT_SHOULDER, 0.6, 0.3, 0.0),
        ]);
        assert!(!detector.detect(&history_of(&[partial.clone(), partial])));
        assert_eq!(detector.phase(), JackPhase::Unknown);
    }

    #[test]
    fn test_full_cycle() {
        let mut detector = JumpingJackDetector::new();
        let (c, o) = (standing(), jack_open());

        assert!(!detector.detect(&history_of(&[c.clone(), c.clone(), c.clone()])));
        assert_eq!(detector.phase(), JackPhase::Closed);

        assert!(!detector.detect(&history_of(&[c.clone(), c.clone(), o.clone()])));
        assert_eq!(detector.phase(), JackPhase::Opening);

        assert!(!detector.detect(&history_of(&[c.clone(), o.clone(), o.clone()])));
        assert_eq!(detector.phase(), JackPhase::Open);

        assert!(detector.detect(&history_of(&[o.clone(), o.clone(), c.clone()])));
        assert_eq!(detector.phase(), JackPhase::Closing);

        assert!(!detector.detect(&history_of(&[o.clone(), c.clone(), c.clone()])));
        assert_eq!(detector.phase(), JackPhase::Closed);
        assert_eq!(detector.rep_count(), 1);
    }

    #[test]
    fn test_cooldown_after_rep() {
        let mut detector = JumpingJackDetector::new();
        let (c, o) = (standing(), jack_open());
        for window in [
            [&c, &c, &c],
            [&c, &c, &o],
            [&c, &o, &o],
            [&o, &o, &c],
            [&o, &c, &c],
        ] {
            detector.detect(&history_of(&window.map(|f| f.clone())));
        }
        assert_eq!(detector.rep_count(), 1);

        // Open frames during the cooldown are ignored
        let open = history_of(&[o.clone(), o.clone(), o.clone()]);
        for _ in 0..10 {
            assert!(!detector.detect(&open));
            assert_eq!(detector.phase(), JackPhase::Closed);
        }
        detector.detect(&open);
        assert_eq!(detector.phase(), JackPhase::Open);
    }

    #[test]
    fn test_neither_position_does_not_settle() {
        let mut detector = JumpingJackDetector::new();
        // Arms raised but feet together
        let arms_only = fixtures::frame_from(
            &standing()
                .iter()
                .map(|(id, lm)| match id {
                    LEFT_WRIST => (id, 0.2, 0.1, 0.0),
                    RIGHT_WRIST => (id, 0.8, 0.1, 0.0),
                    _ => (id, lm.x, lm.y, lm.z),
                })
                .collect::<Vec<_>>(),
        );
        detector.detect(&history_of(&[arms_only.clone(), arms_only.clone(), arms_only]));
        assert_eq!(detector.phase(), JackPhase::Unknown);
    }

    #[test]
    fn test_low_confidence_resets_phase() {
        let mut detector = JumpingJackDetector::new();
        let c = standing();
        detector.detect(&history_of(&[c.clone(), c.clone(), c.clone()]));
        assert_eq!(detector.phase(), JackPhase::Closed);

        let dim = fixtures::with_confidence(&c, &[LEFT_ANKLE], 0.3);
        assert!(!detector.detect(&history_of(&[c.clone(), c, dim])));
        assert_eq!(detector.phase(), JackPhase::Unknown);
    }

    #[test]
    fn test_reset() {
        let mut detector = JumpingJackDetector::new();
        let (c, o) = (standing(), jack_open());
        detector.detect(&history_of(&[c.clone(), c.clone(), c.clone()]));
        detector.detect(&history_of(&[c.clone(), o.clone(), o.clone()]));
        detector.detect(&history_of(&[o.clone(), o.clone(), c]));
        assert!(detector.is_active());

        detector.reset();
        assert_eq!(detector.rep_count(), 0);
        assert!(!detector.is_active());
        assert_eq!(detector.phase(), JackPhase::Unknown);
        assert_eq!(detector.core().cooldown_remaining(), 0);
        assert_eq!(detector.thresholds(), &JumpingJackThresholds::default());
    }
}
