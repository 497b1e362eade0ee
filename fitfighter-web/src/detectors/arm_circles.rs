//! Arm-circles detector
//!
//! Tracks the direction of each wrist around its shoulder and accumulates
//! the swept angle while the motion keeps one rotational direction. Nine
//! tenths of a turn on either arm counts one rep.

use crate::geometry::{directional_angle, distance, wrap_degrees, Point};
use crate::pose::*;

use super::base::{DetectorConfig, DetectorCore, ExerciseDetector};
use super::tracking::RingBuffer;

const REQUIRED: [usize; 6] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_ELBOW,
    RIGHT_ELBOW,
    LEFT_WRIST,
    RIGHT_WRIST,
];

const ANGLE_HISTORY: usize = 10;
/// Deltas inspected for a consistent rotation direction
const CONSISTENCY_DELTAS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmCirclesThresholds {
    /// Wrist travel per frame, in shoulder widths, before an arm is tracked
    pub min_wrist_movement: f64,
    /// Angular steps smaller than this are jitter (degrees)
    pub min_angle_step: f64,
    /// Fraction of a full turn that counts as a circle
    pub completion: f64,
    /// Completion at which an arm reads as active before its first rep
    pub active_completion: f64,
}

impl Default for ArmCirclesThresholds {
    fn default() -> Self {
        Self {
            min_wrist_movement: 0.05,
            min_angle_step: 5.0,
            completion: 0.9,
            active_completion: 0.25,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveArm {
    Left,
    Right,
    Both,
}

impl ActiveArm {
    pub fn name(&self) -> &'static str {
        match self {
            ActiveArm::Left => "left",
            ActiveArm::Right => "right",
            ActiveArm::Both => "both",
        }
    }
}

/// Rotation state of one arm
#[derive(Clone, Debug)]
struct CircleTrack {
    angles: RingBuffer<f64>,
    last_angle: Option<f64>,
    completion: f64,
}

impl CircleTrack {
    fn new() -> Self {
        Self {
            angles: RingBuffer::new(ANGLE_HISTORY),
            last_angle: None,
            completion: 0.0,
        }
    }

    fn clear(&mut self) {
        self.angles.clear();
        self.last_angle = None;
        self.completion = 0.0;
    }

    /// True when the newest deltas all turn the same way
    fn consistent(&self) -> bool {
        if self.angles.len() < 3 {
            return true;
        }
        let recent: Vec<f64> = self
            .angles
            .iter()
            .rev()
            .take(CONSISTENCY_DELTAS + 1)
            .rev()
            .copied()
            .collect();
        let deltas: Vec<f64> = recent.windows(2).map(|w| wrap_degrees(w[1] - w[0])).collect();
        deltas.iter().all(|&d| d > 0.0) || deltas.iter().all(|&d| d < 0.0)
    }

    fn track(&mut self, angle: f64, min_step: f64) {
        self.angles.push(angle);
        let Some(last) = self.last_angle else {
            self.last_angle = Some(angle);
            return;
        };

        let diff = wrap_degrees(angle - last);
        if diff.abs() < min_step {
            return;
        }
        if self.consistent() {
            self.completion = (self.completion + diff.abs() / 360.0).min(1.0);
        }
        self.last_angle = Some(angle);
    }
}

pub struct ArmCirclesDetector {
    core: DetectorCore,
    thresholds: ArmCirclesThresholds,
    left: CircleTrack,
    right: CircleTrack,
    active_arm: Option<ActiveArm>,
}

impl ArmCirclesDetector {
    pub const NAME: &'static str = "arm_circles";

    pub fn new() -> Self {
        Self::with_settings(DetectorConfig::new(0.6, 15), ArmCirclesThresholds::default())
    }

    pub fn with_settings(config: DetectorConfig, thresholds: ArmCirclesThresholds) -> Self {
        Self {
            core: DetectorCore::new(config),
            thresholds,
            left: CircleTrack::new(),
            right: CircleTrack::new(),
            active_arm: None,
        }
    }

    pub fn active_arm(&self) -> Option<ActiveArm> {
        self.active_arm
    }

    /// Completion of the current circle for (left, right)
    pub fn completion(&self) -> (f64, f64) {
        (self.left.completion, self.right.completion)
    }

    fn reset_tracking(&mut self) {
        self.left.clear();
        self.right.clear();
        self.active_arm = None;
    }

    /// Wrist travel since the previous frame, 0 when it was not seen there
    fn wrist_movement(&self, previous: &PoseFrame, wrist: &Point, id: usize) -> f64 {
        match self.core.position(previous, id) {
            Some(prev) => distance(Some(wrist), Some(&prev)),
            None => 0.0,
        }
    }
}

impl Default for ArmCirclesDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseDetector for ArmCirclesDetector {
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
        let (Some(current), Some(previous)) = (history.latest(), history.back(1)) else {
            return self.core.set_active(false);
        };
        if !self.core.landmarks_visible(current, &REQUIRED) {
            self.reset_tracking();
            return self.core.set_active(false);
        }
        let Some([ls, rs, lw, rw]) =
            self.core
                .positions(current, [LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_WRIST, RIGHT_WRIST])
        else {
            return self.core.set_active(false);
        };

        let shoulder_width = distance(Some(&ls), Some(&rs));
        let normalize = |m: f64| if shoulder_width > 0.0 { m / shoulder_width } else { 0.0 };
        let left_movement = normalize(self.wrist_movement(previous, &lw, LEFT_WRIST));
        let right_movement = normalize(self.wrist_movement(previous, &rw, RIGHT_WRIST));

        let t = self.thresholds;
        let left_moving = left_movement > t.min_wrist_movement;
        let right_moving = right_movement > t.min_wrist_movement;
        if left_moving {
            self.left.track(directional_angle(&ls, &lw), t.min_angle_step);
        }
        if right_moving {
            self.right.track(directional_angle(&rs, &rw), t.min_angle_step);
        }

        let completed = match (
            self.left.completion >= t.completion,
            self.right.completion >= t.completion,
        ) {
            (true, true) => Some(ActiveArm::Both),
            (true, false) => Some(ActiveArm::Left),
            (false, true) => Some(ActiveArm::Right),
            (false, false) => None,
        };
        if let Some(arm) = completed {
            self.active_arm = Some(arm);
            self.core.commit_rep(Self::NAME);
            self.left.clear();
            self.right.clear();
        }
        if !(left_moving || right_moving) {
            self.active_arm = None;
        }

        self.core.set_metric("left_wrist_movement", left_movement);
        self.core.set_metric("right_wrist_movement", right_movement);
        self.core.set_metric("left_circle_completion", self.left.completion);
        self.core.set_metric("right_circle_completion", self.right.completion);
        self.core.set_metric(
            "active_arm",
            self.active_arm.map_or("none", |arm| arm.name()),
        );

        let circling = self.left.completion.max(self.right.completion) >= t.active_completion;
        self.core.set_active(self.active_arm.is_some() || circling)
    }

    fn reset(&mut self) {
        self.core.reset();
        self.reset_tracking();
    }

    fn core(&self) -> &DetectorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DetectorCore {
        &mut self.core
    }
}
