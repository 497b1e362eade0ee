//! Stance-aware punch detection
//!
//! Wrist motion is measured relative to its shoulder. Facing the camera,
//! forward (decreasing z) travel dominates. Side-on, the lead arm punches
//! across the frame while the rear arm drives forward, so each gets its
//! own weights and direction check.

use crate::detectors::{
    DetectorConfig, DetectorCore, ExerciseDetector, Limb, StrikeDebounce, LEFT_ARM, RIGHT_ARM,
};
use crate::geometry::Point;
use crate::pose::*;

/// Detected punch types
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PunchType {
    Jab,
    Cross,
    Uppercut,
}

impl PunchType {
    pub fn name(&self) -> &'static str {
        match self {
            PunchType::Jab => "JAB",
            PunchType::Cross => "CROSS",
            PunchType::Uppercut => "UPPERCUT",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn arm(self) -> Limb {
        match self {
            Side::Left => LEFT_ARM,
            Side::Right => RIGHT_ARM,
        }
    }
}

/// Body orientation inferred from shoulder depth asymmetry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stance {
    pub side_facing: bool,
    pub left_forward: bool,
}

impl Stance {
    pub const FRONT: Stance = Stance {
        side_facing: false,
        left_forward: false,
    };

    pub fn from_shoulders(left: &Point, right: &Point) -> Self {
        let side_facing = (left.z - right.z).abs() > (left.x - right.x).abs();
        Self {
            side_facing,
            left_forward: side_facing && left.z < right.z,
        }
    }

    /// Lead arm of a side-on stance; nothing leads when facing the camera
    pub fn is_lead(&self, side: Side) -> bool {
        self.side_facing && self.left_forward == (side == Side::Left)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PunchThresholds {
    pub velocity: f64,
    /// Weight on forward (depth) travel
    pub direction_weight: f64,
    pub consecutive_frames: u32,
    /// Minimum elbow angle at the strike (degrees)
    pub min_extension: f64,
    /// Minimum per-frame wrist travel in the punching direction
    pub min_travel: f64,
    /// Maximum per-frame vertical wrist travel
    pub max_vertical: f64,
    /// Upward wrist travel that marks an uppercut
    pub uppercut_rise: f64,
}

impl Default for PunchThresholds {
    fn default() -> Self {
        Self {
            velocity: 0.08,
            direction_weight: 0.4,
            consecutive_frames: 1,
            min_extension: 110.0,
            min_travel: 0.005,
            max_vertical: 0.05,
            uppercut_rise: 0.02,
        }
    }
}

/// One arm's measurements for the newest frame
#[derive(Clone, Copy, Debug, Default)]
struct ArmReading {
    velocity: f64,
    direction: bool,
    extension: f64,
    rise: f64,
}

pub struct PunchDetector {
    core: DetectorCore,
    thresholds: PunchThresholds,
    debounce: StrikeDebounce,
    last_punch: Option<PunchType>,
}

impl PunchDetector {
    pub const NAME: &'static str = "punch";

    pub fn new() -> Self {
        Self::with_settings(DetectorConfig::new(0.6, 8), PunchThresholds::default())
    }

    pub fn with_settings(config: DetectorConfig, thresholds: PunchThresholds) -> Self {
        Self {
            core: DetectorCore::new(config),
            debounce: StrikeDebounce::new(thresholds.consecutive_frames),
            thresholds,
            last_punch: None,
        }
    }

    pub fn last_punch(&self) -> Option<PunchType> {
        self.last_punch
    }

    pub fn streak(&self) -> u32 {
        self.debounce.consecutive()
    }

    fn stance(&self, frame: &PoseFrame) -> Stance {
        match self.core.positions(frame, [LEFT_SHOULDER, RIGHT_SHOULDER]) {
            Some([left, right]) => Stance::from_shoulders(&left, &right),
            None => Stance::FRONT,
        }
    }

    /// `None` when the arm is not visible in the newest frame
    fn read_arm(&self, side: Side, stance: Stance, previous: &PoseFrame, current: &PoseFrame) -> Option<ArmReading> {
        let arm = side.arm();
        let [shoulder, _, wrist] = self.core.positions(current, arm.ids())?;
        let extension = arm.extension(current, self.core.config.confidence_threshold)?;
        let Some([prev_shoulder, prev_wrist]) = self.core.positions(previous, [arm.root, arm.end]) else {
            return Some(ArmReading {
                extension,
                ..ArmReading::default()
            });
        };

        let w = self.thresholds.direction_weight;
        let d = (wrist - shoulder) - (prev_wrist - prev_shoulder);
        let forward = -d.z;
        let velocity = if stance.is_lead(side) {
            d.x.abs() * 1.5 + forward * w + d.y.abs() * 0.3
        } else if stance.side_facing {
            d.x.abs() * 0.7 + forward * w * 1.5 + d.y.abs() * 0.3
        } else {
            forward * w + d.x.hypot(d.y)
        };

        let travel = wrist - prev_wrist;
        let steady = travel.y.abs() < self.thresholds.max_vertical;
        let toward_target = if stance.is_lead(side) {
            match side {
                Side::Left => travel.x > self.thresholds.min_travel,
                Side::Right => travel.x < -self.thresholds.min_travel,
            }
        } else {
            -travel.z > self.thresholds.min_travel
        };

        Some(ArmReading {
            velocity,
            direction: toward_target && steady,
            extension,
            rise: -travel.y,
        })
    }

    fn is_punch(&self, reading: &ArmReading) -> bool {
        reading.velocity > self.thresholds.velocity
            && reading.direction
            && reading.extension > self.thresholds.min_extension
    }

    fn classify(&self, side: Side, stance: Stance, reading: &ArmReading) -> PunchType {
        if reading.rise > self.thresholds.uppercut_rise {
            PunchType::Uppercut
        } else if stance.side_facing {
            if stance.is_lead(side) {
                PunchType::Jab
            } else {
                PunchType::Cross
            }
        } else {
            match side {
                Side::Left => PunchType::Jab,
                Side::Right => PunchType::Cross,
            }
        }
    }
}

impl Default for PunchDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseDetector for PunchDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn detect(&mut self, history: &PoseHistory) -> bool {
        if self.core.cooling_down() {
            self.debounce.clear();
            return self.core.set_active(false);
        }
        if history.len() < 3 {
            return self.core.set_active(false);
        }
        let (Some(current), Some(previous)) = (history.latest(), history.back(1)) else {
            return self.core.set_active(false);
        };

        let stance = self.stance(current);
        let left = self.read_arm(Side::Left, stance, previous, current);
        let right = self.read_arm(Side::Right, stance, previous, current);
        if left.is_none() && right.is_none() {
            self.debounce.clear();
            self.core.set_metric("state", "invalid");
            return self.core.set_active(false);
        }

        let strike = [(Side::Left, left), (Side::Right, right)]
            .into_iter()
            .filter_map(|(side, reading)| reading.map(|r| (side, r)))
            .filter(|(_, r)| self.is_punch(r))
            .max_by(|a, b| a.1.velocity.total_cmp(&b.1.velocity));

        let (confirmed, rising) = self.debounce.update(strike.is_some());
        if let (true, Some((side, reading))) = (rising, strike) {
            let punch = self.classify(side, stance, &reading);
            self.last_punch = Some(punch);
            self.core.commit_rep(Self::NAME);
        }

        let left = left.unwrap_or_default();
        let right = right.unwrap_or_default();
        self.core.set_metric("left_vel", left.velocity);
        self.core.set_metric("right_vel", right.velocity);
        self.core.set_metric("left_dir", left.direction);
        self.core.set_metric("right_dir", right.direction);
        self.core.set_metric("side_facing", stance.side_facing);
        if let Some(punch) = self.last_punch {
            self.core.set_metric("last_punch", punch.name());
        }
        self.core.set_active(confirmed)
    }

    fn reset(&mut self) {
        self.core.reset();
        self.debounce.clear();
        self.last_punch = None;
    }

    fn core(&self) -> &DetectorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DetectorCore {
        &mut self.core
    }
}
