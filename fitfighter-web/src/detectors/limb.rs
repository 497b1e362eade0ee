//! Limb kinematics - extension angle and relative end velocity
//!
//! A limb is three chained landmarks (root, joint, end): hip-knee-ankle or
//! shoulder-elbow-wrist. Velocity is measured on the end joint relative to
//! the middle joint so whole-body drift does not register as a strike.

use crate::geometry::{angle_3d, Point};
use crate::pose::*;

/// Three chained landmarks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limb {
    pub root: usize,
    pub joint: usize,
    pub end: usize,
}

pub const LEFT_LEG: Limb = Limb::new(LEFT_HIP, LEFT_KNEE, LEFT_ANKLE);
pub const RIGHT_LEG: Limb = Limb::new(RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE);
pub const LEFT_ARM: Limb = Limb::new(LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST);
pub const RIGHT_ARM: Limb = Limb::new(RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST);

impl Limb {
    pub const fn new(root: usize, joint: usize, end: usize) -> Self {
        Self { root, joint, end }
    }

    pub fn ids(&self) -> [usize; 3] {
        [self.root, self.joint, self.end]
    }

    /// 3D angle at the middle joint, `None` if any landmark fails the gate
    pub fn extension(&self, frame: &PoseFrame, threshold: f64) -> Option<f64> {
        let root = frame.visible_position(self.root, threshold)?;
        let joint = frame.visible_position(self.joint, threshold)?;
        let end = frame.visible_position(self.end, threshold)?;
        Some(angle_3d(&root, &joint, &end))
    }

    /// End position relative to the middle joint
    pub fn relative_end(&self, frame: &PoseFrame, threshold: f64) -> Option<Point> {
        let joint = frame.visible_position(self.joint, threshold)?;
        let end = frame.visible_position(self.end, threshold)?;
        Some(end - joint)
    }

    /// Weighted displacement of the relative end between two frames
    ///
    /// Returns 0 when either frame is missing the joint or the end.
    pub fn end_velocity(
        &self,
        previous: &PoseFrame,
        current: &PoseFrame,
        threshold: f64,
        weights: AxisWeights,
    ) -> f64 {
        match (
            self.relative_end(previous, threshold),
            self.relative_end(current, threshold),
        ) {
            (Some(prev), Some(cur)) => weights.norm(&(cur - prev)),
            _ => 0.0,
        }
    }
}

/// Per-axis weights applied to squared displacement components
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisWeights {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AxisWeights {
    pub const UNIFORM: AxisWeights = AxisWeights::new(1.0, 1.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// `sqrt(wx·dx² + wy·dy² + wz·dz²)`
    pub fn norm(&self, d: &Point) -> f64 {
        (self.x * d.x * d.x + self.y * d.y * d.y + self.z * d.z * d.z).sqrt()
    }
}

impl Default for AxisWeights {
    fn default() -> Self {
        Self::UNIFORM
    }
}

/// Consecutive-frame debounce with rising-edge reporting
#[derive(Clone, Copy, Debug, Default)]
pub struct StrikeDebounce {
    required: u32,
    consecutive: u32,
    confirmed: bool,
}

impl StrikeDebounce {
    pub fn new(required: u32) -> Self {
        Self {
            required: required.max(1),
            consecutive: 0,
            confirmed: false,
        }
    }

    /// Feed this frame's raw flag; returns `(confirmed, rising_edge)`
    pub fn update(&mut self, flagged: bool) -> (bool, bool) {
        self.consecutive = if flagged { self.consecutive + 1 } else { 0 };
        let confirmed = self.consecutive >= self.required;
        let rising = confirmed && !self.confirmed;
        self.confirmed = confirmed;
        (confirmed, rising)
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn clear(&mut self) {
        self.consecutive = 0;
        self.confirmed = false;
    }
}
