//! Detectors module - one rule-based classifier per exercise
//!
//! Re-exports only. All logic in submodules.

mod base;
mod tracking;
mod limb;
mod jumping_jack;
mod arm_circles;
mod squat;
mod situp;
mod lunge;
mod pushup;
mod plank;
mod burpee;
mod kick;

pub use base::{DebugInfo, DetectorConfig, DetectorCore, ExerciseDetector, MetricValue};
pub use tracking::{
    majority_vote, BandCounter, BandPhase, Cooldown, RangeTracker, RingBuffer, MIN_RANGE_DIVISOR, MIN_VOTES,
};
pub use limb::{AxisWeights, Limb, StrikeDebounce, LEFT_ARM, LEFT_LEG, RIGHT_ARM, RIGHT_LEG};
pub use jumping_jack::{JackPhase, JumpingJackDetector, JumpingJackThresholds};
pub use arm_circles::{ActiveArm, ArmCirclesDetector, ArmCirclesThresholds};
pub use squat::{SquatDetector, SquatThresholds};
pub use situp::{SitupDetector, SitupThresholds};
pub use lunge::{LungeDetector, LungeThresholds};
pub use pushup::{PushupDetector, PushupThresholds};
pub use plank::{PlankDetector, PlankThresholds};
pub use burpee::{BurpeeDetector, BurpeePhase, BurpeeThresholds};
pub use kick::{KickDetector, KickThresholds};
