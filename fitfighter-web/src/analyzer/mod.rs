//! Analyzer module - alternate single-purpose pipeline
//!
//! Re-exports only. All logic in submodules.

mod punch;
mod hip_range_squat;
mod steady_plank;
mod pipeline;

pub use punch::{PunchDetector, PunchThresholds, PunchType, Side, Stance};
pub use hip_range_squat::{HipRangeSquatDetector, HipRangeThresholds};
pub use steady_plank::{SteadyPlankDetector, SteadyPlankThresholds};
pub use pipeline::MotionAnalyzer;
