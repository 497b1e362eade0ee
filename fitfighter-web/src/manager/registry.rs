//! Compile-time registry of exercise kinds

use std::fmt;
use std::str::FromStr;

use crate::analyzer::{HipRangeSquatDetector, PunchDetector, SteadyPlankDetector};
use crate::detectors::*;
use crate::error::DetectorError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExerciseKind {
    JumpingJack,
    ArmCircles,
    Squat,
    Situp,
    Lunge,
    Pushup,
    Plank,
    Burpee,
    Kick,
    Punch,
    HipRangeSquat,
    SteadyPlank,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 12] = [
        ExerciseKind::JumpingJack,
        ExerciseKind::ArmCircles,
        ExerciseKind::Squat,
        ExerciseKind::Situp,
        ExerciseKind::Lunge,
        ExerciseKind::Pushup,
        ExerciseKind::Plank,
        ExerciseKind::Burpee,
        ExerciseKind::Kick,
        ExerciseKind::Punch,
        ExerciseKind::HipRangeSquat,
        ExerciseKind::SteadyPlank,
    ];

    /// Loaded when the config names no exercises
    pub const DEFAULT_SET: [ExerciseKind; 9] = [
        ExerciseKind::JumpingJack,
        ExerciseKind::ArmCircles,
        ExerciseKind::Squat,
        ExerciseKind::Situp,
        ExerciseKind::Lunge,
        ExerciseKind::Pushup,
        ExerciseKind::Plank,
        ExerciseKind::Burpee,
        ExerciseKind::Kick,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExerciseKind::JumpingJack => JumpingJackDetector::NAME,
            ExerciseKind::ArmCircles => ArmCirclesDetector::NAME,
            ExerciseKind::Squat => SquatDetector::NAME,
            ExerciseKind::Situp => SitupDetector::NAME,
            ExerciseKind::Lunge => LungeDetector::NAME,
            ExerciseKind::Pushup => PushupDetector::NAME,
            ExerciseKind::Plank => PlankDetector::NAME,
            ExerciseKind::Burpee => BurpeeDetector::NAME,
            ExerciseKind::Kick => KickDetector::NAME,
            ExerciseKind::Punch => PunchDetector::NAME,
            ExerciseKind::HipRangeSquat => HipRangeSquatDetector::NAME,
            ExerciseKind::SteadyPlank => SteadyPlankDetector::NAME,
        }
    }

    /// Fresh detector with the given confidence gate
    ///
    /// `frame_rate` only matters to timed holds.
    pub fn build(&self, confidence: f64, frame_rate: f64) -> Box<dyn ExerciseDetector> {
        let mut detector: Box<dyn ExerciseDetector> = match self {
            ExerciseKind::JumpingJack => Box::new(JumpingJackDetector::new()),
            ExerciseKind::ArmCircles => Box::new(ArmCirclesDetector::new()),
            ExerciseKind::Squat => Box::new(SquatDetector::new()),
            ExerciseKind::Situp => Box::new(SitupDetector::new()),
            ExerciseKind::Lunge => Box::new(LungeDetector::new()),
            ExerciseKind::Pushup => Box::new(PushupDetector::new()),
            ExerciseKind::Plank => Box::new(PlankDetector::new().with_frame_rate(frame_rate)),
            ExerciseKind::Burpee => Box::new(BurpeeDetector::new()),
            ExerciseKind::Kick => Box::new(KickDetector::new()),
            ExerciseKind::Punch => Box::new(PunchDetector::new()),
            ExerciseKind::HipRangeSquat => Box::new(HipRangeSquatDetector::new()),
            ExerciseKind::SteadyPlank => Box::new(SteadyPlankDetector::new()),
        };
        detector.set_confidence_threshold(confidence);
        detector
    }
}

impl FromStr for ExerciseKind {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| DetectorError::UnknownExercise(s.to_string()))
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
