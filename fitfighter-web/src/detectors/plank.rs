//! Plank detector
//!
//! A plank is held while the body is horizontal, the hips are level with
//! the shoulders and the torso is still. Holds are timed in ticks; a hold
//! that ends after at least `min_hold_secs` counts one rep.

use crate::geometry::{body_line_angle, distance, midpoint, Point};
use crate::pose::*;

use super::base::{DetectorConfig, DetectorCore, ExerciseDetector};

const REQUIRED: [usize; 8] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_ELBOW,
    RIGHT_ELBOW,
    LEFT_HIP,
    RIGHT_HIP,
    LEFT_ANKLE,
    RIGHT_ANKLE,
];

/// Lower bound on body length used as a normalizer
const MIN_BODY_LENGTH: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlankThresholds {
    /// Maximum shoulder-hip line deviation from horizontal (degrees)
    pub body_angle: f64,
    /// Maximum hip-to-shoulder height difference, in body lengths
    pub hip_elevation: f64,
    /// Maximum average per-frame torso movement, in body lengths
    pub stability: f64,
    /// Frame pairs averaged for the stability check
    pub stability_window: usize,
    /// Shortest hold that counts
    pub min_hold_secs: f64,
    /// Ticks per second used to time holds
    pub frame_rate: f64,
}

impl Default for PlankThresholds {
    fn default() -> Self {
        Self {
            body_angle: 15.0,
            hip_elevation: 0.15,
            stability: 0.03,
            stability_window: 5,
            min_hold_secs: 1.0,
            frame_rate: crate::config::DEFAULT_FRAME_RATE,
        }
    }
}

/// Torso reference points of one frame
#[derive(Clone, Copy, Debug)]
struct Torso {
    shoulders: Point,
    hips: Point,
}

pub struct PlankDetector {
    core: DetectorCore,
    thresholds: PlankThresholds,
    ticks: u64,
    /// Tick at which the current hold started
    hold_start: Option<u64>,
    last_duration: f64,
}

impl PlankDetector {
    pub const NAME: &'static str = "plank";

    pub fn new() -> Self {
        Self::with_settings(DetectorConfig::new(0.6, 0), PlankThresholds::default())
    }

    pub fn with_settings(config: DetectorConfig, thresholds: PlankThresholds) -> Self {
        Self {
            core: DetectorCore::new(config),
            thresholds,
            ticks: 0,
            hold_start: None,
            last_duration: 0.0,
        }
    }

    pub fn with_frame_rate(mut self, frame_rate: f64) -> Self {
        self.thresholds.frame_rate = frame_rate;
        self
    }

    pub fn in_plank(&self) -> bool {
        self.hold_start.is_some()
    }

    /// Length of the current hold, or of the last one once it ended
    pub fn duration(&self) -> f64 {
        self.last_duration
    }

    fn elapsed(&self, start: u64) -> f64 {
        (self.ticks - start) as f64 / self.thresholds.frame_rate.max(f64::EPSILON)
    }

    fn torso(&self, frame: &PoseFrame) -> Option<Torso> {
        let [ls, rs, lh, rh] =
            self.core
                .positions(frame, [LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP])?;
        Some(Torso {
            shoulders: midpoint(&ls, &rs),
            hips: midpoint(&lh, &rh),
        })
    }

    /// Average torso movement per frame over the recent window, in body lengths
    fn movement(&self, history: &PoseHistory, body_length: f64) -> f64 {
        let torsos: Vec<Option<Torso>> = history
            .recent(self.thresholds.stability_window + 1)
            .map(|f| self.torso(f))
            .collect();
        let moves: Vec<f64> = torsos
            .windows(2)
            .filter_map(|pair| match pair {
                [Some(a), Some(b)] => Some(
                    (distance(Some(&a.shoulders), Some(&b.shoulders))
                        + distance(Some(&a.hips), Some(&b.hips)))
                        / (2.0 * body_length.max(MIN_BODY_LENGTH)),
                ),
                _ => None,
            })
            .collect();
        if moves.is_empty() {
            0.0
        } else {
            moves.iter().sum::<f64>() / moves.len() as f64
        }
    }

    /// End the current hold, counting it when long enough
    fn finish_hold(&mut self, start: u64) {
        self.last_duration = self.elapsed(start);
        self.hold_start = None;
        if self.last_duration >= self.thresholds.min_hold_secs {
            self.core.commit_rep(Self::NAME);
            self.core.set_metric("state", "plank_completed");
        } else {
            self.core.set_metric("state", "plank_too_short");
        }
    }
}

impl Default for PlankDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseDetector for PlankDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn detect(&mut self, history: &PoseHistory) -> bool {
        if history.len() < 2 {
            return self.core.set_active(false);
        }
        self.ticks += 1;

        let parts = history
            .latest()
            .filter(|f| self.core.landmarks_visible(f, &REQUIRED))
            .and_then(|f| {
                Some((
                    self.torso(f)?,
                    self.core.positions(f, [LEFT_ANKLE, RIGHT_ANKLE])?,
                ))
            });
        let Some((torso, [la, ra])) = parts else {
            // Losing sight of the body discards the hold
            self.hold_start = None;
            self.core.set_metric("state", "invalid");
            return self.core.set_active(false);
        };

        let body_length = distance(Some(&torso.shoulders), Some(&midpoint(&la, &ra)));
        let body_angle = body_line_angle(&torso.shoulders, &torso.hips);
        let hip_elevation =
            (torso.hips.y - torso.shoulders.y).abs() / body_length.max(MIN_BODY_LENGTH);
        let movement = self.movement(history, body_length);

        let t = self.thresholds;
        let stable = movement < t.stability;
        let is_plank = body_angle < t.body_angle && hip_elevation < t.hip_elevation && stable;

        match (is_plank, self.hold_start) {
            (true, None) => {
                self.hold_start = Some(self.ticks);
                self.last_duration = 0.0;
                self.core.set_metric("state", "plank_started");
            }
            (true, Some(start)) => {
                self.last_duration = self.elapsed(start);
                self.core.set_metric("state", "plank_in_progress");
            }
            (false, Some(start)) => self.finish_hold(start),
            (false, None) => self.core.set_metric("state", "not_in_plank"),
        }

        self.core.set_metric("body_angle", body_angle);
        self.core.set_metric("hip_elevation", hip_elevation);
        self.core.set_metric("is_stable", stable);
        self.core.set_metric("duration", self.last_duration);
        self.core.set_active(self.hold_start.is_some())
    }

    fn reset(&mut self) {
        self.core.reset();
        self.ticks = 0;
        self.hold_start = None;
        self.last_duration = 0.0;
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
    use crate::pose::fixtures::{self, plank, standing, Feed};
    use approx::assert_relative_eq;

    fn hold_then_stand(detector: &mut PlankDetector, hold_frames: usize) {
        let mut feed = Feed::new();
        feed.push(&plank(0.0));
        for _ in 0..hold_frames {
            assert!(detector.detect(feed.push(&plank(0.0))));
        }
        assert!(!detector.detect(feed.push(&standing())));
    }

    #[test]
    fn test_short_hold_discarded() {
        let mut detector = PlankDetector::new();
        hold_then_stand(&mut detector, 15);
        assert_eq!(detector.rep_count(), 0);
        assert_relative_eq!(detector.duration(), 0.5);
    }

    #[test]
    fn test_long_hold_counts_once_at_end() {
        let mut detector = PlankDetector::new();
        let mut feed = Feed::new();
        feed.push(&plank(0.0));
        for _ in 0..45 {
            detector.detect(feed.push(&plank(0.0)));
        }
        assert_eq!(detector.rep_count(), 0, "no count while still holding");
        assert!(detector.in_plank());

        detector.detect(feed.push(&standing()));
        assert_eq!(detector.rep_count(), 1);
        assert_relative_eq!(detector.duration(), 1.5);
        assert!(!detector.in_plank());
    }

    #[test]
    fn test_frame_rate_scales_duration() {
        let mut detector = PlankDetector::new().with_frame_rate(10.0);
        hold_then_stand(&mut detector, 15);
        assert_eq!(detector.rep_count(), 1);
    }

    #[test]
    fn test_jitter_is_not_a_plank() {
        let mut detector = PlankDetector::new();
        let mut feed = Feed::new();
        let nudged = fixtures::shifted(&plank(0.0), 0.03, 0.0);
        for i in 0..12 {
            let frame = if i % 2 == 0 { plank(0.0) } else { nudged.clone() };
            assert!(!detector.detect(feed.push(&frame)));
        }
    }

    #[test]
    fn test_sagging_hips_rejected() {
        let mut detector = PlankDetector::new();
        let mut sag = plank(0.0);
        for id in [LEFT_HIP, RIGHT_HIP] {
            if let Some(lm) = sag.get(id).copied() {
                sag.insert(id, Landmark { y: lm.y + 0.1, ..lm });
            }
        }
        let mut feed = Feed::new();
        for _ in 0..5 {
            assert!(!detector.detect(feed.push(&sag)));
        }
    }

    #[test]
    fn test_lost_landmarks_discard_hold() {
        let mut detector = PlankDetector::new();
        let mut feed = Feed::new();
        feed.push(&plank(0.0));
        for _ in 0..40 {
            detector.detect(feed.push(&plank(0.0)));
        }
        let hidden = fixtures::with_confidence(&plank(0.0), &[LEFT_ANKLE], 0.1);
        assert!(!detector.detect(feed.push(&hidden)));
        detector.detect(feed.push(&standing()));
        assert_eq!(detector.rep_count(), 0);
    }

    #[test]
    fn test_reset() {
        let mut detector = PlankDetector::new();
        hold_then_stand(&mut detector, 45);
        detector.reset();
        assert_eq!(detector.rep_count(), 0);
        assert!(!detector.is_active());
        assert!(!detector.in_plank());
        assert_eq!(detector.duration(), 0.0);
    }
}
