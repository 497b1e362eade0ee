//! Synthetic pose builders shared by the unit tests

use super::frame::PoseFrame;
use super::history::{PoseHistory, DEFAULT_HISTORY_SIZE};
use super::landmark::*;

/// Frame from `(id, x, y, z)` tuples, every landmark fully visible
pub(crate) fn frame_from(points: &[(usize, f64, f64, f64)]) -> PoseFrame {
    points
        .iter()
        .map(|&(id, x, y, z)| (id, Landmark::new(x, y, z, 1.0)))
        .collect()
}

/// Copy of `frame` with the given landmarks' confidence overwritten
pub(crate) fn with_confidence(frame: &PoseFrame, ids: &[usize], visibility: f64) -> PoseFrame {
    let mut out = frame.clone();
    for &id in ids {
        if let Some(lm) = frame.get(id) {
            out.insert(id, Landmark { visibility, ..*lm });
        }
    }
    out
}

/// Copy of `frame` moved by `(dx, dy)`
pub(crate) fn shifted(frame: &PoseFrame, dx: f64, dy: f64) -> PoseFrame {
    frame
        .iter()
        .map(|(id, lm)| (id, Landmark::new(lm.x + dx, lm.y + dy, lm.z, lm.visibility)))
        .collect()
}

pub(crate) fn history_of(frames: &[PoseFrame]) -> PoseHistory {
    PoseHistory::from_frames(DEFAULT_HISTORY_SIZE, frames.iter().cloned())
}

/// Feeds frames one at a time through a sliding history, the way the manager does
pub(crate) struct Feed {
    pub history: PoseHistory,
}

impl Feed {
    pub fn new() -> Self {
        Self {
            history: PoseHistory::new(),
        }
    }

    pub fn push(&mut self, frame: &PoseFrame) -> &PoseHistory {
        self.history.push(frame.clone());
        &self.history
    }
}

/// Upright, arms hanging, feet under the hips
pub(crate) fn standing() -> PoseFrame {
    frame_from(&[
        (NOSE, 0.5, 0.15, 0.0),
        (LEFT_SHOULDER, 0.4, 0.3, 0.0),
        (RIGHT_SHOULDER, 0.6, 0.3, 0.0),
        (LEFT_ELBOW, 0.35, 0.45, 0.0),
        (RIGHT_ELBOW, 0.65, 0.45, 0.0),
        (LEFT_WRIST, 0.35, 0.6, 0.0),
        (RIGHT_WRIST, 0.65, 0.6, 0.0),
        (LEFT_HIP, 0.45, 0.6, 0.0),
        (RIGHT_HIP, 0.55, 0.6, 0.0),
        (LEFT_KNEE, 0.45, 0.75, 0.0),
        (RIGHT_KNEE, 0.55, 0.75, 0.0),
        (LEFT_ANKLE, 0.45, 0.9, 0.0),
        (RIGHT_ANKLE, 0.55, 0.9, 0.0),
        (LEFT_HEEL, 0.45, 0.92, 0.0),
        (RIGHT_HEEL, 0.55, 0.92, 0.0),
        (LEFT_FOOT_INDEX, 0.45, 0.95, -0.05),
        (RIGHT_FOOT_INDEX, 0.55, 0.95, -0.05),
    ])
}

/// Jumping-jack open position: arms raised overhead, feet wide
pub(crate) fn jack_open() -> PoseFrame {
    frame_from(&[
        (NOSE, 0.5, 0.15, 0.0),
        (LEFT_SHOULDER, 0.4, 0.3, 0.0),
        (RIGHT_SHOULDER, 0.6, 0.3, 0.0),
        (LEFT_ELBOW, 0.3, 0.2, 0.0),
        (RIGHT_ELBOW, 0.7, 0.2, 0.0),
        (LEFT_WRIST, 0.2, 0.1, 0.0),
        (RIGHT_WRIST, 0.8, 0.1, 0.0),
        (LEFT_HIP, 0.45, 0.6, 0.0),
        (RIGHT_HIP, 0.55, 0.6, 0.0),
        (LEFT_KNEE, 0.35, 0.75, 0.0),
        (RIGHT_KNEE, 0.65, 0.75, 0.0),
        (LEFT_ANKLE, 0.25, 0.9, 0.0),
        (RIGHT_ANKLE, 0.75, 0.9, 0.0),
    ])
}

/// Side-on squat; `depth` 0 is upright, 1 is a deep squat (knees ≈ 54°, hips ≈ 45°)
///
/// Hips drop 0.2 and travel back while the knees move forward.
pub(crate) fn squat(depth: f64) -> PoseFrame {
    let mut points = Vec::new();
    for (side, base) in [(0usize, 0.45), (1usize, 0.55)] {
        let pick = |left: usize, right: usize| if side == 0 { left } else { right };
        points.extend([
            (pick(LEFT_SHOULDER, RIGHT_SHOULDER), base + 0.05 * depth, 0.3 + 0.2 * depth, 0.0),
            (pick(LEFT_ELBOW, RIGHT_ELBOW), base + 0.1 * depth, 0.42 + 0.2 * depth, 0.0),
            (pick(LEFT_WRIST, RIGHT_WRIST), base + 0.15 * depth, 0.54 + 0.2 * depth, 0.0),
            (pick(LEFT_HIP, RIGHT_HIP), base - 0.15 * depth, 0.55 + 0.2 * depth, 0.0),
            (pick(LEFT_KNEE, RIGHT_KNEE), base + 0.1 * depth, 0.72, 0.0),
            (pick(LEFT_ANKLE, RIGHT_ANKLE), base, 0.9, 0.0),
        ]);
    }
    points.push((NOSE, 0.5 + 0.05 * depth, 0.15 + 0.2 * depth, 0.0));
    frame_from(&points)
}

/// Side-on horizontal body, head at the left, `drop` lowers the shoulders
///
/// With `drop` 0 the arms are straight under the shoulders (elbow 180°);
/// with `drop` 1 the shoulders sit 0.2 lower and the elbows bend to ≈ 39°.
pub(crate) fn plank(drop: f64) -> PoseFrame {
    let shoulder_y = 0.5 + 0.2 * drop;
    let elbow = elbow_for(shoulder_y);
    let mut points = Vec::new();
    for (shoulder, elbow_id, wrist, hip, knee, ankle, z) in [
        (LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST, LEFT_HIP, LEFT_KNEE, LEFT_ANKLE, -0.02),
        (RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST, RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE, 0.02),
    ] {
        points.extend([
            (shoulder, 0.3, shoulder_y, z),
            (elbow_id, elbow.0, elbow.1, z),
            (wrist, 0.3, PLANK_WRIST_Y, z),
            (hip, 0.55, 0.5 + 0.1 * drop, z),
            (knee, 0.68, 0.5 + 0.05 * drop, z),
            (ankle, 0.8, 0.5, z),
        ]);
    }
    points.push((NOSE, 0.22, shoulder_y, 0.0));
    frame_from(&points)
}

const PLANK_WRIST_Y: f64 = 0.8;

/// Elbow between shoulder and wrist with both arm segments 0.15 long
fn elbow_for(shoulder_y: f64) -> (f64, f64) {
    let half = (PLANK_WRIST_Y - shoulder_y) / 2.0;
    let upper = 0.15;
    let offset = (upper * upper - half * half).max(0.0).sqrt();
    (0.3 - offset, shoulder_y + half)
}
