//! Pose frame - every landmark observed at one camera tick

use crate::error::{DetectorError, DetectorResult};
use crate::geometry::Point;

use super::landmark::{Landmark, LANDMARK_COUNT};

/// Values per landmark in a flat buffer: x, y, z, visibility
pub const FLAT_STRIDE: usize = 4;

/// Mapping from landmark id to landmark for one tick
///
/// Ids may be missing; a missing id reads as "not visible" with
/// confidence 0. Detectors never assume a frame is complete.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseFrame {
    landmarks: [Option<Landmark>; LANDMARK_COUNT],
}

impl Default for PoseFrame {
    fn default() -> Self {
        Self {
            landmarks: [None; LANDMARK_COUNT],
        }
    }
}

impl PoseFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a flat buffer of 33 × (x, y, z, visibility)
    ///
    /// A landmark with any non-finite value is left out of the frame.
    pub fn from_flat(data: &[f32]) -> DetectorResult<Self> {
        let expected = LANDMARK_COUNT * FLAT_STRIDE;
        if data.len() != expected {
            return Err(DetectorError::InvalidFrame {
                expected,
                actual: data.len(),
            });
        }

        let mut frame = Self::new();
        for (id, chunk) in data.chunks_exact(FLAT_STRIDE).enumerate() {
            if chunk.iter().all(|v| v.is_finite()) {
                frame.insert(
                    id,
                    Landmark::new(
                        f64::from(chunk[0]),
                        f64::from(chunk[1]),
                        f64::from(chunk[2]),
                        f64::from(chunk[3]),
                    ),
                );
            }
        }
        Ok(frame)
    }

    /// Store a landmark; ids outside 0..33 are ignored and return false
    pub fn insert(&mut self, id: usize, landmark: Landmark) -> bool {
        match self.landmarks.get_mut(id) {
            Some(slot) => {
                *slot = Some(landmark);
                true
            }
            None => false,
        }
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, id: usize, landmark: Landmark) -> Self {
        self.insert(id, landmark);
        self
    }

    pub fn remove(&mut self, id: usize) -> Option<Landmark> {
        self.landmarks.get_mut(id).and_then(Option::take)
    }

    pub fn get(&self, id: usize) -> Option<&Landmark> {
        self.landmarks.get(id).and_then(Option::as_ref)
    }

    /// Confidence of a landmark, 0 when absent
    pub fn visibility(&self, id: usize) -> f64 {
        self.get(id).map_or(0.0, |lm| lm.visibility)
    }

    /// Position of a landmark if present with confidence ≥ `threshold`
    pub fn visible_position(&self, id: usize, threshold: f64) -> Option<Point> {
        self.get(id)
            .filter(|lm| lm.is_visible(threshold))
            .map(Landmark::position)
    }

    /// True iff every id is present with confidence ≥ `threshold`
    pub fn all_visible(&self, ids: &[usize], threshold: f64) -> bool {
        ids.iter()
            .all(|&id| self.get(id).is_some_and(|lm| lm.is_visible(threshold)))
    }

    /// Number of landmarks present
    pub fn len(&self) -> usize {
        self.landmarks.iter().filter(|lm| lm.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.iter().all(Option::is_none)
    }

    /// Present landmarks with their ids, in id order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Landmark)> {
        self.landmarks
            .iter()
            .enumerate()
            .filter_map(|(id, lm)| lm.as_ref().map(|lm| (id, lm)))
    }
}

impl FromIterator<(usize, Landmark)> for PoseFrame {
    fn from_iter<I: IntoIterator<Item = (usize, Landmark)>>(iter: I) -> Self {
        let mut frame = Self::new();
        for (id, landmark) in iter {
            frame.insert(id, landmark);
        }
        frame
    }
}
