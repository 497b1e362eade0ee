//! Body-region visibility report for guiding the user into frame

use serde::Serialize;

use super::frame::PoseFrame;
use super::landmark::*;

/// Landmarks that make up the upper body region
pub const UPPER_BODY: [usize; 8] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_ELBOW,
    RIGHT_ELBOW,
    LEFT_WRIST,
    RIGHT_WRIST,
    LEFT_HIP,
    RIGHT_HIP,
];

/// Landmarks that make up the lower body region
pub const LOWER_BODY: [usize; 4] = [LEFT_KNEE, RIGHT_KNEE, LEFT_ANKLE, RIGHT_ANKLE];

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VisibilityReport {
    pub full_body_visible: bool,
    pub upper_body_visible: bool,
    pub lower_body_visible: bool,
    /// Names of region landmarks below the threshold, upper body first
    pub missing_parts: Vec<&'static str>,
}

pub fn check_visibility(frame: &PoseFrame, threshold: f64) -> VisibilityReport {
    let missing = |ids: &[usize]| -> Vec<&'static str> {
        ids.iter()
            .filter(|&&id| frame.visible_position(id, threshold).is_none())
            .filter_map(|&id| landmark_name(id))
            .collect()
    };

    let upper = missing(&UPPER_BODY);
    let lower = missing(&LOWER_BODY);
    let upper_body_visible = upper.is_empty();
    let lower_body_visible = lower.is_empty();

    VisibilityReport {
        full_body_visible: upper_body_visible && lower_body_visible,
        upper_body_visible,
        lower_body_visible,
        missing_parts: upper.into_iter().chain(lower).collect(),
    }
}
