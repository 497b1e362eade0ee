//! Landmark intake from JavaScript
//!
//! The host sends each pose as a flat Float32Array of 33 × 4 values
//! (x, y, z, visibility). Non-finite values mark a landmark as absent.

use wasm_bindgen::prelude::*;

use crate::error::{DetectorError, DetectorResult};
use crate::pose::{check_visibility, PoseFrame, LANDMARK_NAMES};

use super::session::{snapshot_json, with_session};

/// Parse one flat frame and run it through the session
pub(crate) fn ingest(data: &[f32]) -> DetectorResult<String> {
    let frame = PoseFrame::from_flat(data)?;
    with_session(|session| session.process_frame(frame).to_json())
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Process one frame and return the snapshot as JSON
///
/// A buffer of the wrong length is skipped with a console warning and the
/// unchanged snapshot is returned.
#[wasm_bindgen]
pub fn update_landmarks(data: &[f32]) -> Result<String, JsValue> {
    match ingest(data) {
        Ok(json) => Ok(json),
        Err(e) => {
            web_sys::console::warn_1(&e.to_string().into());
            Ok(snapshot_json()?)
        }
    }
}

/// Which body regions are in frame, as JSON
#[wasm_bindgen]
pub fn visibility_report(data: &[f32]) -> Result<String, JsValue> {
    let frame = PoseFrame::from_flat(data)?;
    let threshold = with_session(|session| session.config().confidence_threshold);
    let report = check_visibility(&frame, threshold);
    Ok(serde_json::to_string(&report).map_err(DetectorError::from)?)
}

/// Landmark names in id order
#[wasm_bindgen]
pub fn landmark_names() -> Vec<String> {
    LANDMARK_NAMES.iter().map(|n| n.to_string()).collect()
}
