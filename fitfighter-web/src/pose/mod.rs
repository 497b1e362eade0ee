//! Pose module - landmark frames and their bounded history
//!
//! Re-exports only. All logic in submodules.

mod frame;
mod history;
mod landmark;
mod visibility;

#[cfg(test)]
pub(crate) mod fixtures;

pub use frame::{PoseFrame, FLAT_STRIDE};
pub use history::{PoseHistory, DEFAULT_HISTORY_SIZE};
pub use landmark::*;
pub use visibility::{check_visibility, VisibilityReport, LOWER_BODY, UPPER_BODY};
