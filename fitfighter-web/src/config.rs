//! Session configuration
//!
//! Deserialized from the host's JSON; every field is optional and falls
//! back to the defaults below.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, DetectorResult};
use crate::pose::DEFAULT_HISTORY_SIZE;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.6;
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Frames kept in the shared pose history
    pub history_size: usize,
    /// Minimum landmark confidence for every detector
    pub confidence_threshold: f64,
    /// Camera tick rate, used to turn frame counts into hold durations
    pub frame_rate: f64,
    /// Exercise kinds to load; `None` loads the default set
    pub exercises: Option<Vec<String>>,
    /// Per-exercise confidence thresholds, keyed by exercise name
    pub confidence_overrides: BTreeMap<String, f64>,
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self {
            history_size: DEFAULT_HISTORY_SIZE,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            frame_rate: DEFAULT_FRAME_RATE,
            exercises: None,
            confidence_overrides: BTreeMap::new(),
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> DetectorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DetectorResult<()> {
        if self.history_size < 2 {
            return Err(DetectorError::invalid_config(
                "history_size",
                format!("{} is below the 2-frame minimum", self.history_size),
            ));
        }
        check_confidence("confidence_threshold", self.confidence_threshold)?;
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(DetectorError::invalid_config(
                "frame_rate",
                format!("{} is not a positive rate", self.frame_rate),
            ));
        }
        for value in self.confidence_overrides.values() {
            check_confidence("confidence_overrides", *value)?;
        }
        Ok(())
    }

    /// Confidence threshold for one exercise, honoring overrides
    pub fn confidence_for(&self, exercise: &str) -> f64 {
        self.confidence_overrides
            .get(exercise)
            .copied()
            .unwrap_or(self.confidence_threshold)
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn check_confidence(field: &'static str, value: f64) -> DetectorResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DetectorError::invalid_config(
            field,
            format!("{value} is outside [0, 1]"),
        ))
    }
}
