//! Error types for the motion classification engine.
//!
//! Nothing in the per-frame path returns an error: missing landmarks and
//! degenerate geometry are handled inside the detectors. These errors cover
//! setup problems (unknown exercise names, bad configuration values) and
//! malformed buffers arriving from the host.

use thiserror::Error;

/// A specialized `Result` type for detector setup and intake.
pub type DetectorResult<T> = Result<T, DetectorError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DetectorError {
    /// No detector is registered under this name
    #[error("Unknown exercise: '{0}'")]
    UnknownExercise(String),

    /// A detector with this name is already loaded
    #[error("Exercise already loaded: '{0}'")]
    DuplicateExercise(String),

    /// A configuration value is out of range
    #[error("Invalid config field '{field}': {reason}")]
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A flat landmark buffer had the wrong number of values
    #[error("Invalid frame: expected {expected} values, got {actual}")]
    InvalidFrame {
        /// Values required for a full frame
        expected: usize,
        /// Values received
        actual: usize,
    },

    /// Configuration JSON could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl DetectorError {
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl From<DetectorError> for wasm_bindgen::JsValue {
    fn from(err: DetectorError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = DetectorError::UnknownExercise("yoga".into());
        assert_eq!(err.to_string(), "Unknown exercise: 'yoga'");

        let err = DetectorError::invalid_config("frame_rate", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid config field 'frame_rate': must be positive"
        );
    }
}
