//! FitFighter Web - exercise rep counting from pose landmarks
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - Console logging shared by the bridge
//! - The wasm_bindgen start hook

use wasm_bindgen::prelude::*;

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => ($crate::log(&format_args!($($t)*).to_string()))
}

pub mod analyzer;
pub mod config;
pub mod detectors;
pub mod error;
pub mod geometry;
pub mod manager;
pub mod pose;

mod bridge;

// Re-export wasm_bindgen functions for JS access
pub use bridge::*;

pub use config::ManagerConfig;
pub use error::{DetectorError, DetectorResult};
pub use manager::{DetectionSnapshot, DetectorManager, ExerciseKind};
pub use pose::{Landmark, PoseFrame, PoseHistory};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
