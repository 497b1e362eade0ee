//! Session store and JS bridge
//!
//! One detector manager lives in thread-local storage (WASM is
//! single-threaded). The host configures it once, then streams frames
//! through `update_landmarks`.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::config::ManagerConfig;
use crate::error::{DetectorError, DetectorResult};
use crate::manager::DetectorManager;

thread_local! {
    static SESSION: RefCell<DetectorManager> = RefCell::new(DetectorManager::default());
}

/// Run `f` against the session's manager
pub(crate) fn with_session<R>(f: impl FnOnce(&mut DetectorManager) -> R) -> R {
    SESSION.with(|cell| f(&mut cell.borrow_mut()))
}

/// Replace the session manager; invalid configs fall back to defaults
///
/// Returns the config error, if any, after the default session is installed.
pub(crate) fn configure(json: &str) -> (Vec<String>, Option<DetectorError>) {
    let (config, error) = match ManagerConfig::from_json(json) {
        Ok(config) => (config, None),
        Err(e) => {
            tracing::warn!(error = %e, "invalid session config, using defaults");
            (ManagerConfig::default(), Some(e))
        }
    };
    let manager = DetectorManager::new(config);
    let problems = manager.load_errors().iter().map(|e| e.to_string()).collect();
    with_session(|session| *session = manager);
    (problems, error)
}

pub(crate) fn snapshot_json() -> DetectorResult<String> {
    with_session(|session| session.snapshot().to_json())
}

pub(crate) fn debug_json() -> DetectorResult<String> {
    with_session(|session| Ok(serde_json::to_string(&session.debug_info())?))
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Start a new session from a JSON config
///
/// Unknown exercise names are skipped with a console warning.
#[wasm_bindgen]
pub fn configure_session(json: &str) -> Result<(), JsValue> {
    let (problems, error) = configure(json);
    for problem in &problems {
        web_sys::console::warn_1(&problem.into());
    }
    if let Some(e) = error {
        return Err(e.into());
    }
    console_log!("session ready: {}", available_exercises().join(", "));
    Ok(())
}

/// Zero every count and clear the history, keeping the loaded exercises
#[wasm_bindgen]
pub fn reset_session() {
    with_session(|session| session.reset_session());
}

/// Current snapshot as JSON
#[wasm_bindgen]
pub fn get_snapshot() -> Result<String, JsValue> {
    Ok(snapshot_json()?)
}

/// Per-detector debug metrics as JSON
#[wasm_bindgen]
pub fn get_debug_info() -> Result<String, JsValue> {
    Ok(debug_json()?)
}

#[wasm_bindgen]
pub fn available_exercises() -> Vec<String> {
    with_session(|session| {
        session
            .available_exercises()
            .into_iter()
            .map(String::from)
            .collect()
    })
}

#[wasm_bindgen]
pub fn add_exercise(name: &str) -> Result<(), JsValue> {
    with_session(|session| session.try_add_exercise(name))?;
    Ok(())
}

/// Returns false if no exercise by that name was loaded
#[wasm_bindgen]
pub fn remove_exercise(name: &str) -> bool {
    with_session(|session| session.remove_detector(name))
}
