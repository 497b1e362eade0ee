//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod landmarks;
mod session;

pub use landmarks::{landmark_names, update_landmarks, visibility_report};
pub use session::{
    add_exercise, available_exercises, configure_session, get_debug_info, get_snapshot, remove_exercise,
    reset_session,
};
