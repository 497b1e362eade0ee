//! Manager module - exercise registry and session aggregation
//!
//! Re-exports only. All logic in submodules.

mod registry;
mod snapshot;
mod session;

pub use registry::ExerciseKind;
pub use snapshot::{DetectionSnapshot, SessionStats};
pub use session::{DetectorManager, ManagerState};
