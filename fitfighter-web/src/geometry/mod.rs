//! Geometry module - pure landmark math
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod direction;
mod distance;

pub use angles::{angle_2d, angle_3d};
pub use direction::{body_line_angle, directional_angle, wrap_degrees};
pub use distance::{distance, midpoint};

/// Point type shared by every geometric helper (normalized x, y, z)
pub type Point = nalgebra::Vector3<f64>;
