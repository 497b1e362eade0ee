//! Euclidean distance and midpoints

use super::Point;

/// 3D Euclidean distance
///
/// Returns `f64::INFINITY` when either point is absent, so callers can
/// compare against thresholds without a separate presence check.
pub fn distance(p: Option<&Point>, q: Option<&Point>) -> f64 {
    match (p, q) {
        (Some(p), Some(q)) => (p - q).norm(),
        _ => f64::INFINITY,
    }
}

/// Point halfway between `a` and `b`
pub fn midpoint(a: &Point, b: &Point) -> Point {
    (a + b) * 0.5
}
