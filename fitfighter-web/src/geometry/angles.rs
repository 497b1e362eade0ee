//! Joint angle calculation using dot product
//!
//! Calculates the angle at a vertex joint from the two rays
//! vertex→a and vertex→c. Used for knees, hips, elbows and arm spread.

use super::Point;

/// Rays shorter than this (product of magnitudes) are treated as degenerate
const DEGENERATE_EPSILON: f64 = 1e-10;

/// Angle at `b` in degrees, ignoring depth
///
/// Uses dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|)
///
/// Returns angle in degrees in [0, 180]:
/// - 90° = joint bent at a right angle
/// - 180° = joint fully straight
/// - 0° for a zero-length ray
pub fn angle_2d(a: &Point, b: &Point, c: &Point) -> f64 {
    let flat = |p: &Point| Point::new(p.x, p.y, 0.0);
    angle_between(flat(a) - flat(b), flat(c) - flat(b))
}

/// Angle at `b` in degrees using all three axes
pub fn angle_3d(a: &Point, b: &Point, c: &Point) -> f64 {
    angle_between(a - b, c - b)
}

fn angle_between(v1: Point, v2: Point) -> f64 {
    let magnitudes = v1.norm() * v2.norm();

    // Handle degenerate case
    if magnitudes < DEGENERATE_EPSILON {
        return 0.0;
    }

    // Clamp guards acos against overshoot near collinear points
    let cos_angle = (v1.dot(&v2) / magnitudes).clamp(-1.0, 1.0);

    cos_angle.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_straight_limb() {
        let shoulder = Point::new(0.0, 0.0, 0.0);
        let elbow = Point::new(0.5, 0.0, 0.0);
        let wrist = Point::new(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(angle_2d(&shoulder, &elbow, &wrist), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bent_limb() {
        let shoulder = Point::new(0.0, 0.0, 0.0);
        let elbow = Point::new(0.5, 0.0, 0.0);
        let wrist = Point::new(0.5, 0.5, 0.0);
        assert_abs_diff_eq!(angle_2d(&shoulder, &elbow, &wrist), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_2d_ignores_depth() {
        let hip = Point::new(0.5, 0.4, 0.0);
        let knee = Point::new(0.5, 0.6, 0.0);
        let ankle = Point::new(0.5, 0.8, -0.3);
        assert_abs_diff_eq!(angle_2d(&hip, &knee, &ankle), 180.0, epsilon = 1e-9);
        assert!(angle_3d(&hip, &knee, &ankle) < 180.0);
    }

    #[test]
    fn test_3d_right_angle_in_depth() {
        let a = Point::new(0.0, 1.0, 0.0);
        let b = Point::new(0.0, 0.0, 0.0);
        let c = Point::new(0.0, 0.0, 1.0);
        assert_abs_diff_eq!(angle_3d(&a, &b, &c), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_ray_is_zero() {
        let p = Point::new(0.3, 0.3, 0.0);
        let q = Point::new(0.6, 0.1, 0.0);
        assert_eq!(angle_2d(&p, &p, &q), 0.0);
        assert_eq!(angle_3d(&q, &p, &p), 0.0);
    }

    #[test]
    fn test_collinear_overshoot_is_clamped() {
        // Nearly collinear points whose cosine can round past -1.0
        let a = Point::new(0.1, 0.1, 0.1);
        let b = Point::new(0.2, 0.2, 0.2);
        let c = Point::new(0.3, 0.3, 0.3);
        let angle = angle_3d(&a, &b, &c);
        assert!(angle.is_finite());
        assert_abs_diff_eq!(angle, 180.0, epsilon = 1e-5);
    }
}
