//! Directional angles - rotation around a joint and body-line tilt

use super::Point;

/// Angle of the vector origin→point measured from screen-up, in [0, 360)
///
/// Screen y grows downward, so "up" is negative y. Rotating toward +x
/// increases the angle.
pub fn directional_angle(origin: &Point, point: &Point) -> f64 {
    let dx = point.x - origin.x;
    let dy = point.y - origin.y;

    let angle = dx.atan2(-dy).to_degrees();
    if angle < 0.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Fold an angular delta into (-180, 180]
pub fn wrap_degrees(delta: f64) -> f64 {
    if delta > 180.0 {
        delta - 360.0
    } else if delta <= -180.0 {
        delta + 360.0
    } else {
        delta
    }
}

/// Deviation of the shoulder→hip line from the horizontal axis, in [0, 90]
///
/// 0° = body lying flat (plank / push-up), 90° = standing upright.
/// Direction-agnostic: head-left and head-right read the same.
pub fn body_line_angle(shoulder_mid: &Point, hip_mid: &Point) -> f64 {
    let body = hip_mid - shoulder_mid;
    let magnitude = body.norm();
    if magnitude < 1e-10 {
        return 0.0;
    }

    let cos_angle = (body.x / magnitude).clamp(-1.0, 1.0);
    let angle = cos_angle.acos().to_degrees();

    // Fold so the reading doesn't depend on which side the head is
    if angle > 90.0 {
        180.0 - angle
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_directional_quadrants() {
        let shoulder = Point::new(0.5, 0.5, 0.0);
        let up = Point::new(0.5, 0.3, 0.0);
        let right = Point::new(0.7, 0.5, 0.0);
        let down = Point::new(0.5, 0.7, 0.0);
        let left = Point::new(0.3, 0.5, 0.0);

        assert_abs_diff_eq!(directional_angle(&shoulder, &up), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(directional_angle(&shoulder, &right), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(directional_angle(&shoulder, &down), 180.0, epsilon = 1e-9);
        assert_abs_diff_eq!(directional_angle(&shoulder, &left), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(350.0), -10.0);
        assert_eq!(wrap_degrees(-350.0), 10.0);
        assert_eq!(wrap_degrees(45.0), 45.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
    }

    #[test]
    fn test_body_line_horizontal_either_direction() {
        let shoulder = Point::new(0.3, 0.5, 0.0);
        let hip = Point::new(0.6, 0.52, 0.0);
        let head_left = body_line_angle(&shoulder, &hip);
        let head_right = body_line_angle(&hip, &shoulder);
        assert!(head_left < 5.0);
        assert_abs_diff_eq!(head_left, head_right, epsilon = 1e-9);
    }

    #[test]
    fn test_body_line_upright() {
        let shoulder = Point::new(0.5, 0.3, 0.0);
        let hip = Point::new(0.5, 0.6, 0.0);
        assert_abs_diff_eq!(body_line_angle(&shoulder, &hip), 90.0, epsilon = 1e-9);
    }
}
