//! Heading/pitch helpers. All angles are in degrees.

use crate::types::Vec3;

/// Wrap an angle into the half-open range (-180, 180]
pub fn wrap_degrees(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a <= -180.0 {
        a += 360.0;
    } else if a > 180.0 {
        a -= 360.0;
    }
    a
}

/// Unit forward vector on the ground plane for a heading.
///
/// Heading 0 faces -Z; positive headings turn left (toward -X).
pub fn heading_forward(heading: f32) -> Vec3 {
    let h = heading.to_radians();
    Vec3::new(-h.sin(), 0.0, -h.cos())
}

/// Unit right vector on the ground plane for a heading (forward x up)
pub fn heading_right(heading: f32) -> Vec3 {
    let h = heading.to_radians();
    Vec3::new(h.cos(), 0.0, -h.sin())
}

/// Move `current` toward `target` by at most `max_delta`
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    if current < target {
        (current + max_delta).min(target)
    } else {
        (current - max_delta).max(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(-180.0), 180.0);
        assert!((wrap_degrees(270.0) - -90.0).abs() < 1e-4);
        assert!((wrap_degrees(-450.0) - -90.0).abs() < 1e-4);
        assert!((wrap_degrees(725.0) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_heading_vectors() {
        let f = heading_forward(0.0);
        assert!((f.z + 1.0).abs() < 1e-6);

        // Turning left by 90 degrees faces -X
        let f = heading_forward(90.0);
        assert!((f.x + 1.0).abs() < 1e-6);
        assert!(f.z.abs() < 1e-6);

        let r = heading_right(0.0);
        assert!((r.x - 1.0).abs() < 1e-6);

        // right == forward x up for any heading
        let h = 37.0;
        let cross = heading_forward(h).cross(&Vec3::UP);
        let right = heading_right(h);
        assert!((cross - right).length() < 1e-5);
    }

    #[test]
    fn test_approach() {
        assert_eq!(approach(0.0, 1.0, 0.25), 0.25);
        assert_eq!(approach(0.9, 1.0, 0.25), 1.0);
        assert_eq!(approach(0.1, 0.0, 0.25), 0.0);
    }
}
