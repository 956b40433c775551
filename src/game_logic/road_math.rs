// Small numeric helpers shared by the track builder, the simulation and the renderer.

use std::f32::consts::PI;

/// Advance `start` by `increment`, wrapping into `[0, max)`.
///
/// A non-positive `max` has no valid range to wrap into, so it collapses to 0
/// instead of producing NaN.
pub fn increase(start: f32, increment: f32, max: f32) -> f32 {
    if max <= 0.0 || !max.is_finite() {
        return 0.0;
    }
    let result = (start + increment).rem_euclid(max);
    // rem_euclid can round up to `max` for tiny negative inputs
    if result >= max { 0.0 } else { result }
}

/// Fraction of the way through the current `total`-sized bucket.
pub fn percent_remaining(n: f32, total: f32) -> f32 {
    if total <= 0.0 {
        return 0.0;
    }
    n.rem_euclid(total) / total
}

pub fn accelerate(value: f32, accel: f32, dt: f32) -> f32 {
    value + accel * dt
}

pub fn interpolate(a: f32, b: f32, percent: f32) -> f32 {
    a + (b - a) * percent
}

pub fn ease_in(a: f32, b: f32, percent: f32) -> f32 {
    a + (b - a) * percent.powi(2)
}

pub fn ease_in_out(a: f32, b: f32, percent: f32) -> f32 {
    a + (b - a) * (0.5 - (percent * PI).cos() / 2.0)
}

/// 1 at the camera, falling towards 0 at the draw horizon.
pub fn exponential_fog(distance: f32, density: f32) -> f32 {
    1.0 / (distance * distance * density).exp()
}

/// Whether two centred spans overlap once both are scaled by `percent`.
pub fn overlap(x1: f32, w1: f32, x2: f32, w2: f32, percent: f32) -> bool {
    let half = percent / 2.0;
    let min1 = x1 - w1 * half;
    let max1 = x1 + w1 * half;
    let min2 = x2 - w2 * half;
    let max2 = x2 + w2 * half;
    !(max1 < min2 || min1 > max2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_wraps_both_directions() {
        assert_eq!(increase(4900.0, 200.0, 5000.0), 100.0);
        assert_eq!(increase(100.0, -300.0, 5000.0), 4800.0);
        assert_eq!(increase(0.0, 5000.0, 5000.0), 0.0);
    }

    #[test]
    fn test_increase_guards_zero_length() {
        assert_eq!(increase(10.0, 10.0, 0.0), 0.0);
        assert!(increase(10.0, 10.0, f32::NAN).is_finite());
    }

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_in(0.0, 4.0, 0.0), 0.0);
        assert_eq!(ease_in(0.0, 4.0, 0.5), 1.0);
        assert!((ease_in_out(0.0, 10.0, 0.5) - 5.0).abs() < 1e-5);
        assert!((ease_in_out(0.0, 10.0, 1.0) - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_fog_is_one_at_camera() {
        assert_eq!(exponential_fog(0.0, 5.0), 1.0);
        assert!(exponential_fog(1.0, 5.0) < 0.01);
    }

    #[test]
    fn test_overlap_tolerance() {
        // touching at full width, apart once shrunk to 80%
        assert!(overlap(0.0, 1.0, 1.0, 1.0, 1.0));
        assert!(!overlap(0.0, 1.0, 1.0, 1.0, 0.8));
    }
}
