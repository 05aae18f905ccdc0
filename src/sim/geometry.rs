//! Geometry and physics helpers

use glam::Vec2;

/// Ring radii evenly spaced from `min_radius` to `max_radius` inclusive,
/// innermost first. A single ring sits at `min_radius`.
pub fn radius_schedule(count: usize, min_radius: f32, max_radius: f32) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![min_radius],
        _ => {
            let steps = (count - 1) as f32;
            (0..count)
                .map(|i| min_radius + (max_radius - min_radius) * i as f32 / steps)
                .collect()
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n, with `normal` a unit vector.
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_radius_schedule_endpoints() {
        let radii = radius_schedule(10, 100.0, 350.0);
        assert_eq!(radii.len(), 10);
        assert_eq!(radii[0], 100.0);
        assert_eq!(radii[9], 350.0);
        // Evenly spaced
        let step = radii[1] - radii[0];
        for pair in radii.windows(2) {
            assert!((pair[1] - pair[0] - step).abs() < 1e-3);
        }
    }

    #[test]
    fn test_radius_schedule_degenerate_counts() {
        assert!(radius_schedule(0, 100.0, 350.0).is_empty());
        assert_eq!(radius_schedule(1, 100.0, 350.0), vec![100.0]);
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let reflected = reflect(Vec2::new(100.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);

        // Tangential motion is untouched
        let reflected = reflect(Vec2::new(0.0, 3.0), Vec2::new(1.0, 0.0));
        assert_eq!(reflected, Vec2::new(0.0, 3.0));
    }

    proptest! {
        #[test]
        fn prop_radius_schedule_strictly_increasing(
            count in 2usize..64,
            min in 1.0f32..200.0,
            span in 1.0f32..400.0,
        ) {
            let max = min + span;
            let radii = radius_schedule(count, min, max);
            prop_assert_eq!(radii.len(), count);
            prop_assert_eq!(radii[0], min);
            prop_assert!((radii[count - 1] - max).abs() < 1e-3);
            for pair in radii.windows(2) {
                prop_assert!(pair[1] > pair[0]);
            }
        }

        #[test]
        fn prop_reflect_preserves_speed(
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            theta in -std::f32::consts::PI..std::f32::consts::PI,
        ) {
            let v = Vec2::new(vx, vy);
            let n = Vec2::new(theta.cos(), theta.sin());
            let out = reflect(v, n);
            prop_assert!((out.length() - v.length()).abs() < 1e-3 * (1.0 + v.length()));
        }
    }
}
