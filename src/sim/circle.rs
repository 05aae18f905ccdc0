//! Rotating rings with a gap
//!
//! A ring is a thin circle around the arena center, missing a fixed angular
//! slice (the gap). Touching the solid part bounces a ball; touching the gap
//! lets it through, scores a point, and breaks the ring for good.

use super::geometry::reflect;
use super::state::Arena;
use super::{Ball, CueSink};
use crate::{cartesian_to_polar, wrap_angle};

/// The angular slice of a ring with no wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    /// Start angle (radians, in [0, 2π))
    pub start: f32,
    /// End angle (radians, in [0, 2π))
    pub end: f32,
}

impl Gap {
    /// Gap trailing a ring's rotation angle by `size` radians
    pub fn trailing(angle: f32, size: f32) -> Self {
        Self {
            start: wrap_angle(angle - size),
            end: wrap_angle(angle),
        }
    }

    /// Strict `start < theta < end` test used for collisions.
    ///
    /// No wraparound handling: when the gap straddles angle 0 (`start > end`)
    /// nothing passes, and angles from `atan2` are in (-π, π] so the upper
    /// half of the arena never matches. Kept as is; see DESIGN.md.
    pub fn admits(&self, theta: f32) -> bool {
        self.start < theta && theta < self.end
    }

    /// Angular size of the drawn gap (handles wraparound)
    pub fn span(&self) -> f32 {
        wrap_angle(self.end - self.start)
    }

    /// Whether `theta` lies in the gap as drawn (wraparound-aware)
    pub fn contains_drawn(&self, theta: f32) -> bool {
        let offset = wrap_angle(theta - self.start);
        offset > 0.0 && offset < self.span()
    }
}

/// A ring obstacle
#[derive(Debug, Clone)]
pub struct Circle {
    pub radius: f32,
    /// Rotation angle (radians, in [0, 2π))
    pub angle: f32,
    pub gap: Gap,
    /// Set once a ball escapes through the gap; never cleared
    broken: bool,
}

impl Circle {
    pub fn new(radius: f32, gap_size: f32) -> Self {
        Self::with_angle(radius, 0.0, gap_size)
    }

    /// Ring starting at a given rotation angle
    pub fn with_angle(radius: f32, angle: f32, gap_size: f32) -> Self {
        let angle = wrap_angle(angle);
        Self {
            radius,
            angle,
            gap: Gap::trailing(angle, gap_size),
            broken: false,
        }
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Angular speed of this ring (radians/frame); larger rings turn faster
    pub fn angular_speed(&self, arena: &Arena) -> f32 {
        arena.rotation_speed * self.radius / arena.rotation_reference_radius
    }

    /// Advance rotation one frame and recompute the gap
    pub fn update(&mut self, arena: &Arena) {
        if self.broken {
            return;
        }
        self.angle = wrap_angle(self.angle + self.angular_speed(arena));
        self.gap = Gap::trailing(self.angle, arena.gap_size);
    }

    /// Resolve contact between this ring and a ball.
    ///
    /// Returns true when the ball touched the ring: either it passed the gap
    /// (ring breaks, ball scores) or it bounced off the wall. Both play a cue.
    pub fn check_collision(&mut self, ball: &mut Ball, arena: &Arena, cues: &mut dyn CueSink) -> bool {
        if self.broken {
            return false;
        }

        let offset = ball.pos - arena.center;
        let (distance, ball_angle) = cartesian_to_polar(offset);

        if (distance - self.radius).abs() > arena.ball_radius {
            return false;
        }

        if self.gap.admits(ball_angle) {
            self.broken = true;
            ball.add_point();
            log::info!(
                "{} escaped ring r={:.0} (score {})",
                ball.name,
                self.radius,
                ball.score()
            );
            cues.play_next();
            return true;
        }

        let normal = offset.normalize_or_zero();
        ball.vel = reflect(ball.vel, normal);
        log::trace!(
            "{} bounced off ring r={:.0} at {:.3} rad",
            ball.name,
            self.radius,
            ball_angle
        );
        cues.play_next();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar_to_cartesian;
    use crate::settings::{BallSpec, Rgb};
    use glam::Vec2;
    use std::f32::consts::{PI, TAU};

    #[derive(Default)]
    struct CountingCues(u32);

    impl CueSink for CountingCues {
        fn play_next(&mut self) {
            self.0 += 1;
        }
    }

    fn arena() -> Arena {
        Arena {
            center: Vec2::new(400.0, 400.0),
            ball_radius: 20.0,
            gravity: 0.15,
            rotation_speed: 0.01,
            rotation_reference_radius: 150.0,
            gap_size: 0.5,
        }
    }

    fn ball_at(arena: &Arena, r: f32, theta: f32, vel: Vec2) -> Ball {
        let pos = arena.center + polar_to_cartesian(r, theta);
        Ball::new(&BallSpec::new("A", Rgb::WHITE), pos, vel)
    }

    #[test]
    fn test_gap_admits_without_wrap() {
        let gap = Gap::trailing(1.5, 0.5);
        assert!((gap.start - 1.0).abs() < 1e-6);
        assert!((gap.end - 1.5).abs() < 1e-6);
        assert!(gap.admits(1.2));
        assert!(!gap.admits(1.0)); // open interval
        assert!(!gap.admits(2.0));
    }

    #[test]
    fn test_gap_across_seam_admits_nothing() {
        // Rotation angle 0.2: gap is [2π - 0.3, 0.2], start > end
        let gap = Gap::trailing(0.2, 0.5);
        assert!(gap.start > gap.end);
        assert!(!gap.admits(0.1));
        assert!(!gap.admits(TAU - 0.1));
        // ...but it is still drawn where it belongs
        assert!(gap.contains_drawn(0.1));
        assert!(gap.contains_drawn(TAU - 0.1));
        assert!(!gap.contains_drawn(PI));
    }

    #[test]
    fn test_update_rotation_scales_with_radius() {
        let arena = arena();
        let mut inner = Circle::new(150.0, arena.gap_size);
        let mut outer = Circle::new(300.0, arena.gap_size);
        inner.update(&arena);
        outer.update(&arena);
        assert!((inner.angle - 0.01).abs() < 1e-6);
        assert!((outer.angle - 0.02).abs() < 1e-6);
        assert!((inner.gap.end - inner.angle).abs() < 1e-6);
        assert!((inner.gap.start - wrap_angle(0.01 - 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_update_wraps_angle() {
        let arena = arena();
        let mut circle = Circle::with_angle(150.0, TAU - 0.005, arena.gap_size);
        circle.update(&arena);
        assert!(circle.angle < 0.01);
        assert!(circle.angle >= 0.0);
    }

    #[test]
    fn test_far_ball_no_collision() {
        let arena = arena();
        let mut circle = Circle::new(200.0, arena.gap_size);
        let mut ball = ball_at(&arena, 100.0, 0.3, Vec2::new(1.0, 1.0));
        let mut cues = CountingCues::default();
        assert!(!circle.check_collision(&mut ball, &arena, &mut cues));
        assert_eq!(ball.vel, Vec2::new(1.0, 1.0));
        assert_eq!(cues.0, 0);
    }

    #[test]
    fn test_pass_through_gap_breaks_ring() {
        let arena = arena();
        let mut circle = Circle::with_angle(200.0, 2.0, arena.gap_size);
        let vel = Vec2::new(3.0, 4.0);
        let mut ball = ball_at(&arena, 205.0, 1.8, vel);
        let mut cues = CountingCues::default();

        assert!(circle.check_collision(&mut ball, &arena, &mut cues));
        assert!(circle.is_broken());
        assert_eq!(ball.score(), 1);
        assert_eq!(ball.vel, vel); // passes unobstructed
        assert_eq!(cues.0, 1);
    }

    #[test]
    fn test_solid_arc_reflects() {
        let arena = arena();
        let mut circle = Circle::new(100.0, arena.gap_size);
        circle.update(&arena);
        // Ball just inside the ring at angle π/2 (straight down), moving outward
        let theta = PI / 2.0;
        let vel = Vec2::new(2.0, 6.0);
        let mut ball = ball_at(&arena, 95.0, theta, vel);
        let mut cues = CountingCues::default();

        assert!(circle.check_collision(&mut ball, &arena, &mut cues));
        assert!(!circle.is_broken());
        assert_eq!(ball.score(), 0);
        assert_eq!(cues.0, 1);

        // Mirror image about the radial normal: radial part flips, tangential stays
        let normal = polar_to_cartesian(1.0, theta);
        assert!((ball.vel.dot(normal) + vel.dot(normal)).abs() < 1e-4);
        let tangent = Vec2::new(-normal.y, normal.x);
        assert!((ball.vel.dot(tangent) - vel.dot(tangent)).abs() < 1e-4);
        assert!((ball.vel.length() - vel.length()).abs() < 1e-4);
    }

    #[test]
    fn test_broken_ring_is_inert() {
        let arena = arena();
        let mut circle = Circle::with_angle(200.0, 2.0, arena.gap_size);
        let mut cues = CountingCues::default();
        let mut first = ball_at(&arena, 200.0, 1.8, Vec2::new(1.0, 0.0));
        assert!(circle.check_collision(&mut first, &arena, &mut cues));
        assert!(circle.is_broken());

        // Any later ball, on the gap or the wall, is ignored
        for theta in [1.8, 0.3, -2.0] {
            let vel = Vec2::new(-3.0, 2.5);
            let mut ball = ball_at(&arena, 200.0, theta, vel);
            assert!(!circle.check_collision(&mut ball, &arena, &mut cues));
            assert_eq!(ball.vel, vel);
            assert_eq!(ball.score(), 0);
        }
        assert_eq!(cues.0, 1);

        // Rotation is frozen too
        let angle = circle.angle;
        circle.update(&arena);
        assert_eq!(circle.angle, angle);
    }
}
