//! Fixed-step simulation tick
//!
//! One call advances the run by exactly one frame.

use super::CueSink;
use super::state::{EndReason, SimState};

/// Advance the simulation by one frame
pub fn tick(state: &mut SimState, cues: &mut dyn CueSink) {
    if state.is_over() {
        return;
    }

    // Last ring went down on the previous frame
    if state.circles.is_empty() {
        state.finish(EndReason::AllBroken);
        return;
    }

    state.frame += 1;

    let SimState {
        arena,
        balls,
        circles,
        ..
    } = state;

    for circle in circles.iter_mut() {
        circle.update(arena);
    }

    for ball in balls.iter_mut() {
        ball.update(arena.gravity);
        for circle in circles.iter_mut() {
            circle.check_collision(ball, arena, cues);
        }
    }

    let before = state.circles.len();
    state.compact_circles();
    let broken = before - state.circles.len();
    if broken > 0 {
        log::debug!(
            "Frame {}: {} ring(s) broken, {} left",
            state.frame,
            broken,
            state.circles.len()
        );
    }
}

/// Tick once, honouring an optional frame cap.
///
/// Returns false once the run is over; reaching `frame_limit` ends it with the
/// current leader as winner instead of ticking.
pub fn step(state: &mut SimState, cues: &mut dyn CueSink, frame_limit: Option<u64>) -> bool {
    if state.is_over() {
        return false;
    }
    if frame_limit.is_some_and(|limit| state.frame >= limit) {
        state.finish(EndReason::FrameLimit);
        return false;
    }
    tick(state, cues);
    true
}

/// Step until the run is over
pub fn run_to_end(state: &mut SimState, cues: &mut dyn CueSink, frame_limit: Option<u64>) {
    while step(state, cues, frame_limit) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar_to_cartesian;
    use crate::settings::{BallSpec, Rgb, SimConfig};
    use crate::sim::state::{Arena, SimPhase};
    use crate::sim::{Ball, Circle};
    use glam::Vec2;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[derive(Default)]
    struct CountingCues(u32);

    impl CueSink for CountingCues {
        fn play_next(&mut self) {
            self.0 += 1;
        }
    }

    fn arena(gap_size: f32) -> Arena {
        Arena {
            center: Vec2::new(400.0, 400.0),
            ball_radius: 20.0,
            gravity: 0.15,
            rotation_speed: 0.01,
            rotation_reference_radius: 150.0,
            gap_size,
        }
    }

    fn ball(name: &str, pos: Vec2, vel: Vec2) -> Ball {
        Ball::new(&BallSpec::new(name, Rgb::WHITE), pos, vel)
    }

    #[test]
    fn test_escape_through_half_gap_ends_run() {
        let arena = arena(PI);
        // Gap spans (π/2, 3π/2) after the first rotation step: the left-lower quadrant
        let circle = Circle::with_angle(150.0, 3.0 * PI / 2.0, PI);
        let theta = 3.0 * PI / 4.0;
        let escaping = ball(
            "A",
            arena.center + polar_to_cartesian(140.0, theta),
            polar_to_cartesian(6.0, theta),
        );
        // Second ball idles at the center, far from the ring
        let idle = ball("B", arena.center, Vec2::new(0.0, -0.15));
        let mut state = SimState::from_parts(arena, vec![escaping, idle], vec![circle]);
        let mut cues = CountingCues::default();

        tick(&mut state, &mut cues);
        assert_eq!(state.balls[0].score(), 1);
        assert_eq!(state.balls[1].score(), 0);
        assert!(state.circles.is_empty());
        assert_eq!(state.phase, SimPhase::Running);
        assert_eq!(cues.0, 1);

        tick(&mut state, &mut cues);
        assert_eq!(
            state.phase,
            SimPhase::Over {
                winner: Some(0),
                reason: EndReason::AllBroken
            }
        );
        assert_eq!(state.winner().map(|b| b.name.as_str()), Some("A"));

        // Frozen from here on
        let pos = state.balls[0].pos;
        let frame = state.frame;
        tick(&mut state, &mut cues);
        assert_eq!(state.balls[0].pos, pos);
        assert_eq!(state.frame, frame);
    }

    #[test]
    fn test_second_ball_passes_ring_broken_earlier_in_frame() {
        let arena = arena(PI);
        let circle = Circle::with_angle(150.0, 3.0 * PI / 2.0, PI);
        let theta = 3.0 * PI / 4.0;
        let pos = arena.center + polar_to_cartesian(140.0, theta);
        let vel = polar_to_cartesian(6.0, theta);
        // Both balls reach the gap on the same frame
        let mut state = SimState::from_parts(
            arena,
            vec![ball("A", pos, vel), ball("B", pos, vel)],
            vec![circle],
        );
        let mut cues = CountingCues::default();

        tick(&mut state, &mut cues);

        assert_eq!(state.balls[0].score(), 1);
        assert_eq!(state.balls[1].score(), 0);
        // No bounce for the second ball: only gravity changed its velocity
        let expected = vel + Vec2::new(0.0, 0.15);
        assert!((state.balls[1].vel - expected).length() < 1e-5);
        assert_eq!(cues.0, 1);
        assert!(state.circles.is_empty());
        assert_eq!(state.phase, SimPhase::Running);
    }

    #[test]
    fn test_step_stops_at_frame_limit() {
        let config = SimConfig::default();
        let mut state = SimState::new(&config, 9);
        let mut cues = CountingCues::default();

        assert!(step(&mut state, &mut cues, Some(2)));
        assert!(step(&mut state, &mut cues, Some(2)));
        assert!(!step(&mut state, &mut cues, Some(2)));
        assert_eq!(state.frame, 2);
        assert!(matches!(
            state.phase,
            SimPhase::Over {
                reason: EndReason::FrameLimit,
                ..
            }
        ));
        assert!(!step(&mut state, &mut cues, None));
    }

    #[test]
    fn test_bounce_off_inner_ring_keeps_it() {
        let arena = arena(0.5);
        // Gap of the inner ring straddles angle 0, so the wall is solid everywhere
        let circles = vec![Circle::new(100.0, 0.5), Circle::new(200.0, 0.5)];
        let theta = PI / 2.0;
        let start = arena.center + polar_to_cartesian(90.0, theta);
        let mut state = SimState::from_parts(
            arena,
            vec![ball("A", start, Vec2::new(0.0, 4.0))],
            circles,
        );
        let mut cues = CountingCues::default();

        tick(&mut state, &mut cues);

        assert_eq!(state.circles.len(), 2);
        assert!(!state.circles[0].is_broken());
        assert_eq!(state.balls[0].score(), 0);
        // Pre-collision velocity (0, 4.15) was radial, so it flips
        assert!((state.balls[0].vel.y + 4.15).abs() < 1e-4);
        assert!(state.balls[0].vel.x.abs() < 1e-4);
        assert_eq!(cues.0, 1);
    }

    #[test]
    fn test_empty_ring_set_ends_on_first_tick() {
        let mut state = SimState::from_parts(
            arena(0.5),
            vec![
                ball("A", Vec2::ZERO, Vec2::ZERO),
                ball("B", Vec2::ZERO, Vec2::ZERO),
            ],
            Vec::new(),
        );
        tick(&mut state, &mut CountingCues::default());
        // Tied at zero: first ball wins
        assert_eq!(state.winner().map(|b| b.name.as_str()), Some("A"));
        assert_eq!(state.frame, 0);
    }

    #[test]
    fn test_frame_limit_forces_winner() {
        let config = SimConfig::default();
        let mut state = SimState::new(&config, 3);
        run_to_end(&mut state, &mut CountingCues::default(), Some(5));
        assert!(state.is_over());
        assert!(state.frame <= 5);
        if state.frame == 5 {
            assert!(matches!(
                state.phase,
                SimPhase::Over {
                    reason: EndReason::FrameLimit,
                    ..
                }
            ));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_scores_never_decrease(seed in any::<u64>()) {
            let config = SimConfig::default();
            let mut state = SimState::new(&config, seed);
            let mut cues = CountingCues::default();
            let mut last: Vec<u32> = state.balls.iter().map(|b| b.score()).collect();
            let mut rings = state.circles.len();

            for _ in 0..1500 {
                tick(&mut state, &mut cues);
                let scores: Vec<u32> = state.balls.iter().map(|b| b.score()).collect();
                let gained: u32 = scores.iter().zip(&last).map(|(now, before)| {
                    assert!(now >= before);
                    now - before
                }).sum();
                // Each point is one ring gone
                prop_assert_eq!(gained as usize, rings - state.circles.len());
                rings = state.circles.len();
                last = scores;
                if state.is_over() {
                    break;
                }
            }
        }
    }
}
