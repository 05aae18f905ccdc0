//! Simulation state and core types
//!
//! `SimState` is the single context owned by the frame loop: arena constants,
//! balls, active rings, and the run phase.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::ball::{Ball, select_winner};
use super::circle::Circle;
use super::geometry::radius_schedule;
use crate::consts::ROTATION_REFERENCE_RADIUS;
use crate::settings::SimConfig;

/// Physical constants shared by every ring and ball for the whole run
#[derive(Debug, Clone)]
pub struct Arena {
    /// Common center of all rings (window center)
    pub center: Vec2,
    pub ball_radius: f32,
    /// Downward acceleration, pixels/frame²
    pub gravity: f32,
    /// Base angular speed, radians/frame
    pub rotation_speed: f32,
    /// Ring radius that turns at exactly `rotation_speed`
    pub rotation_reference_radius: f32,
    /// Angular size of each gap
    pub gap_size: f32,
}

impl Arena {
    pub fn from_config(config: &SimConfig) -> Self {
        let (cx, cy) = config.center();
        Self {
            center: Vec2::new(cx, cy),
            ball_radius: config.ball_radius,
            gravity: config.gravity,
            rotation_speed: config.rotation_speed,
            rotation_reference_radius: ROTATION_REFERENCE_RADIUS,
            gap_size: config.gap_size,
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Every ring was broken
    AllBroken,
    /// The configured frame limit was reached first
    FrameLimit,
}

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    /// Rings turning, balls moving
    Running,
    /// Frozen; `winner` indexes `SimState::balls`
    Over {
        winner: Option<usize>,
        reason: EndReason,
    },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    pub arena: Arena,
    /// Fixed for the run, in configured order
    pub balls: Vec<Ball>,
    /// Active rings, innermost first; broken rings are compacted away
    pub circles: Vec<Circle>,
    pub phase: SimPhase,
    /// Frames simulated so far
    pub frame: u64,
}

impl SimState {
    /// Build the opening layout: every ball at the center, the full ring set
    pub fn new(config: &SimConfig, seed: u64) -> Self {
        let arena = Arena::from_config(config);
        let mut rng = Pcg32::seed_from_u64(seed);

        let balls = config
            .balls
            .iter()
            .map(|spec| {
                Ball::spawn(
                    spec,
                    arena.center,
                    config.min_start_speed,
                    config.max_start_speed,
                    &mut rng,
                )
            })
            .collect();

        let circles = radius_schedule(
            config.circle_count,
            config.min_circle_radius,
            config.max_circle_radius(),
        )
        .into_iter()
        .map(|radius| Circle::new(radius, arena.gap_size))
        .collect();

        Self::from_parts(arena, balls, circles)
    }

    /// Assemble a state from explicit pieces
    pub fn from_parts(arena: Arena, balls: Vec<Ball>, circles: Vec<Circle>) -> Self {
        Self {
            arena,
            balls,
            circles,
            phase: SimPhase::Running,
            frame: 0,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, SimPhase::Over { .. })
    }

    /// The winning ball, once the run is over
    pub fn winner(&self) -> Option<&Ball> {
        match self.phase {
            SimPhase::Over {
                winner: Some(i), ..
            } => self.balls.get(i),
            _ => None,
        }
    }

    /// Freeze the run and pick the winner from current scores. Idempotent.
    pub fn finish(&mut self, reason: EndReason) {
        if self.is_over() {
            return;
        }
        let winner = select_winner(&self.balls);
        self.phase = SimPhase::Over { winner, reason };
        match winner.and_then(|i| self.balls.get(i)) {
            Some(ball) => log::info!(
                "Run over after {} frames ({:?}): winner {} with {}",
                self.frame,
                reason,
                ball.name,
                ball.score()
            ),
            None => log::info!("Run over after {} frames ({:?}): no balls", self.frame, reason),
        }
    }

    /// Drop rings broken during this frame
    pub fn compact_circles(&mut self) {
        self.circles.retain(|c| !c.is_broken());
    }
}
