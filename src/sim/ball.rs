//! Ball entity: a gravity-affected point with a score

use glam::Vec2;
use rand::Rng;

use crate::settings::{BallSpec, Rgb};

/// A competing ball
#[derive(Debug, Clone)]
pub struct Ball {
    pub name: String,
    pub color: Rgb,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Rings escaped; only ever incremented
    score: u32,
}

impl Ball {
    pub fn new(spec: &BallSpec, pos: Vec2, vel: Vec2) -> Self {
        Self {
            name: spec.name.clone(),
            color: spec.color,
            pos,
            vel,
            score: 0,
        }
    }

    /// Spawn at `pos` with both velocity components drawn from `[min_speed, max_speed)`
    pub fn spawn<R: Rng>(
        spec: &BallSpec,
        pos: Vec2,
        min_speed: f32,
        max_speed: f32,
        rng: &mut R,
    ) -> Self {
        let vel = Vec2::new(
            rng.random_range(min_speed..max_speed),
            rng.random_range(min_speed..max_speed),
        );
        Self::new(spec, pos, vel)
    }

    /// Apply gravity, then integrate position (one explicit Euler step)
    pub fn update(&mut self, gravity: f32) {
        self.vel.y += gravity;
        self.pos += self.vel;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Credit one escaped ring
    pub(crate) fn add_point(&mut self) {
        self.score += 1;
    }
}

/// Index of the ball with the strictly highest score; the first ball wins ties
pub fn select_winner(balls: &[Ball]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, ball) in balls.iter().enumerate() {
        match best {
            Some(b) if ball.score <= balls[b].score => {}
            _ => best = Some(i),
        }
    }
    best
}
