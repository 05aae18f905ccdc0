//! DOM overlay: scoreboard, per-ball score labels, winner banner, image skins
//!
//! Layout math lives here so it can be tested natively; the DOM plumbing is
//! wasm-only.

#[cfg(target_arch = "wasm32")]
pub mod hud;
#[cfg(target_arch = "wasm32")]
pub mod skins;

use glam::Vec2;

use crate::sim::Ball;

/// Maps simulation coordinates onto the (letterboxed) canvas, in CSS pixels.
/// Mirrors the fit done in the shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub offset: Vec2,
}

impl Viewport {
    pub fn fit(arena_width: f32, arena_height: f32, client_width: f32, client_height: f32) -> Self {
        let scale = (client_width / arena_width).min(client_height / arena_height);
        let offset = Vec2::new(
            (client_width - arena_width * scale) / 2.0,
            (client_height - arena_height * scale) / 2.0,
        );
        Self { scale, offset }
    }

    pub fn to_screen(&self, pos: Vec2) -> Vec2 {
        self.offset + pos * self.scale
    }
}

/// Image load state of a ball skin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinStatus {
    Loading,
    Ready,
    /// Load failed; the ball is drawn as a plain disc
    Failed,
}

/// Horizontal center of ball `index`'s scoreboard entry: the window is split
/// into equal whole-pixel columns, one per ball
pub fn scoreboard_x(index: usize, count: usize, width: f32) -> f32 {
    let column = (width / count.max(1) as f32).floor();
    column * index as f32 + (column / 2.0).floor()
}

/// Vertical center of the scoreboard line
pub const SCOREBOARD_Y: f32 = 20.0;

pub fn score_line(ball: &Ball) -> String {
    format!("{} : {}", ball.name, ball.score())
}

pub fn winner_banner(ball: &Ball) -> String {
    format!("The winner is : {} !!", ball.name)
}

/// Image asset for a ball
pub fn skin_path(name: &str) -> String {
    format!("images/{}.png", name)
}
