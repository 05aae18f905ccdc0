//! Ring Escape - balls bouncing inside rotating, gapped rings
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, ring collisions, winner)
//! - `audio`: Cue playback (effect clip or MIDI note sequence)
//! - `renderer`: WebGPU SDF rendering pipeline
//! - `ui`: DOM overlay (scoreboard, winner banner, image skins)
//! - `platform`: Frame pacing
//! - `settings`: Run configuration

pub mod audio;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{AssetError, ConfigError};
pub use settings::{AudioMode, BallSpec, RenderMode, Rgb, SimConfig};

use glam::Vec2;

/// Default configuration constants
pub mod consts {
    /// Window size (logical pixels)
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 800.0;
    /// Target frame rate; one simulation step per frame
    pub const FPS: u32 = 60;
    /// Maximum substeps per animation frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 20.0;
    /// Initial velocity components are drawn from [MIN, MAX)
    pub const BALL_MIN_START_SPEED: f32 = 5.0;
    pub const BALL_MAX_START_SPEED: f32 = 7.0;
    /// Downward acceleration, pixels/frame²
    pub const GRAVITY: f32 = 0.15;

    /// Ring defaults
    pub const CIRCLE_COUNT: usize = 10;
    /// Base rotation, radians/frame at the reference radius
    pub const CIRCLE_ROTATION_SPEED: f32 = 0.01;
    /// Radius at which a ring turns at exactly the base rate
    pub const ROTATION_REFERENCE_RADIUS: f32 = 150.0;
    /// Angular size of each ring's gap (radians)
    pub const CIRCLE_GAP_SIZE: f32 = 0.5;
    pub const MIN_CIRCLE_RADIUS: f32 = 100.0;
    /// Distance kept between the outermost ring and the window edge
    pub const OUTER_MARGIN: f32 = 50.0;
    /// Stroke width of a ring
    pub const RING_THICKNESS: f32 = 2.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta), theta in (-π, π]
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
