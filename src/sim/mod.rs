//! Deterministic simulation module
//!
//! All physics and scoring lives here. This module must stay pure:
//! - One fixed step per frame
//! - Seeded RNG only
//! - Stable iteration order (configured ball order, innermost ring first)
//! - No rendering or platform dependencies; audio goes through `CueSink`

pub mod ball;
pub mod circle;
pub mod geometry;
pub mod state;
pub mod tick;

pub use ball::{Ball, select_winner};
pub use circle::{Circle, Gap};
pub use geometry::{radius_schedule, reflect};
pub use state::{Arena, EndReason, SimPhase, SimState};
pub use tick::{run_to_end, step, tick};

/// Receiver of audio cues; called once per ball/ring contact
pub trait CueSink {
    fn play_next(&mut self);
}

