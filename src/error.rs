//! Error types for configuration and asset loading
//!
//! The simulation core itself is infallible; these only surface at setup.

use thiserror::Error;

/// Invalid or unreadable run configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one ball is required")]
    NoBalls,
    #[error("at least one circle is required")]
    NoCircles,
    #[error("{count} balls configured, at most {max} can be drawn")]
    TooManyBalls { count: usize, max: usize },
    #[error("{count} circles configured, at most {max} can be drawn")]
    TooManyCircles { count: usize, max: usize },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("minimum circle radius {min} exceeds maximum {max}")]
    RadiusRange { min: f32, max: f32 },
    #[error("ball radius {ball} must be smaller than the minimum circle radius {circle}")]
    BallTooLarge { ball: f32, circle: f32 },
    #[error("start speed range [{min}, {max}) is empty")]
    SpeedRange { min: f32, max: f32 },
    #[error("frame rate must be non-zero")]
    ZeroFps,
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure to load an image or music asset; always recovered with a fallback
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid MIDI data: {0}")]
    Midi(#[from] midly::Error),
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },
}
