//! Run configuration
//!
//! Fixed at startup. Loaded from LocalStorage on the web, or from the JSON file
//! named by `RING_ESCAPE_CONFIG` on native builds.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::renderer::{MAX_BALLS, MAX_CIRCLES};

/// 8-bit RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Linear 0-1 components with full alpha (for GPU upload)
    pub fn to_f32_rgba(self) -> [f32; 4] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
            1.0,
        ]
    }

    /// CSS `rgb(...)` string (for DOM overlays)
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

/// How balls are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    /// Plain filled circles in the ball's color
    #[default]
    ShapeOnly,
    /// Per-ball image masked to a circle, falling back to the shape
    ImageBacked,
}

/// Which cue plays on every collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AudioMode {
    /// Short fixed bounce clip
    #[default]
    EffectClip,
    /// Next note of the selected MIDI file, cycling
    MidiSequence,
}

/// A competing ball: its label and color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSpec {
    pub name: String,
    pub color: Rgb,
}

impl BallSpec {
    pub fn new(name: impl Into<String>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Window ===
    pub width: f32,
    pub height: f32,
    pub fps: u32,
    /// Optional title shown above the arena
    pub question: String,

    // === Balls ===
    pub balls: Vec<BallSpec>,
    pub ball_radius: f32,
    pub min_start_speed: f32,
    pub max_start_speed: f32,
    pub gravity: f32,

    // === Rings ===
    pub circle_count: usize,
    pub min_circle_radius: f32,
    /// Gap between the outermost ring and the window edge
    pub outer_margin: f32,
    pub rotation_speed: f32,
    pub gap_size: f32,

    // === Presentation ===
    pub render_mode: RenderMode,
    pub audio_mode: AudioMode,
    /// MIDI file stem under `musics/`
    pub music: String,

    // === Run control ===
    /// RNG seed; the clock is used when absent
    pub seed: Option<u64>,
    /// Opt-in cap: stop after this many frames even if rings remain
    pub frame_limit: Option<u64>,
    /// Sleep to the target frame rate in native headless runs
    pub paced: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            fps: FPS,
            question: String::new(),

            balls: vec![
                BallSpec::new("YES", Rgb(0, 0, 255)),
                BallSpec::new("NO", Rgb(0, 255, 0)),
            ],
            ball_radius: BALL_RADIUS,
            min_start_speed: BALL_MIN_START_SPEED,
            max_start_speed: BALL_MAX_START_SPEED,
            gravity: GRAVITY,

            circle_count: CIRCLE_COUNT,
            min_circle_radius: MIN_CIRCLE_RADIUS,
            outer_margin: OUTER_MARGIN,
            rotation_speed: CIRCLE_ROTATION_SPEED,
            gap_size: CIRCLE_GAP_SIZE,

            render_mode: RenderMode::ShapeOnly,
            audio_mode: AudioMode::EffectClip,
            music: "Wii".to_string(),

            seed: None,
            frame_limit: None,
            paced: true,
        }
    }
}

impl SimConfig {
    /// Environment variable naming a JSON config file (native only)
    pub const CONFIG_ENV: &'static str = "RING_ESCAPE_CONFIG";

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "ring_escape_config";

    /// Arena center (window center)
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Outermost ring radius: half the smaller window side, minus the margin
    pub fn max_circle_radius(&self) -> f32 {
        (self.width.min(self.height) / 2.0).floor() - self.outer_margin
    }

    /// Frame duration in seconds
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    /// Check values the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.balls.is_empty() {
            return Err(ConfigError::NoBalls);
        }
        if self.circle_count == 0 {
            return Err(ConfigError::NoCircles);
        }
        if self.balls.len() > MAX_BALLS {
            return Err(ConfigError::TooManyBalls {
                count: self.balls.len(),
                max: MAX_BALLS,
            });
        }
        if self.circle_count > MAX_CIRCLES {
            return Err(ConfigError::TooManyCircles {
                count: self.circle_count,
                max: MAX_CIRCLES,
            });
        }
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("ball_radius", self.ball_radius),
            ("min_circle_radius", self.min_circle_radius),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        let max = self.max_circle_radius();
        if self.min_circle_radius > max {
            return Err(ConfigError::RadiusRange {
                min: self.min_circle_radius,
                max,
            });
        }
        if self.ball_radius >= self.min_circle_radius {
            return Err(ConfigError::BallTooLarge {
                ball: self.ball_radius,
                circle: self.min_circle_radius,
            });
        }
        if !(self.min_start_speed < self.max_start_speed) {
            return Err(ConfigError::SpeedRange {
                min: self.min_start_speed,
                max: self.max_start_speed,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load config from the file named by `RING_ESCAPE_CONFIG`, else defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(Self::CONFIG_ENV) else {
            log::info!("Using default config");
            return Self::default();
        };
        let path = std::path::PathBuf::from(path);
        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }
}
