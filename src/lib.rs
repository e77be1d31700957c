//! Sparkler - a glowing text sparkler with a fireworks show
//!
//! Core modules:
//! - `sim`: Deterministic simulation (glyph sampling, particles, fireworks)
//! - `renderer`: 2D raster surface abstraction and per-frame drawing
//! - `audio`: Explosion and crackle cues (Web Audio in the browser)
//! - `engine`: One display session tying simulation and drawing together
//! - `settings`: User-facing preferences

pub mod audio;
pub mod color;
pub mod engine;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use audio::{AudioCues, AudioManager, CueCounter, NullCues};
pub use color::{Hsl, Rgba};
pub use engine::Engine;
pub use settings::{QualityPreset, Settings};

/// Simulation and drawing constants
pub mod consts {
    /// Text drawn and sampled when settings don't override it
    pub const DEFAULT_TEXT: &str = "2026";
    /// Font size as a fraction of viewport width
    pub const FONT_WIDTH_FRACTION: f32 = 0.25;
    /// Upper bound on the glyph font size (px)
    pub const MAX_FONT_SIZE: f32 = 300.0;
    /// CSS font weight/family used for the glyph
    pub const FONT_FAMILY: &str = "sans-serif";
    pub const FONT_WEIGHT: u32 = 900;
    /// Sample every n-th pixel in both axes
    pub const SAMPLE_STRIDE: usize = 4;
    /// Coverage threshold (alpha must exceed this)
    pub const SAMPLE_ALPHA_THRESHOLD: u8 = 128;

    /// Sparklers spawned per tick
    pub const EMISSION_RATE: usize = 200;
    /// Maximum initial sparkler speed
    pub const SPARKLER_MAX_SPEED: f32 = 1.5;
    pub const SPARKLER_DECAY_MIN: f32 = 0.02;
    pub const SPARKLER_DECAY_MAX: f32 = 0.07;
    pub const SPARKLER_SIZE_MIN: f32 = 0.5;
    pub const SPARKLER_SIZE_MAX: f32 = 2.5;
    /// Gold/orange/white hue band (degrees)
    pub const SPARKLER_HUE_MIN: f32 = 30.0;
    pub const SPARKLER_HUE_MAX: f32 = 60.0;
    pub const SPARKLER_LIGHTNESS_MIN: f32 = 50.0;
    pub const SPARKLER_LIGHTNESS_MAX: f32 = 100.0;

    /// Downward acceleration on every particle (px/tick²)
    pub const PARTICLE_GRAVITY: f32 = 0.05;
    /// Velocity multiplier applied to burst particles after gravity
    pub const EXPLOSION_DRAG: f32 = 0.96;

    /// Per-tick chance of launching a firework
    pub const LAUNCH_CHANCE: f64 = 0.03;
    /// Downward acceleration on a rising rocket (px/tick²)
    pub const ROCKET_GRAVITY: f32 = 0.2;
    pub const ROCKET_MAX_DRIFT: f32 = 2.0;
    pub const ROCKET_SPEED_MIN: f32 = 12.0;
    pub const ROCKET_SPEED_MAX: f32 = 15.0;
    /// Target altitude band as fractions of viewport height
    pub const TARGET_MIN_FRACTION: f32 = 0.1;
    pub const TARGET_MAX_FRACTION: f32 = 0.5;
    /// Slack on the apex test so f32 accumulation of gravity steps still
    /// reaches the closed-form apex tick
    pub const APEX_EPSILON: f32 = 1e-3;
    /// Trail length in velocity units
    pub const TRAIL_SCALE: f32 = 3.0;
    pub const TRAIL_WIDTH: f32 = 2.0;

    /// Burst size is BURST_MIN + [0, BURST_SPREAD)
    pub const BURST_MIN: usize = 80;
    pub const BURST_SPREAD: usize = 50;
    pub const BURST_SPEED_MIN: f32 = 1.0;
    pub const BURST_SPEED_MAX: f32 = 7.0;
    pub const BURST_DECAY_MIN: f32 = 0.01;
    pub const BURST_DECAY_MAX: f32 = 0.025;
    pub const BURST_SIZE_MIN: f32 = 1.0;
    pub const BURST_SIZE_MAX: f32 = 4.0;
    pub const BURST_LIGHTNESS: f32 = 60.0;

    /// Opacity of the black rectangle laid over the previous frame
    pub const FADE_ALPHA: f32 = 0.2;
    /// Halo blur radius for the glyph glow (px)
    pub const GLOW_BLUR: f32 = 20.0;
}
