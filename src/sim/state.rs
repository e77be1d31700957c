//! Simulation state for one display session
//!
//! Everything that evolves between ticks lives here. Drawing reads it,
//! never writes it.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::firework::FireworkManager;
use super::glyph::{self, GlyphLayout, GlyphPointSet, GlyphRasterizer};
use super::particle::{ParticleField, Physics};
use crate::settings::Settings;

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Complete simulation state (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub viewport: Viewport,
    /// Text placement used for both sampling and the glow pass
    pub layout: GlyphLayout,
    /// Sample points covering the glyph
    pub glyph_points: GlyphPointSet,
    /// Sparkler pool
    pub sparklers: ParticleField,
    /// Active fireworks, each owning its burst
    pub fireworks: FireworkManager,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl SimState {
    /// Create a new state and sample the glyph for `viewport`
    pub fn new(
        seed: u64,
        viewport: Viewport,
        settings: &Settings,
        rasterizer: &mut dyn GlyphRasterizer,
    ) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            viewport,
            layout: GlyphLayout::new(&settings.text, viewport.width, viewport.height),
            glyph_points: GlyphPointSet::empty(),
            sparklers: ParticleField::new(Physics::Sparkler, settings.max_sparklers()),
            fireworks: FireworkManager::new(settings.max_fireworks()),
            time_ticks: 0,
        };
        state.resample(rasterizer);
        state
    }

    /// Re-render and re-sample the glyph for the current viewport
    pub fn resample(&mut self, rasterizer: &mut dyn GlyphRasterizer) {
        let text = self.layout.text.clone();
        self.layout = GlyphLayout::new(&text, self.viewport.width, self.viewport.height);
        self.glyph_points = glyph::sample(
            rasterizer,
            &text,
            self.viewport.width,
            self.viewport.height,
        );
        log::info!(
            "Glyph \"{}\" sampled at {}x{}: {} points",
            text,
            self.viewport.width,
            self.viewport.height,
            self.glyph_points.len()
        );
    }

    /// Adopt a new viewport: resample the glyph and start the pools over
    pub fn resize(&mut self, viewport: Viewport, rasterizer: &mut dyn GlyphRasterizer) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.sparklers.clear();
        self.fireworks.clear();
        self.resample(rasterizer);
    }

    /// Total live particles (sparklers + bursts)
    pub fn particle_count(&self) -> usize {
        self.sparklers.len() + self.fireworks.particle_count()
    }
}
