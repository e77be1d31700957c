//! Deterministic simulation module
//!
//! All animation logic lives here. This module must stay deterministic:
//! - One fixed step per display frame
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod firework;
pub mod glyph;
pub mod particle;
pub mod state;
pub mod tick;

pub use firework::{Firework, FireworkManager, FireworkState, FireworkTick, Transition};
pub use glyph::{AlphaMask, GlyphLayout, GlyphPointSet, GlyphRasterizer, Point, sample, sample_mask};
pub use particle::{Particle, ParticleField, Physics};
pub use state::{SimState, Viewport};
pub use tick::{TickStats, tick};
