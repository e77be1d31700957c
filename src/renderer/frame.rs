//! Per-frame drawing
//!
//! Layering is fixed: fade, glyph glow, sparklers, fireworks, then a reset
//! of the global draw state so the next frame's fade starts clean.

use super::{BlendMode, Surface};
use crate::color::{Hsl, Rgba};
use crate::consts::*;
use crate::sim::{Firework, FireworkManager, FireworkState, Particle, ParticleField, SimState};

const GLOW_FILL: Rgba = Rgba::new(255, 200, 100, 0.05);
const GLOW_HALO: Rgba = Rgba::new(255, 160, 0, 0.5);

/// Fade the previous frame and lay down the glyph glow
pub fn begin_frame(surface: &mut dyn Surface, state: &SimState) {
    surface.reset();
    surface.fill_rect(
        0.0,
        0.0,
        state.viewport.width as f32,
        state.viewport.height as f32,
        Rgba::BLACK.with_alpha(FADE_ALPHA),
    );
    surface.fill_text_glow(&state.layout, GLOW_FILL, GLOW_HALO, GLOW_BLUR);
}

#[inline]
fn draw_particle(surface: &mut dyn Surface, p: &Particle) {
    if !p.is_alive() {
        return;
    }
    surface.set_alpha(p.opacity());
    surface.fill_circle(p.pos, p.size, p.color.to_rgba(1.0));
}

/// Draw every live sparkler additively
pub fn draw_sparklers(surface: &mut dyn Surface, sparklers: &ParticleField) {
    surface.set_blend(BlendMode::Lighter);
    for p in sparklers.iter() {
        draw_particle(surface, p);
    }
    surface.set_alpha(1.0);
}

#[inline]
fn draw_trail(surface: &mut dyn Surface, fw: &Firework) {
    surface.set_alpha(1.0);
    surface.stroke_line(
        fw.pos,
        fw.trail_end(),
        TRAIL_WIDTH,
        Hsl::new(fw.hue, 100.0, 50.0).to_rgba(0.5),
    );
}

/// Draw rising trails and bursts, in the same blend mode as the sparklers
///
/// A rocket that detonated this tick still gets its trail; its burst is
/// first drawn on the following tick, after one update.
pub fn draw_fireworks(surface: &mut dyn Surface, fireworks: &FireworkManager) {
    surface.set_blend(BlendMode::Lighter);
    for fw in fireworks.iter() {
        match fw.state() {
            FireworkState::Rising => draw_trail(surface, fw),
            FireworkState::Exploded if fw.just_exploded() => draw_trail(surface, fw),
            FireworkState::Exploded => {
                for p in fw.particles() {
                    draw_particle(surface, p);
                }
            }
            FireworkState::Dead => {}
        }
    }
}

/// Restore default draw state
pub fn end_frame(surface: &mut dyn Surface) {
    surface.reset();
}
