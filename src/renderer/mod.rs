//! 2D raster rendering
//!
//! Drawing goes through the `Surface` trait, implemented by the browser
//! canvas (`canvas`, wasm only) and a software pixel buffer (`raster`).

pub mod block_font;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod frame;
pub mod raster;

pub use block_font::BlockFont;
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasGlyphRasterizer;
pub use frame::{begin_frame, draw_fireworks, draw_sparklers, end_frame};
pub use raster::PixelBuffer;

use glam::Vec2;

use crate::color::Rgba;
use crate::sim::GlyphLayout;

/// How new pixels combine with the frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Normal alpha compositing ("source-over")
    #[default]
    SourceOver,
    /// Additive ("lighter"): overlaps brighten
    Lighter,
}

impl BlendMode {
    /// Canvas `globalCompositeOperation` name
    pub fn as_str(&self) -> &'static str {
        match self {
            BlendMode::SourceOver => "source-over",
            BlendMode::Lighter => "lighter",
        }
    }
}

/// A 2D drawing surface
///
/// Colours carry their own opacity; `set_alpha` multiplies it like the
/// canvas `globalAlpha`.
pub trait Surface {
    fn set_blend(&mut self, mode: BlendMode);
    fn set_alpha(&mut self, alpha: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
    /// Fill `layout`'s text with a blurred halo around it
    fn fill_text_glow(&mut self, layout: &GlyphLayout, fill: Rgba, halo: Rgba, blur: f32);

    /// Back to alpha 1 and source-over
    fn reset(&mut self) {
        self.set_alpha(1.0);
        self.set_blend(BlendMode::SourceOver);
    }
}
