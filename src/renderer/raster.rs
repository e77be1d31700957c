//! Software frame buffer
//!
//! An opaque RGB canvas in linear 0..1 floats, used by the native host and
//! by tests that check what actually lands on screen.

use glam::Vec2;

use super::{BlendMode, BlockFont, Surface};
use crate::color::Rgba;
use crate::sim::GlyphLayout;

/// Opaque software canvas (starts black)
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 3]>,
    alpha: f32,
    blend: BlendMode,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);
        Self {
            width,
            height,
            pixels: vec![[0.0; 3]; width * height],
            alpha: 1.0,
            blend: BlendMode::SourceOver,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> [f32; 3] {
        self.pixels
            .get(y * self.width + x)
            .copied()
            .unwrap_or([0.0; 3])
    }

    /// Mean Rec. 601 luma over the whole frame
    pub fn mean_luma(&self) -> f32 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        let sum: f32 = self
            .pixels
            .iter()
            .map(|[r, g, b]| 0.299 * r + 0.587 * g + 0.114 * b)
            .sum();
        sum / self.pixels.len() as f32
    }

    /// Frame as packed 8-bit RGBA
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|px| {
                let [r, g, b] = px.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
                [r, g, b, 255]
            })
            .collect()
    }

    /// Composite `color` onto one pixel with `coverage` in 0..=1
    #[inline]
    fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let a = (color.a * self.alpha * coverage).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let src = color.unit();
        let dst = &mut self.pixels[y as usize * self.width + x as usize];
        for i in 0..3 {
            dst[i] = match self.blend {
                BlendMode::SourceOver => src[i] * a + dst[i] * (1.0 - a),
                BlendMode::Lighter => (dst[i] + src[i] * a).min(1.0),
            };
        }
    }

    /// Pixel-centre bounding box of a region, clipped to the buffer
    fn bounds(&self, min: Vec2, max: Vec2) -> (i64, i64, i64, i64) {
        let x0 = (min.x - 0.5).floor().max(0.0) as i64;
        let y0 = (min.y - 0.5).floor().max(0.0) as i64;
        let x1 = ((max.x - 0.5).ceil() as i64).min(self.width as i64 - 1);
        let y1 = ((max.y - 0.5).ceil() as i64).min(self.height as i64 - 1);
        (x0, y0, x1, y1)
    }
}

impl Surface for PixelBuffer {
    fn set_blend(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let (x0, y0, x1, y1) = self.bounds(Vec2::new(x, y), Vec2::new(x + w, y + h));
        for py in y0..=y1 {
            for px in x0..=x1 {
                let c = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                if c.x >= x && c.x < x + w && c.y >= y && c.y < y + h {
                    self.blend_pixel(px, py, color, 1.0);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let r = Vec2::splat(radius);
        let (x0, y0, x1, y1) = self.bounds(center - r, center + r);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let c = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                // One pixel of anti-aliasing at the rim
                let coverage = (radius + 0.5 - c.distance(center)).clamp(0.0, 1.0);
                self.blend_pixel(px, py, color, coverage);
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let half = (width / 2.0).max(0.5);
        let pad = Vec2::splat(half);
        let (x0, y0, x1, y1) = self.bounds(from.min(to) - pad, from.max(to) + pad);
        let seg = to - from;
        let len_sq = seg.length_squared();
        for py in y0..=y1 {
            for px in x0..=x1 {
                let c = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let t = if len_sq > 0.0 {
                    ((c - from).dot(seg) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let d = c.distance(from + seg * t);
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                self.blend_pixel(px, py, color, coverage);
            }
        }
    }

    /// Halo is approximated by the fill alone; the blur is a canvas nicety
    fn fill_text_glow(&mut self, layout: &GlyphLayout, fill: Rgba, _halo: Rgba, _blur: f32) {
        let mask = BlockFont.mask(layout, self.width as u32, self.height as u32);
        for y in 0..mask.height {
            for x in 0..mask.width {
                let a = mask.get(x, y);
                if a > 0 {
                    self.blend_pixel(x as i64, y as i64, fill, a as f32 / 255.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luma(px: [f32; 3]) -> f32 {
        0.299 * px[0] + 0.587 * px[1] + 0.114 * px[2]
    }

    #[test]
    fn test_fade_decays_exponentially() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.fill_rect(0.0, 0.0, 4.0, 4.0, Rgba::new(255, 255, 255, 1.0));
        assert_eq!(buf.pixel(1, 1), [1.0; 3]);

        let fade = Rgba::BLACK.with_alpha(0.2);
        buf.fill_rect(0.0, 0.0, 4.0, 4.0, fade);
        assert!((buf.pixel(1, 1)[0] - 0.8).abs() < 1e-6);
        buf.fill_rect(0.0, 0.0, 4.0, 4.0, fade);
        assert!((buf.pixel(1, 1)[0] - 0.64).abs() < 1e-6);
    }

    #[test]
    fn test_lighter_adds() {
        let mut buf = PixelBuffer::new(8, 8);
        let red = Rgba::new(255, 0, 0, 1.0);
        buf.set_blend(BlendMode::Lighter);
        buf.set_alpha(0.5);
        buf.fill_circle(Vec2::new(4.0, 4.0), 2.0, red);
        let once = buf.pixel(4, 4)[0];
        buf.fill_circle(Vec2::new(4.0, 4.0), 2.0, red);
        let twice = buf.pixel(4, 4)[0];
        assert!((once - 0.5).abs() < 1e-6);
        assert!((twice - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_source_over_occludes() {
        let mut buf = PixelBuffer::new(8, 8);
        buf.fill_circle(Vec2::new(4.0, 4.0), 3.0, Rgba::new(255, 0, 0, 1.0));
        buf.fill_circle(Vec2::new(4.0, 4.0), 3.0, Rgba::new(0, 0, 255, 1.0));
        assert_eq!(buf.pixel(4, 4), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_zero_alpha_draws_nothing() {
        let mut buf = PixelBuffer::new(8, 8);
        buf.set_alpha(0.0);
        buf.fill_circle(Vec2::new(4.0, 4.0), 3.0, Rgba::new(255, 255, 255, 1.0));
        assert_eq!(buf.mean_luma(), 0.0);
    }

    #[test]
    fn test_shapes_clip_at_edges() {
        let mut buf = PixelBuffer::new(8, 8);
        buf.fill_circle(Vec2::new(-2.0, -2.0), 5.0, Rgba::new(255, 255, 255, 1.0));
        buf.stroke_line(
            Vec2::new(-10.0, 4.0),
            Vec2::new(20.0, 4.0),
            2.0,
            Rgba::new(255, 255, 255, 1.0),
        );
        assert!(luma(buf.pixel(0, 0)) > 0.0);
        assert!(luma(buf.pixel(7, 4)) > 0.0);
        assert_eq!(luma(buf.pixel(7, 7)), 0.0);
    }

    #[test]
    fn test_text_glow_tints_glyph_only() {
        let mut buf = PixelBuffer::new(800, 600);
        let layout = GlyphLayout::new("1", 800, 600);
        buf.fill_text_glow(
            &layout,
            Rgba::new(255, 200, 100, 0.05),
            Rgba::new(255, 160, 0, 0.5),
            20.0,
        );
        // Stem of the "1" runs through the centre
        assert!(luma(buf.pixel(400, 300)) > 0.0);
        assert_eq!(luma(buf.pixel(10, 10)), 0.0);
    }

    #[test]
    fn test_to_rgba8_is_opaque() {
        let buf = PixelBuffer::new(2, 1);
        assert_eq!(buf.to_rgba8(), vec![0, 0, 0, 255, 0, 0, 0, 255]);
    }
}
