//! Glyph sampling
//!
//! Renders the text once per viewport size and keeps a sparse set of points
//! covering its filled pixels. Sparklers are emitted from these points.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

/// A sample location inside the glyph
pub type Point = Vec2;

/// Font size for a given viewport width
#[inline]
pub fn font_size(viewport_width: u32) -> f32 {
    (viewport_width as f32 * FONT_WIDTH_FRACTION).min(MAX_FONT_SIZE)
}

/// CSS font shorthand for a given size
pub fn css_font(font_px: f32) -> String {
    format!("{} {}px {}", FONT_WEIGHT, font_px, FONT_FAMILY)
}

/// Text placement shared by sampling and the glow pass
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphLayout {
    pub text: String,
    pub font_px: f32,
    /// Centre of the text (centre alignment, middle baseline)
    pub center: Vec2,
}

impl GlyphLayout {
    pub fn new(text: &str, width: u32, height: u32) -> Self {
        Self {
            text: text.to_string(),
            font_px: font_size(width),
            center: Vec2::new(width as f32 / 2.0, height as f32 / 2.0),
        }
    }
}

/// Per-pixel coverage of a rendered glyph, row-major
#[derive(Debug, Clone)]
pub struct AlphaMask {
    pub width: usize,
    pub height: usize,
    pub alpha: Vec<u8>,
}

impl AlphaMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width * height],
        }
    }

    /// Build from RGBA bytes (as returned by `getImageData`)
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Self {
        let alpha = rgba.chunks_exact(4).map(|px| px[3]).collect::<Vec<_>>();
        debug_assert_eq!(alpha.len(), width * height);
        Self {
            width,
            height,
            alpha,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.alpha.get(y * self.width + x).copied().unwrap_or(0)
    }
}

/// Anything that can rasterize text into an offscreen coverage mask
pub trait GlyphRasterizer {
    /// Render `layout` into a `width`x`height` mask. `None` if the backend
    /// can't produce one (the caller treats that as no coverage).
    fn rasterize(&mut self, layout: &GlyphLayout, width: u32, height: u32) -> Option<AlphaMask>;
}

/// Points covering the glyph, in no particular order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphPointSet {
    points: Vec<Point>,
}

impl GlyphPointSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Uniformly random point (with replacement), `None` if empty
    pub fn choose(&self, rng: &mut impl Rng) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points[rng.random_range(0..self.points.len())])
    }
}

/// Collect pixels above the coverage threshold on a fixed stride
pub fn sample_mask(mask: &AlphaMask, stride: usize) -> GlyphPointSet {
    let stride = stride.max(1);
    let mut points = Vec::new();
    for y in (0..mask.height).step_by(stride) {
        for x in (0..mask.width).step_by(stride) {
            if mask.get(x, y) > SAMPLE_ALPHA_THRESHOLD {
                points.push(Vec2::new(x as f32, y as f32));
            }
        }
    }
    GlyphPointSet { points }
}

/// Render `text` for a `width`x`height` viewport and sample its coverage
pub fn sample(
    rasterizer: &mut dyn GlyphRasterizer,
    text: &str,
    width: u32,
    height: u32,
) -> GlyphPointSet {
    if width == 0 || height == 0 {
        return GlyphPointSet::empty();
    }
    let layout = GlyphLayout::new(text, width, height);
    match rasterizer.rasterize(&layout, width, height) {
        Some(mask) => sample_mask(&mask, SAMPLE_STRIDE),
        None => GlyphPointSet::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::BlockFont;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_font_size_caps() {
        assert_eq!(font_size(800), 200.0);
        assert_eq!(font_size(2000), 300.0);
        assert_eq!(css_font(200.0), "900 200px sans-serif");
    }

    #[test]
    fn test_sample_mask_stride_and_threshold() {
        let mut mask = AlphaMask::new(10, 10);
        // On-stride, above threshold
        mask.alpha[4 * 10 + 4] = 255;
        // On-stride, exactly at threshold (rejected)
        mask.alpha[8 * 10] = 128;
        // Off-stride (never visited)
        mask.alpha[5 * 10 + 5] = 255;

        let set = sample_mask(&mask, 4);
        assert_eq!(set.points(), &[Vec2::new(4.0, 4.0)]);
    }

    #[test]
    fn test_from_rgba_takes_alpha_channel() {
        let rgba = [255, 255, 255, 10, 0, 0, 0, 200];
        let mask = AlphaMask::from_rgba(2, 1, &rgba);
        assert_eq!(mask.alpha, vec![10, 200]);
    }

    #[test]
    fn test_zero_viewport_is_empty() {
        let mut font = BlockFont;
        assert!(sample(&mut font, "2026", 0, 600).is_empty());
        assert!(sample(&mut font, "2026", 800, 0).is_empty());
    }

    #[test]
    fn test_failed_raster_is_empty() {
        struct Broken;
        impl GlyphRasterizer for Broken {
            fn rasterize(&mut self, _: &GlyphLayout, _: u32, _: u32) -> Option<AlphaMask> {
                None
            }
        }
        assert!(sample(&mut Broken, "2026", 800, 600).is_empty());
    }

    #[test]
    fn test_sample_is_deterministic() {
        let mut font = BlockFont;
        let a = sample(&mut font, "2026", 800, 600);
        let b = sample(&mut font, "2026", 800, 600);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn test_points_lie_on_stride_inside_viewport() {
        let mut font = BlockFont;
        let set = sample(&mut font, "2026", 800, 600);
        for p in set.points() {
            assert_eq!(p.x as usize % SAMPLE_STRIDE, 0);
            assert_eq!(p.y as usize % SAMPLE_STRIDE, 0);
            assert!(p.x < 800.0 && p.y < 600.0);
        }
    }

    #[test]
    fn test_resample_on_resize_changes_set() {
        let mut font = BlockFont;
        let small = sample(&mut font, "2026", 400, 300);
        let large = sample(&mut font, "2026", 800, 600);
        assert!(large.len() > small.len());
    }

    #[test]
    fn test_choose_from_empty() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(GlyphPointSet::empty().choose(&mut rng).is_none());
    }

    proptest! {
        #[test]
        fn prop_sample_is_repeatable_and_in_bounds(width in 0u32..400, height in 0u32..300) {
            let mut font = BlockFont;
            let a = sample(&mut font, "2026", width, height);
            let b = sample(&mut font, "2026", width, height);
            prop_assert_eq!(&a, &b);
            for p in a.points() {
                prop_assert!(p.x >= 0.0 && p.x < width as f32);
                prop_assert!(p.y >= 0.0 && p.y < height as f32);
            }
        }
    }
}
