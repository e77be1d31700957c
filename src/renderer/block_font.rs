//! Built-in 5x7 bitmap font
//!
//! Stands in for the browser's text rasterizer on native builds and in
//! tests. Heavy block glyphs scaled to the requested font size, centred the
//! same way the canvas centres text.

use glam::Vec2;

use crate::sim::{AlphaMask, GlyphLayout, GlyphRasterizer};

const COLS: usize = 5;
const ROWS: usize = 7;
/// Cap height as a fraction of font size
const CAP_HEIGHT: f32 = 0.72;

/// Rows top to bottom, bit 4 is the leftmost column
fn bitmap(c: char) -> [u8; ROWS] {
    match c.to_ascii_uppercase() {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        _ => [0; ROWS],
    }
}

/// Where a laid-out string lands on screen
struct Placement {
    glyphs: Vec<[u8; ROWS]>,
    /// Size of one bitmap cell (px)
    cell: f32,
    origin: Vec2,
}

impl Placement {
    fn new(layout: &GlyphLayout) -> Self {
        let glyphs: Vec<_> = layout.text.chars().map(bitmap).collect();
        let cell = layout.font_px * CAP_HEIGHT / ROWS as f32;
        // One blank column between glyphs, none after the last
        let cols = (glyphs.len() * (COLS + 1)).saturating_sub(1);
        let size = Vec2::new(cols as f32 * cell, ROWS as f32 * cell);
        Self {
            glyphs,
            cell,
            origin: layout.center - size / 2.0,
        }
    }

    /// Is the pixel centred at (x + 0.5, y + 0.5) inked?
    fn covers(&self, x: usize, y: usize) -> bool {
        if self.cell <= 0.0 {
            return false;
        }
        let local = (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - self.origin) / self.cell;
        if local.x < 0.0 || local.y < 0.0 {
            return false;
        }
        let (col, row) = (local.x as usize, local.y as usize);
        if row >= ROWS {
            return false;
        }
        let (index, cx) = (col / (COLS + 1), col % (COLS + 1));
        if cx >= COLS {
            return false;
        }
        self.glyphs
            .get(index)
            .is_some_and(|rows| rows[row] & (1 << (COLS - 1 - cx)) != 0)
    }
}

/// Software text rasterizer backed by the 5x7 bitmaps
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFont;

impl BlockFont {
    /// Coverage of `layout` over a `width`x`height` area
    pub fn mask(&self, layout: &GlyphLayout, width: u32, height: u32) -> AlphaMask {
        let (width, height) = (width as usize, height as usize);
        let mut mask = AlphaMask::new(width, height);
        let placement = Placement::new(layout);
        if placement.glyphs.is_empty() {
            return mask;
        }

        // Only visit the text's bounding box
        let x0 = placement.origin.x.max(0.0) as usize;
        let y0 = placement.origin.y.max(0.0) as usize;
        let cols = placement.glyphs.len() * (COLS + 1);
        let x1 = ((placement.origin.x + cols as f32 * placement.cell).ceil().max(0.0) as usize)
            .min(width);
        let y1 = ((placement.origin.y + ROWS as f32 * placement.cell).ceil().max(0.0) as usize)
            .min(height);

        for y in y0..y1 {
            for x in x0..x1 {
                if placement.covers(x, y) {
                    mask.alpha[y * width + x] = 255;
                }
            }
        }
        mask
    }
}

impl GlyphRasterizer for BlockFont {
    fn rasterize(&mut self, layout: &GlyphLayout, width: u32, height: u32) -> Option<AlphaMask> {
        Some(self.mask(layout, width, height))
    }
}
