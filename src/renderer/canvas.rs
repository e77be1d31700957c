//! Browser canvas backend

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{BlendMode, Surface};
use crate::color::Rgba;
use crate::sim::glyph::css_font;
use crate::sim::{AlphaMask, GlyphLayout, GlyphRasterizer};

/// Apply the shared text placement (centred, middle baseline)
fn set_text_style(ctx: &CanvasRenderingContext2d, layout: &GlyphLayout) {
    ctx.set_font(&css_font(layout.font_px));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
}

impl Surface for CanvasRenderingContext2d {
    fn set_blend(&mut self, mode: BlendMode) {
        let _ = self.set_global_composite_operation(mode.as_str());
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.set_global_alpha(alpha as f64);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.set_fill_style_str(&color.css());
        CanvasRenderingContext2d::fill_rect(self, x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.set_fill_style_str(&color.css());
        self.begin_path();
        if self
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_ok()
        {
            self.fill();
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.set_stroke_style_str(&color.css());
        self.set_line_width(width as f64);
        self.begin_path();
        self.move_to(from.x as f64, from.y as f64);
        self.line_to(to.x as f64, to.y as f64);
        self.stroke();
    }

    fn fill_text_glow(&mut self, layout: &GlyphLayout, fill: Rgba, halo: Rgba, blur: f32) {
        self.save();
        self.set_shadow_blur(blur as f64);
        self.set_shadow_color(&halo.css());
        set_text_style(self, layout);
        self.set_fill_style_str(&fill.css());
        let _ = self.fill_text(&layout.text, layout.center.x as f64, layout.center.y as f64);
        self.restore();
    }
}

/// Rasterizes text on an offscreen canvas and reads the pixels back
pub struct CanvasGlyphRasterizer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasGlyphRasterizer {
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
        Some(Self { canvas, ctx })
    }
}

impl GlyphRasterizer for CanvasGlyphRasterizer {
    fn rasterize(&mut self, layout: &GlyphLayout, width: u32, height: u32) -> Option<AlphaMask> {
        // Resizing also clears the canvas
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        let ctx = &self.ctx;
        set_text_style(ctx, layout);
        ctx.set_fill_style_str("#FFFFFF");
        ctx.fill_text(&layout.text, layout.center.x as f64, layout.center.y as f64)
            .ok()?;

        let image = match ctx.get_image_data(0.0, 0.0, width as f64, height as f64) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Glyph read-back failed: {:?}", e);
                return None;
            }
        };
        Some(AlphaMask::from_rgba(
            width as usize,
            height as usize,
            &image.data(),
        ))
    }
}
