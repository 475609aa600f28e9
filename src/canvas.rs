//! Drawing surfaces for the detection overlay.

use crate::error::RenderError;
use crate::geometry::{DisplaySize, PixelRect};
use ab_glyph::{FontArc, PxScale};
use image::{Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;

/// Font size of label chips, in pixels.
pub const FONT_PX: f32 = 13.0;

/// Width of one glyph relative to the font size when no font is loaded.
const FALLBACK_GLYPH_EM: f64 = 0.55;

/// Minimal 2D drawing surface, modelled on an HTML canvas context.
pub trait Canvas2d {
    fn size(&self) -> DisplaySize;

    /// Resizes the backing store. Like a canvas element, this also clears it.
    fn resize(&mut self, size: DisplaySize);

    fn clear(&mut self);

    /// Strokes the outline of `rect`, centered on its edges.
    fn stroke_rect(&mut self, rect: PixelRect, color: Rgba<u8>, line_width: u32);

    /// Fills `rect`, alpha-blending `color` over what is already there.
    fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>);

    /// Draws `text` with its top-left corner at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: Rgba<u8>);

    fn measure_text(&self, text: &str) -> f64;
}

/// `Canvas2d` backed by an RGBA raster, transparent where nothing was drawn.
pub struct RasterCanvas {
    buffer: RgbaImage,
    font: Option<FontArc>,
    font_px: f32,
}

impl RasterCanvas {
    pub fn new() -> Self {
        Self {
            buffer: RgbaImage::new(0, 0),
            font: None,
            font_px: FONT_PX,
        }
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Loads a TrueType/OpenType font used for label chips.
    pub fn with_font_file(self, path: &Path) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path).map_err(|e| RenderError::Font {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| RenderError::Font {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.with_font(font))
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.buffer
    }
}

impl Default for RasterCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas2d for RasterCanvas {
    fn size(&self) -> DisplaySize {
        DisplaySize::new(self.buffer.width(), self.buffer.height())
    }

    fn resize(&mut self, size: DisplaySize) {
        self.buffer = RgbaImage::new(size.width, size.height);
    }

    fn clear(&mut self) {
        for p in self.buffer.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Rgba<u8>, line_width: u32) {
        let half = f64::from(line_width) / 2.0;
        for t in 0..line_width {
            let inset = f64::from(t);
            let x = (rect.x - half + inset).round() as i32;
            let y = (rect.y - half + inset).round() as i32;
            let w = (rect.w + 2.0 * (half - inset)).round();
            let h = (rect.h + 2.0 * (half - inset)).round();
            if w < 1.0 || h < 1.0 {
                continue;
            }
            draw_hollow_rect_mut(
                &mut self.buffer,
                Rect::at(x, y).of_size(w as u32, h as u32),
                color,
            );
        }
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>) {
        let (bw, bh) = self.buffer.dimensions();
        let x0 = rect.x.round().max(0.0) as u32;
        let y0 = rect.y.round().max(0.0) as u32;
        let x1 = ((rect.x + rect.w).round().max(0.0) as u32).min(bw);
        let y1 = ((rect.y + rect.h).round().max(0.0) as u32).min(bh);
        for y in y0..y1 {
            for x in x0..x1 {
                self.buffer.get_pixel_mut(x, y).blend(&color);
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: Rgba<u8>) {
        match &self.font {
            Some(font) => draw_text_mut(
                &mut self.buffer,
                color,
                x.round() as i32,
                y.round() as i32,
                PxScale::from(self.font_px),
                font,
                text,
            ),
            None => tracing::debug!(text, "no font loaded, label text not rasterized"),
        }
    }

    fn measure_text(&self, text: &str) -> f64 {
        match &self.font {
            Some(font) => f64::from(text_size(PxScale::from(self.font_px), font, text).0),
            None => text.chars().count() as f64 * f64::from(self.font_px) * FALLBACK_GLYPH_EM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_gives_transparent_backing_store() {
        let mut canvas = RasterCanvas::new();
        canvas.resize(DisplaySize::new(20, 10));
        assert_eq!(canvas.size(), DisplaySize::new(20, 10));
        assert!(canvas.pixels().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn stroke_is_two_pixels_wide_around_the_edge() {
        let mut canvas = RasterCanvas::new();
        canvas.resize(DisplaySize::new(50, 50));
        let red = Rgba([0xE1, 0x1D, 0x48, 255]);
        canvas.stroke_rect(
            PixelRect {
                x: 10.0,
                y: 10.0,
                w: 20.0,
                h: 20.0,
            },
            red,
            2,
        );
        assert_eq!(*canvas.pixels().get_pixel(9, 15), red);
        assert_eq!(*canvas.pixels().get_pixel(10, 15), red);
        assert_eq!(canvas.pixels().get_pixel(15, 15)[3], 0);
    }

    #[test]
    fn fill_is_clipped_and_blended() {
        let mut canvas = RasterCanvas::new();
        canvas.resize(DisplaySize::new(10, 10));
        canvas.fill_rect(
            PixelRect {
                x: -5.0,
                y: 8.0,
                w: 100.0,
                h: 18.0,
            },
            Rgba([0, 0, 0, 153]),
        );
        assert!((150..=155).contains(&canvas.pixels().get_pixel(0, 9)[3]));
        assert!((150..=155).contains(&canvas.pixels().get_pixel(9, 8)[3]));
        assert_eq!(canvas.pixels().get_pixel(0, 7)[3], 0);
    }

    #[test]
    fn text_width_is_estimated_without_font() {
        let canvas = RasterCanvas::new();
        assert!(!canvas.has_font());
        let w = canvas.measure_text("algal 90%");
        assert!((w - 9.0 * 13.0 * 0.55).abs() < 1e-9);
    }
}
