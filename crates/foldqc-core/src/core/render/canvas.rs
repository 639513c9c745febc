use super::colormap::Rgb;
use super::glyphs::{self, GLYPH_SIZE};
use std::io::Write;

const METERS_PER_INCH: f64 = 0.0254;

/// An RGB8 raster. All drawing operations clip silently at the edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&background);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    #[inline]
    pub fn put_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[idx..idx + 3].copy_from_slice(&color);
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgb) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i64);
        let y1 = (y + h).min(self.height as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                self.put_pixel(px, py, color);
            }
        }
    }

    /// Draws a frame of `thickness` pixels just outside the given rectangle.
    pub fn stroke_rect(&mut self, x: i64, y: i64, w: i64, h: i64, thickness: i64, color: Rgb) {
        let t = thickness;
        self.fill_rect(x - t, y - t, w + 2 * t, t, color);
        self.fill_rect(x - t, y + h, w + 2 * t, t, color);
        self.fill_rect(x - t, y, t, h, color);
        self.fill_rect(x + w, y, t, h, color);
    }

    /// Width in pixels of `text` drawn at `scale`.
    pub fn text_extent(text: &str, scale: u32) -> i64 {
        text.chars().count() as i64 * (GLYPH_SIZE * scale) as i64
    }

    /// Draws `text` left to right with its top-left corner at `(x, y)`.
    pub fn draw_text(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb) {
        let s = scale as i64;
        let cell = GLYPH_SIZE as i64 * s;
        for (k, c) in text.chars().enumerate() {
            let bitmap = glyphs::glyph(c);
            let origin_x = x + k as i64 * cell;
            for gy in 0..GLYPH_SIZE {
                for gx in 0..GLYPH_SIZE {
                    if glyphs::is_set(&bitmap, gx, gy) {
                        self.fill_rect(origin_x + gx as i64 * s, y + gy as i64 * s, s, s, color);
                    }
                }
            }
        }
    }

    /// Draws `text` rotated a quarter turn counter-clockwise, reading bottom to
    /// top. `(x, bottom)` is the bottom-left corner of the rotated run.
    pub fn draw_text_vertical(&mut self, x: i64, bottom: i64, text: &str, scale: u32, color: Rgb) {
        let s = scale as i64;
        let cell = GLYPH_SIZE as i64 * s;
        for (k, c) in text.chars().enumerate() {
            let bitmap = glyphs::glyph(c);
            let block_bottom = bottom - k as i64 * cell;
            for gy in 0..GLYPH_SIZE {
                for gx in 0..GLYPH_SIZE {
                    if glyphs::is_set(&bitmap, gx, gy) {
                        let px = x + gy as i64 * s;
                        let py = block_bottom - (gx as i64 + 1) * s;
                        self.fill_rect(px, py, s, s, color);
                    }
                }
            }
        }
    }

    /// Encodes the canvas as an 8-bit RGB PNG tagged with `dpi`.
    pub fn write_png(&self, writer: impl Write, dpi: u32) -> Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let ppm = (dpi as f64 / METERS_PER_INCH).round() as u32;
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));
        let mut png_writer = encoder.write_header()?;
        png_writer.write_image_data(&self.pixels)?;
        png_writer.finish()
    }
}
