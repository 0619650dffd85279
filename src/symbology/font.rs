//! Human-readable text under (or above) linear barcodes.
//!
//! Uses the Spleen 12x24 bitmap font, scaled nearest-neighbor to the
//! requested text height. Glyphs keep the font's 1:2 aspect ratio.

use spleen_font::{FONT_12X24, PSF2Font};

use super::canvas::RenderedImage;
use super::settings::Color;

const GLYPH_W: usize = 12;
const GLYPH_H: usize = 24;

/// A 12x24 glyph bitmap, one byte per pixel (1 = ink).
pub struct Glyph {
    bits: Vec<u8>,
}

impl Glyph {
    fn get(&self, x: usize, y: usize) -> bool {
        self.bits.get(y * GLYPH_W + x).copied().unwrap_or(0) != 0
    }
}

/// Glyph bitmap for `ch`; characters missing from the font draw a box.
pub fn glyph(ch: char) -> Glyph {
    let mut bits = vec![0u8; GLYPH_W * GLYPH_H];
    let utf8 = ch.to_string();

    let mut found = false;
    if let Ok(mut spleen) = PSF2Font::new(FONT_12X24)
        && let Some(spleen_glyph) = spleen.glyph_for_utf8(utf8.as_bytes())
    {
        for (row_y, row) in spleen_glyph.enumerate() {
            for (col_x, on) in row.enumerate() {
                let idx = row_y * GLYPH_W + col_x;
                if col_x < GLYPH_W && idx < bits.len() {
                    bits[idx] = if on { 1 } else { 0 };
                }
            }
        }
        found = true;
    }

    if !found && !ch.is_whitespace() {
        draw_box(&mut bits);
    }
    Glyph { bits }
}

/// Width in pixels of `text` rendered at `height` pixels.
pub fn text_width(text: &str, height: u32) -> u32 {
    char_width(height) * text.chars().count() as u32
}

/// Draw `text` with its top-left corner at (`x`, `y`).
pub fn draw_text(surface: &mut RenderedImage, text: &str, x: u32, y: u32, height: u32, color: Color) {
    let height = height.max(1);
    let width = char_width(height);

    for (i, ch) in text.chars().enumerate() {
        let g = glyph(ch);
        let origin_x = x + i as u32 * width;
        for dy in 0..height {
            let sy = dy as usize * GLYPH_H / height as usize;
            for dx in 0..width {
                let sx = dx as usize * GLYPH_W / width as usize;
                if g.get(sx, sy) {
                    surface.fill_rect(origin_x + dx, y + dy, 1, 1, color);
                }
            }
        }
    }
}

fn char_width(height: u32) -> u32 {
    (height / 2).max(1)
}

fn draw_box(bits: &mut [u8]) {
    for x in 0..GLYPH_W {
        bits[x] = 1;
        bits[(GLYPH_H - 1) * GLYPH_W + x] = 1;
    }
    for y in 0..GLYPH_H {
        bits[y * GLYPH_W] = 1;
        bits[y * GLYPH_W + GLYPH_W - 1] = 1;
    }
}
