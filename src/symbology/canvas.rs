//! Drawing surface for rendered codes.

use base64::Engine as _;
use image::{ImageEncoder, Rgba, RgbaImage};

use super::settings::Color;
use crate::error::LabelkitError;

/// A rendered code image: an RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    image: RgbaImage,
}

impl RenderedImage {
    /// Allocate a surface filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), Rgba(background.0)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Fill a rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        let x_end = x.saturating_add(w).min(self.width());
        let y_end = y.saturating_add(h).min(self.height());
        for py in y..y_end {
            for px in x..x_end {
                self.image.put_pixel(px, py, Rgba(color.0));
            }
        }
    }

    /// Read a pixel, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        (x < self.width() && y < self.height()).then(|| Color(self.image.get_pixel(x, y).0))
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, LabelkitError> {
        let mut png_bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                self.image.as_raw(),
                self.width(),
                self.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e: image::ImageError| LabelkitError::Image(e.to_string()))?;
        Ok(png_bytes)
    }

    /// Encode as a `data:image/png;base64,...` URI.
    pub fn to_data_uri(&self) -> Result<String, LabelkitError> {
        let png = self.to_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips() {
        let mut img = RenderedImage::new(4, 4, Color::WHITE);
        img.fill_rect(2, 2, 10, 10, Color::BLACK);
        assert_eq!(img.pixel(3, 3), Some(Color::BLACK));
        assert_eq!(img.pixel(1, 1), Some(Color::WHITE));
        assert_eq!(img.pixel(4, 4), None);
    }

    #[test]
    fn test_png_decodes() {
        let img = RenderedImage::new(7, 3, Color::WHITE);
        let png = img.to_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (7, 3));
    }

    #[test]
    fn test_data_uri_prefix() {
        let uri = RenderedImage::new(1, 1, Color::BLACK).to_data_uri().unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }
}
