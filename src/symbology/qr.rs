//! QR code rendering via the qrcode crate.

use qrcode::{EcLevel, QrCode};

use super::canvas::RenderedImage;
use super::settings::{BarcodeOptions, QrErrorLevel, QrOptions};
use super::{MAX_DIMENSION, RenderError};

fn ec_level(level: QrErrorLevel) -> EcLevel {
    match level {
        QrErrorLevel::L => EcLevel::L,
        QrErrorLevel::M => EcLevel::M,
        QrErrorLevel::Q => EcLevel::Q,
        QrErrorLevel::H => EcLevel::H,
    }
}

/// Render `value` as a QR code.
///
/// Dark modules use `colors.line_color`, light modules and the quiet zone
/// use `colors.background`.
pub fn render(
    value: &str,
    opts: &QrOptions,
    colors: &BarcodeOptions,
) -> Result<RenderedImage, RenderError> {
    let code = QrCode::with_error_correction_level(value, ec_level(opts.error_correction))
        .map_err(|e| RenderError::InvalidValue {
            value: value.to_string(),
            format: "QR".to_string(),
            reason: e.to_string(),
        })?;

    let scale = opts.scale.max(1);
    let qr_size = code.width() as u32;
    let pixel_size = (qr_size as u64 + opts.margin as u64 * 2).saturating_mul(scale as u64);
    if pixel_size > MAX_DIMENSION as u64 {
        return Err(RenderError::Encoder(format!(
            "QR surface {pixel_size}px exceeds {MAX_DIMENSION}px"
        )));
    }

    let pixel_size = pixel_size as u32;
    let mut surface = RenderedImage::new(pixel_size, pixel_size, colors.background);
    let offset = opts.margin * scale;

    for qy in 0..qr_size {
        for qx in 0..qr_size {
            if code[(qx as usize, qy as usize)] == qrcode::Color::Dark {
                surface.fill_rect(
                    offset + qx * scale,
                    offset + qy * scale,
                    scale,
                    scale,
                    colors.line_color,
                );
            }
        }
    }

    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbology::settings::Color;

    #[test]
    fn test_qr_dimensions() {
        let opts = QrOptions {
            margin: 2,
            scale: 3,
            ..Default::default()
        };
        let img = render("SKU-001", &opts, &BarcodeOptions::default()).unwrap();
        // Version 1 is 21 modules wide
        assert_eq!(img.width(), (21 + 4) * 3);
        assert_eq!(img.width(), img.height());
    }

    #[test]
    fn test_qr_colors() {
        let colors = BarcodeOptions {
            line_color: Color([0, 0, 255, 255]),
            background: Color([255, 255, 0, 255]),
            ..Default::default()
        };
        let opts = QrOptions {
            margin: 1,
            scale: 1,
            ..Default::default()
        };
        let img = render("hello", &opts, &colors).unwrap();
        // Quiet zone is light, finder pattern corner is dark
        assert_eq!(img.pixel(0, 0), Some(colors.background));
        assert_eq!(img.pixel(1, 1), Some(colors.line_color));
    }

    #[test]
    fn test_qr_too_long() {
        let value = "x".repeat(8000);
        let err = render(&value, &QrOptions::default(), &BarcodeOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidValue { .. }));
    }

    #[test]
    fn test_qr_huge_scale_does_not_wrap() {
        let opts = QrOptions {
            margin: u32::MAX / 2,
            scale: u32::MAX,
            ..Default::default()
        };
        let err = render("SKU-001", &opts, &BarcodeOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::Encoder(_)));
    }
}
