//! Linear barcode encoding and rasterization.
//!
//! Symbol encoding is delegated to the barcoders crate; this module
//! normalizes values for each symbology (check digits, charset prefixes,
//! start/stop characters) and paints the module pattern onto a surface.

use barcoders::sym::codabar::Codabar;
use barcoders::sym::code39::Code39;
use barcoders::sym::code93::Code93;
use barcoders::sym::code128::Code128;
use barcoders::sym::ean8::EAN8;
use barcoders::sym::ean13::EAN13;
use barcoders::sym::tf::TF;

use super::canvas::RenderedImage;
use super::font;
use super::settings::{BarcodeFormat, BarcodeOptions, TextAlign, TextPosition};
use super::{MAX_DIMENSION, RenderError};

/// An encoded symbol: module pattern plus the text to print under it.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSymbol {
    /// One entry per module, true = bar.
    pub modules: Vec<bool>,
    /// Human-readable interpretation (includes computed check digits).
    pub text: String,
}

/// Encode `value` in the given symbology.
pub fn encode(value: &str, format: BarcodeFormat) -> Result<EncodedSymbol, RenderError> {
    let invalid = |reason: String| RenderError::InvalidValue {
        value: value.to_string(),
        format: format.to_string(),
        reason,
    };

    let (encoded, text) = match format {
        BarcodeFormat::Code128 => {
            // Character set B covers upper/lower case, digits and punctuation.
            let prefixed = format!("\u{0181}{}", value);
            let sym = Code128::new(&prefixed).map_err(|e| invalid(e.to_string()))?;
            (sym.encode(), value.to_string())
        }
        BarcodeFormat::Code39 => {
            let sym = Code39::new(value).map_err(|e| invalid(e.to_string()))?;
            (sym.encode(), value.to_string())
        }
        BarcodeFormat::Code93 => {
            let sym = Code93::new(value).map_err(|e| invalid(e.to_string()))?;
            (sym.encode(), value.to_string())
        }
        BarcodeFormat::Ean13 => {
            let data = ean_payload(value, 12).map_err(invalid)?;
            let sym = EAN13::new(&data).map_err(|e| invalid(e.to_string()))?;
            (sym.encode(), with_check_digit(&data))
        }
        BarcodeFormat::Ean8 => {
            let data = ean_payload(value, 7).map_err(invalid)?;
            let sym = EAN8::new(&data).map_err(|e| invalid(e.to_string()))?;
            (sym.encode(), with_check_digit(&data))
        }
        BarcodeFormat::UpcA => {
            // UPC-A is EAN-13 with a leading zero.
            let data = ean_payload(value, 11).map_err(invalid)?;
            let sym = EAN13::new(format!("0{data}")).map_err(|e| invalid(e.to_string()))?;
            (sym.encode(), with_check_digit(&data))
        }
        BarcodeFormat::Itf => {
            if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid("ITF accepts digits only".into()));
            }
            if value.len() % 2 != 0 {
                return Err(invalid("ITF requires an even number of digits".into()));
            }
            let sym = TF::interleaved(value).map_err(|e| invalid(e.to_string()))?;
            (sym.encode(), value.to_string())
        }
        BarcodeFormat::Codabar => {
            let data = codabar_payload(value);
            let sym = Codabar::new(&data).map_err(|e| invalid(e.to_string()))?;
            (sym.encode(), value.to_string())
        }
    };

    if encoded.is_empty() {
        return Err(invalid("encoder produced no modules".into()));
    }

    Ok(EncodedSymbol {
        modules: encoded.into_iter().map(|m| m == 1).collect(),
        text,
    })
}

/// Paint an encoded symbol with the given options.
pub fn rasterize(symbol: &EncodedSymbol, opts: &BarcodeOptions) -> Result<RenderedImage, RenderError> {
    let module_width = opts.module_width.max(1);
    let show_text = opts.display_value && !symbol.text.is_empty();

    // u64 so oversized options are reported instead of wrapping
    let wide_bars = symbol.modules.len() as u64 * module_width as u64;
    let wide_text = if show_text {
        opts.font_size as u64 + opts.text_margin as u64
    } else {
        0
    };
    let wide_width = wide_bars + opts.margin as u64 * 2;
    let wide_height = opts.height as u64 + wide_text + opts.margin as u64 * 2;
    if wide_width > MAX_DIMENSION as u64 || wide_height > MAX_DIMENSION as u64 {
        return Err(RenderError::Encoder(format!(
            "barcode surface {wide_width}x{wide_height} exceeds {MAX_DIMENSION}px"
        )));
    }
    let (bars_width, text_block) = (wide_bars as u32, wide_text as u32);
    let (width, height) = (wide_width as u32, wide_height as u32);

    let mut surface = RenderedImage::new(width, height, opts.background);

    let (bars_y, text_y) = match opts.text_position {
        TextPosition::Top => (opts.margin + text_block, opts.margin),
        TextPosition::Bottom => (
            opts.margin,
            opts.margin + opts.height + opts.text_margin,
        ),
    };

    for (i, &is_bar) in symbol.modules.iter().enumerate() {
        if is_bar {
            let x = opts.margin + i as u32 * module_width;
            surface.fill_rect(x, bars_y, module_width, opts.height, opts.line_color);
        }
    }

    if text_block > 0 {
        let text_w = font::text_width(&symbol.text, opts.font_size);
        let text_x = match opts.text_align {
            TextAlign::Left => opts.margin,
            TextAlign::Center => opts.margin + bars_width.saturating_sub(text_w) / 2,
            TextAlign::Right => opts.margin + bars_width.saturating_sub(text_w),
        };
        font::draw_text(
            &mut surface,
            &symbol.text,
            text_x,
            text_y,
            opts.font_size,
            opts.line_color,
        );
    }

    Ok(surface)
}

/// Validate an EAN/UPC value and strip its check digit.
///
/// Accepts either `data_len` digits (check digit computed by the encoder) or
/// `data_len + 1` digits with a correct check digit.
fn ean_payload(value: &str, data_len: usize) -> Result<String, String> {
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err("value must be numeric".into());
    }
    match value.len() {
        n if n == data_len => Ok(value.to_string()),
        n if n == data_len + 1 => {
            let (data, check) = value.split_at(data_len);
            let expected = check_digit(data);
            if check.as_bytes()[0] - b'0' != expected {
                return Err(format!("check digit should be {expected}"));
            }
            Ok(data.to_string())
        }
        n => Err(format!(
            "expected {} or {} digits, got {n}",
            data_len,
            data_len + 1
        )),
    }
}

/// GS1 mod-10 check digit over an all-digit string.
pub fn check_digit(data: &str) -> u8 {
    let sum: u32 = data
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = (b - b'0') as u32;
            if i % 2 == 0 { d * 3 } else { d }
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

fn with_check_digit(data: &str) -> String {
    format!("{data}{}", check_digit(data))
}

/// Codabar needs start/stop characters; default both to `A` when absent.
fn codabar_payload(value: &str) -> String {
    let is_guard = |c: char| matches!(c.to_ascii_uppercase(), 'A' | 'B' | 'C' | 'D');
    let starts = value.chars().next().is_some_and(is_guard);
    let ends = value.len() > 1 && value.chars().last().is_some_and(is_guard);
    if starts && ends {
        value.to_uppercase()
    } else {
        format!("A{}A", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code128_encoding() {
        let sym = encode("Hello-42", BarcodeFormat::Code128).unwrap();
        assert!(!sym.modules.is_empty());
        assert!(sym.modules.iter().any(|&b| b));
        assert_eq!(sym.text, "Hello-42");
    }

    #[test]
    fn test_code39_encoding() {
        let sym = encode("ABC-123", BarcodeFormat::Code39).unwrap();
        assert!(sym.modules.iter().any(|&b| b));
    }

    #[test]
    fn test_ean13_twelve_digits() {
        let sym = encode("590123412345", BarcodeFormat::Ean13).unwrap();
        assert_eq!(sym.text, "5901234123457");
        // 3 + 42 + 5 + 42 + 3 modules
        assert_eq!(sym.modules.len(), 95);
    }

    #[test]
    fn test_ean13_with_check_digit() {
        let sym = encode("5901234123457", BarcodeFormat::Ean13).unwrap();
        assert_eq!(sym.text, "5901234123457");
    }

    #[test]
    fn test_ean13_rejects_bad_input() {
        for value in ["5901234123450", "12345", "ABCDEFGHIJKL"] {
            let err = encode(value, BarcodeFormat::Ean13).unwrap_err();
            assert!(matches!(err, RenderError::InvalidValue { .. }), "{value}");
        }
    }

    #[test]
    fn test_upca_check_digit() {
        let sym = encode("03600029145", BarcodeFormat::UpcA).unwrap();
        assert_eq!(sym.text, "036000291452");
    }

    #[test]
    fn test_ean8() {
        let sym = encode("9638507", BarcodeFormat::Ean8).unwrap();
        assert_eq!(sym.text, "96385074");
        assert_eq!(sym.modules.len(), 67);
    }

    #[test]
    fn test_itf_requires_even_digits() {
        assert!(encode("1234", BarcodeFormat::Itf).is_ok());
        assert!(matches!(
            encode("123", BarcodeFormat::Itf),
            Err(RenderError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_codabar_guards_added() {
        assert_eq!(codabar_payload("12345"), "A12345A");
        assert_eq!(codabar_payload("b123c"), "B123C");
    }

    #[test]
    fn test_rasterize_dimensions() {
        let sym = encode("590123412345", BarcodeFormat::Ean13).unwrap();
        let opts = BarcodeOptions::default();
        let img = rasterize(&sym, &opts).unwrap();
        assert_eq!(img.width(), 95 * 2 + 20);
        assert_eq!(img.height(), 100 + 20 + 2 + 20);
    }

    #[test]
    fn test_rasterize_without_text() {
        let sym = encode("1234", BarcodeFormat::Itf).unwrap();
        let opts = BarcodeOptions {
            display_value: false,
            margin: 0,
            ..Default::default()
        };
        let img = rasterize(&sym, &opts).unwrap();
        assert_eq!(img.height(), 100);
        // First module of ITF start pattern is a bar
        assert_eq!(img.pixel(0, 0), Some(opts.line_color));
    }

    #[test]
    fn test_rasterize_too_large() {
        let sym = encode("1234", BarcodeFormat::Itf).unwrap();
        let opts = BarcodeOptions {
            height: MAX_DIMENSION + 1,
            ..Default::default()
        };
        assert!(matches!(rasterize(&sym, &opts), Err(RenderError::Encoder(_))));
    }

    #[test]
    fn test_rasterize_huge_margin_does_not_wrap() {
        let sym = encode("1234", BarcodeFormat::Itf).unwrap();
        let opts = BarcodeOptions {
            margin: u32::MAX / 2 + 1,
            font_size: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(rasterize(&sym, &opts), Err(RenderError::Encoder(_))));
    }
}
