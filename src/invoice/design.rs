//! Invoice design settings, preset themes and the template choice.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LabelkitError;
use crate::symbology::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoPosition {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl LogoSize {
    pub fn height_px(&self) -> u32 {
        match self {
            LogoSize::Small => 40,
            LogoSize::Medium => 64,
            LogoSize::Large => 96,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Light,
    #[default]
    Normal,
    Medium,
    Bold,
}

impl FontWeight {
    pub fn css(&self) -> u16 {
        match self {
            FontWeight::Light => 300,
            FontWeight::Normal => 400,
            FontWeight::Medium => 500,
            FontWeight::Bold => 700,
        }
    }
}

/// Colors, typography and branding for rendered invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceDesignConfig {
    pub primary_color: Color,
    pub secondary_color: Color,
    pub accent_color: Color,
    pub text_color: Color,
    pub background_color: Color,
    pub font_family: String,
    pub font_weight: FontWeight,
    /// Multiplier on the base font size, 0.5..=2.0
    pub font_scale: f32,
    pub logo_url: Option<String>,
    pub logo_position: LogoPosition,
    pub logo_size: LogoSize,
    /// chrono strftime pattern
    pub date_format: String,
    pub currency_symbol: String,
    pub show_tax_breakdown: bool,
    pub footer_text: String,
}

impl Default for InvoiceDesignConfig {
    fn default() -> Self {
        Theme::Classic.config()
    }
}

impl InvoiceDesignConfig {
    pub fn validate(&self) -> Result<(), LabelkitError> {
        if !(0.5..=2.0).contains(&self.font_scale) {
            return Err(LabelkitError::InvalidInput(format!(
                "font scale {} outside 0.5..=2.0",
                self.font_scale
            )));
        }
        crate::label::check_date_format(&self.date_format)?;
        if let Some(url) = &self.logo_url {
            let ok = url.starts_with("https://")
                || url.starts_with("http://")
                || url.starts_with("data:image/");
            if !ok {
                return Err(LabelkitError::InvalidInput(
                    "logo must be an http(s) or data:image URL".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Preset themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Classic,
    Modern,
    Minimal,
    Bold,
    Elegant,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Classic,
        Theme::Modern,
        Theme::Minimal,
        Theme::Bold,
        Theme::Elegant,
    ];

    pub fn all() -> &'static [Theme] {
        &Self::ALL
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Modern => "modern",
            Theme::Minimal => "minimal",
            Theme::Bold => "bold",
            Theme::Elegant => "elegant",
        }
    }

    pub fn by_name(name: &str) -> Option<Theme> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// The full design config this theme stands for.
    pub fn config(&self) -> InvoiceDesignConfig {
        let base = InvoiceDesignConfig {
            primary_color: Color([0x1f, 0x29, 0x37, 255]),
            secondary_color: Color([0x6b, 0x72, 0x80, 255]),
            accent_color: Color([0x25, 0x63, 0xeb, 255]),
            text_color: Color([0x11, 0x18, 0x27, 255]),
            background_color: Color::WHITE,
            font_family: "Georgia, serif".to_string(),
            font_weight: FontWeight::Normal,
            font_scale: 1.0,
            logo_url: None,
            logo_position: LogoPosition::Left,
            logo_size: LogoSize::Medium,
            date_format: "%Y-%m-%d".to_string(),
            currency_symbol: "$".to_string(),
            show_tax_breakdown: true,
            footer_text: "Thank you for your business.".to_string(),
        };

        match self {
            Theme::Classic => base,
            Theme::Modern => InvoiceDesignConfig {
                primary_color: Color([0x0f, 0x76, 0x6e, 255]),
                accent_color: Color([0x14, 0xb8, 0xa6, 255]),
                font_family: "Inter, Helvetica, sans-serif".to_string(),
                font_weight: FontWeight::Medium,
                date_format: "%d %b %Y".to_string(),
                ..base
            },
            Theme::Minimal => InvoiceDesignConfig {
                primary_color: Color([0x11, 0x11, 0x11, 255]),
                secondary_color: Color([0x9c, 0xa3, 0xaf, 255]),
                accent_color: Color([0x11, 0x11, 0x11, 255]),
                font_family: "Helvetica, Arial, sans-serif".to_string(),
                font_weight: FontWeight::Light,
                show_tax_breakdown: false,
                ..base
            },
            Theme::Bold => InvoiceDesignConfig {
                primary_color: Color([0xb9, 0x1c, 0x1c, 255]),
                accent_color: Color([0xf5, 0x9e, 0x0b, 255]),
                font_family: "Arial Black, Arial, sans-serif".to_string(),
                font_weight: FontWeight::Bold,
                font_scale: 1.1,
                logo_size: LogoSize::Large,
                ..base
            },
            Theme::Elegant => InvoiceDesignConfig {
                primary_color: Color([0x4c, 0x1d, 0x95, 255]),
                secondary_color: Color([0x8b, 0x5c, 0xf6, 255]),
                accent_color: Color([0xc0, 0x84, 0xfc, 255]),
                font_family: "Garamond, 'Times New Roman', serif".to_string(),
                logo_position: LogoPosition::Center,
                date_format: "%B %-d, %Y".to_string(),
                ..base
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of the five invoice layouts is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct InvoiceTemplate(u8);

impl InvoiceTemplate {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(n: u8) -> Result<Self, LabelkitError> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Self(n))
        } else {
            Err(LabelkitError::InvalidInput(format!(
                "invoice template must be {}..={}, got {n}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = InvoiceTemplate> {
        (Self::MIN..=Self::MAX).map(InvoiceTemplate)
    }
}

impl Default for InvoiceTemplate {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for InvoiceTemplate {
    type Error = LabelkitError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<InvoiceTemplate> for u8 {
    fn from(t: InvoiceTemplate) -> u8 {
        t.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_bounds() {
        assert!(InvoiceTemplate::new(0).is_err());
        assert!(InvoiceTemplate::new(6).is_err());
        assert_eq!(InvoiceTemplate::new(5).unwrap().number(), 5);
        assert_eq!(InvoiceTemplate::all().count(), 5);
    }

    #[test]
    fn test_template_serde() {
        let t: InvoiceTemplate = serde_json::from_str("3").unwrap();
        assert_eq!(t.number(), 3);
        assert!(serde_json::from_str::<InvoiceTemplate>("9").is_err());
        assert_eq!(serde_json::to_string(&t).unwrap(), "3");
    }

    #[test]
    fn test_themes_are_distinct_and_valid() {
        for theme in Theme::ALL {
            assert!(theme.config().validate().is_ok(), "{theme}");
            assert_eq!(Theme::by_name(theme.name()), Some(theme));
        }
        assert_ne!(Theme::Modern.config(), Theme::Classic.config());
        assert_eq!(Theme::by_name("nope"), None);
    }

    #[test]
    fn test_validate_logo_url() {
        let mut c = InvoiceDesignConfig::default();
        c.logo_url = Some("javascript:alert(1)".into());
        assert!(c.validate().is_err());
        c.logo_url = Some("https://cdn.example.com/logo.png".into());
        assert!(c.validate().is_ok());
        c.font_scale = 3.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_date_format() {
        let mut c = InvoiceDesignConfig::default();
        c.date_format = "%d.%m.%Y %H:%M".into();
        assert!(matches!(c.validate(), Err(LabelkitError::InvalidInput(_))));
    }

    #[test]
    fn test_partial_json() {
        let c: InvoiceDesignConfig =
            serde_json::from_str(r##"{"primary_color": "#ff0000", "font_scale": 1.2}"##).unwrap();
        assert_eq!(c.primary_color, Color([255, 0, 0, 255]));
        assert_eq!(c.currency_symbol, "$");
    }
}
