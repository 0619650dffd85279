//! HTML invoice preview.
//!
//! Renders a sample invoice with a design config and one of the five
//! layouts. The output is a standalone HTML document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::design::{InvoiceDesignConfig, InvoiceTemplate, LogoPosition};
use crate::html::{css_value, esc};
use crate::label::{format_date, format_price};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub address: Vec<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
    /// Fraction, 0.2 for 20%
    pub tax_rate: f64,
}

impl InvoiceLine {
    pub fn net(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }

    pub fn tax(&self) -> f64 {
        self.net() * self.tax_rate
    }
}

/// Invoice content used to preview a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleInvoice {
    pub number: String,
    pub issued: NaiveDate,
    pub due: NaiveDate,
    pub seller: Party,
    pub customer: Party,
    pub lines: Vec<InvoiceLine>,
    pub notes: Option<String>,
}

impl SampleInvoice {
    pub fn demo() -> Self {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
        Self {
            number: "INV-0042".to_string(),
            issued: date(2026, 3, 14),
            due: date(2026, 4, 13),
            seller: Party {
                name: "Corner Grocery".to_string(),
                address: vec!["12 Market Street".to_string(), "Springfield".to_string()],
                email: Some("hello@cornergrocery.example".to_string()),
            },
            customer: Party {
                name: "Blue Door Cafe".to_string(),
                address: vec!["3 Harbour Road".to_string(), "Shelbyville".to_string()],
                email: None,
            },
            lines: vec![
                InvoiceLine {
                    description: "Organic oat milk 1L".to_string(),
                    quantity: 24,
                    unit_price: 1.85,
                    tax_rate: 0.0,
                },
                InvoiceLine {
                    description: "Espresso beans 1kg".to_string(),
                    quantity: 6,
                    unit_price: 18.50,
                    tax_rate: 0.2,
                },
                InvoiceLine {
                    description: "Paper cups (box of 100)".to_string(),
                    quantity: 4,
                    unit_price: 7.25,
                    tax_rate: 0.2,
                },
            ],
            notes: Some("Payment by bank transfer within 30 days.".to_string()),
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(InvoiceLine::net).sum()
    }

    pub fn tax(&self) -> f64 {
        self.lines.iter().map(InvoiceLine::tax).sum()
    }

    pub fn total(&self) -> f64 {
        self.subtotal() + self.tax()
    }
}

/// Render `sample` as an HTML document using `config` and `template`.
pub fn render_preview(
    config: &InvoiceDesignConfig,
    template: InvoiceTemplate,
    sample: &SampleInvoice,
) -> String {
    let header = match template.number() {
        2 => banner_header(config, sample),
        3 => split_header(config, sample),
        4 => compact_header(config, sample),
        5 => centered_header(config, sample),
        _ => classic_header(config, sample),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8"/>
<title>Invoice {number}</title>
<style>
{style}
</style>
</head>
<body>
<div class="invoice template-{n}">
{header}
{parties}
{lines}
{totals}
{footer}
</div>
</body>
</html>"#,
        number = esc(&sample.number),
        style = stylesheet(config, template),
        n = template.number(),
        header = header,
        parties = parties(sample),
        lines = line_table(config, sample),
        totals = totals(config, sample),
        footer = footer(config, sample),
    )
}

fn stylesheet(config: &InvoiceDesignConfig, template: InvoiceTemplate) -> String {
    let base_pt = 10.0 * config.font_scale;
    let mut css = format!(
        "body {{ margin: 0; background: {bg}; color: {text}; font-family: {font}; font-weight: {weight}; font-size: {base_pt:.1}pt; }}\n\
         .invoice {{ max-width: 800px; margin: 0 auto; padding: 32px; }}\n\
         h1 {{ color: {primary}; margin: 0; }}\n\
         .meta, .party-email {{ color: {secondary}; }}\n\
         .logo {{ height: {logo}px; }}\n\
         table.lines {{ width: 100%; border-collapse: collapse; margin-top: 24px; }}\n\
         table.lines th {{ text-align: left; border-bottom: 2px solid {accent}; padding: 6px 4px; }}\n\
         table.lines td {{ padding: 6px 4px; border-bottom: 1px solid {secondary}33; }}\n\
         .num {{ text-align: right; }}\n\
         .totals {{ margin-top: 16px; margin-left: auto; width: 40%; }}\n\
         .totals .grand {{ color: {primary}; font-weight: 700; border-top: 2px solid {accent}; }}\n\
         footer {{ margin-top: 32px; color: {secondary}; font-size: 0.9em; }}\n",
        bg = config.background_color.to_hex(),
        text = config.text_color.to_hex(),
        font = css_value(&config.font_family),
        weight = config.font_weight.css(),
        primary = config.primary_color.to_hex(),
        secondary = config.secondary_color.to_hex(),
        accent = config.accent_color.to_hex(),
        logo = config.logo_size.height_px(),
    );

    let extra = match template.number() {
        2 => format!(
            ".banner {{ background: {}; color: #fff; padding: 24px; margin: -32px -32px 24px; }}\n.banner h1 {{ color: inherit; }}\n",
            config.primary_color.to_hex()
        ),
        3 => ".split { display: grid; grid-template-columns: 1fr 1fr; gap: 24px; }\n".to_string(),
        4 => ".compact { display: flex; justify-content: space-between; align-items: baseline; }\ntable.lines td { padding: 3px 4px; }\n".to_string(),
        5 => ".centered { text-align: center; }\n".to_string(),
        _ => ".classic { display: flex; justify-content: space-between; }\n".to_string(),
    };
    css.push_str(&extra);
    css
}

fn logo(config: &InvoiceDesignConfig) -> String {
    match &config.logo_url {
        Some(url) => {
            let align = match config.logo_position {
                LogoPosition::Left => "left",
                LogoPosition::Center => "center",
                LogoPosition::Right => "right",
            };
            format!(
                r#"<div class="logo-wrap" style="text-align:{align}"><img class="logo" src="{}" alt="logo"/></div>"#,
                esc(url)
            )
        }
        None => String::new(),
    }
}

fn meta(config: &InvoiceDesignConfig, sample: &SampleInvoice) -> String {
    format!(
        r#"<div class="meta">Invoice {} &middot; Issued {} &middot; Due {}</div>"#,
        esc(&sample.number),
        esc(&format_date(sample.issued, &config.date_format)),
        esc(&format_date(sample.due, &config.date_format)),
    )
}

fn classic_header(config: &InvoiceDesignConfig, sample: &SampleInvoice) -> String {
    format!(
        r#"<header class="classic"><div>{}<h1>{}</h1></div><div>{}</div></header>"#,
        logo(config),
        esc(&sample.seller.name),
        meta(config, sample)
    )
}

fn banner_header(config: &InvoiceDesignConfig, sample: &SampleInvoice) -> String {
    format!(
        r#"<header class="banner">{}<h1>INVOICE</h1>{}</header>"#,
        logo(config),
        meta(config, sample)
    )
}

fn split_header(config: &InvoiceDesignConfig, sample: &SampleInvoice) -> String {
    format!(
        r#"<header class="split"><div>{}<h1>{}</h1></div><div>{}</div></header>"#,
        logo(config),
        esc(&sample.seller.name),
        meta(config, sample)
    )
}

fn compact_header(config: &InvoiceDesignConfig, sample: &SampleInvoice) -> String {
    format!(
        r#"<header class="compact"><h1>{}</h1>{}</header>"#,
        esc(&sample.seller.name),
        meta(config, sample)
    )
}

fn centered_header(config: &InvoiceDesignConfig, sample: &SampleInvoice) -> String {
    format!(
        r#"<header class="centered">{}<h1>{}</h1>{}</header>"#,
        logo(config),
        esc(&sample.seller.name),
        meta(config, sample)
    )
}

fn party(label: &str, p: &Party) -> String {
    let mut html = format!(
        r#"<div class="party"><strong>{}</strong><div>{}</div>"#,
        esc(label),
        esc(&p.name)
    );
    for line in &p.address {
        let _ = write!(html, "<div>{}</div>", esc(line));
    }
    if let Some(email) = &p.email {
        let _ = write!(html, r#"<div class="party-email">{}</div>"#, esc(email));
    }
    html.push_str("</div>");
    html
}

fn parties(sample: &SampleInvoice) -> String {
    format!(
        r#"<section class="parties" style="display:flex;justify-content:space-between;margin-top:24px">{}{}</section>"#,
        party("From", &sample.seller),
        party("Bill to", &sample.customer)
    )
}

fn line_table(config: &InvoiceDesignConfig, sample: &SampleInvoice) -> String {
    let sym = &config.currency_symbol;
    let mut rows = String::new();
    for line in &sample.lines {
        let _ = write!(
            rows,
            r#"<tr><td>{}</td><td class="num">{}</td><td class="num">{}</td><td class="num">{}</td></tr>"#,
            esc(&line.description),
            line.quantity,
            esc(&format_price(sym, line.unit_price)),
            esc(&format_price(sym, line.net())),
        );
    }
    format!(
        r#"<table class="lines"><thead><tr><th>Item</th><th class="num">Qty</th><th class="num">Unit</th><th class="num">Amount</th></tr></thead><tbody>{rows}</tbody></table>"#
    )
}

fn totals(config: &InvoiceDesignConfig, sample: &SampleInvoice) -> String {
    let sym = &config.currency_symbol;
    let mut html = String::from(r#"<table class="totals">"#);
    if config.show_tax_breakdown {
        let _ = write!(
            html,
            r#"<tr class="subtotal"><td>Subtotal</td><td class="num">{}</td></tr><tr class="tax"><td>Tax</td><td class="num">{}</td></tr>"#,
            esc(&format_price(sym, sample.subtotal())),
            esc(&format_price(sym, sample.tax())),
        );
    }
    let _ = write!(
        html,
        r#"<tr class="grand"><td>Total</td><td class="num">{}</td></tr></table>"#,
        esc(&format_price(sym, sample.total()))
    );
    html
}

fn footer(config: &InvoiceDesignConfig, sample: &SampleInvoice) -> String {
    let notes = sample
        .notes
        .as_deref()
        .map(|n| format!("<p>{}</p>", esc(n)))
        .unwrap_or_default();
    format!("<footer>{notes}<p>{}</p></footer>", esc(&config.footer_text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::Theme;

    #[test]
    fn test_totals() {
        let s = SampleInvoice::demo();
        assert!((s.subtotal() - 184.40).abs() < 1e-9);
        assert!((s.tax() - 28.00).abs() < 1e-9);
        assert!((s.total() - 212.40).abs() < 1e-9);
    }

    #[test]
    fn test_each_template_renders_its_layout() {
        let config = InvoiceDesignConfig::default();
        let sample = SampleInvoice::demo();
        for (template, class) in InvoiceTemplate::all().zip([
            "classic", "banner", "split", "compact", "centered",
        ]) {
            let html = render_preview(&config, template, &sample);
            assert!(
                html.contains(&format!(r#"<header class="{class}">"#)),
                "template {}",
                template.number()
            );
            assert!(html.contains("Espresso beans 1kg"));
            assert!(html.contains("$212.40"));
        }
    }

    #[test]
    fn test_design_flows_into_markup() {
        let mut config = Theme::Modern.config();
        config.currency_symbol = "€".into();
        config.show_tax_breakdown = false;
        config.logo_url = Some("https://cdn.example.com/l.png".into());
        let html = render_preview(&config, InvoiceTemplate::default(), &SampleInvoice::demo());
        assert!(html.contains("#0f766e"));
        assert!(html.contains("€212.40"));
        assert!(!html.contains("Subtotal"));
        assert!(html.contains("14 Mar 2026"));
        assert!(html.contains(r#"src="https://cdn.example.com/l.png""#));
    }

    #[test]
    fn test_time_only_date_format_renders_iso() {
        let config = InvoiceDesignConfig {
            date_format: "%H:%M".into(),
            ..Default::default()
        };
        let html = render_preview(&config, InvoiceTemplate::default(), &SampleInvoice::demo());
        assert!(html.contains("Issued 2026-03-14"));
    }

    #[test]
    fn test_escapes_content() {
        let mut sample = SampleInvoice::demo();
        sample.customer.name = "<script>x</script>".into();
        let html = render_preview(&InvoiceDesignConfig::default(), InvoiceTemplate::default(), &sample);
        assert!(!html.contains("<script>x"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
