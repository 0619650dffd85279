//! Print composition sink.
//!
//! Builds one standalone HTML document with every label of a batch laid out
//! in a grid, then hands it to a [`PrintSurface`].

use std::io::Write;
use tracing::info;

use crate::batch::Batch;
use crate::error::{LabelkitError, Result};
use crate::html::esc;
use crate::label::{LabelSettings, compose};

/// A complete print-ready HTML document.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintDocument {
    pub html: String,
    pub labels: usize,
}

impl PrintDocument {
    /// Compose every unit with `settings` and wrap them in a print grid.
    pub fn build(batch: &Batch, settings: &LabelSettings) -> Result<Self> {
        settings.validate()?;

        let mut grid = String::new();
        let mut labels = 0usize;
        for (product, unit) in batch.pairs() {
            let fragment = compose(product, unit, settings)?;
            grid.push_str(&fragment.html);
            grid.push('\n');
            labels += 1;
        }

        let title = format!("{} labels", batch.mode);
        Ok(Self {
            html: print_shell(&title, &grid, settings),
            labels,
        })
    }
}

fn print_shell(title: &str, grid: &str, settings: &LabelSettings) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8"/>
<title>{title}</title>
<style>
body {{ margin: 0; padding: 8mm; background: #fff; }}
.grid {{ display: grid; grid-template-columns: repeat({cols}, {width}mm); gap: {gap}mm; }}
.label {{ box-sizing: border-box; overflow: hidden; padding: 1mm; display: flex; flex-direction: column; align-items: center; justify-content: center; text-align: center; page-break-inside: avoid; break-inside: avoid; }}
.label-business {{ font-weight: 600; }}
.label-name {{ font-weight: 700; }}
.label-code {{ max-width: 100%; max-height: 60%; image-rendering: pixelated; }}
.label-price {{ font-weight: 700; }}
@media print {{
  @page {{ margin: 5mm; }}
  body {{ padding: 0; }}
  .label {{ page-break-inside: avoid; break-inside: avoid; }}
}}
</style>
</head>
<body>
<div class="grid">
{grid}</div>
<script>
window.addEventListener('load', function () {{
  window.addEventListener('afterprint', function () {{ window.close(); }});
  window.print();
}});
</script>
</body>
</html>"#,
        title = esc(title),
        cols = settings.labels_per_row,
        width = settings.label_width_mm,
        gap = settings.gap_mm,
        grid = grid,
    )
}

/// Something that can display a document and start printing it.
pub trait PrintSurface {
    fn open(&self, document: &PrintDocument) -> Result<()>;
}

/// Writes the document to a temporary HTML file and opens it in the
/// platform browser, which runs the print dialog.
#[derive(Debug, Clone, Default)]
pub struct BrowserSurface;

impl PrintSurface for BrowserSurface {
    fn open(&self, document: &PrintDocument) -> Result<()> {
        let mut file = tempfile::Builder::new()
            .prefix("labelkit-print-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(document.html.as_bytes())?;
        let (_, path) = file
            .keep()
            .map_err(|e| LabelkitError::Io(e.error))?;

        webbrowser::open(&path.to_string_lossy())
            .map_err(|e| LabelkitError::PrintSurfaceUnavailable(e.to_string()))?;
        info!(path = %path.display(), labels = document.labels, "opened print document");
        Ok(())
    }
}

/// Writes the document to a fixed path without opening anything.
#[derive(Debug, Clone)]
pub struct FileSurface {
    pub path: std::path::PathBuf,
}

impl PrintSurface for FileSurface {
    fn open(&self, document: &PrintDocument) -> Result<()> {
        std::fs::write(&self.path, &document.html)?;
        info!(path = %self.path.display(), labels = document.labels, "wrote print document");
        Ok(())
    }
}

/// Build the print document and open it on `surface`.
pub fn print_batch(
    batch: &Batch,
    settings: &LabelSettings,
    surface: &dyn PrintSurface,
) -> Result<PrintDocument> {
    let document = PrintDocument::build(batch, settings)?;
    surface.open(&document)?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::generate;
    use crate::catalog::NewProduct;
    use crate::symbology::{CodeSettings, SymbolRenderer};

    struct BlockedSurface;

    impl PrintSurface for BlockedSurface {
        fn open(&self, _document: &PrintDocument) -> Result<()> {
            Err(LabelkitError::PrintSurfaceUnavailable("window blocked".into()))
        }
    }

    fn batch() -> Batch {
        generate(
            vec![
                NewProduct::new("Honey", "H-1").quantity(3).into_selected(),
                NewProduct::new("Jam", "J-1").into_selected(),
            ],
            &CodeSettings::qr(),
            &SymbolRenderer,
        )
        .unwrap()
    }

    #[test]
    fn test_document_structure() {
        let settings = LabelSettings {
            labels_per_row: 4,
            label_width_mm: 38.0,
            ..Default::default()
        };
        let doc = PrintDocument::build(&batch(), &settings).unwrap();
        assert_eq!(doc.labels, 4);
        assert_eq!(doc.html.matches("class=\"label\"").count(), 4);
        assert!(doc.html.contains("repeat(4, 38mm)"));
        assert!(doc.html.contains("@media print"));
        assert!(doc.html.contains("page-break-inside: avoid"));
        assert!(doc.html.contains("window.print()"));
        assert!(doc.html.contains("window.close()"));
    }

    #[test]
    fn test_blocked_surface_is_reported() {
        let err = print_batch(&batch(), &LabelSettings::default(), &BlockedSurface).unwrap_err();
        assert!(matches!(err, LabelkitError::PrintSurfaceUnavailable(_)));
    }

    #[test]
    fn test_file_surface() {
        let dir = tempfile::tempdir().unwrap();
        let surface = FileSurface {
            path: dir.path().join("print.html"),
        };
        let doc = print_batch(&batch(), &LabelSettings::default(), &surface).unwrap();
        let written = std::fs::read_to_string(dir.path().join("print.html")).unwrap();
        assert_eq!(written, doc.html);
    }
}
