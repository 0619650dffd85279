//! Individual file download sink.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::batch::Batch;
use crate::catalog::SelectedProduct;
use crate::error::{LabelkitError, Result};
use crate::symbology::CodeMode;

/// Destination for saved files.
pub trait FileSaver {
    fn save(&mut self, name: &str, bytes: &[u8]) -> Result<()>;
}

/// Writes each file into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySaver {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FileSaver for DirectorySaver {
    fn save(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        if name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(LabelkitError::InvalidInput(format!("bad file name '{name}'")));
        }
        let path = self.dir.join(name);
        std::fs::write(&path, bytes)?;
        self.written.push(path);
        Ok(())
    }
}

/// Keeps saved files in memory, in call order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSaver {
    pub files: Vec<(String, Vec<u8>)>,
}

impl RecordingSaver {
    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(|(n, _)| n.as_str()).collect()
    }
}

impl FileSaver for RecordingSaver {
    fn save(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.files.push((name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Name stem for a product: the name slug, else the SKU slug, else `product`.
pub fn product_stem(product: &SelectedProduct) -> String {
    let mut stem = slug::slugify(&product.name);
    if stem.is_empty() {
        stem = slug::slugify(&product.sku);
    }
    if stem.is_empty() {
        stem = "product".to_string();
    }
    stem
}

/// Stems for every product in `selected`, keyed by product id and unique
/// across the slice. Products sharing a stem get their SKU slug appended;
/// stems that still clash get a numeric suffix in selection order.
pub fn product_stems(selected: &[SelectedProduct]) -> HashMap<&str, String> {
    let mut shared: HashMap<String, usize> = HashMap::new();
    for product in selected {
        *shared.entry(product_stem(product)).or_default() += 1;
    }

    let mut taken: HashSet<String> = HashSet::new();
    let mut stems = HashMap::with_capacity(selected.len());
    for product in selected {
        if stems.contains_key(product.id.as_str()) {
            continue;
        }
        let base = product_stem(product);
        let sku = slug::slugify(&product.sku);
        let preferred = if shared[&base] > 1 && !sku.is_empty() && sku != base {
            format!("{base}-{sku}")
        } else {
            base
        };

        let mut stem = preferred.clone();
        let mut n = 2;
        while taken.contains(&stem) {
            stem = format!("{preferred}-{n}");
            n += 1;
        }
        if stem != preferred {
            debug!(product = %product.name, stem = %stem, "file name stem already taken");
        }
        taken.insert(stem.clone());
        stems.insert(product.id.as_str(), stem);
    }
    stems
}

/// File name for one unit: `{stem}-{mode}-{n}.png`, `n` starting at 1.
pub fn unit_file_name(stem: &str, mode: CodeMode, unit_index: u32) -> String {
    format!("{stem}-{}-{}.png", mode.as_str(), unit_index + 1)
}

/// File name of every unit of `batch`, in generation order. No two units
/// of one batch share a name.
pub fn unit_file_names(batch: &Batch) -> Vec<String> {
    let stems = product_stems(&batch.selected);
    batch
        .pairs()
        .map(|(product, unit)| {
            let stem = stems
                .get(product.id.as_str())
                .cloned()
                .unwrap_or_else(|| product_stem(product));
            unit_file_name(&stem, batch.mode, unit.unit_index)
        })
        .collect()
}

/// Every unit as a `(file name, png bytes)` pair, in generation order.
pub fn unit_files(batch: &Batch) -> Result<Vec<(String, Vec<u8>)>> {
    unit_file_names(batch)
        .into_iter()
        .zip(batch.pairs())
        .map(|(name, (_, unit))| Ok((name, unit.image.to_png()?)))
        .collect()
}

/// Save each unit as its own PNG file. Returns the number of files saved.
pub fn download_all(batch: &Batch, saver: &mut dyn FileSaver) -> Result<usize> {
    let files = unit_files(batch)?;
    for (name, bytes) in &files {
        saver.save(name, bytes)?;
    }
    info!(files = files.len(), "saved individual code images");
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NewProduct;

    #[test]
    fn test_unit_file_name() {
        let p = NewProduct::new("Organic Oat Milk 1L", "OAT-1").into_selected();
        let stem = product_stem(&p);
        assert_eq!(
            unit_file_name(&stem, CodeMode::Barcode, 0),
            "organic-oat-milk-1l-barcode-1.png"
        );
        assert_eq!(
            unit_file_name(&stem, CodeMode::QrCode, 4),
            "organic-oat-milk-1l-qrcode-5.png"
        );
    }

    #[test]
    fn test_product_stem_fallbacks() {
        let p = NewProduct::new("", "SKU 9").into_selected();
        assert_eq!(product_stem(&p), "sku-9");
        let p = NewProduct::new("!!!", "").into_selected();
        assert_eq!(product_stem(&p), "product");
    }

    #[test]
    fn test_same_name_products_get_distinct_stems() {
        let selected = vec![
            NewProduct::new("Tea", "T-1").with_id("a").into_selected(),
            NewProduct::new("Tea", "T-2").with_id("b").into_selected(),
            NewProduct::new("Mug", "M-1").with_id("c").into_selected(),
        ];
        let stems = product_stems(&selected);
        assert_eq!(stems["a"], "tea-t-1");
        assert_eq!(stems["b"], "tea-t-2");
        assert_eq!(stems["c"], "mug");
    }

    #[test]
    fn test_clashing_skus_get_numeric_suffix() {
        let selected = vec![
            NewProduct::new("Tea", "").with_id("a").into_selected(),
            NewProduct::new("Tea", "").with_id("b").into_selected(),
            NewProduct::new("Tea 2", "").with_id("c").into_selected(),
        ];
        let stems = product_stems(&selected);
        let unique: HashSet<_> = stems.values().collect();
        assert_eq!(unique.len(), 3);
        assert_eq!(stems["a"], "tea");
    }

    #[test]
    fn test_batch_file_names_are_unique() {
        let selected = vec![
            NewProduct::new("Tea", "T-1").with_id("a").quantity(2).into_selected(),
            NewProduct::new("Tea", "T-2").with_id("b").quantity(2).into_selected(),
        ];
        let batch = crate::batch::generate(
            selected,
            &crate::symbology::CodeSettings::default(),
            &crate::symbology::SymbolRenderer,
        )
        .unwrap();

        let names = unit_file_names(&batch);
        assert_eq!(
            names,
            [
                "tea-t-1-barcode-1.png",
                "tea-t-1-barcode-2.png",
                "tea-t-2-barcode-1.png",
                "tea-t-2-barcode-2.png",
            ]
        );

        let dir = tempfile::tempdir().unwrap();
        let mut saver = DirectorySaver::new(dir.path()).unwrap();
        assert_eq!(download_all(&batch, &mut saver).unwrap(), 4);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 4);
    }

    #[test]
    fn test_directory_saver() {
        let dir = tempfile::tempdir().unwrap();
        let mut saver = DirectorySaver::new(dir.path().join("out")).unwrap();
        saver.save("a.png", b"abc").unwrap();
        assert_eq!(std::fs::read(dir.path().join("out/a.png")).unwrap(), b"abc");
        assert!(saver.save("../a.png", b"abc").is_err());
        assert_eq!(saver.written().len(), 1);
    }
}
