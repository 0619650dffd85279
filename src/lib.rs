//! # Labelkit - Bulk Barcode, QR and Label Generation
//!
//! Labelkit turns a selection of products into printable codes. It provides:
//!
//! - **Selection**: a working set of products with per-product quantities
//! - **Symbology**: linear barcodes and QR codes rendered to RGBA images
//! - **Batching**: one rendered unit per quantity, tagged with its product
//! - **Labels**: HTML label fragments around each code, plus saved templates
//! - **Export**: individual PNGs, a zip archive, or a print-ready document
//! - **Invoice design**: themes, five layouts and an HTML preview
//!
//! ## Quick Start
//!
//! ```
//! use labelkit::{
//!     batch,
//!     catalog::{NewProduct, SelectionStore},
//!     export::{RecordingSaver, download_all},
//!     symbology::{BarcodeFormat, CodeSettings, SymbolRenderer},
//! };
//!
//! let mut selection = SelectionStore::new();
//! selection.add(NewProduct::new("Oat Milk", "OAT-1").barcode("5901234123457").quantity(2));
//! selection.add(NewProduct::new("Espresso", "ESP-1"));
//!
//! let settings = CodeSettings::barcode(BarcodeFormat::Code128);
//! let batch = batch::generate(selection.snapshot(), &settings, &SymbolRenderer)?;
//! assert_eq!(batch.units.len(), 3);
//!
//! let mut saver = RecordingSaver::default();
//! download_all(&batch, &mut saver)?;
//! assert_eq!(saver.names()[0], "oat-milk-barcode-1.png");
//! # Ok::<(), labelkit::LabelkitError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Product records, catalog search, selection store |
//! | [`symbology`] | Code settings and the barcode/QR renderer |
//! | [`batch`] | Batch orchestration and unit ownership |
//! | [`label`] | Label settings, composition, templates |
//! | [`export`] | Download, archive and print sinks |
//! | [`invoice`] | Invoice design config, themes, preview |
//! | [`storage`] | Settings persistence |
//! | [`server`] | HTTP service |
//! | [`error`] | Error types |

pub mod batch;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod html;
pub mod invoice;
pub mod label;
pub mod server;
pub mod storage;
pub mod symbology;

// Re-exports for convenience
pub use config::AppConfig;
pub use error::LabelkitError;
