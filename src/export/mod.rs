//! # Export Sinks
//!
//! Three independent consumers of a completed [`Batch`](crate::batch::Batch).
//! Each can run any number of times against the same batch without
//! re-rendering.
//!
//! | Sink | Output |
//! |------|--------|
//! | [`download`] | one PNG per unit |
//! | [`archive`] | one zip with one entry per unit, or per-unit fallback |
//! | [`print`] | one HTML document with a print grid |

pub mod archive;
pub mod download;
pub mod print;

pub use archive::{
    ArchiveCapability, ArchiveOutcome, ZipArchiver, archive_name, build_archive,
    download_all_as_zip,
};
pub use download::{
    DirectorySaver, FileSaver, RecordingSaver, download_all, product_stem, product_stems,
    unit_file_name, unit_file_names, unit_files,
};
pub use print::{BrowserSurface, FileSurface, PrintDocument, PrintSurface, print_batch};
