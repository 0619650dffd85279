//! Zip archive sink.
//!
//! Whether archiving is possible is decided once, up front, and passed in as
//! an [`ArchiveCapability`]. Without it the sink falls back to saving every
//! unit individually.

use tracing::{info, warn};

use super::download::{FileSaver, download_all, unit_files};
use crate::batch::Batch;
use crate::error::{LabelkitError, Result};

/// Builds zip archives. Only constructible with the `archive` feature.
#[derive(Debug, Clone, Copy)]
pub struct ZipArchiver {
    _private: (),
}

#[derive(Debug, Clone, Copy)]
pub enum ArchiveCapability {
    Available(ZipArchiver),
    Unavailable,
}

impl ArchiveCapability {
    /// Resolve the capability: available when compiled with the `archive`
    /// feature and `enabled` is set.
    pub fn detect(enabled: bool) -> Self {
        if enabled && cfg!(feature = "archive") {
            ArchiveCapability::Available(ZipArchiver { _private: () })
        } else {
            ArchiveCapability::Unavailable
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ArchiveCapability::Available(_))
    }
}

/// Outcome of [`download_all_as_zip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// One archive saved under this name with this many entries
    Archived { name: String, entries: usize },
    /// No archiver; this many individual files were saved instead
    FellBack { files: usize },
}

impl ZipArchiver {
    /// Zip `(name, bytes)` entries, in order.
    #[cfg(feature = "archive")]
    pub fn build(&self, entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
        use std::io::Write;

        let mut buffer = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buffer);
            let zip_options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);
            for (name, bytes) in entries {
                zip.start_file(name.as_str(), zip_options)
                    .map_err(|e| LabelkitError::Archive(e.to_string()))?;
                zip.write_all(bytes)?;
            }
            zip.finish()
                .map_err(|e| LabelkitError::Archive(e.to_string()))?;
        }
        Ok(buffer.into_inner())
    }

    #[cfg(not(feature = "archive"))]
    pub fn build(&self, _entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
        Err(LabelkitError::ArchiveUnavailable)
    }
}

/// Archive file name for a batch, e.g. `barcodes-20260314-101500.zip`.
pub fn archive_name(batch: &Batch) -> String {
    format!(
        "{}s-{}.zip",
        batch.mode.as_str(),
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    )
}

/// Zip every unit of `batch`, entries named like the individual downloads.
pub fn build_archive(batch: &Batch, capability: &ArchiveCapability) -> Result<Vec<u8>> {
    match capability {
        ArchiveCapability::Available(archiver) => archiver.build(&unit_files(batch)?),
        ArchiveCapability::Unavailable => Err(LabelkitError::ArchiveUnavailable),
    }
}

/// Save the batch as one zip archive, or fall back to individual files.
pub fn download_all_as_zip(
    batch: &Batch,
    capability: &ArchiveCapability,
    saver: &mut dyn FileSaver,
) -> Result<ArchiveOutcome> {
    match capability {
        ArchiveCapability::Available(archiver) => {
            let files = unit_files(batch)?;
            let bytes = archiver.build(&files)?;
            let name = archive_name(batch);
            saver.save(&name, &bytes)?;
            info!(name = %name, entries = files.len(), "saved archive");
            Ok(ArchiveOutcome::Archived {
                name,
                entries: files.len(),
            })
        }
        ArchiveCapability::Unavailable => {
            warn!("archive support unavailable; saving files individually");
            let files = download_all(batch, saver)?;
            Ok(ArchiveOutcome::FellBack { files })
        }
    }
}
