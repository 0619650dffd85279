//! Application configuration.
//!
//! A single optional JSON file seeds the session: initial code and label
//! settings, the data directory and whether zip export is enabled. Every
//! field is optional; missing ones fall back to defaults. CLI flags override
//! what the file says.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::label::LabelSettings;
use crate::symbology::CodeSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where templates and invoice settings are stored
    pub data_dir: PathBuf,
    pub listen_addr: String,
    pub archive_enabled: bool,
    pub code: CodeSettings,
    pub label: LabelSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("labelkit-data"),
            listen_addr: "127.0.0.1:8080".to_string(),
            archive_enabled: true,
            code: CodeSettings::default(),
            label: LabelSettings::default(),
        }
    }
}

impl AppConfig {
    /// Read and validate a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&text)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// `from_file` when a path is given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.code.validate()?;
        self.label.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbology::{BarcodeFormat, CodeMode};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_without_file() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labelkit.json");
        std::fs::write(
            &path,
            r#"{"archive_enabled": false, "code": {"mode": "qrcode", "format": "ean13"}}"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert!(!config.archive_enabled);
        assert_eq!(config.code.mode, CodeMode::QrCode);
        assert_eq!(config.code.format, BarcodeFormat::Ean13);
        assert_eq!(config.label, LabelSettings::default());
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/labelkit.json"))).is_err());
    }
}
