//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::batch::Batch;
use crate::catalog::{JsonCatalog, SelectionStore};
use crate::config::AppConfig;
use crate::error::Result;
use crate::export::ArchiveCapability;
use crate::invoice::InvoiceDesignStore;
use crate::label::{LabelSettings, TemplateStore};
use crate::storage::{JsonFileStore, SettingsStore};
use crate::symbology::CodeSettings;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Directory for templates and invoice settings
    pub data_dir: PathBuf,
    pub archive_enabled: bool,
    /// Optional product catalog for search
    pub catalog: Option<PathBuf>,
    /// Settings each new session starts with
    pub code: CodeSettings,
    pub label: LabelSettings,
}

impl From<AppConfig> for ServerConfig {
    fn from(config: AppConfig) -> Self {
        Self {
            listen_addr: config.listen_addr,
            data_dir: config.data_dir,
            archive_enabled: config.archive_enabled,
            catalog: None,
            code: config.code,
            label: config.label,
        }
    }
}

/// The working session: selection, active settings and the last batch.
pub struct Session {
    pub selection: SelectionStore,
    pub code: CodeSettings,
    pub label: LabelSettings,
    /// Cached until the next generate.
    pub last_batch: Option<Arc<Batch>>,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub session: RwLock<Session>,
    pub templates: RwLock<TemplateStore>,
    pub invoice: RwLock<InvoiceDesignStore>,
    pub archive: ArchiveCapability,
    pub catalog: Option<JsonCatalog>,
}

impl AppState {
    /// Open persistent stores under `config.data_dir`.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let store: Arc<dyn SettingsStore> = Arc::new(JsonFileStore::open(&config.data_dir)?);
        Self::with_store(config, store)
    }

    pub fn with_store(config: ServerConfig, store: Arc<dyn SettingsStore>) -> Result<Self> {
        let catalog = match &config.catalog {
            Some(path) => Some(JsonCatalog::load(path)?),
            None => None,
        };
        Ok(Self {
            session: RwLock::new(Session {
                selection: SelectionStore::new(),
                code: config.code.clone(),
                label: config.label.clone(),
                last_batch: None,
            }),
            templates: RwLock::new(TemplateStore::load(store.clone())?),
            invoice: RwLock::new(InvoiceDesignStore::open(store)?),
            archive: ArchiveCapability::detect(config.archive_enabled),
            catalog,
            config,
        })
    }
}
