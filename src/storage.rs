//! # Settings Persistence
//!
//! Label templates and the invoice design are saved through a small
//! key/value seam. In a deployment the POS backend owns this; the crate ships
//! a JSON-file store for the CLI and server, and an in-memory store.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{LabelkitError, Result};

/// Key/value persistence for JSON documents.
pub trait SettingsStore: Send + Sync {
    fn load_value(&self, key: &str) -> Result<Option<Value>>;
    fn save_value(&self, key: &str, value: Value) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Typed helpers over any [`SettingsStore`].
pub trait SettingsStoreExt {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>;
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()>;
}

impl<S: SettingsStore + ?Sized> SettingsStoreExt for S {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.load_value(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.save_value(key, serde_json::to_value(value)?)
    }
}

/// One pretty-printed JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(LabelkitError::Storage(format!("invalid key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SettingsStore for JsonFileStore {
    fn load_value(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save_value(&self, key: &str, value: Value) -> Result<()> {
        let path = self.path_for(key)?;
        // Readers never observe a partially written document.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&value)?)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Value>>> {
        self.values
            .lock()
            .map_err(|e| LabelkitError::Storage(e.to_string()))
    }
}

impl SettingsStore for MemoryStore {
    fn load_value(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn save_value(&self, key: &str, value: Value) -> Result<()> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    fn sample() -> Sample {
        Sample {
            name: "x".into(),
            count: 3,
        }
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.load::<Sample>("k").unwrap(), None);
        store.save("k", &sample()).unwrap();
        assert_eq!(store.load::<Sample>("k").unwrap(), Some(sample()));
        store.remove("k").unwrap();
        assert_eq!(store.load::<Sample>("k").unwrap(), None);
    }

    #[test]
    fn test_json_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("data")).unwrap();
        store.save("label_templates", &sample()).unwrap();
        assert!(dir.path().join("data/label_templates.json").exists());

        let reopened = JsonFileStore::open(dir.path().join("data")).unwrap();
        assert_eq!(reopened.load::<Sample>("label_templates").unwrap(), Some(sample()));

        reopened.remove("label_templates").unwrap();
        reopened.remove("label_templates").unwrap();
        assert_eq!(reopened.load::<Sample>("label_templates").unwrap(), None);
    }

    #[test]
    fn test_json_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.save("../escape", &sample()),
            Err(LabelkitError::Storage(_))
        ));
    }

    #[test]
    fn test_dyn_store_helpers() {
        let store: std::sync::Arc<dyn SettingsStore> = std::sync::Arc::new(MemoryStore::new());
        store.save("k", &sample()).unwrap();
        assert_eq!(store.load::<Sample>("k").unwrap(), Some(sample()));
    }
}
