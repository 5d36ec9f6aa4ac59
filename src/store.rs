use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::RecapError;

/// Insertion-ordered key-value store with optional JSON file persistence.
///
/// Keys are namespaced strings like `revision:{user}:{id}`; prefix scans
/// return values in the order their keys were first written. This stands
/// in for the external persistent key-value collaborator behind the same
/// `get` / `set` / `get_by_prefix` seam.
#[derive(Debug, Default)]
pub struct Store {
    path: Option<PathBuf>,
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Entry {
    key: String,
    value: Value,
}

impl Store {
    /// Store that lives only in memory. Used by tests and short-lived
    /// computations.
    pub fn in_memory() -> Self {
        Store::default()
    }

    /// Open a file-backed store, loading existing entries. A missing file
    /// starts the store empty; a present but unparsable file is an error.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RecapError> {
        let path = path.as_ref().to_path_buf();
        let entries: Vec<Entry> = match tokio::fs::read_to_string(&path).await {
            Ok(data) => serde_json::from_str(&data).map_err(|e| {
                RecapError::Storage(format!("failed to parse {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(RecapError::Storage(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "store opened");
        Ok(Store {
            path: Some(path),
            entries,
        })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    /// Write a value under `key`, replacing any previous value in place.
    /// File-backed stores persist after every write.
    pub async fn set(&mut self, key: &str, value: Value) -> Result<(), RecapError> {
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(Entry {
                key: key.to_string(),
                value,
            }),
        }
        self.persist().await
    }

    /// All values whose key starts with `prefix`, in insertion order.
    pub fn get_by_prefix(&self, prefix: &str) -> Vec<&Value> {
        self.entries
            .iter()
            .filter(|e| e.key.starts_with(prefix))
            .map(|e| &e.value)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    async fn persist(&self) -> Result<(), RecapError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                RecapError::Storage(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| RecapError::Storage(format!("failed to serialize store: {e}")))?;
        tokio::fs::write(path, json).await.map_err(|e| {
            RecapError::Storage(format!("failed to write {}: {e}", path.display()))
        })?;
        Ok(())
    }
}
