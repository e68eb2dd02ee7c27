//! JSON file preference store
//!
//! Keeps the whole namespace in one JSON object on disk. Every mutation
//! writes a temporary file and renames it over the original, so a crash or
//! a failed write never leaves a partially updated namespace behind.

use crate::store::{PreferenceStore, StoreResult, WriteBatch};
use async_trait::async_trait;
use feedkit_core::StorageError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Preference store persisted as a JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`
    ///
    /// A missing file starts an empty namespace. A corrupted file is logged
    /// and treated as empty; it is replaced by the next write.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let values = match tokio::fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(
                        "Preferences file {} is corrupted, starting empty: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StorageError::unavailable(
                    path.display().to_string(),
                    e.to_string(),
                ))
            }
        };

        tracing::debug!(
            "Opened preferences file {} ({} keys)",
            path.display(),
            values.len()
        );

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `next` and, only on success, make it the current namespace
    async fn commit(
        &self,
        current: &mut BTreeMap<String, String>,
        next: BTreeMap<String, String>,
        key: &str,
    ) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(&next)
            .map_err(|e| StorageError::unavailable(key, e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::unavailable(key, e.to_string()))?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| StorageError::unavailable(key, e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::unavailable(key, e.to_string()))?;

        *current = next;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for JsonFileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.apply(WriteBatch::new().set(key, value)).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.apply(WriteBatch::new().remove(key)).await
    }

    async fn clear_all(&self) -> StoreResult<()> {
        let mut values = self.values.lock().await;
        self.commit(&mut values, BTreeMap::new(), "*").await
    }

    async fn apply(&self, batch: WriteBatch) -> StoreResult<()> {
        let mut values = self.values.lock().await;
        let mut next = values.clone();
        for (key, value) in batch.entries() {
            match value {
                Some(v) => next.insert(key.clone(), v.clone()),
                None => next.remove(key),
            };
        }
        self.commit(&mut values, next, batch.first_key()).await
    }
}
