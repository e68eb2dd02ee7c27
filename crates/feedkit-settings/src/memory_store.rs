//! In-memory preference store
//!
//! Used for sessions that must not touch disk and as the test double for
//! every component that depends on a [`PreferenceStore`]. Availability can be
//! toggled to simulate a failing backend.

use crate::store::{PreferenceStore, StoreResult, WriteBatch};
use async_trait::async_trait;
use feedkit_core::StorageError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Preference store backed by a `HashMap`
#[derive(Debug)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
    available: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
            writes: AtomicUsize::new(0),
        }
    }

    /// Create a store pre-populated with values
    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        {
            let mut map = store.values.write();
            for (k, v) in values {
                map.insert(k.into(), v.into());
            }
        }
        store
    }

    /// Make every subsequent operation fail (or succeed again)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of successful mutating operations
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    fn check(&self, key: &str) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::unavailable(key, "store is offline"))
        }
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check(key)?;
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check(key)?;
        self.values.write().insert(key.to_string(), value.to_string());
        self.record_write();
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.check(key)?;
        self.values.write().remove(key);
        self.record_write();
        Ok(())
    }

    async fn clear_all(&self) -> StoreResult<()> {
        self.check("*")?;
        self.values.write().clear();
        self.record_write();
        Ok(())
    }

    async fn apply(&self, batch: WriteBatch) -> StoreResult<()> {
        self.check(batch.first_key())?;
        let mut values = self.values.write();
        for (key, value) in batch.entries() {
            match value {
                Some(v) => values.insert(key.clone(), v.clone()),
                None => values.remove(key),
            };
        }
        self.record_write();
        Ok(())
    }
}
