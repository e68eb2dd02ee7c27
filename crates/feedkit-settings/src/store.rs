//! Preference store contract
//!
//! The store is the single source of truth for durable state. It never
//! invents defaults: an absent key is reported as `None`.

use async_trait::async_trait;
use feedkit_core::StorageError;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StorageError>;

/// A set of writes applied as one unit
///
/// Either every entry is applied or none is. `None` values remove the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    entries: Vec<(String, Option<String>)>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a write
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), Some(value.into())));
        self
    }

    /// Queue a removal
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.entries.push((key.into(), None));
        self
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queued entries in insertion order
    pub fn entries(&self) -> &[(String, Option<String>)] {
        &self.entries
    }

    /// First key of the batch, used in error messages
    pub fn first_key(&self) -> &str {
        self.entries.first().map(|(k, _)| k.as_str()).unwrap_or("")
    }
}

/// Durable key/value store for preferences
///
/// All operations may fail with [`StorageError::Unavailable`]. Callers treat
/// a failed read as "value absent" and surface failed writes.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read a value
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a value
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove a value; removing an absent key succeeds
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Remove every value
    async fn clear_all(&self) -> StoreResult<()>;

    /// Apply several writes as one all-or-nothing unit
    async fn apply(&self, batch: WriteBatch) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_builder() {
        let batch = WriteBatch::new().set("a", "1").remove("b");
        assert_eq!(batch.entries().len(), 2);
        assert_eq!(batch.first_key(), "a");
        assert_eq!(batch.entries()[1], ("b".to_string(), None));
        assert!(WriteBatch::new().is_empty());
    }
}
