//! Typed access to stored preferences
//!
//! Reads never fail: a store error or an undecodable value is logged and
//! reported as absent. Writes return the store error to the caller.

use crate::keys;
use crate::store::{PreferenceStore, StoreResult, WriteBatch};
use async_trait::async_trait;
use feedkit_core::{
    InvalidationToken, Multiplier, PersistedResult, SelectionField, SelectionState, StorageError,
};

/// Typed helpers available on every [`PreferenceStore`]
#[async_trait]
pub trait PreferenceStoreExt: PreferenceStore {
    /// Read a key, treating failure as absence
    async fn get_or_absent(&self, key: &str) -> Option<String> {
        match self.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Reading '{}' failed, treating as absent: {}", key, e);
                None
            }
        }
    }

    /// Load the stored selection; missing fields are empty
    async fn load_selection(&self) -> SelectionState {
        let mut selection = SelectionState::default();
        for field in SelectionField::ALL {
            if let Some(value) = self.get_or_absent(keys::selection_key(field)).await {
                selection.set_field(field, value);
            }
        }
        selection.remember_choice = self
            .get_or_absent(keys::SELECTION_REMEMBER)
            .await
            .is_some_and(|v| v == "true");
        selection
    }

    /// Write the whole selection as one unit
    async fn save_selection(&self, selection: &SelectionState) -> StoreResult<()> {
        let mut batch = WriteBatch::new();
        for field in SelectionField::ALL {
            let value = selection.field(field);
            batch = if value.is_empty() {
                batch.remove(keys::selection_key(field))
            } else {
                batch.set(keys::selection_key(field), value)
            };
        }
        batch = batch.set(
            keys::SELECTION_REMEMBER,
            selection.remember_choice.to_string(),
        );
        self.apply(batch).await
    }

    /// Write one selection field
    async fn save_selection_field(&self, field: SelectionField, value: &str) -> StoreResult<()> {
        self.set(keys::selection_key(field), value).await
    }

    /// Load the last resolved result
    async fn load_result(&self) -> Option<PersistedResult> {
        let raw = self.get_or_absent(keys::RESULT_SNAPSHOT).await?;
        match serde_json::from_str(&raw) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!("Stored snapshot is unreadable, treating as absent: {}", e);
                None
            }
        }
    }

    /// Load the durable multiplier
    async fn load_multiplier(&self) -> Option<Multiplier> {
        let raw = self.get_or_absent(keys::RESULT_MULTIPLIER).await?;
        let parsed = Multiplier::parse(&raw);
        if parsed.is_none() {
            tracing::warn!("Stored multiplier '{}' is unreadable, treating as absent", raw);
        }
        parsed
    }

    /// Persist the durable multiplier
    async fn save_multiplier(&self, multiplier: Multiplier) -> StoreResult<()> {
        self.set(keys::RESULT_MULTIPLIER, &multiplier.to_stored())
            .await
    }

    /// Persist a resolved result, optionally with a new multiplier, as one unit
    async fn save_result(
        &self,
        result: &PersistedResult,
        multiplier: Option<Multiplier>,
    ) -> StoreResult<()> {
        let encoded = serde_json::to_string(result)
            .map_err(|e| StorageError::corrupted(keys::RESULT_SNAPSHOT, e.to_string()))?;
        let mut batch = WriteBatch::new().set(keys::RESULT_SNAPSHOT, encoded);
        if let Some(m) = multiplier {
            batch = batch.set(keys::RESULT_MULTIPLIER, m.to_stored());
        }
        self.apply(batch).await
    }

    /// Drop the stored result together with the multiplier persisted with it
    async fn remove_result(&self) -> StoreResult<()> {
        self.apply(
            WriteBatch::new()
                .remove(keys::RESULT_SNAPSHOT)
                .remove(keys::RESULT_MULTIPLIER),
        )
        .await
    }

    /// Load the current invalidation token
    async fn load_invalidation_token(&self) -> Option<InvalidationToken> {
        self.get_or_absent(keys::INVALIDATION_TOKEN)
            .await
            .and_then(InvalidationToken::from_stored)
    }

    /// Load the bearer token written at login
    async fn load_auth_token(&self) -> Option<String> {
        self.get_or_absent(keys::AUTH_TOKEN)
            .await
            .filter(|t| !t.trim().is_empty())
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStoreExt for T {}
