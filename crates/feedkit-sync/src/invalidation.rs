//! Staleness signalling between screens
//!
//! A reset writes a fresh [`InvalidationToken`] to the preference store.
//! Each mounted screen owns an [`InvalidationWatcher`] that remembers which
//! token it last reacted to; any other token means the screen's resolved
//! state is stale. Focus checks, the periodic poll and bus notifications all
//! go through [`InvalidationWatcher::consume_if_stale`], which hands a given
//! token to at most one reaction per watcher.

use feedkit_core::{AppEvent, EventBus, InvalidationToken, PreferenceEvent};
use feedkit_settings::{keys, PreferenceStore, PreferenceStoreExt, StoreResult, WriteBatch};
use parking_lot::Mutex;
use std::sync::Arc;

/// Writes and clears invalidation tokens
#[derive(Clone)]
pub struct InvalidationBus {
    store: Arc<dyn PreferenceStore>,
    events: Arc<EventBus>,
}

impl InvalidationBus {
    /// Create a bus over a preference store
    pub fn new(store: Arc<dyn PreferenceStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    /// Mark shared state stale after a preference reset
    ///
    /// Turns the remember flag off, clears the four selection fields and
    /// writes a fresh token, all as one unit.
    pub async fn mark_stale(&self) -> StoreResult<InvalidationToken> {
        let token = InvalidationToken::fresh();
        let mut batch = WriteBatch::new().set(keys::SELECTION_REMEMBER, "false");
        for key in keys::RESETTABLE_SELECTION {
            batch = batch.remove(key);
        }
        batch = batch.set(keys::INVALIDATION_TOKEN, token.as_str());
        self.store.apply(batch).await?;

        tracing::info!("Preferences reset, invalidation token {}", token);
        self.events
            .emit(AppEvent::Preferences(PreferenceEvent::Invalidated {
                token: token.clone(),
                selection_cleared: true,
            }));
        Ok(token)
    }

    /// Mark resolved results stale without touching the selection
    pub async fn mark_stale_token_only(&self) -> StoreResult<InvalidationToken> {
        let token = InvalidationToken::fresh();
        self.store
            .set(keys::INVALIDATION_TOKEN, token.as_str())
            .await?;

        tracing::info!("Results invalidated, token {}", token);
        self.events
            .emit(AppEvent::Preferences(PreferenceEvent::Invalidated {
                token: token.clone(),
                selection_cleared: false,
            }));
        Ok(token)
    }

    /// The stored token, if any; a failed read counts as no token
    pub async fn current_token(&self) -> Option<InvalidationToken> {
        self.store.load_invalidation_token().await
    }

    /// Remove the stored token once a fresh result is persisted
    pub async fn clear_token(&self) -> StoreResult<()> {
        self.store.remove(keys::INVALIDATION_TOKEN).await
    }

    /// Create a watcher with no token seen yet
    pub fn watcher(&self) -> InvalidationWatcher {
        InvalidationWatcher {
            bus: self.clone(),
            state: Mutex::new(WatcherState::default()),
        }
    }
}

impl std::fmt::Debug for InvalidationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvalidationBus").finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct WatcherState {
    /// Last token this watcher finished reacting to
    last_seen: Option<InvalidationToken>,
    /// Token handed out but not yet acknowledged
    pending: Option<InvalidationToken>,
}

/// Per-screen memory of consumed tokens
///
/// Lives in memory only; a freshly mounted screen treats any stored token
/// as new.
#[derive(Debug)]
pub struct InvalidationWatcher {
    bus: InvalidationBus,
    state: Mutex<WatcherState>,
}

impl InvalidationWatcher {
    /// Return the stored token if this watcher has not reacted to it yet
    ///
    /// The returned token is held as pending: further calls return `None`
    /// for it until it is acknowledged or abandoned. The caller reacts and
    /// then calls [`acknowledge`](Self::acknowledge).
    pub async fn consume_if_stale(&self) -> Option<InvalidationToken> {
        let token = self.bus.current_token().await?;

        let mut state = self.state.lock();
        if state.last_seen.as_ref() == Some(&token) || state.pending.as_ref() == Some(&token) {
            return None;
        }
        tracing::debug!("New invalidation token {}", token);
        state.pending = Some(token.clone());
        Some(token)
    }

    /// Record that the reaction to `token` has finished
    pub fn acknowledge(&self, token: InvalidationToken) {
        let mut state = self.state.lock();
        if state.pending.as_ref() == Some(&token) {
            state.pending = None;
        }
        state.last_seen = Some(token);
    }

    /// Release a pending token without reacting, so it is reported again
    pub fn abandon(&self, token: &InvalidationToken) {
        let mut state = self.state.lock();
        if state.pending.as_ref() == Some(token) {
            state.pending = None;
        }
    }

    /// Last acknowledged token
    pub fn last_seen(&self) -> Option<InvalidationToken> {
        self.state.lock().last_seen.clone()
    }
}
