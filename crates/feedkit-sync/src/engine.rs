//! Sync engine
//!
//! Wires the preference store, the calculation service and the event bus
//! into the components screens use, and exposes the selection and session
//! operations that do not belong to a single screen.

use crate::backend::CalculatorBackend;
use crate::invalidation::InvalidationBus;
use crate::lifecycle::ScreenSession;
use crate::resolver::SettingsResolver;
use crate::share::ShareService;
use feedkit_core::{
    AppEvent, CatalogEntry, CatalogKind, EventBus, EventBusConfig, InvalidationToken, Multiplier,
    PersistedResult, PreferenceEvent, Result, SelectionField, SelectionState,
};
use feedkit_settings::{PreferenceStore, PreferenceStoreExt, SyncSettings};
use std::sync::Arc;
use std::time::Duration;

/// Components shared by the engine and every screen session
#[derive(Clone)]
pub(crate) struct SyncContext {
    pub(crate) store: Arc<dyn PreferenceStore>,
    pub(crate) backend: Arc<dyn CalculatorBackend>,
    pub(crate) events: Arc<EventBus>,
    pub(crate) invalidation: InvalidationBus,
    pub(crate) resolver: Arc<SettingsResolver>,
    pub(crate) share: ShareService,
    pub(crate) poll_interval: Duration,
}

impl SyncContext {
    /// Reset the remembered preference remotely, then locally
    ///
    /// Without an auth token only the local reset runs. A failed remote
    /// reset leaves local state untouched.
    pub(crate) async fn reset_preferences(&self) -> Result<InvalidationToken> {
        match self.store.load_auth_token().await {
            Some(token) => {
                self.backend.reset_preference(&token).await?;
                tracing::info!("Remote preference reset");
            }
            None => tracing::debug!("No auth token, skipping remote preference reset"),
        }
        Ok(self.invalidation.mark_stale().await?)
    }
}

/// Entry point of the synchronization core
pub struct SyncEngine {
    ctx: SyncContext,
}

impl SyncEngine {
    /// Create an engine with its own event bus
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        backend: Arc<dyn CalculatorBackend>,
        settings: &SyncSettings,
    ) -> Self {
        let events = Arc::new(EventBus::with_config(EventBusConfig {
            enable_history: settings.event_history,
            ..EventBusConfig::default()
        }));
        Self::with_event_bus(store, backend, settings, events)
    }

    /// Create an engine publishing on an existing event bus
    pub fn with_event_bus(
        store: Arc<dyn PreferenceStore>,
        backend: Arc<dyn CalculatorBackend>,
        settings: &SyncSettings,
        events: Arc<EventBus>,
    ) -> Self {
        let invalidation = InvalidationBus::new(store.clone(), events.clone());
        let resolver = Arc::new(SettingsResolver::new(
            store.clone(),
            backend.clone(),
            invalidation.clone(),
            events.clone(),
        ));
        let share = ShareService::new(store.clone(), backend.clone(), events.clone());

        Self {
            ctx: SyncContext {
                store,
                backend,
                events,
                invalidation,
                resolver,
                share,
                poll_interval: settings.poll_interval(),
            },
        }
    }

    /// Prepare stored state for a new session
    ///
    /// Drops a result that was resolved without the remember flag in a
    /// previous session, along with the multiplier stored for it.
    pub async fn start(&self) -> Result<()> {
        if let Some(result) = self.ctx.store.load_result().await {
            if !result.remembered {
                tracing::info!("Dropping non-remembered result for {}", result.selection);
                self.ctx.store.remove_result().await?;
            }
        }
        Ok(())
    }

    /// Mount a screen
    pub fn open_screen(&self, name: impl Into<String>) -> ScreenSession {
        ScreenSession::new(self.ctx.clone(), name)
    }

    /// Stored selection
    pub async fn selection(&self) -> SelectionState {
        self.ctx.store.load_selection().await
    }

    /// Change one selection field
    pub async fn select(&self, field: SelectionField, value: &str) -> Result<()> {
        self.ctx.store.save_selection_field(field, value).await?;
        tracing::info!("Selected {} '{}'", field, value);
        self.ctx
            .events
            .emit(AppEvent::Preferences(PreferenceEvent::SelectionChanged {
                field: Some(field),
            }));
        Ok(())
    }

    /// Replace the whole selection
    pub async fn set_selection(&self, selection: &SelectionState) -> Result<()> {
        self.ctx.store.save_selection(selection).await?;
        tracing::info!(
            "Selection set to {} (remember: {})",
            selection.key(),
            selection.remember_choice
        );
        self.ctx
            .events
            .emit(AppEvent::Preferences(PreferenceEvent::SelectionChanged {
                field: None,
            }));
        Ok(())
    }

    /// List a remote catalog
    pub async fn catalog(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>> {
        Ok(self.ctx.backend.catalog(kind).await?)
    }

    /// Reset the remembered preference and mark shared state stale
    pub async fn reset_preferences(&self) -> Result<InvalidationToken> {
        self.ctx.reset_preferences().await
    }

    /// Mark resolved results stale, keeping the selection
    pub async fn invalidate_results(&self) -> Result<InvalidationToken> {
        Ok(self.ctx.invalidation.mark_stale_token_only().await?)
    }

    /// Forget every stored preference
    pub async fn logout(&self) -> Result<()> {
        self.ctx.store.clear_all().await?;
        tracing::info!("Preferences cleared");
        self.ctx
            .events
            .emit(AppEvent::Preferences(PreferenceEvent::Cleared));
        Ok(())
    }

    /// Last persisted result
    pub async fn stored_result(&self) -> Option<PersistedResult> {
        self.ctx.store.load_result().await
    }

    /// Persisted multiplier
    pub async fn stored_multiplier(&self) -> Option<Multiplier> {
        self.ctx.store.load_multiplier().await
    }

    /// The resolver
    pub fn resolver(&self) -> &SettingsResolver {
        &self.ctx.resolver
    }

    /// The invalidation bus
    pub fn invalidation(&self) -> &InvalidationBus {
        &self.ctx.invalidation
    }

    /// The share service
    pub fn share(&self) -> &ShareService {
        &self.ctx.share
    }

    /// The event bus
    pub fn events(&self) -> &Arc<EventBus> {
        &self.ctx.events
    }

    /// The preference store
    pub fn store(&self) -> &Arc<dyn PreferenceStore> {
        &self.ctx.store
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("poll_interval", &self.ctx.poll_interval)
            .finish_non_exhaustive()
    }
}
