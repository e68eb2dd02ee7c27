//! Settings resolver
//!
//! Turns the stored selection into a persisted result:
//! 1. validate the selection (no request for an incomplete one)
//! 2. call the calculation service
//! 3. persist the snapshot and, unless the user already tuned the
//!    multiplier for this selection, the server baseline, as one write
//! 4. clear the invalidation token
//!
//! A failed or discarded resolve leaves the stored result untouched.

use crate::backend::CalculatorBackend;
use crate::invalidation::InvalidationBus;
use crate::view::{ResolveTicket, ResultView};
use feedkit_core::{
    AppEvent, Error, EventBus, Multiplier, MultiplierEvent, PersistedResult, ResolveError,
    ResolveRequest, ResultEvent, ResultSnapshot, Result, SelectionField, SelectionKey,
    SelectionState,
};
use feedkit_settings::{PreferenceStore, PreferenceStoreExt};
use std::sync::Arc;

/// Outcome of a successful resolve
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveOutcome {
    /// The persisted result
    pub result: PersistedResult,
    /// The multiplier persisted after the resolve
    pub multiplier: Multiplier,
    /// Whether a user adjustment was kept over the server baseline
    pub kept_local: bool,
}

/// Whether a stored user multiplier wins over a fresh server baseline
///
/// The stored multiplier counts as a user adjustment when it differs from
/// the baseline of the previous result for the same selection, or when it
/// was saved before any result existed.
pub fn keeps_local_multiplier(
    stored: Option<Multiplier>,
    previous: Option<&PersistedResult>,
    selection: &SelectionKey,
) -> bool {
    let Some(stored) = stored else {
        return false;
    };
    match previous {
        None => true,
        Some(previous) => {
            previous.is_for(selection)
                && !stored.same_as(&Multiplier::new(previous.snapshot.base_multiplier))
        }
    }
}

/// Orchestrates selection, calculation and persistence
pub struct SettingsResolver {
    store: Arc<dyn PreferenceStore>,
    backend: Arc<dyn CalculatorBackend>,
    invalidation: InvalidationBus,
    events: Arc<EventBus>,
}

impl SettingsResolver {
    /// Create a resolver
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        backend: Arc<dyn CalculatorBackend>,
        invalidation: InvalidationBus,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            store,
            backend,
            invalidation,
            events,
        }
    }

    /// Read the stored selection
    pub async fn load_selection(&self) -> SelectionState {
        self.store.load_selection().await
    }

    /// Fill empty fields with the first catalog entry
    ///
    /// Only applies when the selection is not remembered. Filled values are
    /// not written back. A failed catalog request leaves the field empty.
    /// Returns the fields that were filled.
    pub async fn fill_defaults(&self, selection: &mut SelectionState) -> Vec<SelectionField> {
        if selection.remember_choice {
            return Vec::new();
        }

        let mut filled = Vec::new();
        for field in selection.missing_fields() {
            match self.backend.catalog(field.catalog()).await {
                Ok(entries) => {
                    if let Some(first) = entries.into_iter().next() {
                        tracing::debug!("Defaulting {} to '{}'", field, first.name);
                        selection.set_field(field, first.name);
                        filled.push(field);
                    }
                }
                Err(e) => tracing::warn!("Could not load {} catalog: {}", field.catalog(), e),
            }
        }
        filled
    }

    /// Resolve a selection without a view
    pub async fn resolve(&self, selection: &SelectionState) -> Result<ResolveOutcome> {
        selection.validate()?;
        self.run("direct", selection, None).await
    }

    /// Resolve a selection on behalf of a screen
    ///
    /// The view drops a snapshot of another selection before the request is
    /// sent. If the view is unmounted or starts a newer resolve while the
    /// request is in flight, the result is discarded with
    /// [`ResolveError::Cancelled`] and nothing is persisted.
    pub async fn resolve_for(
        &self,
        view: &ResultView,
        selection: &SelectionState,
    ) -> Result<ResolveOutcome> {
        if let Err(e) = selection.validate() {
            view.set_notice(e.to_string());
            return Err(e.into());
        }

        let ticket = view.begin_resolve(&selection.key());
        let outcome = self.run(view.screen(), selection, Some((view, &ticket))).await;

        match &outcome {
            Ok(o) => {
                if !view.present(&ticket, o.result.clone(), o.multiplier) {
                    tracing::debug!("[{}] view moved on before presenting", view.screen());
                }
            }
            Err(e) if !matches!(e, Error::Resolve(ResolveError::Cancelled)) => {
                view.fail(&ticket, e.to_string());
            }
            Err(_) => {}
        }
        outcome
    }

    async fn run(
        &self,
        screen: &str,
        selection: &SelectionState,
        guard: Option<(&ResultView, &ResolveTicket)>,
    ) -> Result<ResolveOutcome> {
        let key = selection.key();
        tracing::info!("[{}] resolving {}", screen, key);
        self.events.emit(AppEvent::Results(ResultEvent::ResolveStarted {
            screen: screen.to_string(),
            selection: key.clone(),
        }));

        let request = ResolveRequest::from(selection);
        let response = match self.backend.calculate(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::info!("[{}] {}", screen, e);
                self.events.emit(AppEvent::Results(ResultEvent::ResolveFailed {
                    screen: screen.to_string(),
                    reason: e.to_string(),
                }));
                return Err(e.into());
            }
        };

        if let Some((view, ticket)) = guard {
            if !view.is_current(ticket) {
                tracing::warn!("[{}] discarding result for {}", screen, key);
                self.events.emit(AppEvent::Results(ResultEvent::Discarded {
                    screen: screen.to_string(),
                }));
                return Err(ResolveError::Cancelled.into());
            }
        }

        let snapshot = ResultSnapshot::from(response);
        let outcome = self
            .persist(selection, snapshot)
            .await
            .inspect_err(|e| {
                self.events.emit(AppEvent::Results(ResultEvent::ResolveFailed {
                    screen: screen.to_string(),
                    reason: e.to_string(),
                }));
            })?;

        if let Err(e) = self.invalidation.clear_token().await {
            tracing::warn!("Could not clear invalidation token: {}", e);
        }

        self.events.emit(AppEvent::Results(ResultEvent::Resolved {
            screen: screen.to_string(),
            selection: key,
            base_multiplier: outcome.result.snapshot.base_multiplier,
        }));
        Ok(outcome)
    }

    async fn persist(
        &self,
        selection: &SelectionState,
        snapshot: ResultSnapshot,
    ) -> Result<ResolveOutcome> {
        let key = selection.key();
        let previous = self.store.load_result().await;
        let stored = self.store.load_multiplier().await;
        let baseline = Multiplier::new(snapshot.base_multiplier);

        let kept_local = keeps_local_multiplier(stored, previous.as_ref(), &key);
        let result = PersistedResult {
            selection: key,
            remembered: selection.remember_choice,
            snapshot,
        };

        let (multiplier, write) = match stored {
            Some(user) if kept_local => (user, None),
            _ => (baseline, Some(baseline)),
        };
        self.store.save_result(&result, write).await?;

        if kept_local {
            tracing::info!(
                "Keeping user multiplier {} over server baseline {}",
                multiplier,
                baseline
            );
            self.events
                .emit(AppEvent::Multiplier(MultiplierEvent::LocalKept {
                    value: multiplier.value(),
                    discarded_baseline: baseline.value(),
                }));
        } else {
            tracing::info!("Applied server baseline {}", baseline);
            self.events
                .emit(AppEvent::Multiplier(MultiplierEvent::BaselineApplied {
                    value: baseline.value(),
                }));
        }

        Ok(ResolveOutcome {
            result,
            multiplier,
            kept_local,
        })
    }
}

impl std::fmt::Debug for SettingsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsResolver").finish_non_exhaustive()
    }
}
