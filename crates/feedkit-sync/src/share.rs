//! Best-effort upload of a tuned multiplier
//!
//! Only the persisted multiplier is ever shared. Failures are reported to
//! the caller and never touch local state.

use crate::backend::{CalculatorBackend, ShareRequest};
use feedkit_core::{AppEvent, EventBus, Multiplier, ShareError, ShareEvent};
use feedkit_settings::{PreferenceStore, PreferenceStoreExt};
use std::sync::Arc;

/// Sends the saved multiplier for the stored selection
#[derive(Clone)]
pub struct ShareService {
    store: Arc<dyn PreferenceStore>,
    backend: Arc<dyn CalculatorBackend>,
    events: Arc<EventBus>,
}

impl ShareService {
    /// Create a share service
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        backend: Arc<dyn CalculatorBackend>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            store,
            backend,
            events,
        }
    }

    /// Share the last saved multiplier
    pub async fn share(&self) -> Result<Multiplier, ShareError> {
        let result = self.try_share().await;
        match &result {
            Ok(multiplier) => {
                tracing::info!("Shared multiplier {}", multiplier);
                self.events.emit(AppEvent::Share(ShareEvent::Shared {
                    multiplier: multiplier.value(),
                }));
            }
            Err(e) => {
                tracing::info!("{}", e);
                self.events.emit(AppEvent::Share(ShareEvent::Failed {
                    reason: e.to_string(),
                }));
            }
        }
        result
    }

    async fn try_share(&self) -> Result<Multiplier, ShareError> {
        let token = self
            .store
            .load_auth_token()
            .await
            .ok_or(ShareError::NotAuthenticated)?;
        let multiplier = self
            .store
            .load_multiplier()
            .await
            .ok_or(ShareError::NothingSaved)?;
        let selection = self.store.load_selection().await;

        let request = ShareRequest::new(&selection, multiplier);
        self.backend.share_settings(&token, &request).await?;
        Ok(multiplier)
    }
}

impl std::fmt::Debug for ShareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareService").finish_non_exhaustive()
    }
}
