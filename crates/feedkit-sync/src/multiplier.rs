//! Multiplier controller
//!
//! Owns the in-memory multiplier a screen displays. Step adjustments stay in
//! memory until [`MultiplierController::save`] persists them; sharing always
//! uses the persisted value.

use feedkit_core::{AppEvent, EventBus, Multiplier, MultiplierEvent, StorageError};
use feedkit_settings::{PreferenceStore, PreferenceStoreExt};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct ControllerState {
    current: Multiplier,
    saved: Option<Multiplier>,
}

/// Bounded adjustment applied on top of a resolved snapshot
pub struct MultiplierController {
    store: Arc<dyn PreferenceStore>,
    events: Arc<EventBus>,
    state: Mutex<ControllerState>,
}

impl MultiplierController {
    /// Create a controller with the neutral value; call [`load`](Self::load)
    /// to pick up the persisted one
    pub fn new(store: Arc<dyn PreferenceStore>, events: Arc<EventBus>) -> Self {
        Self {
            store,
            events,
            state: Mutex::new(ControllerState::default()),
        }
    }

    /// Read the persisted value into memory
    pub async fn load(&self) -> Multiplier {
        let saved = self.store.load_multiplier().await;
        let mut state = self.state.lock();
        state.saved = saved;
        state.current = saved.unwrap_or_default();
        state.current
    }

    /// Step the in-memory value by `delta`
    ///
    /// The result is rounded to one decimal place and saturates at the
    /// bounds.
    pub fn adjust(&self, delta: f64) -> Multiplier {
        let value = {
            let mut state = self.state.lock();
            state.current = state.current.adjusted(delta);
            state.current
        };
        tracing::debug!("Multiplier adjusted by {:+} to {}", delta, value);
        self.events
            .emit(AppEvent::Multiplier(MultiplierEvent::Adjusted {
                value: value.value(),
            }));
        value
    }

    /// Persist the in-memory value
    pub async fn save(&self) -> Result<Multiplier, StorageError> {
        let value = self.current();
        self.store.save_multiplier(value).await?;
        self.state.lock().saved = Some(value);

        tracing::info!("Multiplier saved: {}", value);
        self.events
            .emit(AppEvent::Multiplier(MultiplierEvent::Saved {
                value: value.value(),
            }));
        Ok(value)
    }

    /// Discard unsaved adjustments and reload the persisted value
    pub async fn reset(&self) -> Multiplier {
        let value = self.load().await;
        tracing::debug!("Multiplier reset to {}", value);
        self.events
            .emit(AppEvent::Multiplier(MultiplierEvent::Reset {
                value: value.value(),
            }));
        value
    }

    /// Follow a newly persisted multiplier after a resolve
    ///
    /// An unsaved adjustment stays on screen; otherwise the display follows
    /// the stored value.
    pub fn rebase(&self, persisted: Multiplier) -> Multiplier {
        let mut state = self.state.lock();
        let dirty = Self::dirty(&state);
        state.saved = Some(persisted);
        if !dirty {
            state.current = persisted;
        }
        state.current
    }

    /// In-memory value
    pub fn current(&self) -> Multiplier {
        self.state.lock().current
    }

    /// Last value this controller read or wrote
    pub fn saved(&self) -> Option<Multiplier> {
        self.state.lock().saved
    }

    /// Whether the in-memory value differs from the persisted one
    pub fn is_dirty(&self) -> bool {
        Self::dirty(&self.state.lock())
    }

    fn dirty(state: &ControllerState) -> bool {
        match state.saved {
            Some(saved) => !state.current.same_as(&saved),
            None => !state.current.same_as(&Multiplier::NEUTRAL),
        }
    }
}

impl std::fmt::Debug for MultiplierController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiplierController")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}
