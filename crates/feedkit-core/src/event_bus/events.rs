//! Event type definitions for the event bus.
//!
//! This module defines all application events organized by category.
//! Events are designed to be cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};

use crate::data::{InvalidationToken, SelectionField, SelectionKey};

/// Root event enum for all application events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Stored selection and invalidation
    Preferences(PreferenceEvent),
    /// Resolve lifecycle
    Results(ResultEvent),
    /// Multiplier adjustments
    Multiplier(MultiplierEvent),
    /// Feedback sharing
    Share(ShareEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Preferences(_) => EventCategory::Preferences,
            AppEvent::Results(_) => EventCategory::Results,
            AppEvent::Multiplier(_) => EventCategory::Multiplier,
            AppEvent::Share(_) => EventCategory::Share,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Preferences(e) => e.description(),
            AppEvent::Results(e) => e.description(),
            AppEvent::Multiplier(e) => e.description(),
            AppEvent::Share(e) => e.description(),
        }
    }

    /// The token carried by an invalidation event
    pub fn invalidation_token(&self) -> Option<&InvalidationToken> {
        match self {
            AppEvent::Preferences(PreferenceEvent::Invalidated { token, .. }) => Some(token),
            _ => None,
        }
    }
}

/// Event category, reported in log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Selection and invalidation events.
    Preferences,
    /// Resolve lifecycle events.
    Results,
    /// Multiplier events.
    Multiplier,
    /// Share events.
    Share,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Preferences => write!(f, "Preferences"),
            EventCategory::Results => write!(f, "Results"),
            EventCategory::Multiplier => write!(f, "Multiplier"),
            EventCategory::Share => write!(f, "Share"),
        }
    }
}

/// Preference store events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PreferenceEvent {
    /// Selection fields were written.
    SelectionChanged {
        /// The field that changed, `None` when the whole selection was written.
        field: Option<SelectionField>,
    },
    /// Shared state was marked stale.
    Invalidated {
        /// The freshly written token.
        token: InvalidationToken,
        /// Whether the resettable selection fields were cleared.
        selection_cleared: bool,
    },
    /// Every stored preference was removed (logout).
    Cleared,
}

impl PreferenceEvent {
    fn description(&self) -> String {
        match self {
            PreferenceEvent::SelectionChanged { field: Some(field) } => {
                format!("Selection changed: {}", field)
            }
            PreferenceEvent::SelectionChanged { field: None } => "Selection replaced".to_string(),
            PreferenceEvent::Invalidated {
                token,
                selection_cleared,
            } => format!(
                "Invalidated ({}){}",
                token,
                if *selection_cleared {
                    ", selection cleared"
                } else {
                    ""
                }
            ),
            PreferenceEvent::Cleared => "Preferences cleared".to_string(),
        }
    }
}

/// Resolve lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResultEvent {
    /// A resolve was issued.
    ResolveStarted {
        /// Screen that triggered the resolve.
        screen: String,
        /// Selection being resolved.
        selection: SelectionKey,
    },
    /// A snapshot was persisted.
    Resolved {
        /// Screen that triggered the resolve.
        screen: String,
        /// Selection the snapshot belongs to.
        selection: SelectionKey,
        /// Server baseline multiplier.
        base_multiplier: f64,
    },
    /// A resolve failed; the previous snapshot is kept.
    ResolveFailed {
        /// Screen that triggered the resolve.
        screen: String,
        /// Failure description.
        reason: String,
    },
    /// A result arrived after its view went away and was dropped.
    Discarded {
        /// Screen whose result was dropped.
        screen: String,
    },
    /// A trigger arrived while a resolve was in flight.
    Coalesced {
        /// Screen that received the trigger.
        screen: String,
    },
}

impl ResultEvent {
    fn description(&self) -> String {
        match self {
            ResultEvent::ResolveStarted { screen, selection } => {
                format!("[{}] resolving {}", screen, selection)
            }
            ResultEvent::Resolved {
                screen,
                selection,
                base_multiplier,
            } => format!(
                "[{}] resolved {} (baseline {})",
                screen, selection, base_multiplier
            ),
            ResultEvent::ResolveFailed { screen, reason } => {
                format!("[{}] resolve failed: {}", screen, reason)
            }
            ResultEvent::Discarded { screen } => format!("[{}] result discarded", screen),
            ResultEvent::Coalesced { screen } => format!("[{}] trigger coalesced", screen),
        }
    }
}

/// Multiplier events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MultiplierEvent {
    /// The in-memory value was stepped.
    Adjusted {
        /// New in-memory value.
        value: f64,
    },
    /// The in-memory value was persisted.
    Saved {
        /// Persisted value.
        value: f64,
    },
    /// The in-memory value was reloaded from storage.
    Reset {
        /// Reloaded value.
        value: f64,
    },
    /// A fresh server baseline replaced the stored multiplier.
    BaselineApplied {
        /// New baseline.
        value: f64,
    },
    /// A user adjustment was kept over a fresh server baseline.
    LocalKept {
        /// Kept user value.
        value: f64,
        /// Discarded server baseline.
        discarded_baseline: f64,
    },
}

impl MultiplierEvent {
    fn description(&self) -> String {
        match self {
            MultiplierEvent::Adjusted { value } => format!("Multiplier adjusted to {}", value),
            MultiplierEvent::Saved { value } => format!("Multiplier saved: {}", value),
            MultiplierEvent::Reset { value } => format!("Multiplier reset to {}", value),
            MultiplierEvent::BaselineApplied { value } => {
                format!("Server baseline applied: {}", value)
            }
            MultiplierEvent::LocalKept {
                value,
                discarded_baseline,
            } => format!(
                "Kept user multiplier {} over baseline {}",
                value, discarded_baseline
            ),
        }
    }
}

/// Share events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShareEvent {
    /// The saved multiplier was shared.
    Shared {
        /// Shared value.
        multiplier: f64,
    },
    /// Sharing failed.
    Failed {
        /// Failure description.
        reason: String,
    },
}

impl ShareEvent {
    fn description(&self) -> String {
        match self {
            ShareEvent::Shared { multiplier } => format!("Shared multiplier {}", multiplier),
            ShareEvent::Failed { reason } => format!("Share failed: {}", reason),
        }
    }
}
