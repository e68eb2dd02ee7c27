//! Event bus implementation.
//!
//! A bus is created by the application and shared by `Arc` with every
//! component that announces changes. Listeners take a broadcast receiver;
//! nothing is dispatched on the publishing task.

use parking_lot::RwLock;
use std::collections::VecDeque;
use tokio::sync::broadcast;

use super::events::AppEvent;

/// Configuration for the event bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBusConfig {
    /// Broadcast channel capacity; slower receivers observe a lag.
    pub channel_capacity: usize,
    /// Whether to keep the most recent events.
    pub enable_history: bool,
    /// Maximum number of events kept when history is enabled.
    pub max_history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            enable_history: false,
            max_history_size: 500,
        }
    }
}

/// In-process broadcast of [`AppEvent`]s
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
    history: RwLock<VecDeque<AppEvent>>,
    config: EventBusConfig,
}

impl EventBus {
    /// Create a bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            history: RwLock::new(VecDeque::new()),
            config,
        }
    }

    /// Announce a state change
    ///
    /// Returns how many receivers were live; zero is not an error, since
    /// changes are announced whether or not a screen is listening.
    pub fn emit(&self, event: AppEvent) -> usize {
        tracing::debug!(category = %event.category(), "{}", event.description());

        if self.config.enable_history {
            let mut history = self.history.write();
            history.push_back(event.clone());
            while history.len() > self.config.max_history_size {
                history.pop_front();
            }
        }

        self.sender.send(event).unwrap_or(0)
    }

    /// A receiver for events emitted from now on
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Recorded events, oldest first; empty unless history is enabled
    pub fn history(&self) -> Vec<AppEvent> {
        self.history.read().iter().cloned().collect()
    }

    /// Forget recorded events
    pub fn clear_history(&self) {
        self.history.write().clear();
    }

    /// Active configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receivers", &self.receiver_count())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InvalidationToken;
    use crate::event_bus::events::{MultiplierEvent, PreferenceEvent};

    fn invalidated() -> AppEvent {
        AppEvent::Preferences(PreferenceEvent::Invalidated {
            token: InvalidationToken::fresh(),
            selection_cleared: true,
        })
    }

    fn history_bus(size: usize) -> EventBus {
        EventBus::with_config(EventBusConfig {
            enable_history: true,
            max_history_size: size,
            ..Default::default()
        })
    }

    #[test]
    fn test_emit_without_receivers() {
        let bus = EventBus::new();
        assert_eq!(bus.receiver_count(), 0);
        assert_eq!(bus.emit(invalidated()), 0);
        assert!(bus.history().is_empty());
    }

    #[tokio::test]
    async fn test_receivers_get_events_emitted_after_subscribing() {
        let bus = EventBus::new();
        bus.emit(AppEvent::Preferences(PreferenceEvent::Cleared));

        let mut first = bus.receiver();
        let mut second = bus.receiver();
        let event = invalidated();
        assert_eq!(bus.emit(event.clone()), 2);

        assert_eq!(first.recv().await.ok(), Some(event.clone()));
        assert_eq!(second.try_recv().ok(), Some(event));
        assert!(first.try_recv().is_err());
    }

    #[test]
    fn test_history_keeps_most_recent() {
        let bus = history_bus(3);

        for i in 0..5 {
            bus.emit(AppEvent::Multiplier(MultiplierEvent::Adjusted {
                value: 1.0 + i as f64 / 10.0,
            }));
        }

        let history = bus.history();
        assert_eq!(history.len(), 3);
        assert_eq!(
            history[0],
            AppEvent::Multiplier(MultiplierEvent::Adjusted { value: 1.2 })
        );

        bus.clear_history();
        assert!(bus.history().is_empty());
    }

    #[tokio::test]
    async fn test_slow_receiver_lags() {
        let bus = EventBus::with_config(EventBusConfig {
            channel_capacity: 2,
            ..Default::default()
        });
        let mut receiver = bus.receiver();

        for _ in 0..4 {
            bus.emit(invalidated());
        }

        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Lagged(2))
        ));
    }
}
