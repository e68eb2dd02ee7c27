//! # Event Bus Module
//!
//! Typed in-process events announced by the synchronization core, delivered
//! to listeners over a tokio broadcast channel. Screens use it to react to a
//! reset performed elsewhere without waiting for the next poll.
//!
//! ## Usage
//!
//! ```rust
//! use feedkit_core::event_bus::{AppEvent, EventBus, PreferenceEvent};
//!
//! let bus = EventBus::new();
//! let mut receiver = bus.receiver();
//!
//! bus.emit(AppEvent::Preferences(PreferenceEvent::Cleared));
//! assert_eq!(
//!     receiver.try_recv().ok(),
//!     Some(AppEvent::Preferences(PreferenceEvent::Cleared))
//! );
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
