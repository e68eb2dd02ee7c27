//! # FeedKit Sync
//!
//! Keeps independently mounted screens in agreement about the persisted
//! selection, the last resolved result and the tuned multiplier.
//!
//! ## Components
//! - [`InvalidationBus`] / [`InvalidationWatcher`]: staleness tokens
//! - [`SettingsResolver`]: selection to persisted result
//! - [`MultiplierController`]: bounded in-memory adjustment
//! - [`ShareService`]: best-effort upload of the saved multiplier
//! - [`ScreenSession`]: lifecycle callbacks of one screen
//! - [`SyncEngine`]: wiring and session-wide operations
//!
//! ## Usage
//! ```no_run
//! use feedkit_settings::{MemoryStore, RemoteSettings, SyncSettings};
//! use feedkit_sync::{HttpBackend, SyncEngine};
//! use std::sync::Arc;
//!
//! # async fn run() -> feedkit_core::Result<()> {
//! let backend = HttpBackend::new(RemoteSettings::default())?;
//! let engine = SyncEngine::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(backend),
//!     &SyncSettings::default(),
//! );
//! engine.start().await?;
//!
//! let results = engine.open_screen("results");
//! results.on_screen_focused().await?;
//! results.on_user_adjusts(0.1);
//! results.on_user_saves().await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod engine;
pub mod http;
pub mod invalidation;
pub mod lifecycle;
pub mod multiplier;
pub mod resolver;
pub mod share;
pub mod view;

pub use backend::{CalculatorBackend, ShareRequest};
pub use engine::SyncEngine;
pub use http::HttpBackend;
pub use invalidation::{InvalidationBus, InvalidationWatcher};
pub use lifecycle::ScreenSession;
pub use multiplier::MultiplierController;
pub use resolver::{keeps_local_multiplier, ResolveOutcome, SettingsResolver};
pub use share::ShareService;
pub use view::{ResolveTicket, ResultView};
