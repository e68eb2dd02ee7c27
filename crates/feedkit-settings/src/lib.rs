//! FeedKit Settings Crate
//!
//! Handles durable preference storage (selection, resolved results,
//! multiplier, invalidation token) and application configuration.

pub mod config;
pub mod error;
pub mod file_store;
pub mod keys;
pub mod memory_store;
pub mod preferences;
pub mod store;

pub use config::{Config, DisplaySettings, RemoteSettings, StorageSettings, SyncSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use preferences::PreferenceStoreExt;
pub use store::{PreferenceStore, StoreResult, WriteBatch};
