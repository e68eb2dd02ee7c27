//! # FeedKit
//!
//! A feeds-and-speeds calculator front-end. The user picks a machine,
//! spindle, material and bit; a remote service computes RPM, feed, depth of
//! cut, stepover and plunge; the user tunes the result with a bounded
//! multiplier and may share the tuned value back.
//!
//! ## Architecture
//!
//! FeedKit is organized as a workspace with multiple crates:
//!
//! 1. **feedkit-core** - Errors, data model, unit conversion, events
//! 2. **feedkit-settings** - Preference stores and configuration
//! 3. **feedkit-sync** - Invalidation, resolution, multiplier control, screen sessions
//! 4. **feedkit** - Command-line front-end that integrates all crates

pub mod cli;

pub use feedkit_core::{
    units, AppEvent, CatalogEntry, CatalogKind, CutParameters, DisplayRow, Error, EventBus,
    InvalidationToken, MeasurementSystem, Multiplier, PersistedResult, ResultSnapshot, Result,
    SelectionField, SelectionState,
};

pub use feedkit_settings::{
    Config, JsonFileStore, MemoryStore, PreferenceStore, PreferenceStoreExt, RemoteSettings,
    SyncSettings,
};

pub use feedkit_sync::{
    CalculatorBackend, HttpBackend, InvalidationBus, MultiplierController, ResultView,
    ScreenSession, SettingsResolver, ShareService, SyncEngine,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty formatted output on stderr, leaving stdout to command output
/// - RUST_LOG environment variable support
/// - INFO as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
