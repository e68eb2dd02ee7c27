//! # FeedKit Core
//!
//! Core types and utilities for FeedKit.
//! Provides the error taxonomy, the selection/result/multiplier data model,
//! unit conversion and display formatting, and the in-process event bus.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod units;

pub use data::{
    CatalogEntry, CatalogKind, CutParameters, DisplayRow, InvalidationToken, Multiplier,
    PersistedResult, ResolveRequest, ResolveResponse, ResultSnapshot, SelectionField,
    SelectionKey, SelectionState, PROFILE_FACTOR,
};

pub use error::{
    Error, ResetError, ResolveError, Result, SelectionError, ShareError, StorageError,
};

// Re-export event bus for convenience
pub use event_bus::{
    AppEvent, EventBus, EventBusConfig, EventCategory, MultiplierEvent, PreferenceEvent,
    ResultEvent, ShareEvent,
};

pub use units::{MeasurementSystem, Quantity};
