//! Data models for selections, resolved results and user adjustments
//!
//! This module provides:
//! - The machine/spindle/material/bit selection and its completeness rules
//! - Resolved result snapshots and the remote calculation wire shapes
//! - The bounded multiplier applied on top of a snapshot
//! - Invalidation tokens used to signal stale shared state
//! - Derived cut parameters for the area clearance and profile passes

pub mod derived;
pub mod multiplier;
pub mod selection;
pub mod snapshot;
pub mod token;

pub use derived::{CutParameters, DisplayRow, PROFILE_FACTOR};
pub use multiplier::Multiplier;
pub use selection::{CatalogEntry, CatalogKind, SelectionField, SelectionKey, SelectionState};
pub use snapshot::{PersistedResult, ResolveRequest, ResolveResponse, ResultSnapshot};
pub use token::InvalidationToken;
