//! Persisted key namespace
//!
//! All preferences live in one key/value namespace.

use feedkit_core::SelectionField;

/// Selected machine
pub const SELECTION_MACHINE: &str = "selection.machine";
/// Selected spindle
pub const SELECTION_SPINDLE: &str = "selection.spindle";
/// Selected material
pub const SELECTION_MATERIAL: &str = "selection.material";
/// Selected bit
pub const SELECTION_BIT: &str = "selection.bit";
/// Remember-choice flag ("true" / "false")
pub const SELECTION_REMEMBER: &str = "selection.remember";
/// Last resolved snapshot envelope (JSON)
pub const RESULT_SNAPSHOT: &str = "result.snapshot";
/// Durable multiplier (decimal string)
pub const RESULT_MULTIPLIER: &str = "result.multiplier";
/// Current invalidation token
pub const INVALIDATION_TOKEN: &str = "invalidation.token";
/// Bearer token written by the login flow
pub const AUTH_TOKEN: &str = "auth.token";

/// Key holding a selection field
pub fn selection_key(field: SelectionField) -> &'static str {
    match field {
        SelectionField::Machine => SELECTION_MACHINE,
        SelectionField::Spindle => SELECTION_SPINDLE,
        SelectionField::Material => SELECTION_MATERIAL,
        SelectionField::Bit => SELECTION_BIT,
    }
}

/// Keys cleared by a preference reset
pub const RESETTABLE_SELECTION: [&str; 4] = [
    SELECTION_MACHINE,
    SELECTION_SPINDLE,
    SELECTION_MATERIAL,
    SELECTION_BIT,
];
