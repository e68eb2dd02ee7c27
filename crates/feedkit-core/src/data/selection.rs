//! Selection of machine, spindle, material and bit
//!
//! The four IDs are opaque strings referencing catalog entries owned by the
//! remote service.

use crate::error::SelectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four selection fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionField {
    /// The CNC machine
    Machine,
    /// The spindle or router fitted to the machine
    Spindle,
    /// The stock material
    Material,
    /// The cutting bit
    Bit,
}

impl SelectionField {
    /// All fields in request order
    pub const ALL: [SelectionField; 4] = [
        SelectionField::Machine,
        SelectionField::Spindle,
        SelectionField::Material,
        SelectionField::Bit,
    ];

    /// Field name as used in messages and wire payloads
    pub fn name(&self) -> &'static str {
        match self {
            Self::Machine => "machine",
            Self::Spindle => "spindle",
            Self::Material => "material",
            Self::Bit => "bit",
        }
    }

    /// Catalog listing the valid values for this field
    pub fn catalog(&self) -> CatalogKind {
        match self {
            Self::Machine => CatalogKind::Machines,
            Self::Spindle => CatalogKind::Spindles,
            Self::Material => CatalogKind::Materials,
            Self::Bit => CatalogKind::Bits,
        }
    }
}

impl fmt::Display for SelectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SelectionField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "machine" => Ok(Self::Machine),
            "spindle" | "router" => Ok(Self::Spindle),
            "material" => Ok(Self::Material),
            "bit" => Ok(Self::Bit),
            _ => Err(format!("Unknown selection field: {}", s)),
        }
    }
}

/// Remote catalog collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// Machine catalog
    Machines,
    /// Spindle catalog
    Spindles,
    /// Material catalog
    Materials,
    /// Bit catalog
    Bits,
}

impl CatalogKind {
    /// Path segment used by the catalog endpoint
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Machines => "machines",
            Self::Spindles => "spindles",
            Self::Materials => "materials",
            Self::Bits => "bits",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "machines" | "machine" => Ok(Self::Machines),
            "spindles" | "spindle" | "routers" => Ok(Self::Spindles),
            "materials" | "material" => Ok(Self::Materials),
            "bits" | "bit" => Ok(Self::Bits),
            _ => Err(format!("Unknown catalog: {}", s)),
        }
    }
}

/// A catalog entry as listed by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Entry identifier
    pub id: String,
    /// Display name, also used as the selection value
    pub name: String,
}

/// The user's current selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Selected machine ID
    pub machine_id: String,
    /// Selected spindle ID
    pub spindle_id: String,
    /// Selected material ID
    pub material_id: String,
    /// Selected bit ID
    pub bit_id: String,
    /// Whether the server should remember this combination
    pub remember_choice: bool,
}

impl SelectionState {
    /// Create a selection from the four IDs
    pub fn new(
        machine: impl Into<String>,
        spindle: impl Into<String>,
        material: impl Into<String>,
        bit: impl Into<String>,
    ) -> Self {
        Self {
            machine_id: machine.into(),
            spindle_id: spindle.into(),
            material_id: material.into(),
            bit_id: bit.into(),
            remember_choice: false,
        }
    }

    /// Set the remember flag
    pub fn remembered(mut self, remember: bool) -> Self {
        self.remember_choice = remember;
        self
    }

    /// Get a field value
    pub fn field(&self, field: SelectionField) -> &str {
        match field {
            SelectionField::Machine => &self.machine_id,
            SelectionField::Spindle => &self.spindle_id,
            SelectionField::Material => &self.material_id,
            SelectionField::Bit => &self.bit_id,
        }
    }

    /// Set a field value
    pub fn set_field(&mut self, field: SelectionField, value: impl Into<String>) {
        let value = value.into();
        match field {
            SelectionField::Machine => self.machine_id = value,
            SelectionField::Spindle => self.spindle_id = value,
            SelectionField::Material => self.material_id = value,
            SelectionField::Bit => self.bit_id = value,
        }
    }

    /// Fields that are empty (whitespace counts as empty)
    pub fn missing_fields(&self) -> Vec<SelectionField> {
        SelectionField::ALL
            .into_iter()
            .filter(|f| self.field(*f).trim().is_empty())
            .collect()
    }

    /// Whether all four IDs are present
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Check that a resolve may be attempted
    pub fn validate(&self) -> Result<(), SelectionError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SelectionError::Incomplete {
                missing: missing.iter().map(|f| f.name()).collect(),
            })
        }
    }

    /// Identity of the combination, ignoring the remember flag
    pub fn key(&self) -> SelectionKey {
        SelectionKey {
            machine: self.machine_id.clone(),
            spindle: self.spindle_id.clone(),
            material: self.material_id.clone(),
            bit: self.bit_id.clone(),
        }
    }
}

/// The four IDs identifying which combination a snapshot belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionKey {
    /// Machine ID
    pub machine: String,
    /// Spindle ID
    pub spindle: String,
    /// Material ID
    pub material: String,
    /// Bit ID
    pub bit: String,
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {}",
            self.machine, self.spindle, self.material, self.bit
        )
    }
}
