//! Resolved result snapshots and the remote calculation wire shapes

use super::selection::{SelectionKey, SelectionState};
use serde::{Deserialize, Serialize};

/// Machining parameters resolved for one selection
///
/// Lengths are in mm and speeds in mm/min. A snapshot is immutable once
/// stored; a new resolve replaces it as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSnapshot {
    /// Spindle speed
    pub rpm: Option<f64>,
    /// Feed rate (mm/min)
    pub feed: Option<f64>,
    /// Depth of cut (mm)
    pub depth_of_cut: Option<f64>,
    /// Stepover (mm)
    pub stepover: Option<f64>,
    /// Plunge rate (mm/min)
    pub plunge: Option<f64>,
    /// Advisory message from the server
    pub warning: Option<String>,
    /// Server-recommended multiplier
    pub base_multiplier: f64,
}

impl ResultSnapshot {
    /// The warning, if it carries any text
    pub fn warning_text(&self) -> Option<&str> {
        self.warning
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty() && *w != "null")
    }
}

/// Request body of the remote calculation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    /// Machine ID
    pub machine: String,
    /// Spindle ID
    pub spindle: String,
    /// Bit ID
    pub bit: String,
    /// Material ID
    pub material: String,
    /// Remember flag
    pub remember: bool,
}

impl From<&SelectionState> for ResolveRequest {
    fn from(selection: &SelectionState) -> Self {
        Self {
            machine: selection.machine_id.clone(),
            spindle: selection.spindle_id.clone(),
            bit: selection.bit_id.clone(),
            material: selection.material_id.clone(),
            remember: selection.remember_choice,
        }
    }
}

/// Response body of the remote calculation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveResponse {
    /// Spindle speed
    #[serde(default)]
    pub rpm: Option<f64>,
    /// Feed rate (mm/min)
    #[serde(default)]
    pub feed: Option<f64>,
    /// Depth of cut (mm)
    #[serde(default)]
    pub depth_of_cut: Option<f64>,
    /// Stepover (mm)
    #[serde(default)]
    pub stepover: Option<f64>,
    /// Plunge rate (mm/min)
    #[serde(default)]
    pub plunge: Option<f64>,
    /// Server-recommended base multiplier
    pub multiplier: f64,
    /// Advisory message
    #[serde(default)]
    pub warning: Option<String>,
}

impl From<ResolveResponse> for ResultSnapshot {
    fn from(response: ResolveResponse) -> Self {
        Self {
            rpm: response.rpm,
            feed: response.feed,
            depth_of_cut: response.depth_of_cut,
            stepover: response.stepover,
            plunge: response.plunge,
            warning: response.warning,
            base_multiplier: response.multiplier,
        }
    }
}

/// Stored form of a snapshot
///
/// Records which selection the snapshot was resolved for and whether the
/// selection was remembered; non-remembered results only live for one
/// session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedResult {
    /// Selection the snapshot was computed for
    pub selection: SelectionKey,
    /// Remember flag at resolve time
    #[serde(default)]
    pub remembered: bool,
    /// The snapshot itself
    pub snapshot: ResultSnapshot,
}

impl PersistedResult {
    /// Whether this result belongs to the given selection
    pub fn is_for(&self, selection: &SelectionKey) -> bool {
        &self.selection == selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "rpm": 18000, "feed": 100.0, "depth_of_cut": null,
            "stepover": 1.5, "plunge": 40, "multiplier": 0.8,
            "warning": null, "spindle": "B", "bit": "C", "material": "D"
        }"#;
        let response: ResolveResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.multiplier, 0.8);
        assert_eq!(response.depth_of_cut, None);

        let snapshot = ResultSnapshot::from(response);
        assert_eq!(snapshot.rpm, Some(18000.0));
        assert_eq!(snapshot.base_multiplier, 0.8);
        assert_eq!(snapshot.warning_text(), None);
    }

    #[test]
    fn test_response_requires_multiplier() {
        let body = r#"{ "rpm": 18000 }"#;
        assert!(serde_json::from_str::<ResolveResponse>(body).is_err());
    }

    #[test]
    fn test_request_from_selection() {
        let selection = SelectionState::new("A", "B", "D", "C").remembered(true);
        let request = ResolveRequest::from(&selection);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "machine": "A", "spindle": "B", "bit": "C",
                "material": "D", "remember": true
            })
        );
    }

    #[test]
    fn test_warning_text_filters_placeholders() {
        let mut snapshot = ResultSnapshot {
            rpm: None,
            feed: None,
            depth_of_cut: None,
            stepover: None,
            plunge: None,
            warning: Some("null".to_string()),
            base_multiplier: 1.0,
        };
        assert_eq!(snapshot.warning_text(), None);

        snapshot.warning = Some("Bit too long for material".to_string());
        assert_eq!(snapshot.warning_text(), Some("Bit too long for material"));
    }
}
