//! Remote calculation service contract
//!
//! The service computes machining parameters, lists catalogs and accepts
//! shared multipliers. It is consumed as an opaque request/response
//! collaborator; [`crate::HttpBackend`] talks to the real service and tests
//! substitute their own implementation.

use async_trait::async_trait;
use feedkit_core::{
    CatalogEntry, CatalogKind, Multiplier, ResetError, ResolveError, ResolveRequest,
    ResolveResponse, SelectionState, ShareError,
};
use serde::{Deserialize, Serialize};

/// Body of a share request
///
/// The service expects the remember flag and the multiplier as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    /// Machine ID
    pub machine: String,
    /// Spindle ID
    pub spindle: String,
    /// Bit ID
    pub bit: String,
    /// Material ID
    pub material: String,
    /// `"true"` or `"false"`
    #[serde(rename = "rememberChoice")]
    pub remember_choice: String,
    /// Decimal representation of the saved multiplier
    pub multiplier: String,
}

impl ShareRequest {
    /// Build a share body for a selection and a saved multiplier
    pub fn new(selection: &SelectionState, multiplier: Multiplier) -> Self {
        Self {
            machine: selection.machine_id.clone(),
            spindle: selection.spindle_id.clone(),
            bit: selection.bit_id.clone(),
            material: selection.material_id.clone(),
            remember_choice: selection.remember_choice.to_string(),
            multiplier: multiplier.to_stored(),
        }
    }
}

/// Remote calculation service
#[async_trait]
pub trait CalculatorBackend: Send + Sync {
    /// Compute parameters for a selection
    async fn calculate(&self, request: &ResolveRequest) -> Result<ResolveResponse, ResolveError>;

    /// List one catalog
    async fn catalog(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, ResolveError>;

    /// Upload a tuned multiplier
    async fn share_settings(&self, auth_token: &str, request: &ShareRequest)
        -> Result<(), ShareError>;

    /// Forget the server-side remembered preference
    async fn reset_preference(&self, auth_token: &str) -> Result<(), ResetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_request_wire_shape() {
        let selection = SelectionState::new("A", "B", "D", "C").remembered(true);
        let request = ShareRequest::new(&selection, Multiplier::new(1.3));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["machine"], "A");
        assert_eq!(json["spindle"], "B");
        assert_eq!(json["bit"], "C");
        assert_eq!(json["material"], "D");
        assert_eq!(json["rememberChoice"], "true");
        assert_eq!(json["multiplier"], "1.3");
    }
}
