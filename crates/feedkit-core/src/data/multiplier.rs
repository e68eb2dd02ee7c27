//! Bounded multiplier applied on top of a resolved snapshot

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar adjustment in the closed interval [0.1, 2.0]
///
/// Stepped adjustments are quantized to one decimal place. The server's
/// baseline may be any in-range value and is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Multiplier(f64);

impl Multiplier {
    /// Lowest allowed value
    pub const MIN: f64 = 0.1;
    /// Highest allowed value
    pub const MAX: f64 = 2.0;
    /// Increment of one +/- press
    pub const STEP: f64 = 0.1;
    /// Neutral multiplier
    pub const NEUTRAL: Multiplier = Multiplier(1.0);

    const EPSILON: f64 = 1e-9;

    /// Create a multiplier, saturating into range
    ///
    /// Non-finite input falls back to the neutral value.
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self::NEUTRAL;
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Parse a stored decimal string
    pub fn parse(value: &str) -> Option<Self> {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Self::new)
    }

    /// The raw value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Add `delta`, round to one decimal place and saturate into range
    pub fn adjusted(&self, delta: f64) -> Self {
        let next = ((self.0 + delta) * 10.0).round() / 10.0;
        Self::new(next)
    }

    /// Compare two multipliers ignoring floating-point noise
    pub fn same_as(&self, other: &Multiplier) -> bool {
        (self.0 - other.0).abs() < Self::EPSILON
    }

    /// Apply to a raw value; absent values stay absent
    pub fn apply(&self, raw: Option<f64>) -> Option<f64> {
        raw.map(|v| v * self.0)
    }

    /// Stored representation
    pub fn to_stored(&self) -> String {
        self.0.to_string()
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
