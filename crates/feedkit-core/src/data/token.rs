//! Invalidation tokens
//!
//! A token is written whenever shared preferences are reset. Any token a
//! screen has not seen before means its resolved state is stale.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque marker signalling stale shared state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvalidationToken(String);

impl InvalidationToken {
    /// Create a fresh token
    ///
    /// Tokens lead with a millisecond timestamp and carry a random suffix so
    /// two resets within the same millisecond remain distinguishable.
    pub fn fresh() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{}-{}", millis, &suffix[..8]))
    }

    /// Wrap a stored token value; empty values are not tokens
    pub fn from_stored(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// The stored representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvalidationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_tokens_are_distinct() {
        let a = InvalidationToken::fresh();
        let b = InvalidationToken::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_stored_value_is_not_a_token() {
        assert_eq!(InvalidationToken::from_stored(""), None);
        assert_eq!(InvalidationToken::from_stored("  "), None);
        assert_eq!(
            InvalidationToken::from_stored("1700000000000").map(|t| t.to_string()),
            Some("1700000000000".to_string())
        );
    }
}
