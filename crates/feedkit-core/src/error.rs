//! Error handling for FeedKit
//!
//! Provides the error types for every layer of the synchronization core:
//! - Selection errors (missing catalog IDs, recovered locally)
//! - Storage errors (preference store unavailable or corrupted)
//! - Resolve errors (remote calculation failures)
//! - Share errors (best-effort feedback upload)
//! - Reset errors (remote preference reset)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Selection error type
///
/// Raised before any network call is made when the current selection
/// cannot be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// One or more catalog IDs are empty
    #[error("Incomplete selection: missing {}", .missing.join(", "))]
    Incomplete {
        /// Names of the missing selection fields.
        missing: Vec<&'static str>,
    },
}

/// Storage error type
///
/// Represents failures of the preference store. Reads that fail are
/// treated as "value absent" by callers; writes surface these errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store could not be reached
    #[error("Storage unavailable for '{key}': {reason}")]
    Unavailable {
        /// The key being read or written.
        key: String,
        /// The reason the store is unavailable.
        reason: String,
    },

    /// A stored value could not be decoded
    #[error("Corrupted value for '{key}': {reason}")]
    Corrupted {
        /// The key holding the corrupted value.
        key: String,
        /// The reason decoding failed.
        reason: String,
    },
}

impl StorageError {
    /// Create an unavailable error for a key
    pub fn unavailable(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a corrupted-value error for a key
    pub fn corrupted(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupted {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Resolve error type
///
/// Represents failures of the remote calculation call. A failed resolve
/// never mutates the previously stored snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The server answered with a non-2xx status
    #[error("Resolve failed: server returned {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The request never produced a response
    #[error("Resolve failed: network error: {message}")]
    Network {
        /// The transport error message.
        message: String,
    },

    /// A 2xx response body was not the expected JSON
    #[error("Resolve failed: malformed response: {reason}")]
    MalformedResponse {
        /// The reason the body was rejected.
        reason: String,
    },

    /// The requesting view went away before the result arrived
    #[error("Resolve discarded: requesting view is no longer current")]
    Cancelled,
}

/// Share error type
///
/// Sharing is best-effort; these errors never affect local state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// No bearer token is stored
    #[error("Share failed: not authenticated")]
    NotAuthenticated,

    /// No multiplier has been saved yet
    #[error("Share failed: no saved multiplier to share")]
    NothingSaved,

    /// The server answered with a non-2xx status
    #[error("Share failed: server returned {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The request never produced a response
    #[error("Share failed: network error: {message}")]
    Network {
        /// The transport error message.
        message: String,
    },

    /// A 2xx response body was not JSON
    #[error("Share failed: malformed response: {reason}")]
    MalformedResponse {
        /// The reason the body was rejected.
        reason: String,
    },
}

/// Remote preference reset error type
///
/// A failed remote reset leaves local preferences untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResetError {
    /// The server answered with a non-2xx status
    #[error("Preference reset failed: server returned {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The request never produced a response
    #[error("Preference reset failed: network error: {message}")]
    Network {
        /// The transport error message.
        message: String,
    },
}

/// Main error type for FeedKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Selection error
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Resolve error
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Share error
    #[error(transparent)]
    Share(#[from] ShareError),

    /// Reset error
    #[error(transparent)]
    Reset(#[from] ResetError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an incomplete selection
    pub fn is_incomplete_selection(&self) -> bool {
        matches!(self, Error::Selection(SelectionError::Incomplete { .. }))
    }

    /// Check if this is a storage error
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    /// Check if this is a resolve failure
    pub fn is_resolve_error(&self) -> bool {
        matches!(self, Error::Resolve(_))
    }

    /// Check if this resolve was discarded because its view went away
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Resolve(ResolveError::Cancelled))
    }

    /// Check if this is a share failure
    pub fn is_share_error(&self) -> bool {
        matches!(self, Error::Share(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
