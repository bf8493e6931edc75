//! Error types for the cache and its backing stores
//!
//! Provides unified error handling using thiserror. None of these errors
//! escape the public cache operations; they exist so stores can report
//! failure explicitly and the cache can decide how to degrade.

use thiserror::Error;

// == Store Error Enum ==
/// Failure reported by a [`PersistentStore`](crate::store::PersistentStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing medium cannot be read or written at all
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A write was attempted but refused (quota, read-only medium)
    #[error("Write rejected: {0}")]
    WriteRejected(String),

    /// A stored value exists but its bytes are damaged
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Underlying filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// == Cache Error Enum ==
/// Unified error type for cache internals.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Payload could not be encoded into the record format
    #[error("Serialization failed for key {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Record exists but does not decode into the expected shape
    #[error("Corrupt record for key {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Backing store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

// == Result Type Alias ==
/// Convenience Result type for cache internals.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Result type returned by store implementations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
