//! Error types for runeward-core

use thiserror::Error;

/// Core error type
///
/// Rule evaluation failures never surface here: a malformed rule is
/// marked ignored and reported through the diagnostics channel so the
/// rest of the cycle keeps running. This enum covers the persistence
/// boundary and host-facing lookups only.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Unsupported patch for item {item}: {reason}")]
    UnsupportedPatch { item: String, reason: String },

    #[error("Commit rejected: {0}")]
    CommitRejected(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
