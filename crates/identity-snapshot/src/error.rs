//! Error types for identity snapshots.
//!
//! All errors are strongly typed and propagated without panicking.
//! Validation errors identify the failing field so callers can fix
//! the data and retry; store errors are surfaced unchanged.

/// Snapshot error types covering validation, codec, and store failures.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("unix time not set")]
    UnsetTime,

    #[error("either name or login should be set")]
    NameOrLoginRequired,

    #[error("{field} should be a single line")]
    NotSingleLine { field: &'static str },

    #[error("{field} is not fully printable")]
    NotPrintable { field: &'static str },

    #[error("avatar url is not a valid URL: {0}")]
    InvalidAvatarUrl(String),

    #[error("nonce is too big: {len} bytes (max 64)")]
    NonceTooLong { len: usize },

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("validation error: {0}")]
    Validation(#[source] Box<SnapshotError>),

    #[error("unknown format version {found}")]
    FormatMismatch { found: u32 },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, SnapshotError>;
