//! Error types for the data layer
//!
//! Loading never fails (bad blobs degrade to empty/default collections), so
//! only input validation and saving surface errors.

/// Rejected input to a repository mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("student name is required")]
    EmptyName,
    #[error("phone number is required")]
    EmptyPhone,
    #[error("a student must be selected")]
    MissingStudent,
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
    #[error("invalid month (expected YYYY-MM): {0:?}")]
    InvalidMonth(String),
    #[error("unknown payment method: {0:?}")]
    UnknownMethod(String),
    /// The last stored id leaves no room for another
    #[error("no identifiers left after {0}")]
    IdExhausted(i64),
    #[error("invalid setting: {0}")]
    InvalidSetting(String),
}

/// Failure writing to durable storage
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// No storage backend (e.g. LocalStorage disabled)
    #[error("storage unavailable")]
    Unavailable,
    /// Backend rejected the write (quota exceeded, security error)
    #[error("storage backend error: {0}")]
    Backend(String),
}
