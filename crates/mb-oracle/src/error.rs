//! Error types for the oracle core.

use thiserror::Error;

use crate::category::Category;

/// Result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;

/// Errors that can occur while configuring or persisting the oracle.
///
/// Draw requests never produce these: a rejected draw is reported through
/// [`crate::DrawAck`], and unreadable persisted state falls back to defaults.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Filesystem failure in a storage backend.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or decoded as JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A storage key contains characters the backend cannot represent.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Category name that is not one of the fixed categories.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Theme name that is not one of the built-in themes.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// An answer book was built with no answers for a category.
    #[error("answer pool for {0} is empty")]
    EmptyPool(Category),
}
