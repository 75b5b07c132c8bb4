//! # Store Errors
//!
//! Errors raised by a document store. Views pass them through unchanged.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Error)]
pub enum StoreError {
    // ==================
    // Selector Errors
    // ==================
    /// Selector is structurally invalid
    #[error("Malformed selector: {0}")]
    MalformedSelector(String),

    /// Operator not understood by the store
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// `$regex` pattern failed to compile
    #[error("Invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),

    // ==================
    // Write Errors
    // ==================
    /// Modifier is structurally invalid
    #[error("Invalid modifier: {0}")]
    InvalidModifier(String),

    /// Document is not a JSON object
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A document with this `_id` already exists
    #[error("Duplicate document id: {0}")]
    DuplicateId(String),

    // ==================
    // Persistence Errors
    // ==================
    /// File I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document file could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::MalformedSelector(_) => "STORE_MALFORMED_SELECTOR",
            StoreError::UnknownOperator(_) => "STORE_UNKNOWN_OPERATOR",
            StoreError::InvalidRegex(_) => "STORE_INVALID_REGEX",
            StoreError::InvalidModifier(_) => "STORE_INVALID_MODIFIER",
            StoreError::InvalidDocument(_) => "STORE_INVALID_DOCUMENT",
            StoreError::DuplicateId(_) => "STORE_DUPLICATE_ID",
            StoreError::Io(_) => "STORE_IO_ERROR",
            StoreError::Serialization(_) => "STORE_SERIALIZATION_ERROR",
            StoreError::Internal(_) => "STORE_INTERNAL_ERROR",
        }
    }

    /// Returns whether the caller supplied bad input
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            StoreError::Io(_) | StoreError::Serialization(_) | StoreError::Internal(_)
        )
    }
}
