//! # View Errors
//!
//! Errors raised by view construction and publication. Store errors
//! raised during a view operation pass through unchanged as `StoreError`.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for view construction and publication
pub type ViewResult<T> = Result<T, ViewError>;

/// View errors
#[derive(Debug, Error)]
pub enum ViewError {
    // ==================
    // Construction Errors
    // ==================
    /// Source is neither a registered collection nor an existing view
    #[error("Invalid view source: {0} is neither a collection nor a view")]
    InvalidSource(String),

    /// A view or collection with this name already exists
    #[error("View already defined: {0}")]
    DuplicateView(String),

    // ==================
    // Publication Errors
    // ==================
    /// A publication with this name already exists
    #[error("Publication already registered: {0}")]
    DuplicatePublication(String),

    /// No publication with this name
    #[error("Publication not found: {0}")]
    UnknownPublication(String),

    // ==================
    // Pass-through
    // ==================
    /// Error raised by the underlying store
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ViewError {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            ViewError::InvalidSource(_) => "VIEW_INVALID_SOURCE",
            ViewError::DuplicateView(_) => "VIEW_DUPLICATE",
            ViewError::DuplicatePublication(_) => "VIEW_DUPLICATE_PUBLICATION",
            ViewError::UnknownPublication(_) => "VIEW_UNKNOWN_PUBLICATION",
            ViewError::Store(e) => e.code(),
            ViewError::Internal(_) => "VIEW_INTERNAL_ERROR",
        }
    }
}
