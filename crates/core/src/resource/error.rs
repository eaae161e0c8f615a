//! Resource error types.

use thiserror::Error;

use kassabok_shared::AppError;

use crate::cipher::CipherError;

/// Resource operation errors.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Input is missing or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No resource with this id.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The caller may not perform this action on the resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Document encryption failed.
    #[error("document cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl ResourceError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(id.to_string())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<AppError> for ResourceError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation(msg) => Self::Validation(msg),
            AppError::NotFound(msg) => Self::NotFound(msg),
            AppError::Forbidden(msg) | AppError::Unauthorized(msg) => Self::Forbidden(msg),
            AppError::Database(msg) | AppError::Internal(msg) => Self::Repository(msg),
        }
    }
}

impl From<ResourceError> for AppError {
    fn from(error: ResourceError) -> Self {
        match error {
            ResourceError::Validation(msg) => Self::Validation(msg),
            ResourceError::NotFound(id) => Self::NotFound(format!("resource {id}")),
            ResourceError::Forbidden(msg) => Self::Forbidden(msg),
            ResourceError::Cipher(e) => Self::Internal(e.to_string()),
            ResourceError::Repository(msg) => Self::Database(msg),
        }
    }
}
