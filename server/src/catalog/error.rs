//! Catalog Error Types

use rc_common::Collection;
use thiserror::Error;

use super::uploads::UploadError;
use crate::auth::{AuthError, ErrorResponse};

/// Errors returned by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Authentication or permission check failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Record does not exist.
    #[error("{collection} record not found: {id}")]
    NotFound {
        /// Collection searched.
        collection: Collection,
        /// Requested id.
        id: String,
    },

    /// Input failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Document could not be converted to or from its record type.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Document store failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Picture upload failure.
    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl CatalogError {
    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Auth(e) => e.code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Serialization(_) | Self::Storage(_) => "INTERNAL_ERROR",
            Self::Upload(e) => e.code(),
        }
    }

    /// HTTP status the error maps to.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Auth(e) => e.status(),
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Serialization(_) | Self::Storage(_) => 500,
            Self::Upload(e) => e.status(),
        }
    }

    /// Response body for this error.
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            Self::Serialization(_) | Self::Storage(_) => "Internal server error".to_string(),
            Self::Upload(UploadError::Io(_)) => "Storage operation failed".to_string(),
            _ => self.to_string(),
        };
        ErrorResponse {
            error: self.code().to_string(),
            message,
        }
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
