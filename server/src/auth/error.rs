//! Authentication Error Types

use serde::Serialize;
use thiserror::Error;

use crate::permissions::PermissionError;

/// Authentication and authorization error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing Authorization header.
    #[error("Missing authorization header")]
    MissingAuthHeader,

    /// Invalid authorization header format.
    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    /// Invalid token (bad signature, malformed, missing claims).
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Authenticated user lacks the permission an operation requires.
    #[error("Missing permission: {permission}")]
    Forbidden {
        /// Name of the required permission.
        permission: String,
    },

    /// Permissions claim could not be decoded.
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// Internal server error.
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

impl AuthError {
    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingAuthHeader => "MISSING_AUTH",
            Self::InvalidAuthHeader => "INVALID_AUTH_HEADER",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Permission(PermissionError::InvalidInput(_)) => "INVALID_PERMISSIONS",
            Self::Permission(_) => "UNKNOWN_PERMISSION",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status the error maps to.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::MissingAuthHeader
            | Self::InvalidAuthHeader
            | Self::InvalidToken
            | Self::TokenExpired => 401,
            Self::Forbidden { .. } | Self::Permission(PermissionError::InvalidInput(_)) => 403,
            Self::Permission(_) | Self::Internal(_) => 500,
        }
    }

    /// Response body for this error.
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;
