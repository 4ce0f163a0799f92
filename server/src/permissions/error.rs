//! Permission Error Types

use thiserror::Error;

/// Errors raised by the permission registry and codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// Encoded permission set is missing or not a valid mask.
    #[error("Invalid permission set: {0}")]
    InvalidInput(String),

    /// Permission name is not in the registry.
    #[error("Unknown permission: {0}")]
    UnknownPermission(String),

    /// Permission name registered twice.
    #[error("Duplicate permission: {0}")]
    DuplicatePermission(String),

    /// No free bit left for another permission.
    #[error("Permission registry is full ({max} entries)")]
    RegistryFull {
        /// Maximum number of entries.
        max: usize,
    },
}

/// Result type for permission operations.
pub type PermissionResult<T> = Result<T, PermissionError>;
