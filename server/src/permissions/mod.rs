//! Permission system types and utilities.
//!
//! - Content permissions: typed flags for the built-in permissions
//! - Registry: ordered name to bit mapping
//! - Codec: mask encode/decode against a registry

pub mod codec;
pub mod content;
pub mod error;
pub mod registry;

pub use codec::PermissionCodec;
pub use content::ContentPermissions;
pub use error::{PermissionError, PermissionResult};
pub use registry::{PermissionEntry, PermissionRegistry, MAX_PERMISSIONS};
