//! Authentication Service
//!
//! Verifies access tokens and guards catalog mutations by permission.

mod error;
mod guard;
pub mod jwt;

pub use error::{AuthError, AuthResult, ErrorResponse};
pub use guard::{authenticate, bearer_token, AuthUser};
