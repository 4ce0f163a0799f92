//! JWT Token Validation
//!
//! Tokens are HS256-signed with the shared `TOKEN_SECRET` and minted by an
//! external admin tool. This module only verifies them and exposes claims.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use super::error::{AuthError, AuthResult};
use crate::permissions::{PermissionError, PermissionResult};

/// JWT claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user document id).
    pub sub: String,
    /// Username, informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Issued at (Unix timestamp).
    #[serde(default)]
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Encoded permission set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<serde_json::Value>,
}

impl Claims {
    /// The permissions claim as an integer mask.
    ///
    /// Returns `Ok(None)` when the claim is absent and `InvalidInput` when it
    /// is present but not an integer.
    pub fn permission_mask(&self) -> PermissionResult<Option<i64>> {
        match &self.permissions {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => value.as_i64().map(Some).ok_or_else(|| {
                PermissionError::InvalidInput(format!(
                    "permissions claim is not an integer: {value}"
                ))
            }),
        }
    }
}

/// Validate and decode an access token.
///
/// Returns `TokenExpired` for an expired token and `InvalidToken` for any
/// other verification failure.
pub fn validate_access_token(token: &str, secret: &str) -> AuthResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

    Ok(token_data.claims)
}
