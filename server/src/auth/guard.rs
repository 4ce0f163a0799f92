//! Mutation Guard
//!
//! Turns an Authorization header into an `AuthUser` and checks the user's
//! permission mask before a write. Every failure denies the operation.

use tracing::{debug, warn};

use super::error::{AuthError, AuthResult};
use super::jwt::{validate_access_token, Claims};
use crate::permissions::{ContentPermissions, PermissionCodec};

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// User document id.
    pub id: String,
    /// Username, if the token carried one.
    pub username: Option<String>,
    /// Encoded permission set; `None` when the token has no claim.
    pub permissions: Option<i64>,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AuthError;

    fn try_from(claims: Claims) -> AuthResult<Self> {
        let permissions = claims.permission_mask()?;
        Ok(Self {
            id: claims.sub,
            username: claims.username,
            permissions,
        })
    }
}

impl AuthUser {
    /// Require that the user holds `permission`.
    ///
    /// Returns `Forbidden` when the mask lacks it and propagates decode
    /// errors for a missing or malformed mask.
    pub fn require_permission(
        &self,
        codec: &PermissionCodec,
        permission: ContentPermissions,
    ) -> AuthResult<()> {
        let name = permission.name().ok_or_else(|| {
            AuthError::Internal(format!("not a single permission: {permission:?}"))
        })?;

        match codec.has(self.permissions, name) {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!(user_id = %self.id, permission = name, "Permission denied");
                Err(AuthError::Forbidden {
                    permission: name.to_string(),
                })
            }
            Err(e) => {
                warn!(user_id = %self.id, permission = name, error = %e, "Permission check failed");
                Err(e.into())
            }
        }
    }

    /// Names of all permissions granted to this user.
    pub fn granted<'a>(&self, codec: &'a PermissionCodec) -> AuthResult<Vec<&'a str>> {
        Ok(codec.decode(self.permissions)?)
    }
}

/// Extract the token from a `Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> AuthResult<&str> {
    let header = header.ok_or(AuthError::MissingAuthHeader)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Authenticate a request from its Authorization header.
pub fn authenticate(header: Option<&str>, secret: &str) -> AuthResult<AuthUser> {
    let token = bearer_token(header)?;
    let claims = validate_access_token(token, secret)?;
    let user = AuthUser::try_from(claims)?;
    debug!(user_id = %user.id, "Authenticated");
    Ok(user)
}
