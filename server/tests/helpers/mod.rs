//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use railcat_server::auth::{authenticate, AuthUser};
use railcat_server::catalog::{CatalogService, MemoryStore};
use railcat_server::config::Config;
use railcat_server::permissions::PermissionCodec;
use serde_json::{json, Value};

/// Smallest PNG prefix `infer` recognizes.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];

/// Sign arbitrary claims with the test secret.
pub fn sign_claims(claims: &Value, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign token")
}

/// Sign a valid one-hour token for `sub` carrying `permissions`.
pub fn sign_token(config: &Config, sub: &str, permissions: Value) -> String {
    sign_claims(
        &json!({
            "sub": sub,
            "username": sub,
            "iat": Utc::now().timestamp(),
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
            "permissions": permissions,
        }),
        &config.token_secret,
    )
}

/// Authenticate a caller the way a request handler would.
pub fn login(config: &Config, sub: &str, permissions: Value) -> AuthUser {
    let header = format!("Bearer {}", sign_token(config, sub, permissions));
    authenticate(Some(&header), &config.token_secret).expect("Failed to authenticate")
}

/// Service over an empty in-memory store.
pub fn catalog(config: Config) -> CatalogService<MemoryStore> {
    CatalogService::new(
        Arc::new(MemoryStore::new()),
        Arc::new(PermissionCodec::default()),
        Arc::new(config),
    )
}
