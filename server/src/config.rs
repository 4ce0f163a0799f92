//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Image types accepted for picture uploads when none are configured.
pub const DEFAULT_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

fn default_image_types() -> Vec<String> {
    DEFAULT_IMAGE_TYPES.iter().map(|t| (*t).to_string()).collect()
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HS256 secret shared with the token-issuing tool
    pub token_secret: String,

    /// Directory picture uploads are written to
    pub upload_dir: PathBuf,

    /// Path prefix under which uploaded files are served
    pub public_upload_prefix: String,

    /// Maximum decoded picture size in bytes (default: 10MB)
    pub max_upload_size: usize,

    /// Allowed MIME types for picture uploads
    pub allowed_image_types: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            token_secret: env::var("TOKEN_SECRET").context("TOKEN_SECRET must be set")?,
            upload_dir: env::var("UPLOAD_DIR")
                .map_or_else(|_| PathBuf::from("./uploads"), PathBuf::from),
            public_upload_prefix: env::var("PUBLIC_UPLOAD_PREFIX")
                .unwrap_or_else(|_| "/uploads".into()),
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10 * 1024 * 1024), // 10MB
            allowed_image_types: env::var("ALLOWED_IMAGE_TYPES")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|types| !types.is_empty())
                .unwrap_or_else(default_image_types),
        })
    }

    /// Check whether a MIME type may be uploaded.
    #[must_use]
    pub fn is_allowed_image_type(&self, mime_type: &str) -> bool {
        self.allowed_image_types.iter().any(|t| t == mime_type)
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            token_secret: "test-secret".into(),
            upload_dir: env::temp_dir().join("railcat-test-uploads"),
            public_upload_prefix: "/uploads".into(),
            max_upload_size: 1024 * 1024,
            allowed_image_types: default_image_types(),
        }
    }
}
