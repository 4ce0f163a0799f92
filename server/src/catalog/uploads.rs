//! Picture Upload Handling
//!
//! Pictures arrive as base64 strings, optionally wrapped in a `data:` URL.
//! The payload is size-checked, its type sniffed from magic bytes, and the
//! bytes written under the configured upload directory.

use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while accepting a picture.
#[derive(Debug, Error)]
pub enum UploadError {
    /// No image data provided.
    #[error("No file provided")]
    NoFile,

    /// Image too large.
    #[error("File too large (max: {max_size} bytes)")]
    TooLarge {
        /// Maximum allowed size in bytes.
        max_size: usize,
    },

    /// Payload is not valid base64 or a valid data URL.
    #[error("Invalid image encoding")]
    InvalidEncoding,

    /// Image type not accepted.
    #[error("Invalid file type: {mime_type}")]
    InvalidMimeType {
        /// The rejected MIME type.
        mime_type: String,
    },

    /// Writing the file failed.
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoFile => "NO_FILE",
            Self::TooLarge { .. } => "FILE_TOO_LARGE",
            Self::InvalidEncoding => "INVALID_ENCODING",
            Self::InvalidMimeType { .. } => "INVALID_MIME_TYPE",
            Self::Io(_) => "STORAGE_ERROR",
        }
    }

    /// HTTP status the error maps to.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::NoFile | Self::InvalidEncoding => 400,
            Self::TooLarge { .. } => 413,
            Self::InvalidMimeType { .. } => 415,
            Self::Io(_) => 500,
        }
    }
}

// ============================================================================
// Types
// ============================================================================

/// Picture upload request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureUpload {
    /// Base64 image bytes or a `data:<mime>;base64,<bytes>` URL.
    pub data: String,
    /// Tag ids to attach.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Unit shown in the picture.
    pub unit: Option<String>,
}

/// A decoded and type-checked image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedImage {
    /// Raw bytes.
    pub bytes: Vec<u8>,
    /// Detected MIME type.
    pub mime_type: String,
    /// File extension for the detected type.
    pub extension: String,
}

/// Location of a written picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Path on disk.
    pub disk_path: PathBuf,
    /// Public path recorded on the picture.
    pub public_path: String,
}

// ============================================================================
// Validation
// ============================================================================

/// Split a payload into its claimed MIME type (for data URLs) and base64 body.
fn split_data_url(payload: &str) -> Result<(Option<&str>, &str), UploadError> {
    let Some(rest) = payload.strip_prefix("data:") else {
        return Ok((None, payload));
    };
    let (meta, body) = rest.split_once(',').ok_or(UploadError::InvalidEncoding)?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or(UploadError::InvalidEncoding)?;
    Ok(((!mime.is_empty()).then_some(mime), body))
}

/// Decode a base64 payload, enforcing `max_size` on the decoded bytes.
///
/// Returns the claimed MIME type from a data URL alongside the bytes.
pub fn decode_payload(
    payload: &str,
    max_size: usize,
) -> Result<(Option<String>, Vec<u8>), UploadError> {
    let (claimed, body) = split_data_url(payload.trim())?;
    let body: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if body.is_empty() {
        return Err(UploadError::NoFile);
    }

    // Reject before decoding when the encoded length already exceeds the limit
    if body.len() / 4 * 3 > max_size.saturating_add(2) {
        return Err(UploadError::TooLarge { max_size });
    }

    let bytes = STANDARD
        .decode(body.as_bytes())
        .map_err(|_| UploadError::InvalidEncoding)?;
    if bytes.len() > max_size {
        return Err(UploadError::TooLarge { max_size });
    }

    Ok((claimed.map(str::to_string), bytes))
}

/// Validate image bytes against the allowed types using magic byte detection.
pub fn validate_image(
    bytes: Vec<u8>,
    claimed_mime: Option<&str>,
    config: &Config,
) -> Result<ValidatedImage, UploadError> {
    let Some(kind) = infer::get(&bytes) else {
        tracing::warn!(
            size = bytes.len(),
            "Picture content does not match any known signature"
        );
        return Err(UploadError::InvalidMimeType {
            mime_type: claimed_mime.map_or_else(
                || "unrecognizable content".to_string(),
                |claimed| format!("{claimed} (content unrecognizable)"),
            ),
        });
    };

    let detected = kind.mime_type();
    if let Some(claimed) = claimed_mime {
        if claimed != detected {
            tracing::warn!(
                claimed_mime = %claimed,
                detected_mime = %detected,
                "Picture type mismatch"
            );
            return Err(UploadError::InvalidMimeType {
                mime_type: format!("{claimed} (detected: {detected})"),
            });
        }
    }

    if !config.is_allowed_image_type(detected) {
        return Err(UploadError::InvalidMimeType {
            mime_type: detected.to_string(),
        });
    }

    Ok(ValidatedImage {
        bytes,
        mime_type: detected.to_string(),
        extension: kind.extension().to_string(),
    })
}

// ============================================================================
// Storage
// ============================================================================

/// Write an image under the upload directory with a generated name.
pub async fn write_image(
    image: &ValidatedImage,
    config: &Config,
) -> Result<StoredFile, UploadError> {
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let file_name = format!("{}.{}", Uuid::now_v7(), image.extension);
    let disk_path = config.upload_dir.join(&file_name);
    tokio::fs::write(&disk_path, &image.bytes).await?;

    let public_path = format!(
        "{}/{}",
        config.public_upload_prefix.trim_end_matches('/'),
        file_name
    );
    Ok(StoredFile {
        disk_path,
        public_path,
    })
}
