//! Stored record envelope and collection names.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;

/// Document collections of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    /// Locomotive manufacturers.
    Manufacturers,
    /// Locomotive models.
    Models,
    /// Unit owners (operators, museums, private).
    Owners,
    /// Individual locomotive units.
    Units,
    /// Tags attached to pictures.
    ImageTags,
    /// Uploaded pictures.
    Pictures,
    /// Documentation records (manuals, articles).
    Documentations,
}

impl Collection {
    /// Collection name as used by the document store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manufacturers => "manufacturers",
            Self::Models => "models",
            Self::Owners => "owners",
            Self::Units => "units",
            Self::ImageTags => "imageTags",
            Self::Pictures => "pictures",
            Self::Documentations => "documentations",
        }
    }

    /// All collections.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Manufacturers,
            Self::Models,
            Self::Owners,
            Self::Units,
            Self::ImageTags,
            Self::Pictures,
            Self::Documentations,
        ]
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog payload type bound to the collection it lives in.
pub trait CatalogEntry: Serialize + DeserializeOwned + Validate + Send + Sync + 'static {
    /// Collection holding documents of this type.
    const COLLECTION: Collection;
}

/// A stored document: store-assigned id, verification flag, and payload.
///
/// The payload is flattened so the document keeps the shape
/// `{ "id": ..., "verified": ..., "name": ..., ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<T> {
    /// Store-assigned identifier.
    pub id: String,
    /// Whether a moderator has verified this record.
    #[serde(default)]
    pub verified: bool,
    /// Record payload.
    #[serde(flatten)]
    pub data: T,
}
