//! Catalog payload types.
//!
//! Field names serialize in camelCase to match the stored documents.
//! References to other records are store ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::record::{CatalogEntry, Collection};

/// Locomotive manufacturer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Manufacturer {
    /// Full company name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Abbreviated name (e.g. "H. Cegielski").
    #[validate(length(max = 64))]
    pub short_name: Option<String>,
    /// Country of origin.
    #[validate(length(max = 100))]
    pub country: Option<String>,
    /// Founding date, free-form.
    pub creation_date: Option<String>,
    /// Whether the company still operates.
    #[serde(default)]
    pub works: bool,
    /// Liquidation date, free-form.
    pub date_of_liquidation: Option<String>,
    /// Units built by this manufacturer.
    #[serde(default)]
    pub units: Vec<String>,
}

impl CatalogEntry for Manufacturer {
    const COLLECTION: Collection = Collection::Manufacturers;
}

/// Locomotive model (series / type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Manufacturer's factory type designation.
    #[validate(length(max = 64))]
    pub factory_type: Option<String>,
    /// Manufacturer id.
    pub manufacturer: Option<String>,
    /// Manufacturer's own model name.
    pub manufacturer_model: Option<String>,
    /// Common model name.
    #[validate(length(min = 1, max = 200))]
    pub model_name: String,
    /// Intended use (freight, passenger, shunting, ...).
    pub intended_use: Option<String>,
    /// Traction type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Technical specification table, free-form.
    pub spec_table: Option<String>,
    /// Operator series designation.
    pub series: Option<String>,
}

impl CatalogEntry for Model {
    const COLLECTION: Collection = Collection::Models;
}

/// Owner of locomotive units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// Owner name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Owned unit ids.
    #[serde(default)]
    pub units: Vec<String>,
}

impl CatalogEntry for Owner {
    const COLLECTION: Collection = Collection::Owners;
}

/// A single locomotive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Unit name or nickname.
    #[validate(length(max = 200))]
    pub name: Option<String>,
    /// Running number.
    #[validate(length(min = 1, max = 64))]
    pub number: String,
    /// Model id.
    pub model: Option<String>,
    /// Owner id.
    pub owner: Option<String>,
    /// Manufacturer id.
    pub manufacturer: Option<String>,
    /// Current state (active, preserved, scrapped, ...).
    pub state: Option<String>,
    /// Depot assignments over time.
    #[serde(default)]
    pub assignments: Vec<String>,
    /// Repair history entries.
    #[serde(default)]
    pub repair_history: Vec<String>,
    /// Country the unit operates in.
    pub country_of_operation: Option<String>,
}

impl CatalogEntry for Unit {
    const COLLECTION: Collection = Collection::Units;
}

/// Tag attached to pictures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImageTag {
    /// Tag text.
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

impl CatalogEntry for ImageTag {
    const COLLECTION: Collection = Collection::ImageTags;
}

/// An uploaded picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Picture {
    /// Public path of the stored file.
    pub path: String,
    /// Detected MIME type.
    pub mime_type: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Tag ids.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Unit shown in the picture.
    pub unit: Option<String>,
    /// Uploader's user id.
    pub uploaded_by: String,
    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
}

impl CatalogEntry for Picture {
    const COLLECTION: Collection = Collection::Pictures;
}

/// Documentation record (manual, book, magazine article).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Documentation {
    /// Title.
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    /// Author.
    pub author: Option<String>,
    /// Issue number for periodicals.
    pub issue_number: Option<String>,
    /// Publisher.
    pub publisher: Option<String>,
    /// Release date, free-form.
    pub release_date: Option<String>,
    /// Document type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Link to an online copy.
    #[validate(url)]
    pub url: Option<String>,
    /// Model id this document describes.
    pub model: Option<String>,
}

impl CatalogEntry for Documentation {
    const COLLECTION: Collection = Collection::Documentations;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;

    #[test]
    fn test_manufacturer_serializes_camel_case() {
        let m = Manufacturer {
            name: "Fablok".into(),
            short_name: Some("FAB".into()),
            country: Some("Poland".into()),
            creation_date: Some("1919".into()),
            works: true,
            date_of_liquidation: None,
            units: vec![],
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["shortName"], "FAB");
        assert_eq!(json["creationDate"], "1919");
        assert!(json.get("short_name").is_none());
    }

    #[test]
    fn test_model_kind_serializes_as_type() {
        let json = serde_json::json!({ "modelName": "Ty2", "type": "steam" });
        let model: Model = serde_json::from_value(json).unwrap();
        assert_eq!(model.kind.as_deref(), Some("steam"));
        assert_eq!(model.model_name, "Ty2");
    }

    #[test]
    fn test_record_flattens_payload() {
        let record = Record {
            id: "abc".into(),
            verified: false,
            data: ImageTag {
                name: "winter".into(),
            },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "abc", "verified": false, "name": "winter" }));
    }

    #[test]
    fn test_record_verified_defaults_to_false() {
        let json = serde_json::json!({ "id": "o1", "name": "PKP Cargo" });
        let record: Record<Owner> = serde_json::from_value(json).unwrap();
        assert!(!record.verified);
        assert!(record.data.units.is_empty());
    }

    #[test]
    fn test_empty_name_fails_validation() {
        let tag = ImageTag {
            name: String::new(),
        };
        assert!(tag.validate().is_err());
    }

    #[test]
    fn test_documentation_rejects_bad_url() {
        let doc = Documentation {
            title: "Parowozy PKP".into(),
            author: None,
            issue_number: None,
            publisher: None,
            release_date: None,
            kind: None,
            url: Some("not a url".into()),
            model: None,
        };
        assert!(doc.validate().is_err());
    }
}
