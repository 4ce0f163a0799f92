//! Catalog service.
//!
//! Queries are public. Every mutation checks the caller's permission mask
//! before touching the store:
//! - create / update / upload: `ADD_CONTENT`
//! - verify: `VERIFY_CONTENT`
//! - delete: `DELETE_CONTENT`
//! - grant encoding: `MANAGE_ROLES`

use std::sync::Arc;

use chrono::Utc;
use rc_common::{CatalogEntry, Collection, Documentation, Model, Owner, Picture, Record, Unit};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use validator::Validate;

use super::error::{CatalogError, CatalogResult};
use super::store::{CatalogStore, Document};
use super::uploads::{decode_payload, validate_image, write_image, PictureUpload};
use crate::auth::AuthUser;
use crate::config::Config;
use crate::permissions::{ContentPermissions, PermissionCodec};

/// Catalog operations over a document store.
#[derive(Debug)]
pub struct CatalogService<S> {
    store: Arc<S>,
    codec: Arc<PermissionCodec>,
    config: Arc<Config>,
}

impl<S: CatalogStore> CatalogService<S> {
    /// Create a new service.
    #[must_use]
    pub fn new(store: Arc<S>, codec: Arc<PermissionCodec>, config: Arc<Config>) -> Self {
        Self {
            store,
            codec,
            config,
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// List all records of a collection.
    pub async fn list<T: CatalogEntry>(&self) -> CatalogResult<Vec<Record<T>>> {
        let documents = self.store.list(T::COLLECTION).await?;
        documents.into_iter().map(from_document).collect()
    }

    /// Fetch a record by id.
    pub async fn get<T: CatalogEntry>(&self, id: &str) -> CatalogResult<Record<T>> {
        self.store
            .get(T::COLLECTION, id)
            .await?
            .map(from_document)
            .transpose()?
            .ok_or_else(|| CatalogError::NotFound {
                collection: T::COLLECTION,
                id: id.to_string(),
            })
    }

    /// Units listed on an owner, in the owner's order.
    ///
    /// Ids that no longer resolve are skipped.
    pub async fn units_of_owner(&self, owner_id: &str) -> CatalogResult<Vec<Record<Unit>>> {
        let owner = self.get::<Owner>(owner_id).await?;
        let mut units = Vec::with_capacity(owner.data.units.len());
        for unit_id in &owner.data.units {
            match self.store.get(Collection::Units, unit_id).await? {
                Some(document) => units.push(from_document(document)?),
                None => warn!(owner_id, unit_id = %unit_id, "Owner references missing unit"),
            }
        }
        Ok(units)
    }

    /// Units built by a manufacturer.
    pub async fn units_of_manufacturer(
        &self,
        manufacturer_id: &str,
    ) -> CatalogResult<Vec<Record<Unit>>> {
        self.find_by::<Unit>("manufacturer", manufacturer_id).await
    }

    /// Units of a model.
    pub async fn units_of_model(&self, model_id: &str) -> CatalogResult<Vec<Record<Unit>>> {
        self.find_by::<Unit>("model", model_id).await
    }

    /// Models made by a manufacturer.
    pub async fn models_of_manufacturer(
        &self,
        manufacturer_id: &str,
    ) -> CatalogResult<Vec<Record<Model>>> {
        self.find_by::<Model>("manufacturer", manufacturer_id).await
    }

    /// Documentation describing a model.
    pub async fn documentation_of_model(
        &self,
        model_id: &str,
    ) -> CatalogResult<Vec<Record<Documentation>>> {
        self.find_by::<Documentation>("model", model_id).await
    }

    /// Pictures carrying a tag.
    pub async fn pictures_with_tag(&self, tag_id: &str) -> CatalogResult<Vec<Record<Picture>>> {
        let documents = self
            .store
            .find_contains(Collection::Pictures, "tags", &Value::from(tag_id))
            .await?;
        documents.into_iter().map(from_document).collect()
    }

    async fn find_by<T: CatalogEntry>(
        &self,
        field: &str,
        id: &str,
    ) -> CatalogResult<Vec<Record<T>>> {
        let documents = self
            .store
            .find_eq(T::COLLECTION, field, &Value::from(id))
            .await?;
        documents.into_iter().map(from_document).collect()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a record.
    #[tracing::instrument(skip_all, fields(collection = %T::COLLECTION, user_id = %user.id))]
    pub async fn create<T: CatalogEntry>(
        &self,
        user: &AuthUser,
        data: T,
    ) -> CatalogResult<Record<T>> {
        user.require_permission(&self.codec, ContentPermissions::ADD_CONTENT)?;
        validate(&data)?;

        let id = self
            .store
            .insert(T::COLLECTION, to_document(&data, false)?)
            .await?;
        info!(id = %id, "Record created");

        Ok(Record {
            id,
            verified: false,
            data,
        })
    }

    /// Replace a record's payload. The record returns to unverified.
    #[tracing::instrument(skip_all, fields(collection = %T::COLLECTION, user_id = %user.id))]
    pub async fn update<T: CatalogEntry>(
        &self,
        user: &AuthUser,
        id: &str,
        data: T,
    ) -> CatalogResult<Record<T>> {
        user.require_permission(&self.codec, ContentPermissions::ADD_CONTENT)?;
        validate(&data)?;

        let replaced = self
            .store
            .replace(T::COLLECTION, id, to_document(&data, false)?)
            .await?;
        if !replaced {
            return Err(not_found::<T>(id));
        }
        info!("Record updated");

        Ok(Record {
            id: id.to_string(),
            verified: false,
            data,
        })
    }

    /// Mark a record as verified.
    #[tracing::instrument(skip(self, user), fields(collection = %T::COLLECTION, user = %user.id))]
    pub async fn verify<T: CatalogEntry>(
        &self,
        user: &AuthUser,
        id: &str,
    ) -> CatalogResult<Record<T>> {
        user.require_permission(&self.codec, ContentPermissions::VERIFY_CONTENT)?;

        let document = self
            .store
            .set_verified(T::COLLECTION, id)
            .await?
            .ok_or_else(|| not_found::<T>(id))?;
        info!("Record verified");

        from_document(document)
    }

    /// Delete a record.
    #[tracing::instrument(skip(self, user), fields(collection = %T::COLLECTION, user = %user.id))]
    pub async fn delete<T: CatalogEntry>(&self, user: &AuthUser, id: &str) -> CatalogResult<()> {
        user.require_permission(&self.codec, ContentPermissions::DELETE_CONTENT)?;

        if !self.store.remove(T::COLLECTION, id).await? {
            return Err(not_found::<T>(id));
        }
        info!("Record deleted");
        Ok(())
    }

    /// Encode a permission grant for another user.
    ///
    /// The returned mask is what the token-issuing tool embeds as the
    /// `permissions` claim.
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn encode_grant(&self, user: &AuthUser, names: &[String]) -> CatalogResult<i64> {
        user.require_permission(&self.codec, ContentPermissions::MANAGE_ROLES)?;

        self.codec
            .encode(names)
            .map_err(|e| CatalogError::Validation(e.to_string()))
    }

    /// Store an uploaded picture and create its record.
    ///
    /// The file is removed again if the record cannot be stored.
    #[tracing::instrument(skip(self, user, upload), fields(user_id = %user.id))]
    pub async fn upload_picture(
        &self,
        user: &AuthUser,
        upload: PictureUpload,
    ) -> CatalogResult<Record<Picture>> {
        user.require_permission(&self.codec, ContentPermissions::ADD_CONTENT)?;

        let (claimed, bytes) = decode_payload(&upload.data, self.config.max_upload_size)?;
        let image = validate_image(bytes, claimed.as_deref(), &self.config)?;
        let stored = write_image(&image, &self.config).await?;

        let picture = Picture {
            path: stored.public_path,
            mime_type: image.mime_type,
            size_bytes: image.bytes.len() as u64,
            tags: upload.tags,
            unit: upload.unit,
            uploaded_by: user.id.clone(),
            uploaded_at: Utc::now(),
        };

        let inserted = match to_document(&picture, false) {
            Ok(document) => self.store.insert(Collection::Pictures, document).await,
            Err(e) => Err(e),
        };
        let id = match inserted {
            Ok(id) => id,
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&stored.disk_path).await {
                    warn!(
                        path = %stored.disk_path.display(),
                        error = %cleanup,
                        "Failed to remove orphaned upload"
                    );
                }
                return Err(e);
            }
        };
        info!(id = %id, path = %picture.path, "Picture uploaded");

        Ok(Record {
            id,
            verified: false,
            data: picture,
        })
    }
}

fn validate<T: Validate>(data: &T) -> CatalogResult<()> {
    data.validate().map_err(|e| CatalogError::Validation(e.to_string()))
}

fn not_found<T: CatalogEntry>(id: &str) -> CatalogError {
    CatalogError::NotFound {
        collection: T::COLLECTION,
        id: id.to_string(),
    }
}

fn to_document<T: Serialize>(data: &T, verified: bool) -> CatalogResult<Document> {
    match serde_json::to_value(data)? {
        Value::Object(mut document) => {
            document.insert("verified".to_string(), Value::Bool(verified));
            Ok(document)
        }
        other => Err(CatalogError::Storage(format!(
            "record did not serialize to an object: {other}"
        ))),
    }
}

fn from_document<T: CatalogEntry>(document: Document) -> CatalogResult<Record<T>> {
    Ok(serde_json::from_value(Value::Object(document))?)
}
