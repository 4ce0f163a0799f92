//! Catalog mutation guard tests.
//!
//! **Scope:** Every write goes through `CatalogService` with a caller built
//! from a signed token. These tests check that:
//! - Denied writes leave the store untouched
//! - Each mutation requires its own permission
//! - Relation queries follow owner, model and tag references
//! - Picture uploads land on disk and in the pictures collection
//!
//! Run with: `cargo test --test catalog_guard_test`

mod helpers;

use base64::{engine::general_purpose::STANDARD, Engine};
use railcat_server::auth::AuthError;
use railcat_server::catalog::{CatalogError, CatalogStore, PictureUpload, UploadError};
use railcat_server::config::Config;
use rc_common::{Collection, Documentation, ImageTag, Model, Owner, Unit};
use serde_json::json;

fn unit(number: &str, model: Option<&str>, manufacturer: Option<&str>) -> Unit {
    Unit {
        name: None,
        number: number.to_string(),
        model: model.map(str::to_string),
        owner: None,
        manufacturer: manufacturer.map(str::to_string),
        state: Some("active".to_string()),
        assignments: Vec::new(),
        repair_history: Vec::new(),
        country_of_operation: Some("PL".to_string()),
    }
}

fn model(name: &str, manufacturer: Option<&str>) -> Model {
    Model {
        factory_type: Some("205E".to_string()),
        manufacturer: manufacturer.map(str::to_string),
        manufacturer_model: None,
        model_name: name.to_string(),
        intended_use: Some("passenger".to_string()),
        kind: Some("electric".to_string()),
        spec_table: None,
        series: None,
    }
}

fn upload_config(dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default_for_test();
    config.upload_dir = dir.path().to_path_buf();
    config
}

#[tokio::test]
async fn test_viewer_cannot_write_anything() {
    let config = Config::default_for_test();
    let viewer = helpers::login(&config, "viewer", json!(0));
    let catalog = helpers::catalog(config);

    let err = catalog
        .create(&viewer, unit("EU07-001", None, None))
        .await
        .unwrap_err();
    assert_eq!(err.status(), 403);
    assert_eq!(err.to_response().error, "FORBIDDEN");
    assert_eq!(catalog.store().count(Collection::Units), 0);
}

#[tokio::test]
async fn test_editor_creates_but_cannot_verify_or_delete() {
    let config = Config::default_for_test();
    let editor = helpers::login(&config, "editor", json!(1));
    let catalog = helpers::catalog(config);

    let created = catalog
        .create(&editor, unit("EU07-001", None, None))
        .await
        .unwrap();

    let err = catalog
        .verify::<Unit>(&editor, &created.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Auth(AuthError::Forbidden { ref permission })
            if permission == "VERIFY_CONTENT"
    ));

    let err = catalog
        .delete::<Unit>(&editor, &created.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Auth(AuthError::Forbidden { ref permission })
            if permission == "DELETE_CONTENT"
    ));

    let stored = catalog.get::<Unit>(&created.id).await.unwrap();
    assert!(!stored.verified);
    assert_eq!(catalog.store().count(Collection::Units), 1);
}

#[tokio::test]
async fn test_missing_claim_cannot_write() {
    let config = Config::default_for_test();
    let user = helpers::login(&config, "legacy", serde_json::Value::Null);
    let catalog = helpers::catalog(config);

    let err = catalog
        .create(
            &user,
            ImageTag {
                name: "winter".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_response().error, "INVALID_PERMISSIONS");
    assert_eq!(catalog.store().count(Collection::ImageTags), 0);
}

#[tokio::test]
async fn test_moderator_lifecycle() {
    let config = Config::default_for_test();
    let moderator = helpers::login(&config, "moderator", json!(7));
    let catalog = helpers::catalog(config);

    let created = catalog
        .create(
            &moderator,
            Owner {
                name: "PKP Intercity".to_string(),
                units: Vec::new(),
            },
        )
        .await
        .unwrap();

    let verified = catalog
        .verify::<Owner>(&moderator, &created.id)
        .await
        .unwrap();
    assert!(verified.verified);

    let listed = catalog.list::<Owner>().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].verified);

    catalog
        .delete::<Owner>(&moderator, &created.id)
        .await
        .unwrap();
    assert!(catalog.list::<Owner>().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_relations() {
    let config = Config::default_for_test();
    let editor = helpers::login(&config, "editor", json!(1));
    let catalog = helpers::catalog(config);

    let eu07 = catalog
        .create(&editor, model("EU07", Some("pafawag")))
        .await
        .unwrap();
    let first = catalog
        .create(&editor, unit("EU07-001", Some(&eu07.id), Some("pafawag")))
        .await
        .unwrap();
    let second = catalog
        .create(&editor, unit("EU07-002", Some(&eu07.id), Some("pafawag")))
        .await
        .unwrap();
    catalog
        .create(&editor, unit("SM42-001", Some("other"), Some("fablok")))
        .await
        .unwrap();

    let owner = catalog
        .create(
            &editor,
            Owner {
                name: "PKP Intercity".to_string(),
                units: vec![second.id.clone(), "scrapped".to_string(), first.id.clone()],
            },
        )
        .await
        .unwrap();

    let owned: Vec<_> = catalog
        .units_of_owner(&owner.id)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.data.number)
        .collect();
    assert_eq!(owned, vec!["EU07-002", "EU07-001"]);

    let of_model: Vec<_> = catalog
        .units_of_model(&eu07.id)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(of_model, vec![first.id.clone(), second.id.clone()]);

    let fablok = catalog.units_of_manufacturer("fablok").await.unwrap();
    assert_eq!(fablok.len(), 1);
    let pafawag = catalog.models_of_manufacturer("pafawag").await.unwrap();
    assert_eq!(pafawag.len(), 1);

    catalog
        .create(
            &editor,
            Documentation {
                title: "EU07 driver's manual".to_string(),
                author: None,
                issue_number: None,
                publisher: Some("WKiŁ".to_string()),
                release_date: Some("1975".to_string()),
                kind: Some("manual".to_string()),
                url: None,
                model: Some(eu07.id.clone()),
            },
        )
        .await
        .unwrap();
    let docs = catalog.documentation_of_model(&eu07.id).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].data.title, "EU07 driver's manual");

    let err = catalog.units_of_owner("nobody").await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
}

#[tokio::test]
async fn test_upload_picture() {
    let dir = tempfile::tempdir().unwrap();
    let config = upload_config(&dir);
    let editor = helpers::login(&config, "editor", json!(1));
    let catalog = helpers::catalog(config);
    let encoded = STANDARD.encode(helpers::PNG_BYTES);

    let picture = catalog
        .upload_picture(
            &editor,
            PictureUpload {
                data: format!("data:image/png;base64,{encoded}"),
                tags: vec!["winter".to_string()],
                unit: Some("u-1".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(picture.data.mime_type, "image/png");
    assert_eq!(picture.data.uploaded_by, "editor");
    assert_eq!(picture.data.size_bytes, helpers::PNG_BYTES.len() as u64);
    assert!(picture.data.path.starts_with("/uploads/"));

    let file_name = picture.data.path.trim_start_matches("/uploads/");
    let on_disk = tokio::fs::read(dir.path().join(file_name)).await.unwrap();
    assert_eq!(on_disk, helpers::PNG_BYTES);

    let tagged = catalog.pictures_with_tag("winter").await.unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].id, picture.id);

    let stored = catalog
        .store()
        .get(Collection::Pictures, &picture.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored["verified"], json!(false));
}

#[tokio::test]
async fn test_upload_requires_add_content() {
    let dir = tempfile::tempdir().unwrap();
    let config = upload_config(&dir);
    let verifier = helpers::login(&config, "verifier", json!(2));
    let catalog = helpers::catalog(config);

    let err = catalog
        .upload_picture(
            &verifier,
            PictureUpload {
                data: STANDARD.encode(helpers::PNG_BYTES),
                tags: Vec::new(),
                unit: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), 403);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_upload_rejects_bad_payloads() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = upload_config(&dir);
    config.max_upload_size = 8;
    let editor = helpers::login(&config, "editor", json!(1));
    let catalog = helpers::catalog(config);

    let err = catalog
        .upload_picture(
            &editor,
            PictureUpload {
                data: STANDARD.encode(helpers::PNG_BYTES),
                tags: Vec::new(),
                unit: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Upload(UploadError::TooLarge { max_size: 8 })
    ));
    assert_eq!(err.status(), 413);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    let err = catalog
        .upload_picture(
            &editor,
            PictureUpload {
                data: STANDARD.encode(b"hello!"),
                tags: Vec::new(),
                unit: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), 415);
    assert_eq!(catalog.store().count(Collection::Pictures), 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_grant_encoding_requires_manage_roles() {
    let config = Config::default_for_test();
    let admin = helpers::login(&config, "admin", json!(8));
    let moderator = helpers::login(&config, "moderator", json!(7));
    let catalog = helpers::catalog(config);

    let names = vec!["ADD_CONTENT".to_string(), "DELETE_CONTENT".to_string()];
    assert_eq!(catalog.encode_grant(&admin, &names).await.unwrap(), 5);

    let err = catalog.encode_grant(&moderator, &names).await.unwrap_err();
    assert_eq!(err.status(), 403);
}
