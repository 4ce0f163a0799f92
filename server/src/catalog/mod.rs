//! Railway Catalog
//!
//! Manufacturers, models, owners, units, pictures, tags and documentation,
//! stored as JSON documents. Reads are public; writes are permission-gated.

pub mod error;
pub mod service;
pub mod store;
pub mod uploads;

pub use error::{CatalogError, CatalogResult};
pub use service::CatalogService;
pub use store::{CatalogStore, Document, MemoryStore};
pub use uploads::{PictureUpload, UploadError};
