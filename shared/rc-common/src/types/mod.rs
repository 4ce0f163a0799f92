//! Catalog Types

mod catalog;
mod record;

pub use catalog::*;
pub use record::{CatalogEntry, Collection, Record};
