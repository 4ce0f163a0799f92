//! `railcat` Common Library
//!
//! Catalog record types shared by the backend and its tooling.

pub mod types;

pub use types::*;
