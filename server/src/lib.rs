//! railcat Server
//!
//! Permission-gated catalog of railway heritage: locomotive manufacturers,
//! models, units, their owners, pictures and documentation.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod permissions;
