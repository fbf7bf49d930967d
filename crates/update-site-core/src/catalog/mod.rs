//! Catalog Module
//!
//! Plugin catalogs published by an update site, and detection of installed
//! plugins with newer versions available.
//!
//! - `document`: update-center JSON parsing
//! - `types`: `PluginDescriptor` and `Catalog`
//! - `detector`: installed / updatable queries
//! - `source`: `CatalogSource` trait

pub mod detector;
pub mod document;
pub mod source;
pub mod types;

// Re-exports
pub use detector::{list_installed, list_updatable};
pub use document::{parse_document, parse_document_str, UpdateCenterDocument, UpdateCenterPlugin};
pub use source::{installed_plugins, updatable_plugins, CatalogSource};
pub use types::{Catalog, PluginDescriptor};
