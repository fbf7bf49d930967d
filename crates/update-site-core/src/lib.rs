pub mod catalog;
pub mod config;
pub mod error;
pub mod registry;
pub mod site;
pub mod store;
pub mod version;

pub use catalog::{
    list_installed, list_updatable, parse_document, parse_document_str, Catalog, CatalogSource,
    PluginDescriptor, UpdateCenterDocument, UpdateCenterPlugin,
};
pub use config::Config;
pub use error::{Result, UpdateSiteError};
pub use registry::{InstalledPlugin, InstalledPluginsFile, PluginRegistry};
pub use site::{PostBack, UpdateSite};
pub use store::DataStore;
pub use version::{is_newer, strip_qualifiers, VersionNumber};
