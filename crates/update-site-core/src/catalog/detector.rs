//! Update detection over a catalog snapshot
//!
//! An absent catalog (`None`) means the site data has not been received yet.
//! Both queries then return empty results instead of failing.

use tracing::debug;

use crate::catalog::types::{Catalog, PluginDescriptor};
use crate::error::Result;
use crate::version::is_newer;

/// Plugins in the catalog that are installed, in catalog order
pub fn list_installed(catalog: Option<&Catalog>) -> Vec<&PluginDescriptor> {
    let Some(catalog) = catalog else {
        return Vec::new();
    };

    catalog.iter().filter(|p| p.is_installed()).collect()
}

/// Installed plugins for which the catalog offers a newer version
///
/// A version that cannot be parsed is returned as an error rather than
/// skipped.
pub fn list_updatable(catalog: Option<&Catalog>) -> Result<Vec<&PluginDescriptor>> {
    let mut updatable = Vec::new();

    for plugin in list_installed(catalog) {
        let Some(installed) = plugin.installed_version.as_deref() else {
            continue;
        };
        if is_newer(&plugin.version, installed)? {
            debug!(
                plugin = %plugin.id,
                installed,
                available = %plugin.version,
                "update available"
            );
            updatable.push(plugin);
        }
    }

    Ok(updatable)
}
