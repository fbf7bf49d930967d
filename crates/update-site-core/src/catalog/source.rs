//! Catalog sources
//!
//! A source hands out catalog snapshots. `Ok(None)` means no catalog is
//! available yet, which is a normal state and not an error.

use crate::catalog::detector::{list_installed, list_updatable};
use crate::catalog::types::{Catalog, PluginDescriptor};
use crate::error::Result;

pub trait CatalogSource {
    /// Current catalog snapshot, or `None` if unavailable
    fn catalog(&self) -> Result<Option<Catalog>>;
}

impl CatalogSource for Catalog {
    fn catalog(&self) -> Result<Option<Catalog>> {
        Ok(Some(self.clone()))
    }
}

impl CatalogSource for Option<Catalog> {
    fn catalog(&self) -> Result<Option<Catalog>> {
        Ok(self.clone())
    }
}

/// Installed plugins from the source's current snapshot
pub fn installed_plugins<S: CatalogSource + ?Sized>(source: &S) -> Result<Vec<PluginDescriptor>> {
    let catalog = source.catalog()?;
    Ok(list_installed(catalog.as_ref())
        .into_iter()
        .cloned()
        .collect())
}

/// Updatable plugins from the source's current snapshot
pub fn updatable_plugins<S: CatalogSource + ?Sized>(source: &S) -> Result<Vec<PluginDescriptor>> {
    let catalog = source.catalog()?;
    Ok(list_updatable(catalog.as_ref())?
        .into_iter()
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_source() {
        let source: Option<Catalog> = None;

        assert!(installed_plugins(&source).unwrap().is_empty());
        assert!(updatable_plugins(&source).unwrap().is_empty());
    }

    #[test]
    fn test_catalog_as_source() {
        let catalog = Catalog::new(vec![
            PluginDescriptor::new("git", "3.0").with_installed("2.0"),
            PluginDescriptor::new("ant", "1.0").with_installed("1.0"),
        ])
        .unwrap();

        let updates = updatable_plugins(&catalog).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].id, "git");
        assert_eq!(installed_plugins(&catalog).unwrap().len(), 2);
    }
}
