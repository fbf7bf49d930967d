//! Catalog type definitions

use std::collections::HashSet;

use crate::catalog::document::UpdateCenterDocument;
use crate::error::{Result, UpdateSiteError};

/// One catalog entry: an available plugin and, if installed, its local version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    /// Plugin id (unique within a catalog)
    pub id: String,
    /// Version offered by the update site
    pub version: String,
    /// Installed version, if the plugin is installed
    pub installed_version: Option<String>,
    /// Human readable title
    pub title: Option<String>,
    /// Download URL
    pub url: Option<String>,
    /// Short description
    pub excerpt: Option<String>,
}

impl PluginDescriptor {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            installed_version: None,
            title: None,
            url: None,
            excerpt: None,
        }
    }

    pub fn with_installed(mut self, version: impl Into<String>) -> Self {
        self.installed_version = Some(version.into());
        self
    }

    pub fn is_installed(&self) -> bool {
        self.installed_version.is_some()
    }

    /// Title if present, otherwise the id
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// Immutable snapshot of an update site's plugins, in document order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    plugins: Vec<PluginDescriptor>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(descriptors: impl IntoIterator<Item = PluginDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut plugins = Vec::new();

        for descriptor in descriptors {
            if !seen.insert(descriptor.id.clone()) {
                return Err(UpdateSiteError::DuplicatePlugin { id: descriptor.id });
            }
            plugins.push(descriptor);
        }

        Ok(Self { plugins })
    }

    /// Build a catalog from an update-center document, looking up each
    /// plugin's installed version through `installed_version`.
    pub fn resolve<F>(document: &UpdateCenterDocument, installed_version: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(document.plugins.iter().map(|(id, entry)| PluginDescriptor {
            id: id.clone(),
            version: entry.version.clone(),
            installed_version: installed_version(id.as_str()),
            title: entry.title.clone(),
            url: entry.url.clone(),
            excerpt: entry.excerpt.clone(),
        }))
    }

    pub fn get(&self, id: &str) -> Option<&PluginDescriptor> {
        self.plugins.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PluginDescriptor> {
        self.plugins.iter()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a PluginDescriptor;
    type IntoIter = std::slice::Iter<'a, PluginDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.plugins.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::document::parse_document_str;

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::new(vec![
            PluginDescriptor::new("git", "1.0"),
            PluginDescriptor::new("git", "2.0"),
        ]);

        assert!(matches!(
            result,
            Err(UpdateSiteError::DuplicatePlugin { ref id }) if id == "git"
        ));
    }

    #[test]
    fn test_resolve_cross_references_installed() {
        let document = parse_document_str(
            r#"{
                "plugins": {
                    "git": { "name": "git", "version": "2.0", "title": "Git plugin" },
                    "ant": { "name": "ant", "version": "1.1" }
                }
            }"#,
        )
        .unwrap();

        let catalog = Catalog::resolve(&document, |id| {
            (id == "git").then(|| "1.5".to_string())
        })
        .unwrap();

        assert_eq!(catalog.len(), 2);
        let git = catalog.get("git").unwrap();
        assert_eq!(git.installed_version.as_deref(), Some("1.5"));
        assert_eq!(git.display_name(), "Git plugin");
        assert!(!catalog.get("ant").unwrap().is_installed());
        assert_eq!(catalog.get("ant").unwrap().display_name(), "ant");
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let catalog = Catalog::new(vec![
            PluginDescriptor::new("zeta", "1"),
            PluginDescriptor::new("alpha", "1"),
            PluginDescriptor::new("mid", "1"),
        ])
        .unwrap();

        let ids: Vec<&str> = catalog.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    }
}
