//! Update Site
//!
//! A configured update site: where its catalog comes from (URL), where the
//! last received catalog is kept (data file), and the installed/updates
//! queries over that catalog.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::catalog::{
    installed_plugins, parse_document, updatable_plugins, Catalog, CatalogSource,
    PluginDescriptor, UpdateCenterDocument,
};
use crate::config::Config;
use crate::error::Result;
use crate::registry::PluginRegistry;
use crate::store::{validate_site_id, DataStore};

/// Outcome of a post-back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostBack {
    /// Document written to the data file
    Stored { path: PathBuf, bytes: usize },
    /// Nothing but whitespace was received
    Ignored,
}

pub struct UpdateSite {
    id: String,
    url: Option<String>,
    store: DataStore,
    registry: PluginRegistry,
}

impl UpdateSite {
    /// Create a site rooted at `root_dir` (data files and installed registry)
    pub fn new(id: &str, url: Option<String>, root_dir: &Path) -> Result<Self> {
        validate_site_id(id)?;

        Ok(Self {
            id: id.to_string(),
            url,
            store: DataStore::new(root_dir.to_path_buf()),
            registry: PluginRegistry::new(root_dir.to_path_buf()),
        })
    }

    pub fn from_config(config: &Config, root_dir: &Path) -> Result<Self> {
        Self::new(&config.site.id, config.site.url.clone(), root_dir)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Configured update-center URL
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Configured sites never stand in for the built-in default site
    pub fn is_legacy_default(&self) -> bool {
        false
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Where the received update-center document is stored
    pub fn data_file(&self) -> Result<PathBuf> {
        self.store.data_file(&self.id)
    }

    pub fn has_data(&self) -> Result<bool> {
        self.store.exists(&self.id)
    }

    /// Receive an update-center document.
    ///
    /// `json` is used when non-empty; otherwise the document is read from
    /// `body` as UTF-8. A blank document is ignored.
    pub fn post_back<R: Read>(&self, json: Option<&str>, body: Option<R>) -> Result<PostBack> {
        let document = match json {
            Some(json) if !json.is_empty() => json.to_string(),
            _ => match body {
                Some(mut body) => {
                    let mut content = String::new();
                    body.read_to_string(&mut content)?;
                    content
                }
                None => String::new(),
            },
        };

        if document.trim().is_empty() {
            debug!(site = %self.id, "ignoring blank post-back");
            return Ok(PostBack::Ignored);
        }

        let path = self.store.write(&self.id, &document)?;
        info!(site = %self.id, bytes = document.len(), "stored update-center document");

        Ok(PostBack::Stored {
            path,
            bytes: document.len(),
        })
    }

    /// Post-back with the document given directly
    pub fn post_back_str(&self, json: &str) -> Result<PostBack> {
        self.post_back(Some(json), None::<io::Empty>)
    }

    /// The stored update-center document, if one has been received
    pub fn document(&self) -> Result<Option<UpdateCenterDocument>> {
        if !self.has_data()? {
            debug!(site = %self.id, "no update-center data received yet");
            return Ok(None);
        }

        let document = parse_document(&self.data_file()?)?;
        if let Some(doc_id) = document.id.as_deref() {
            if doc_id != self.id {
                warn!(site = %self.id, document = doc_id, "update-center document id differs from site id");
            }
        }

        Ok(Some(document))
    }

    /// Plugins from the catalog that are installed
    pub fn installed(&self) -> Result<Vec<PluginDescriptor>> {
        installed_plugins(self)
    }

    /// Installed plugins with a newer version in the catalog
    pub fn updates(&self) -> Result<Vec<PluginDescriptor>> {
        updatable_plugins(self)
    }
}

impl CatalogSource for UpdateSite {
    fn catalog(&self) -> Result<Option<Catalog>> {
        let Some(document) = self.document()? else {
            return Ok(None);
        };

        let installed = self.registry.load()?;
        let catalog = Catalog::resolve(&document, |id| installed.installed_version(id))?;
        Ok(Some(catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpdateSiteError;
    use tempfile::TempDir;

    const DOCUMENT: &str = r#"{
        "id": "simple",
        "plugins": {
            "A": { "name": "A", "version": "2.0" },
            "B": { "name": "B", "version": "1.0" },
            "C": { "name": "C", "version": "0.9" }
        }
    }"#;

    fn create_test_site() -> (UpdateSite, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let site = UpdateSite::new(
            "simple",
            Some("http://updates.example.com/uc.json".to_string()),
            temp_dir.path(),
        )
        .unwrap();
        (site, temp_dir)
    }

    fn ids(plugins: &[PluginDescriptor]) -> Vec<&str> {
        plugins.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_site_properties() {
        let (site, temp) = create_test_site();

        assert_eq!(site.id(), "simple");
        assert_eq!(site.url(), Some("http://updates.example.com/uc.json"));
        assert!(!site.is_legacy_default());
        assert_eq!(
            site.data_file().unwrap(),
            temp.path().join("updates").join("simple.json")
        );
    }

    #[test]
    fn test_invalid_site_id() {
        let temp = TempDir::new().unwrap();
        let result = UpdateSite::new("../x", None, temp.path());
        assert!(matches!(result, Err(UpdateSiteError::InvalidSiteId { .. })));
    }

    #[test]
    fn test_no_data_means_empty_results() {
        let (site, _temp) = create_test_site();
        site.registry().add("A", "1.5").unwrap();

        assert!(site.catalog().unwrap().is_none());
        assert!(site.installed().unwrap().is_empty());
        assert!(site.updates().unwrap().is_empty());
    }

    #[test]
    fn test_post_back_param() {
        let (site, _temp) = create_test_site();

        let outcome = site.post_back_str(DOCUMENT).unwrap();
        assert!(matches!(outcome, PostBack::Stored { bytes, .. } if bytes == DOCUMENT.len()));

        let stored = std::fs::read_to_string(site.data_file().unwrap()).unwrap();
        assert_eq!(stored, DOCUMENT);
    }

    #[test]
    fn test_post_back_body_when_param_empty() {
        let (site, _temp) = create_test_site();

        let outcome = site
            .post_back(Some(""), Some(DOCUMENT.as_bytes()))
            .unwrap();

        assert!(matches!(outcome, PostBack::Stored { .. }));
        assert!(site.has_data().unwrap());
    }

    #[test]
    fn test_post_back_param_wins_over_body() {
        let (site, _temp) = create_test_site();

        site.post_back(Some(DOCUMENT), Some("ignored".as_bytes()))
            .unwrap();

        let stored = std::fs::read_to_string(site.data_file().unwrap()).unwrap();
        assert_eq!(stored, DOCUMENT);
    }

    #[test]
    fn test_post_back_blank_is_ignored() {
        let (site, _temp) = create_test_site();

        assert_eq!(site.post_back_str("   \n").unwrap(), PostBack::Ignored);
        assert_eq!(
            site.post_back(None, Some("\t ".as_bytes())).unwrap(),
            PostBack::Ignored
        );
        assert_eq!(site.post_back(None, None::<&[u8]>).unwrap(), PostBack::Ignored);
        assert!(!site.has_data().unwrap());
    }

    #[test]
    fn test_post_back_invalid_utf8_body() {
        let (site, _temp) = create_test_site();

        let bytes: &[u8] = &[0xff, 0xfe, 0xfd];
        let result = site.post_back(None, Some(bytes));
        assert!(matches!(result, Err(UpdateSiteError::Io(_))));
    }

    #[test]
    fn test_installed_and_updates() {
        let (site, _temp) = create_test_site();
        site.post_back_str(DOCUMENT).unwrap();
        site.registry().add("A", "1.5").unwrap();
        site.registry().add("B", "1.0").unwrap();

        assert_eq!(ids(&site.installed().unwrap()), vec!["A", "B"]);
        assert_eq!(ids(&site.updates().unwrap()), vec!["A"]);
    }

    #[test]
    fn test_corrupt_installed_version_surfaces() {
        let (site, _temp) = create_test_site();
        site.post_back_str(DOCUMENT).unwrap();
        site.registry().add("A", "one.five").unwrap();

        assert!(matches!(
            site.updates(),
            Err(UpdateSiteError::VersionParse { .. })
        ));
    }

    #[test]
    fn test_corrupt_document_surfaces() {
        let (site, _temp) = create_test_site();
        site.post_back_str("not json").unwrap();

        assert!(matches!(
            site.catalog(),
            Err(UpdateSiteError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_from_config() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.set("site.id", "internal").unwrap();

        let site = UpdateSite::from_config(&config, temp.path()).unwrap();
        assert_eq!(site.id(), "internal");
        assert_eq!(site.url(), None);
    }
}
