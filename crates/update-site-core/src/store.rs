//! Data file store
//!
//! Keeps the last received update-center document for each site as
//! `<root>/updates/<site-id>.json`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, UpdateSiteError};

const UPDATES_DIR: &str = "updates";

/// Validate a site id for use as a file name
pub fn validate_site_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');

    if valid {
        Ok(())
    } else {
        Err(UpdateSiteError::InvalidSiteId { id: id.to_string() })
    }
}

pub struct DataStore {
    root_dir: PathBuf,
}

impl DataStore {
    pub fn new(root_dir: PathBuf) -> Self {
        Self { root_dir }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Path of the data file for a site
    pub fn data_file(&self, site_id: &str) -> Result<PathBuf> {
        validate_site_id(site_id)?;
        Ok(self
            .root_dir
            .join(UPDATES_DIR)
            .join(format!("{}.json", site_id)))
    }

    /// Write a document verbatim
    pub fn write(&self, site_id: &str, content: &str) -> Result<PathBuf> {
        let path = self.data_file(site_id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, content)?;
        debug!(site = site_id, bytes = content.len(), path = %path.display(), "wrote data file");
        Ok(path)
    }

    /// Read a stored document, `None` if nothing has been stored yet
    pub fn read(&self, site_id: &str) -> Result<Option<String>> {
        let path = self.data_file(site_id)?;
        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(fs::read_to_string(&path)?))
    }

    pub fn exists(&self, site_id: &str) -> Result<bool> {
        Ok(self.data_file(site_id)?.exists())
    }

    /// Delete a stored document. Returns false if there was none.
    pub fn remove(&self, site_id: &str) -> Result<bool> {
        let path = self.data_file(site_id)?;
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path)?;
        Ok(true)
    }
}
