//! Installed Plugin Registry
//!
//! Manages installed_plugins.json, the local record of which plugins are
//! installed and at what version.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, UpdateSiteError};

const INSTALLED_PLUGINS_FILE: &str = "installed_plugins.json";

/// Installed plugin information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledPlugin {
    /// Installed version
    pub version: String,
    /// Installation timestamp
    #[serde(rename = "installedAt")]
    pub installed_at: String,
    /// Last updated timestamp
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

/// installed_plugins.json structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledPluginsFile {
    /// File version
    pub version: u32,
    /// Plugins map: plugin id -> installed plugin
    #[serde(default)]
    pub plugins: BTreeMap<String, InstalledPlugin>,
}

impl Default for InstalledPluginsFile {
    fn default() -> Self {
        Self {
            version: 1,
            plugins: BTreeMap::new(),
        }
    }
}

/// Plugin Registry - file-backed record of installed plugins
pub struct PluginRegistry {
    /// Base directory holding installed_plugins.json
    base_dir: PathBuf,
}

impl PluginRegistry {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Path of installed_plugins.json
    pub fn path(&self) -> PathBuf {
        self.base_dir.join(INSTALLED_PLUGINS_FILE)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Load installed_plugins.json
    pub fn load(&self) -> Result<InstalledPluginsFile> {
        let path = self.path();

        if !path.exists() {
            return Ok(InstalledPluginsFile::default());
        }

        let content = fs::read_to_string(&path)?;
        let file: InstalledPluginsFile =
            serde_json::from_str(&content).map_err(|e| UpdateSiteError::ConfigParse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Ok(file)
    }

    /// Save installed_plugins.json
    pub fn save(&self, file: &InstalledPluginsFile) -> Result<()> {
        fs::create_dir_all(&self.base_dir)?;

        let content = serde_json::to_string_pretty(file)?;
        fs::write(self.path(), content)?;
        Ok(())
    }

    /// Record a plugin as installed, or update its version
    pub fn add(&self, id: &str, version: &str) -> Result<InstalledPlugin> {
        let mut installed = self.load()?;
        let now = chrono::Utc::now().to_rfc3339();

        let plugin = match installed.plugins.get(id) {
            Some(existing) => InstalledPlugin {
                version: version.to_string(),
                installed_at: existing.installed_at.clone(),
                last_updated: now,
            },
            None => InstalledPlugin {
                version: version.to_string(),
                installed_at: now.clone(),
                last_updated: now,
            },
        };

        debug!(plugin = id, version, "recording installed plugin");
        installed.plugins.insert(id.to_string(), plugin.clone());
        self.save(&installed)?;

        Ok(plugin)
    }

    /// Remove an installed plugin
    pub fn remove(&self, id: &str) -> Result<()> {
        let mut installed = self.load()?;

        if installed.plugins.remove(id).is_none() {
            return Err(UpdateSiteError::PluginNotFound { id: id.to_string() });
        }

        self.save(&installed)
    }

    /// Get installed plugin by id
    pub fn get(&self, id: &str) -> Result<Option<InstalledPlugin>> {
        let installed = self.load()?;
        Ok(installed.plugins.get(id).cloned())
    }

    /// List all installed plugins, sorted by id
    pub fn list(&self) -> Result<Vec<(String, InstalledPlugin)>> {
        let installed = self.load()?;
        Ok(installed.plugins.into_iter().collect())
    }
}

impl InstalledPluginsFile {
    /// Installed version of a plugin, if any
    pub fn installed_version(&self, id: &str) -> Option<String> {
        self.plugins.get(id).map(|p| p.version.clone())
    }
}
