use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, UpdateSiteError};
use crate::store::validate_site_id;

const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_SITE_ID: &str = "default";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# update-site configuration file
# Location: ~/.update-site/config.toml

[site]
# Update site id. The received catalog is stored as updates/<id>.json
# Default: "default"
id = "default"

# URL the update-center document is published at
# Example: url = "https://updates.example.com/update-center.json"
# url = ""
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
}

/// Update-site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site id
    #[serde(default = "default_site_id")]
    pub id: String,

    /// Update-center URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

fn default_site_id() -> String {
    DEFAULT_SITE_ID.to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            id: default_site_id(),
            url: None,
        }
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| UpdateSiteError::ConfigParse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        validate_site_id(&config.site.id)?;
        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "site.id" => Some(self.site.id.clone()),
            "site.url" => Some(self.site.url.clone().unwrap_or_default()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key. An empty URL unsets it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "site.id" => {
                validate_site_id(value)?;
                self.site.id = value.to_string();
                Ok(())
            }
            "site.url" => {
                self.site.url = (!value.is_empty()).then(|| value.to_string());
                Ok(())
            }
            _ => Err(UpdateSiteError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        ["site.id", "site.url"]
            .iter()
            .filter_map(|key| self.get(key).map(|v| (key.to_string(), v)))
            .collect()
    }
}
