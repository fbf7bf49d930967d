//! Update-center document parser
//!
//! Parses the JSON document an update site publishes. The document may be
//! wrapped as JSONP (`updateCenter.post({...});`), as served to browsers.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::error::{Result, UpdateSiteError};

const JSONP_PREFIX: &str = "updateCenter.post(";

/// Update-center document (parsed from `updates/<site-id>.json`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCenterDocument {
    /// Site id the document was published for
    #[serde(default)]
    pub id: Option<String>,
    /// Document format version
    #[serde(default, rename = "updateCenterVersion")]
    pub update_center_version: Option<String>,
    /// Plugins keyed by id, in document order
    #[serde(default, deserialize_with = "deserialize_plugins")]
    pub plugins: Vec<(String, UpdateCenterPlugin)>,
}

/// Plugin entry in the update-center document
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCenterPlugin {
    #[serde(default)]
    pub name: Option<String>,
    pub version: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
}

struct OrderedPlugins;

impl<'de> Visitor<'de> for OrderedPlugins {
    type Value = Vec<(String, UpdateCenterPlugin)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of plugin id to plugin entry")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut plugins = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((id, plugin)) = map.next_entry::<String, UpdateCenterPlugin>()? {
            plugins.push((id, plugin));
        }
        Ok(plugins)
    }
}

fn deserialize_plugins<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<(String, UpdateCenterPlugin)>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_map(OrderedPlugins)
}

/// Remove a `updateCenter.post(...)` wrapper if present
fn strip_jsonp(content: &str) -> &str {
    let trimmed = content.trim();
    if let Some(inner) = trimmed.strip_prefix(JSONP_PREFIX) {
        let inner = inner.trim_end();
        let inner = inner.strip_suffix(';').unwrap_or(inner).trim_end();
        if let Some(inner) = inner.strip_suffix(')') {
            return inner.trim();
        }
    }
    trimmed
}

/// Parse an update-center document from a string
pub fn parse_document_str(content: &str) -> Result<UpdateCenterDocument> {
    let document = serde_json::from_str(strip_jsonp(content))?;
    Ok(document)
}

/// Parse an update-center document from a file
pub fn parse_document(path: &Path) -> Result<UpdateCenterDocument> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(strip_jsonp(&content)).map_err(|e| UpdateSiteError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
