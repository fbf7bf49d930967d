use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateSiteError {
    #[error("Invalid version '{version}': {message}")]
    VersionParse { version: String, message: String },

    #[error("Plugin not found: {id}")]
    PluginNotFound { id: String },

    #[error("Duplicate plugin in catalog: {id}")]
    DuplicatePlugin { id: String },

    #[error("Invalid site id: '{id}' - must contain only alphanumeric, hyphen, underscore, dot")]
    InvalidSiteId { id: String },

    #[error("Failed to parse {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, UpdateSiteError>;

impl UpdateSiteError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::VersionParse { .. } => 2,
            Self::PluginNotFound { .. } => 3,
            Self::InvalidSiteId { .. } => 4,
            Self::ConfigParse { .. } | Self::ConfigKeyNotFound { .. } => 5,
            Self::DuplicatePlugin { .. } => 6,
            _ => 1,
        }
    }
}
