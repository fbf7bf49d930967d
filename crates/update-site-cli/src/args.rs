use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "update-site")]
#[command(about = "Inspect plugin update-site catalogs and pending updates")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.update-site)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Update site id (overrides site.id from config)
    #[arg(long, global = true)]
    pub site: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the update site: id, URL, data file and catalog status
    Info,

    /// List installed plugins known to the catalog
    Installed,

    /// List installed plugins with a newer version available
    Updates,

    /// Compare two versions (exit 0 if candidate is newer, 1 otherwise)
    Compare {
        /// Candidate version (e.g., "1.2 (beta)")
        candidate: String,

        /// Baseline version (e.g., "1.1")
        baseline: String,
    },

    /// Store an update-center document (from --json or stdin)
    PostBack {
        /// Document content; read from stdin when empty or omitted
        #[arg(long)]
        json: Option<String>,
    },

    /// Manage the installed plugin registry
    Registry {
        #[command(subcommand)]
        action: RegistryAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum RegistryAction {
    /// Record a plugin as installed
    Add {
        /// Plugin id
        id: String,

        /// Installed version
        version: String,
    },

    /// Remove a plugin from the registry
    Remove {
        /// Plugin id
        id: String,
    },

    /// List installed plugins
    List,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., site.url)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., site.url)
        key: String,

        /// Value to set (empty string unsets site.url)
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
