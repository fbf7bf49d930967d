use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use update_site_core::config::Config;
use update_site_core::registry::PluginRegistry;
use update_site_core::{
    is_newer, strip_qualifiers, CatalogSource, PostBack, Result, UpdateSite, UpdateSiteError,
};

mod args;
use args::{Cli, Commands, ConfigAction, RegistryAction, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("update_site_core={},update_site={}", level, level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let base_dir = resolve_base_dir(cli.base_dir);
    debug!(base_dir = %base_dir.display(), "resolved base directory");

    match cli.command {
        Some(Commands::Info) => handle_info(&open_site(&base_dir, cli.site)?)?,
        Some(Commands::Installed) => handle_installed(&open_site(&base_dir, cli.site)?)?,
        Some(Commands::Updates) => handle_updates(&open_site(&base_dir, cli.site)?)?,
        Some(Commands::Compare {
            candidate,
            baseline,
        }) => return handle_compare(&candidate, &baseline),
        Some(Commands::PostBack { json }) => {
            handle_post_back(&open_site(&base_dir, cli.site)?, json.as_deref())?
        }
        Some(Commands::Registry { action }) => handle_registry(action, &base_dir)?,
        Some(Commands::Config { action }) => handle_config(action, &base_dir)?,
        Some(Commands::Completions { shell }) => handle_completions(shell),
        None => {
            Cli::command().print_help().ok();
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("UPDATE_SITE_BASE") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".update-site"))
        .unwrap_or_else(|| PathBuf::from(".update-site"))
}

fn open_site(base_dir: &Path, site_override: Option<String>) -> Result<UpdateSite> {
    let mut config = Config::load(base_dir)?;
    if let Some(id) = site_override {
        config.set("site.id", &id)?;
    }
    UpdateSite::from_config(&config, base_dir)
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "update-site", &mut io::stdout());
}

fn handle_info(site: &UpdateSite) -> Result<()> {
    println!();
    println!("Site:           {}", site.id().cyan());
    println!(
        "URL:            {}",
        site.url().unwrap_or("(not configured)")
    );
    println!("Data file:      {}", site.data_file()?.display());
    println!("Legacy default: {}", site.is_legacy_default());

    match site.catalog()? {
        Some(catalog) => {
            println!(
                "Catalog:        {} ({} plugins)",
                "available".green(),
                catalog.len()
            );
        }
        None => {
            println!("Catalog:        {}", "not received".yellow());
        }
    }
    println!();

    Ok(())
}

fn handle_installed(site: &UpdateSite) -> Result<()> {
    let installed = site.installed()?;
    if installed.is_empty() {
        println!("No installed plugins in the catalog.");
        return Ok(());
    }

    println!();
    for plugin in &installed {
        println!(
            "  {} {}",
            plugin.id.cyan(),
            plugin.installed_version.as_deref().unwrap_or_default()
        );
    }
    println!();
    println!("Total: {}", installed.len());

    Ok(())
}

fn handle_updates(site: &UpdateSite) -> Result<()> {
    let updates = site.updates()?;
    if updates.is_empty() {
        println!("{}", "All installed plugins are up to date.".green());
        return Ok(());
    }

    println!();
    println!("Updates available:");
    for plugin in &updates {
        println!(
            "  {}  {} -> {}",
            plugin.display_name().cyan(),
            plugin.installed_version.as_deref().unwrap_or_default(),
            plugin.version.green()
        );
    }
    println!();
    println!("Total: {}", updates.len());

    Ok(())
}

fn handle_compare(candidate: &str, baseline: &str) -> Result<ExitCode> {
    let newer = is_newer(candidate, baseline)?;
    let (candidate, baseline) = (strip_qualifiers(candidate), strip_qualifiers(baseline));

    if newer {
        println!("{} {} > {}", "Newer:".green(), candidate, baseline);
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{} {} <= {}", "Not newer:".yellow(), candidate, baseline);
        Ok(ExitCode::from(1))
    }
}

fn handle_post_back(site: &UpdateSite, json: Option<&str>) -> Result<()> {
    let outcome = match json {
        Some(json) if !json.is_empty() => site.post_back_str(json)?,
        _ => site.post_back(None, Some(io::stdin().lock()))?,
    };

    match outcome {
        PostBack::Stored { path, bytes } => {
            println!("{} {} ({} bytes)", "Stored:".green(), path.display(), bytes);
        }
        PostBack::Ignored => {
            println!("{} blank document ignored", "Skipped:".yellow());
        }
    }

    Ok(())
}

fn handle_registry(action: RegistryAction, base_dir: &Path) -> Result<()> {
    let registry = PluginRegistry::new(base_dir.to_path_buf());

    match action {
        RegistryAction::Add { id, version } => {
            registry.add(&id, &version)?;
            println!("{} {} {}", "Installed:".green(), id, version);
        }
        RegistryAction::Remove { id } => {
            registry.remove(&id)?;
            println!("{} {}", "Removed:".green(), id);
        }
        RegistryAction::List => {
            let plugins = registry.list()?;
            if plugins.is_empty() {
                println!("No plugins recorded.");
                println!();
                println!("Record one with: update-site registry add <id> <version>");
                return Ok(());
            }

            println!();
            for (id, plugin) in plugins {
                println!(
                    "  {} {} (updated {})",
                    id.cyan(),
                    plugin.version,
                    plugin.last_updated
                );
            }
            println!();
        }
    }

    Ok(())
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(UpdateSiteError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
