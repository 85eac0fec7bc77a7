//! Config command
//!
//! Manage session-export configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::Path;

use se_core::config::Config;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration
    Validate,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, config_path: &Path) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(config_path, json),
        ConfigCommand::Init { force } => init_config(config_path, force),
        ConfigCommand::Validate => validate_config(config_path),
    }
}

fn show_config(config_path: &Path, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let exists = config_path.exists();
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    if as_json {
        let value = toml::Value::try_from(&config).context("Failed to convert configuration")?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if exists {
        println!("{}", config_path.display().to_string().dimmed());
    } else {
        println!(
            "{}",
            format!("{} (not found, showing defaults)", config_path.display()).dimmed()
        );
    }
    println!();
    println!("{}", config.to_toml()?);

    Ok(())
}

fn init_config(config_path: &Path, force: bool) -> Result<()> {
    use colored::Colorize;

    if config_path.exists() && !force {
        eprintln!(
            "{} {} already exists. Use '{}' to overwrite.",
            "⚠".yellow(),
            config_path.display(),
            "--force".cyan()
        );
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    fs::write(config_path, Config::default().to_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("{} Wrote {}", "✓".green(), config_path.display());

    Ok(())
}

fn validate_config(config_path: &Path) -> Result<()> {
    use colored::Colorize;

    match Config::load(config_path) {
        Ok(_) => {
            println!("{} Configuration is valid.", "✓".green());
            Ok(())
        }
        Err(e) => {
            eprintln!("{} Configuration has errors: {}", "✗".red(), e);
            Err(e.into())
        }
    }
}
