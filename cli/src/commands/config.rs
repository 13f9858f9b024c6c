// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use apphost_core::domain::config::ServiceConfig;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./apphost.yaml)
        #[arg(short, long, default_value = "./apphost.yaml")]
        output: PathBuf,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output } => generate(output).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = ServiceConfig::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. APPHOST_CONFIG_PATH: {}",
            std::env::var("APPHOST_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./apphost.yaml");
        println!("  4. ~/.apphost/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();
    println!("  Service name: {}", config.service_name);
    println!("  Bind address: {}:{}", config.host, config.port);
    println!("  Secret key: {}", "(redacted)".dimmed());
    println!("  Debug: {}", config.debug);
    println!();

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config =
        ServiceConfig::load_or_default(config_path).context("Failed to load configuration")?;

    config.validate().context("Configuration is invalid")?;

    println!("{}", "Configuration is valid.".green().bold());
    Ok(())
}

async fn generate(output: PathBuf) -> Result<()> {
    if output.exists() {
        bail!("Refusing to overwrite existing file: {}", output.display());
    }

    let config = ServiceConfig::default();
    std::fs::write(&output, config.to_yaml_string())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} {}",
        "Sample configuration written to".green(),
        output.display()
    );
    Ok(())
}
