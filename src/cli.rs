use std::io::IsTerminal;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{load_step_config, toolchain_from_env};
use crate::migrate::GoModMigrator;

/// Migrates a GOPATH-mode Go step to Go modules
#[derive(Parser)]
#[command(name = "modupdate", version)]
#[command(about = "Migrates a GOPATH-mode Go project to Go modules")]
pub struct Cli {
    /// Root of the Go project (must contain step.yml)
    pub project_path: String,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Parse arguments and migrate the project they point at.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let project_path = cli.project_path.trim();
    if project_path.is_empty() {
        bail!("Empty project path specified.");
    }

    let migrator = GoModMigrator::new(project_path)?;
    let step = load_step_config(migrator.project_dir())?;

    let Some(go) = step.go_toolkit() else {
        info!("{} does not use the Go toolkit, nothing to migrate", step.path.display());
        return Ok(());
    };
    if !migrator.is_legacy_mode() {
        info!("go.mod already present in {}, nothing to migrate", migrator.project_dir().display());
        return Ok(());
    }

    let toolchain = toolchain_from_env();
    migrator
        .migrate(&toolchain, go.package_name())
        .context("Failed to update to go modules")?;

    // Warnings are already logged; a leftover legacy file does not fail the run.
    migrator.remove_legacy_artifacts();

    migrator.verify_build(&toolchain)?;
    Ok(())
}
