//! CLI command implementations

pub mod install;
pub mod uninstall;
pub mod upgrade;
pub mod where_cmd;

use anyhow::Result;
use neo4j_mcp_installer_core::{Config, ConfigOverrides, EnvSnapshot, LocalPaths};
use std::path::PathBuf;
use neo4j_mcp_installer_release::{InstallReport, InstallStatus, Verification};

use crate::output;

/// Builds the invocation's configuration from flags and the process environment
fn load_config(overrides: ConfigOverrides) -> Result<Config> {
    let config = Config::resolve(overrides, &EnvSnapshot::from_process())?;
    tracing::debug!(
        repo = %config.release.repo,
        install_dir = %config.install_dir.display(),
        cache_dir = %config.cache_dir.display(),
        "configuration resolved"
    );
    Ok(config)
}

/// Install and cache directories only, for commands that stay offline
fn load_paths(install_dir: Option<PathBuf>) -> Result<LocalPaths> {
    let paths = LocalPaths::resolve(install_dir, &EnvSnapshot::from_process())?;
    tracing::debug!(
        install_dir = %paths.install_dir.display(),
        cache_dir = %paths.cache_dir.display(),
        "paths resolved"
    );
    Ok(paths)
}

/// Shared summary for `install` and `upgrade`
fn print_report(report: &InstallReport) -> Result<()> {
    if report.verification.as_ref().is_some_and(Verification::is_skipped) {
        output::warning("checksum verification was skipped; the download was not verified");
    }

    let record = &report.record;
    match &report.status {
        InstallStatus::Installed | InstallStatus::Reinstalled => {
            output::success(&format!("Installed neo4j-mcp {}", record.version));
        }
        InstallStatus::Upgraded { from } => {
            output::success(&format!(
                "Upgraded neo4j-mcp {} → {}",
                from, record.version
            ));
        }
        InstallStatus::AlreadyInstalled => {
            output::success(&format!(
                "neo4j-mcp {} is already installed (use --force to reinstall)",
                record.version
            ));
        }
        InstallStatus::UpToDate => {
            output::success(&format!(
                "neo4j-mcp {} is already the latest release",
                record.version
            ));
        }
    }

    output::print_text(&format!("  Path:    {}", record.binary_path.display()))?;
    output::print_text(&format!("  Version: {}", record.version))?;

    if report.status.changed() {
        output::print_next_steps(&record.install_dir)?;
    }
    Ok(())
}
