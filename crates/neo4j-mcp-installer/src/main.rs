mod cli;
mod commands;
mod output;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use neo4j_mcp_installer_core::{InstallerError, exit_code};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Install {
            version,
            dir,
            force,
            no_verify,
        } => commands::install::run(version, dir.install_dir, force, no_verify),
        Commands::Upgrade { dir, no_verify } => commands::upgrade::run(dir.install_dir, no_verify),
        Commands::Where { dir } => commands::where_cmd::run(dir.install_dir),
        Commands::Uninstall { dir, clean_cache } => {
            commands::uninstall::run(dir.install_dir, clean_cache)
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(error_exit_code(&e));
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn error_exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<InstallerError>()
        .map(InstallerError::exit_code)
        .unwrap_or(exit_code::GENERIC)
}
