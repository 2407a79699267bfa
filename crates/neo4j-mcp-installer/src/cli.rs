//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "neo4j-mcp-installer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download, verify and install neo4j-mcp
    Install {
        /// Release tag to install (e.g. "v1.2.0"); defaults to the latest release
        #[arg(long)]
        version: Option<String>,

        #[command(flatten)]
        dir: InstallDirArg,

        /// Reinstall even if already installed, bypassing the download cache
        #[arg(short, long)]
        force: bool,

        /// Skip SHA-256 verification against the release checksums
        #[arg(long)]
        no_verify: bool,
    },

    /// Replace the installed binary with the latest release
    Upgrade {
        #[command(flatten)]
        dir: InstallDirArg,

        /// Skip SHA-256 verification against the release checksums
        #[arg(long)]
        no_verify: bool,
    },

    /// Print the path of the installed binary
    Where {
        #[command(flatten)]
        dir: InstallDirArg,
    },

    /// Remove the installed binary
    Uninstall {
        #[command(flatten)]
        dir: InstallDirArg,

        /// Also delete every cached download
        #[arg(long)]
        clean_cache: bool,
    },
}

#[derive(Args)]
pub struct InstallDirArg {
    /// Directory holding the binary (default: ~/.local/bin, or
    /// %LOCALAPPDATA%\neo4j-mcp\bin on Windows)
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,
}
