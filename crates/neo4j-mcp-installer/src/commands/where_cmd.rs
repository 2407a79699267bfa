use anyhow::Result;
use std::path::PathBuf;

use neo4j_mcp_installer_release::Installer;

use crate::output;

/// Prints only the path so the output can be used in scripts
pub fn run(install_dir: Option<PathBuf>) -> Result<()> {
    let paths = super::load_paths(install_dir)?;

    let path = Installer::new(&paths.install_dir).where_installed()?;
    output::print_text(&path.display().to_string())?;
    Ok(())
}
