//! `uninstall` - remove the binary, its record and optionally the cache

use anyhow::Result;
use std::path::PathBuf;

use neo4j_mcp_installer_release::Installer;

use crate::output;

pub fn run(install_dir: Option<PathBuf>, clean_cache: bool) -> Result<()> {
    let paths = super::load_paths(install_dir)?;

    let installer = Installer::new(&paths.install_dir);
    let cache_dir = clean_cache.then_some(paths.cache_dir.as_path());
    let report = installer.uninstall(cache_dir)?;

    match &report.binary_removed {
        Some(path) => output::success(&format!("Removed: {}", path.display())),
        None => output::warning("binary was already missing; removed install record only"),
    }

    if clean_cache {
        match &report.cache_removed {
            Some(dir) => output::success(&format!("Removed cache: {}", dir.display())),
            None => output::print_text(&format!(
                "Cache not found: {}",
                paths.cache_dir.display()
            ))?,
        }
    }

    Ok(())
}
