//! `install` - resolve, download, verify and place the binary

use anyhow::Result;
use std::path::PathBuf;

use neo4j_mcp_installer_core::ConfigOverrides;
use neo4j_mcp_installer_release::InstallPipeline;

use crate::output;

pub fn run(
    version: Option<String>,
    install_dir: Option<PathBuf>,
    force: bool,
    no_verify: bool,
) -> Result<()> {
    let config = super::load_config(ConfigOverrides {
        version,
        install_dir,
        no_verify,
    })?;

    let pipeline = InstallPipeline::new(config)?.with_progress(output::progress);
    let report = pipeline.install(force)?;

    super::print_report(&report)
}
