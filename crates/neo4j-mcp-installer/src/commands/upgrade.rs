//! `upgrade` - move an existing installation to the latest release

use anyhow::Result;
use std::path::PathBuf;

use neo4j_mcp_installer_core::ConfigOverrides;
use neo4j_mcp_installer_release::InstallPipeline;

use crate::output;

pub fn run(install_dir: Option<PathBuf>, no_verify: bool) -> Result<()> {
    let config = super::load_config(ConfigOverrides {
        version: None,
        install_dir,
        no_verify,
    })?;

    let pipeline = InstallPipeline::new(config)?.with_progress(output::progress);
    let report = pipeline.upgrade()?;

    super::print_report(&report)
}
