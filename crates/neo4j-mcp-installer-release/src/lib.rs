//! Release acquisition and installation for neo4j-mcp.
//!
//! This crate turns a [`Config`](neo4j_mcp_installer_core::Config) into an
//! installed `neo4j-mcp` binary. It is organized into:
//!
//! - [`github`]: HTTP client, release metadata and URL helpers
//! - [`resolve`]: "latest" or explicit tag → concrete release
//! - [`install`]: target mapping, asset location, cached download,
//!   checksum verification, extraction and placement
//! - [`pipeline`]: the install and upgrade flows tying these together
//!
//! All I/O is blocking and sequential.
//!
//! # Examples
//!
//! ```no_run
//! use neo4j_mcp_installer_core::{Config, ConfigOverrides, EnvSnapshot};
//! use neo4j_mcp_installer_release::InstallPipeline;
//!
//! # fn main() -> neo4j_mcp_installer_core::Result<()> {
//! let config = Config::resolve(ConfigOverrides::default(), &EnvSnapshot::from_process())?;
//! let report = InstallPipeline::new(config)?.install(false)?;
//! println!("{}", report.record.binary_path.display());
//! # Ok(())
//! # }
//! ```

pub mod github;
pub mod install;
pub mod pipeline;
pub mod resolve;

pub use install::{
    AssetDescriptor, InstallOutcome, Installer, Target, UninstallReport, Verification,
};
pub use pipeline::{InstallPipeline, InstallReport, InstallStatus};
pub use resolve::{ResolvedRelease, VersionResolver};
