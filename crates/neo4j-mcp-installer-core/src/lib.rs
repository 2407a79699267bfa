//! Shared building blocks for neo4j-mcp-installer: the error taxonomy,
//! configuration assembly and the persisted install record.

pub mod config;
pub mod error;
pub mod record;

// Re-export commonly used types
pub use config::{
    Config, ConfigOverrides, EnvSnapshot, LocalPaths, ReleaseSpec, VersionRequest,
};
pub use error::{InstallerError, Result, exit_code};
pub use record::InstallRecord;
