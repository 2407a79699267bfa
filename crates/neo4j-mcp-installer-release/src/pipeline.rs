//! The install and upgrade flows
//!
//! ```text
//! install(force)
//!     ↓
//! 1. Existing record with its binary? (force = false) → AlreadyInstalled
//!     ↓ (no network access up to here)
//! 2. Resolve version (flag > env > recorded tag when repairing > latest)
//!     ↓
//! 3. Locate asset for the host target
//!     ↓
//! 4. Fetch into cache (verified before it is cached)
//!     ↓
//! 5. Extract and place binary, write record
//! ```
//!
//! `upgrade` follows the same path from step 2, always asking for the latest
//! release, and stops before step 4 when the recorded version is current.

use neo4j_mcp_installer_core::{Config, InstallRecord, InstallerError, Result, VersionRequest};

use crate::github::GithubClient;
use crate::install::{
    Downloader, FetchOptions, Installer, ProgressFn, Target, Verification, Verifier, locate,
};
use crate::resolve::{ResolvedRelease, VersionResolver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStatus {
    /// Fresh install into an Absent directory
    Installed,
    /// Same release again: `--force`, or a record whose binary had gone missing
    Reinstalled,
    AlreadyInstalled,
    Upgraded { from: String },
    UpToDate,
}

impl InstallStatus {
    /// Whether the binary on disk was replaced
    pub fn changed(&self) -> bool {
        matches!(
            self,
            InstallStatus::Installed | InstallStatus::Reinstalled | InstallStatus::Upgraded { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct InstallReport {
    pub record: InstallRecord,
    pub status: InstallStatus,
    /// `None` when nothing was downloaded
    pub verification: Option<Verification>,
    pub from_cache: bool,
}

pub struct InstallPipeline {
    config: Config,
    client: GithubClient,
    target: Target,
    progress: Option<ProgressFn>,
}

impl InstallPipeline {
    /// Pipeline for the running host.
    ///
    /// Fails with `UnsupportedPlatform` before any network access when the
    /// host has no published build.
    pub fn new(config: Config) -> Result<Self> {
        let target = Target::detect()?;
        let client = GithubClient::from_config(&config)?;
        Ok(Self {
            config,
            client,
            target,
            progress: None,
        })
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn installer(&self) -> Installer {
        Installer::new(&self.config.install_dir)
    }

    pub fn install(&self, force: bool) -> Result<InstallReport> {
        let installer = self.installer();
        let previous = installer.current()?;

        if let Some(record) = &previous {
            if !force && record.binary_present() {
                tracing::info!(version = %record.version, "already installed");
                return Ok(InstallReport {
                    record: record.clone(),
                    status: InstallStatus::AlreadyInstalled,
                    verification: None,
                    from_cache: false,
                });
            }
            if !force {
                tracing::warn!(
                    binary = %record.binary_path.display(),
                    "recorded binary is missing, reinstalling"
                );
            }
        }

        // Repairs keep the recorded release unless a version was asked for
        let request = match &previous {
            Some(record) if !force && self.config.release.version == VersionRequest::Latest => {
                VersionRequest::Tag(record.version.clone())
            }
            _ => self.config.release.version.clone(),
        };
        let resolved = self.resolver().resolve(&request)?;

        let status = match previous {
            None => InstallStatus::Installed,
            Some(record) if record.version == resolved.tag => InstallStatus::Reinstalled,
            Some(record) => InstallStatus::Upgraded {
                from: record.version,
            },
        };
        self.install_release(&resolved, force, status)
    }

    /// Moves an Installed directory to the latest release.
    ///
    /// `NEO4J_MCP_VERSION` and `--version` do not apply here.
    pub fn upgrade(&self) -> Result<InstallReport> {
        let installer = self.installer();
        let record = installer
            .current()?
            .ok_or_else(|| InstallerError::not_installed(&self.config.install_dir))?;

        let resolved = self.resolver().resolve(&VersionRequest::Latest)?;

        if resolved.tag == record.version && record.binary_present() {
            tracing::info!(version = %record.version, "already at latest release");
            return Ok(InstallReport {
                record,
                status: InstallStatus::UpToDate,
                verification: None,
                from_cache: false,
            });
        }

        let status = if resolved.tag == record.version {
            InstallStatus::Reinstalled
        } else {
            InstallStatus::Upgraded {
                from: record.version.clone(),
            }
        };
        self.install_release(&resolved, true, status)
    }

    fn resolver(&self) -> VersionResolver<'_> {
        VersionResolver::new(&self.client, &self.config.release.repo)
    }

    fn install_release(
        &self,
        resolved: &ResolvedRelease,
        force: bool,
        status: InstallStatus,
    ) -> Result<InstallReport> {
        let descriptor = locate(&self.config.release, &resolved.tag, self.target)?;

        let versions_dir = self.config.versions_dir();
        let downloader = Downloader::new(&self.client, &versions_dir);
        let verifier = Verifier::new(&self.client, self.config.skip_verify);
        let options = FetchOptions {
            force,
            expected_size: resolved.asset_size(&descriptor.asset_name),
            progress: self.progress,
        };

        let archive = downloader.fetch(&descriptor, &options, &verifier)?;

        // The pipeline already decided to (re)install
        let outcome = self
            .installer()
            .install(&archive.path, &descriptor, true)?;

        Ok(InstallReport {
            record: outcome.record,
            status,
            verification: archive.verification,
            from_cache: archive.from_cache,
        })
    }
}
