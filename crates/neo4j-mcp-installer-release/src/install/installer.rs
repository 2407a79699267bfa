//! Placing the binary into an install directory and removing it again
//!
//! Each install directory moves between two states:
//!
//! - **Absent**: no record (a stray binary may still exist)
//! - **Installed**: record present and its binary executable
//!
//! Writes go through a temp file in the destination directory followed by an
//! atomic rename, binary first and record second.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use neo4j_mcp_installer_core::{InstallRecord, InstallerError, Result};

use crate::install::archive::extract_binary;
use crate::install::locate::AssetDescriptor;
use crate::install::platform::host_binary_name;

/// Result of [`Installer::install`]
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub record: InstallRecord,
    /// False when an existing record was returned untouched
    pub changed: bool,
}

/// What [`Installer::uninstall`] actually removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallReport {
    pub binary_removed: Option<PathBuf>,
    pub record_removed: bool,
    pub cache_removed: Option<PathBuf>,
}

/// Owns the binary and the install record in one install directory.
///
/// No lock file is taken. Two processes working on the same directory are
/// not serialized: each write is atomic, so readers never see a partial
/// binary or record, but the last writer wins.
pub struct Installer {
    install_dir: PathBuf,
}

impl Installer {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
        }
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Record of the current installation, if any
    pub fn current(&self) -> Result<Option<InstallRecord>> {
        InstallRecord::load(&self.install_dir)
    }

    /// Installs the binary from `archive`, or returns the existing record
    /// unchanged when one exists and `force` is false.
    pub fn install(
        &self,
        archive: &Path,
        descriptor: &AssetDescriptor,
        force: bool,
    ) -> Result<InstallOutcome> {
        if !force {
            if let Some(record) = self.current()? {
                tracing::debug!(version = %record.version, "already installed, nothing to do");
                return Ok(InstallOutcome {
                    record,
                    changed: false,
                });
            }
        }

        let binary_name = descriptor.target.binary_name();
        let extracted = extract_binary(archive, descriptor.target.archive_kind(), binary_name)?;

        fs::create_dir_all(&self.install_dir).map_err(|e| {
            InstallerError::io(
                format!("create install directory {}", self.install_dir.display()),
                e,
            )
        })?;

        let binary_path = self.install_dir.join(binary_name);
        place_executable(&extracted.path, &binary_path, &self.install_dir)?;

        let record = InstallRecord::new(
            &descriptor.version,
            &self.install_dir,
            &binary_path,
            &descriptor.repo,
            descriptor.target.label(),
        );
        record.save()?;

        tracing::info!(
            version = %record.version,
            path = %binary_path.display(),
            "installed neo4j-mcp"
        );

        Ok(InstallOutcome {
            record,
            changed: true,
        })
    }

    /// Path of the installed binary.
    ///
    /// A record whose binary is gone counts as not installed.
    pub fn where_installed(&self) -> Result<PathBuf> {
        let record = self
            .current()?
            .ok_or_else(|| InstallerError::not_installed(&self.install_dir))?;

        if !record.binary_present() {
            return Err(InstallerError::NotInstalled {
                install_dir: self.install_dir.clone(),
                detail: Some(format!(
                    "recorded binary {} is missing",
                    record.binary_path.display()
                )),
            });
        }

        Ok(record.binary_path)
    }

    /// Removes the binary and the record, best effort.
    ///
    /// With `clean_cache` the whole cache directory is deleted first. Fails
    /// with `NotInstalled` only when neither a record nor a binary was found.
    pub fn uninstall(&self, clean_cache: Option<&Path>) -> Result<UninstallReport> {
        let mut report = UninstallReport::default();

        if let Some(cache_dir) = clean_cache {
            report.cache_removed = remove_dir_if_present(cache_dir)?;
        }

        // A corrupt record must not block removal
        let recorded_binary = match self.current() {
            Ok(record) => record.map(|r| r.binary_path),
            Err(InstallerError::RecordInvalid { path, reason }) => {
                tracing::warn!(path = %path.display(), %reason, "ignoring unreadable install record");
                None
            }
            Err(e) => return Err(e),
        };
        let binary_path =
            recorded_binary.unwrap_or_else(|| self.install_dir.join(host_binary_name()));

        report.binary_removed = remove_file_if_present(&binary_path)?;
        report.record_removed = InstallRecord::remove(&self.install_dir)?;

        if report.binary_removed.is_none() && !report.record_removed {
            return Err(InstallerError::NotInstalled {
                install_dir: self.install_dir.clone(),
                detail: report
                    .cache_removed
                    .as_ref()
                    .map(|dir| format!("cache {} was removed", dir.display())),
            });
        }

        tracing::info!(install_dir = %self.install_dir.display(), "uninstalled neo4j-mcp");
        Ok(report)
    }
}

/// Copies `from` over `to` via a temp file in `dest_dir`, then marks it
/// executable and renames it into place.
fn place_executable(from: &Path, to: &Path, dest_dir: &Path) -> Result<()> {
    let mut temp_dest = tempfile::NamedTempFile::new_in(dest_dir).map_err(|e| {
        InstallerError::io(format!("create temporary file in {}", dest_dir.display()), e)
    })?;

    let mut src_file = fs::File::open(from)
        .map_err(|e| InstallerError::io(format!("open {}", from.display()), e))?;
    io::copy(&mut src_file, &mut temp_dest)
        .map_err(|e| InstallerError::io("copy binary contents", e))?;
    drop(src_file);

    #[cfg(unix)]
    set_executable_permissions(temp_dest.path())?;

    temp_dest
        .as_file()
        .sync_all()
        .map_err(|e| InstallerError::io("sync temporary binary", e))?;

    // Atomic rename; replaces an existing binary on Unix and Windows
    temp_dest
        .persist(to)
        .map_err(|e| InstallerError::io(format!("install binary to {}", to.display()), e.error))?;

    #[cfg(unix)]
    {
        let dir = fs::File::open(dest_dir)
            .map_err(|e| InstallerError::io(format!("open {}", dest_dir.display()), e))?;
        dir.sync_all()
            .map_err(|e| InstallerError::io(format!("sync {}", dest_dir.display()), e))?;
    }

    Ok(())
}

#[cfg(unix)]
fn set_executable_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path)
        .map_err(|e| InstallerError::io(format!("get metadata for {}", path.display()), e))?;

    let mut permissions = metadata.permissions();
    permissions.set_mode(permissions.mode() | 0o755);

    fs::set_permissions(path, permissions)
        .map_err(|e| InstallerError::io(format!("set permissions for {}", path.display()), e))
}

fn remove_file_if_present(path: &Path) -> Result<Option<PathBuf>> {
    match fs::remove_file(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(InstallerError::io(format!("remove {}", path.display()), e)),
    }
}

fn remove_dir_if_present(path: &Path) -> Result<Option<PathBuf>> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(InstallerError::io(format!("remove {}", path.display()), e)),
    }
}
