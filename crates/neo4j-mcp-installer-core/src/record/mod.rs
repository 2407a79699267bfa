use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{InstallerError, Result};

/// File name of the record, stored inside the install directory
pub const RECORD_FILE_NAME: &str = ".neo4j-mcp-install.json";

pub const RECORD_SCHEMA_VERSION: &str = "1";

/// What was installed into one install directory.
///
/// There is exactly one record per directory; there is no version history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallRecord {
    pub schema_version: String,
    pub version: String,
    pub install_dir: PathBuf,
    pub binary_path: PathBuf,
    pub source_repo: String,
    /// Platform label of the installed asset, e.g. "Linux_x86_64"
    pub platform: String,
    pub installed_at: DateTime<Utc>,
}

impl InstallRecord {
    pub fn new(
        version: impl Into<String>,
        install_dir: impl Into<PathBuf>,
        binary_path: impl Into<PathBuf>,
        source_repo: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            schema_version: RECORD_SCHEMA_VERSION.to_string(),
            version: version.into(),
            install_dir: install_dir.into(),
            binary_path: binary_path.into(),
            source_repo: source_repo.into(),
            platform: platform.into(),
            installed_at: Utc::now(),
        }
    }

    pub fn path_in(install_dir: &Path) -> PathBuf {
        install_dir.join(RECORD_FILE_NAME)
    }

    /// Reads the record for `install_dir`; `Ok(None)` when there is none
    pub fn load(install_dir: &Path) -> Result<Option<Self>> {
        let path = Self::path_in(install_dir);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(InstallerError::io(
                    format!("read install record {}", path.display()),
                    e,
                ));
            }
        };

        let record: Self =
            serde_json::from_str(&content).map_err(|e| InstallerError::RecordInvalid {
                path: path.clone(),
                reason: format!("failed to parse: {}", e),
            })?;

        // Schema evolution
        match record.schema_version.as_str() {
            RECORD_SCHEMA_VERSION => Ok(Some(record)),
            version => Err(InstallerError::RecordInvalid {
                path,
                reason: format!("unknown schema version '{}'", version),
            }),
        }
    }

    /// Writes the record atomically into its install directory
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.install_dir).map_err(|e| {
            InstallerError::io(
                format!("create install directory {}", self.install_dir.display()),
                e,
            )
        })?;

        let content = serde_json::to_string_pretty(self).map_err(|e| {
            InstallerError::RecordInvalid {
                path: Self::path_in(&self.install_dir),
                reason: format!("failed to serialize: {}", e),
            }
        })?;

        atomic_write(&content, &Self::path_in(&self.install_dir), &self.install_dir)
    }

    /// Deletes the record; returns whether one existed
    pub fn remove(install_dir: &Path) -> Result<bool> {
        let path = Self::path_in(install_dir);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(InstallerError::io(
                format!("remove install record {}", path.display()),
                e,
            )),
        }
    }

    /// True when the recorded binary exists (and is executable on Unix)
    pub fn binary_present(&self) -> bool {
        is_executable_file(&self.binary_path)
    }
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

/// Write via NamedTempFile + persist so readers never see a torn file
fn atomic_write(content: &str, path: &Path, parent: &Path) -> Result<()> {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut temp_file = NamedTempFile::new_in(parent)
        .map_err(|e| InstallerError::io("create temporary record file", e))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| InstallerError::io("write temporary record file", e))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| InstallerError::io("sync temporary record file", e))?;

    temp_file
        .persist(path)
        .map_err(|e| InstallerError::io(format!("persist {}", path.display()), e.error))?;

    #[cfg(unix)]
    {
        let dir = std::fs::File::open(parent)
            .map_err(|e| InstallerError::io(format!("open {}", parent.display()), e))?;
        dir.sync_all()
            .map_err(|e| InstallerError::io(format!("sync {}", parent.display()), e))?;
    }

    Ok(())
}
