use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes, one per failure category
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERIC: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const RESOLUTION: i32 = 3;
    pub const UNSUPPORTED_PLATFORM: i32 = 4;
    pub const DOWNLOAD: i32 = 5;
    pub const VERIFICATION: i32 = 6;
    pub const NOT_INSTALLED: i32 = 7;
    pub const FILESYSTEM: i32 = 8;
    pub const INVALID_STATE: i32 = 9;
}

#[derive(Error, Debug)]
pub enum InstallerError {
    // Version resolution
    #[error("RESOLUTION_FAILED: {0}")]
    Resolution(String),

    // Asset location
    #[error("UNSUPPORTED_PLATFORM: no neo4j-mcp build is published for {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    // Download
    #[error("DOWNLOAD_FAILED: {url}: {reason}")]
    Download { url: String, reason: String },

    // Verification
    #[error("CHECKSUM_MISMATCH: {asset}: expected {expected}, got {actual}")]
    Mismatch {
        asset: String,
        expected: String,
        actual: String,
    },

    #[error("CHECKSUM_UNAVAILABLE: {asset}: {reason} (use --no-verify to skip verification)")]
    ChecksumUnavailable { asset: String, reason: String },

    // Installation
    #[error("EXTRACTION_FAILED: {archive}: {reason}")]
    Extraction { archive: String, reason: String },

    #[error("NOT_INSTALLED: neo4j-mcp is not installed in {}{}", .install_dir.display(), detail_suffix(.detail))]
    NotInstalled {
        install_dir: PathBuf,
        detail: Option<String>,
    },

    // Filesystem
    #[error("PERMISSION_DENIED: {operation}: {source}")]
    Permission {
        operation: String,
        #[source]
        source: io::Error,
    },

    #[error("IO_ERROR: {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    // Configuration and persisted state
    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    Config { field: String, reason: String },

    #[error("RECORD_INVALID: {}: {reason}", .path.display())]
    RecordInvalid { path: PathBuf, reason: String },
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(" ({detail})"),
        None => String::new(),
    }
}

impl InstallerError {
    /// Wraps an I/O failure, classifying permission problems separately
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        let operation = operation.into();
        if source.kind() == io::ErrorKind::PermissionDenied {
            InstallerError::Permission { operation, source }
        } else {
            InstallerError::Io { operation, source }
        }
    }

    pub fn not_installed(install_dir: impl Into<PathBuf>) -> Self {
        InstallerError::NotInstalled {
            install_dir: install_dir.into(),
            detail: None,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            InstallerError::Resolution(_) => exit_code::RESOLUTION,
            InstallerError::UnsupportedPlatform { .. } => exit_code::UNSUPPORTED_PLATFORM,
            InstallerError::Download { .. } => exit_code::DOWNLOAD,
            InstallerError::Mismatch { .. } | InstallerError::ChecksumUnavailable { .. } => {
                exit_code::VERIFICATION
            }
            InstallerError::NotInstalled { .. } => exit_code::NOT_INSTALLED,
            InstallerError::Permission { .. }
            | InstallerError::Io { .. }
            | InstallerError::Extraction { .. } => exit_code::FILESYSTEM,
            InstallerError::Config { .. } | InstallerError::RecordInvalid { .. } => {
                exit_code::INVALID_STATE
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, InstallerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_is_classified() {
        let err = InstallerError::io(
            "write binary",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, InstallerError::Permission { .. }));
        assert_eq!(err.exit_code(), exit_code::FILESYSTEM);
    }

    #[test]
    fn test_other_io_errors_stay_io() {
        let err = InstallerError::io("read", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(err, InstallerError::Io { .. }));
    }

    #[test]
    fn test_exit_codes_are_distinct_per_category() {
        let codes = [
            InstallerError::Resolution("x".into()).exit_code(),
            InstallerError::UnsupportedPlatform {
                os: "freebsd".into(),
                arch: "x86_64".into(),
            }
            .exit_code(),
            InstallerError::Download {
                url: "u".into(),
                reason: "r".into(),
            }
            .exit_code(),
            InstallerError::Mismatch {
                asset: "a".into(),
                expected: "e".into(),
                actual: "b".into(),
            }
            .exit_code(),
            InstallerError::not_installed("/tmp").exit_code(),
        ];

        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, exit_code::SUCCESS);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_not_installed_message_includes_detail() {
        let err = InstallerError::NotInstalled {
            install_dir: PathBuf::from("/opt/bin"),
            detail: Some("binary missing".into()),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("NOT_INSTALLED"));
        assert!(msg.contains("/opt/bin"));
        assert!(msg.contains("(binary missing)"));
    }
}
