//! Shared test support for the neo4j-mcp-installer workspace
//!
//! - scratch directories under the crate's `.tmp/` (gitignored)
//! - fake release archives wrapping [`FAKE_BINARY`]
//! - GitHub release payloads and checksum files describing them

pub mod fixtures;

pub use fixtures::{
    FAKE_BINARY, checksums_block, checksums_coreutils, release_json, sha256_hex,
    tar_gz_with_binary, zip_with_binary,
};

use std::io;
use tempfile::TempDir;

/// Scratch directory under `<crate root>/.tmp/`, removed on drop
///
/// Install and cache directories used by the tests live here, so nothing
/// touches the real `~/.local/bin` or the user cache.
///
/// # Panics
///
/// Panics when `.tmp/` or the directory inside it cannot be created.
///
/// ```rust
/// use neo4j_mcp_installer_testkit::temp_dir_in_workspace;
///
/// let scratch = temp_dir_in_workspace();
/// let install_dir = scratch.path().join("bin");
/// std::fs::create_dir_all(&install_dir).unwrap();
/// assert!(install_dir.is_dir());
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("could not create scratch directory under .tmp/")
}

pub fn try_temp_dir_in_workspace() -> io::Result<TempDir> {
    let scratch_root = std::env::current_dir()?.join(".tmp");
    std::fs::create_dir_all(&scratch_root)?;
    tempfile::Builder::new()
        .prefix("neo4j-mcp-")
        .tempdir_in(&scratch_root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_dir_lives_under_tmp() {
        let scratch = temp_dir_in_workspace();
        let parent = scratch.path().parent().unwrap();

        assert_eq!(parent.file_name().unwrap(), ".tmp");
        assert!(scratch.path().is_dir());
    }

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let scratch = temp_dir_in_workspace();
        let path = scratch.path().to_path_buf();
        drop(scratch);

        assert!(!path.exists(), "{} should be gone", path.display());
    }

    #[test]
    fn test_scratch_dirs_are_distinct() {
        let a = temp_dir_in_workspace();
        let b = temp_dir_in_workspace();
        assert_ne!(a.path(), b.path());
    }
}
