//! Archive extraction and binary lookup
//!
//! Archives are unpacked into a [`TempDir`] that is removed on drop, so a
//! failed install leaves nothing behind. Entry paths are validated by
//! `tar::Entry::unpack_in` and `zip::read::ZipFile::enclosed_name`.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use neo4j_mcp_installer_core::{InstallerError, Result};

use crate::install::platform::ArchiveKind;

/// An unpacked archive plus the path of the binary found inside it
#[derive(Debug)]
pub struct ExtractedBinary {
    // Keeps the extraction directory alive
    _dir: TempDir,
    pub path: PathBuf,
}

/// Unpacks `archive` and locates `binary_name` in it
pub fn extract_binary(archive: &Path, kind: ArchiveKind, binary_name: &str) -> Result<ExtractedBinary> {
    let dir = tempfile::tempdir()
        .map_err(|e| InstallerError::io("create temporary directory for extraction", e))?;

    match kind {
        ArchiveKind::TarGz => extract_tar_gz(archive, dir.path())?,
        ArchiveKind::Zip => extract_zip(archive, dir.path())?,
    }

    let path = find_binary_in_dir(dir.path(), binary_name).ok_or_else(|| {
        InstallerError::Extraction {
            archive: archive_label(archive),
            reason: format!("{} not found in archive", binary_name),
        }
    })?;

    tracing::debug!(binary = %path.display(), "located binary in archive");
    Ok(ExtractedBinary { _dir: dir, path })
}

fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = fs::File::open(archive_path).map_err(|e| {
        InstallerError::io(format!("open archive {}", archive_path.display()), e)
    })?;

    let extraction_error = |e: io::Error| InstallerError::Extraction {
        archive: archive_label(archive_path),
        reason: e.to_string(),
    };

    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
    for entry in archive.entries().map_err(extraction_error)? {
        let mut entry = entry.map_err(extraction_error)?;
        // unpack_in refuses entries that would escape dest_dir
        entry.unpack_in(dest_dir).map_err(extraction_error)?;
    }

    Ok(())
}

fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = fs::File::open(archive_path).map_err(|e| {
        InstallerError::io(format!("open archive {}", archive_path.display()), e)
    })?;

    let extraction_error = |e: zip::result::ZipError| InstallerError::Extraction {
        archive: archive_label(archive_path),
        reason: e.to_string(),
    };

    let mut archive = zip::ZipArchive::new(file).map_err(extraction_error)?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(extraction_error)?;

        let Some(relative) = file.enclosed_name() else {
            tracing::warn!(entry = file.name(), "skipping zip entry with unsafe path");
            continue;
        };
        let outpath = dest_dir.join(relative);

        if file.is_dir() {
            fs::create_dir_all(&outpath).map_err(|e| {
                InstallerError::io(format!("create directory {}", outpath.display()), e)
            })?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                InstallerError::io(format!("create directory {}", parent.display()), e)
            })?;
        }

        let mut outfile = fs::File::create(&outpath).map_err(|e| {
            InstallerError::io(format!("create file {}", outpath.display()), e)
        })?;
        io::copy(&mut file, &mut outfile).map_err(|e| {
            InstallerError::io(format!("extract file {}", outpath.display()), e)
        })?;
    }

    Ok(())
}

/// Searches `dir` recursively. The exact name wins; otherwise the name with
/// or without `.exe` is accepted, for archives packed for the other family.
fn find_binary_in_dir(dir: &Path, binary_name: &str) -> Option<PathBuf> {
    let alternate = match binary_name.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => format!("{}.exe", binary_name),
    };

    let files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    let named = |name: &str| {
        let name = OsStr::new(name);
        files.iter().find(|p| p.file_name() == Some(name)).cloned()
    };

    named(binary_name).or_else(|| named(&alternate))
}

fn archive_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
