//! Streaming download into the version cache
//!
//! An archive only becomes visible at its cache path after it has been
//! fully written, synced and verified against the published checksums. Until
//! then it lives in a `NamedTempFile` next to its final location, which is
//! removed on drop if anything fails. Archives fetched with verification
//! skipped are never cached; they stay temporary for the one install that
//! asked for them.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

use neo4j_mcp_installer_core::{InstallerError, Result};

use crate::github::GithubClient;
use crate::install::locate::AssetDescriptor;
use crate::install::verify::{Verification, Verifier};

/// Progress callback: (bytes_downloaded, total_bytes or 0 when unknown)
pub type ProgressFn = fn(u64, u64);

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Ignore a cached archive and download again
    pub force: bool,
    /// Size advertised by the release index, checked after download
    pub expected_size: Option<u64>,
    pub progress: Option<ProgressFn>,
}

/// A verified archive in the cache, or an unverified temporary one
#[derive(Debug)]
pub struct FetchedArchive {
    pub path: PathBuf,
    pub from_cache: bool,
    /// `None` for cache hits, which were verified when they were stored
    pub verification: Option<Verification>,
    /// Owns `path` when verification was skipped; deleted on drop
    unverified: Option<TempPath>,
}

impl FetchedArchive {
    /// Whether `path` is a cache entry that outlives this value
    pub fn is_cached(&self) -> bool {
        self.unverified.is_none()
    }
}

pub struct Downloader<'a> {
    client: &'a GithubClient,
    versions_dir: &'a Path,
}

impl<'a> Downloader<'a> {
    pub fn new(client: &'a GithubClient, versions_dir: &'a Path) -> Self {
        Self {
            client,
            versions_dir,
        }
    }

    /// `<versions_dir>/<version>/<asset_name>`
    pub fn cache_path(&self, descriptor: &AssetDescriptor) -> PathBuf {
        self.versions_dir
            .join(&descriptor.version)
            .join(&descriptor.asset_name)
    }

    pub fn fetch(
        &self,
        descriptor: &AssetDescriptor,
        options: &FetchOptions,
        verifier: &Verifier<'_>,
    ) -> Result<FetchedArchive> {
        let cache_path = self.cache_path(descriptor);

        if !options.force && cache_path.is_file() {
            tracing::debug!(path = %cache_path.display(), "using cached archive");
            return Ok(FetchedArchive {
                path: cache_path,
                from_cache: true,
                verification: None,
                unverified: None,
            });
        }

        let version_dir = self.versions_dir.join(&descriptor.version);
        fs::create_dir_all(&version_dir).map_err(|e| {
            InstallerError::io(
                format!("create cache directory {}", version_dir.display()),
                e,
            )
        })?;

        let temp_file = self.download_to_temp(descriptor, options, &version_dir)?;

        // Verify before the archive can ever be observed as a cache hit
        let verification = verifier.verify(temp_file.path(), descriptor)?;

        if verification.is_skipped() {
            let temp_path = temp_file.into_temp_path();
            tracing::debug!(
                asset = %descriptor.asset_name,
                "unverified archive kept out of the cache"
            );
            return Ok(FetchedArchive {
                path: temp_path.to_path_buf(),
                from_cache: false,
                verification: Some(verification),
                unverified: Some(temp_path),
            });
        }

        temp_file.persist(&cache_path).map_err(|e| {
            InstallerError::io(format!("persist {}", cache_path.display()), e.error)
        })?;

        tracing::info!(
            asset = %descriptor.asset_name,
            path = %cache_path.display(),
            "archive cached"
        );

        Ok(FetchedArchive {
            path: cache_path,
            from_cache: false,
            verification: Some(verification),
            unverified: None,
        })
    }

    fn download_to_temp(
        &self,
        descriptor: &AssetDescriptor,
        options: &FetchOptions,
        version_dir: &Path,
    ) -> Result<tempfile::NamedTempFile> {
        let url = &descriptor.download_url;
        let download_error = |reason: String| InstallerError::Download {
            url: url.to_string(),
            reason,
        };

        let mut response = self
            .client
            .download(url)
            .map_err(|e| download_error(e.to_string()))?;

        if let Err(err) = response.error_for_status_ref() {
            return Err(download_error(err.without_url().to_string()));
        }

        let total = options
            .expected_size
            .or_else(|| response.content_length())
            .unwrap_or(0);

        let mut temp_file = tempfile::Builder::new()
            .prefix(".")
            .suffix(".partial")
            .tempfile_in(version_dir)
            .map_err(|e| InstallerError::io("create temporary download file", e))?;

        let mut downloaded: u64 = 0;
        let mut buffer = [0; 8192];

        loop {
            let bytes_read = response
                .read(&mut buffer)
                .map_err(|e| download_error(format!("read response body: {}", e)))?;

            if bytes_read == 0 {
                break;
            }

            temp_file
                .write_all(&buffer[..bytes_read])
                .map_err(|e| InstallerError::io("write temporary download file", e))?;

            downloaded += bytes_read as u64;

            if let Some(callback) = options.progress {
                callback(downloaded, total);
            }
        }

        if let Some(expected) = options.expected_size.filter(|e| *e != downloaded) {
            return Err(download_error(format!(
                "size mismatch: expected {} bytes, got {}",
                expected, downloaded
            )));
        }

        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| InstallerError::io("sync temporary download file", e))?;

        tracing::debug!(bytes = downloaded, url = %url, "download complete");
        Ok(temp_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::locate::locate;
    use crate::install::platform::{Arch, Os, Target};
    use mockito::Server;
    use neo4j_mcp_installer_core::{ReleaseSpec, VersionRequest};
    use neo4j_mcp_installer_testkit::{checksums_block, sha256_hex, temp_dir_in_workspace};

    const ASSET_PATH: &str = "/v1.0.0/neo4j-mcp_Linux_x86_64.tar.gz";
    const CHECKSUMS_PATH: &str = "/v1.0.0/neo4j-mcp_1.0.0_checksums.txt";
    const BODY: &[u8] = b"pretend this is a tarball";

    fn descriptor(server: &Server) -> AssetDescriptor {
        let spec = ReleaseSpec {
            repo: "neo4j/mcp".to_string(),
            version: VersionRequest::Latest,
            base_url: server.url(),
        };
        locate(&spec, "v1.0.0", Target::new(Os::Linux, Arch::X86_64).unwrap()).unwrap()
    }

    fn entries_in(dir: &Path) -> Vec<String> {
        match fs::read_dir(dir) {
            Ok(read) => read
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn test_fetch_downloads_verifies_and_caches() {
        let cache = temp_dir_in_workspace();
        let mut server = Server::new();
        let asset = server
            .mock("GET", ASSET_PATH)
            .with_status(200)
            .with_body(BODY)
            .create();
        let sums = server
            .mock("GET", CHECKSUMS_PATH)
            .with_status(200)
            .with_body(checksums_block(&[(
                "neo4j-mcp_Linux_x86_64.tar.gz",
                &sha256_hex(BODY),
            )]))
            .create();

        let client = GithubClient::new(&server.url(), None).unwrap();
        let downloader = Downloader::new(&client, cache.path());
        let fetched = downloader
            .fetch(
                &descriptor(&server),
                &FetchOptions::default(),
                &Verifier::new(&client, false),
            )
            .unwrap();

        asset.assert();
        sums.assert();
        assert!(!fetched.from_cache);
        assert_eq!(fetched.path, downloader.cache_path(&descriptor(&server)));
        assert_eq!(fs::read(&fetched.path).unwrap(), BODY);
        assert!(matches!(
            fetched.verification,
            Some(Verification::Verified { .. })
        ));
    }

    #[test]
    fn test_cached_archive_needs_no_network() {
        let cache = temp_dir_in_workspace();
        let mut server = Server::new();
        let asset = server.mock("GET", ASSET_PATH).expect(0).create();
        let sums = server.mock("GET", CHECKSUMS_PATH).expect(0).create();

        let client = GithubClient::new(&server.url(), None).unwrap();
        let downloader = Downloader::new(&client, cache.path());
        let descriptor = descriptor(&server);

        let cached = downloader.cache_path(&descriptor);
        fs::create_dir_all(cached.parent().unwrap()).unwrap();
        fs::write(&cached, BODY).unwrap();

        let fetched = downloader
            .fetch(
                &descriptor,
                &FetchOptions::default(),
                &Verifier::new(&client, false),
            )
            .unwrap();

        asset.assert();
        sums.assert();
        assert!(fetched.from_cache);
        assert!(fetched.verification.is_none());
    }

    #[test]
    fn test_force_bypasses_cache() {
        let cache = temp_dir_in_workspace();
        let mut server = Server::new();
        let asset = server
            .mock("GET", ASSET_PATH)
            .with_status(200)
            .with_body(BODY)
            .expect(1)
            .create();
        let _sums = server
            .mock("GET", CHECKSUMS_PATH)
            .with_status(200)
            .with_body(checksums_block(&[(
                "neo4j-mcp_Linux_x86_64.tar.gz",
                &sha256_hex(BODY),
            )]))
            .create();

        let client = GithubClient::new(&server.url(), None).unwrap();
        let downloader = Downloader::new(&client, cache.path());
        let descriptor = descriptor(&server);

        let cached = downloader.cache_path(&descriptor);
        fs::create_dir_all(cached.parent().unwrap()).unwrap();
        fs::write(&cached, b"stale").unwrap();

        let options = FetchOptions {
            force: true,
            ..FetchOptions::default()
        };
        let fetched = downloader
            .fetch(&descriptor, &options, &Verifier::new(&client, false))
            .unwrap();

        asset.assert();
        assert!(!fetched.from_cache);
        assert_eq!(fs::read(&cached).unwrap(), BODY);
    }

    #[test]
    fn test_skipped_verification_is_never_cached() {
        let cache = temp_dir_in_workspace();
        let mut server = Server::new();
        let _asset = server
            .mock("GET", ASSET_PATH)
            .with_status(200)
            .with_body(BODY)
            .create();
        let sums = server.mock("GET", CHECKSUMS_PATH).expect(0).create();

        let client = GithubClient::new(&server.url(), None).unwrap();
        let downloader = Downloader::new(&client, cache.path());
        let descriptor = descriptor(&server);
        let fetched = downloader
            .fetch(
                &descriptor,
                &FetchOptions::default(),
                &Verifier::new(&client, true),
            )
            .unwrap();

        sums.assert();
        assert_eq!(fetched.verification, Some(Verification::Skipped));
        assert!(!fetched.is_cached());
        assert_eq!(fs::read(&fetched.path).unwrap(), BODY);
        assert!(!downloader.cache_path(&descriptor).exists());

        let temp = fetched.path.clone();
        drop(fetched);
        assert!(!temp.exists());
    }

    #[test]
    fn test_mismatch_leaves_cache_empty() {
        let cache = temp_dir_in_workspace();
        let mut server = Server::new();
        let _asset = server
            .mock("GET", ASSET_PATH)
            .with_status(200)
            .with_body(BODY)
            .create();
        let _sums = server
            .mock("GET", CHECKSUMS_PATH)
            .with_status(200)
            .with_body(checksums_block(&[(
                "neo4j-mcp_Linux_x86_64.tar.gz",
                &"0".repeat(64),
            )]))
            .create();

        let client = GithubClient::new(&server.url(), None).unwrap();
        let downloader = Downloader::new(&client, cache.path());
        let err = downloader
            .fetch(
                &descriptor(&server),
                &FetchOptions::default(),
                &Verifier::new(&client, false),
            )
            .unwrap_err();

        assert!(matches!(err, InstallerError::Mismatch { .. }));
        assert!(entries_in(&cache.path().join("v1.0.0")).is_empty());
    }

    #[test]
    fn test_http_error_is_download_error() {
        let cache = temp_dir_in_workspace();
        let mut server = Server::new();
        let _asset = server.mock("GET", ASSET_PATH).with_status(404).create();

        let client = GithubClient::new(&server.url(), None).unwrap();
        let downloader = Downloader::new(&client, cache.path());
        let err = downloader
            .fetch(
                &descriptor(&server),
                &FetchOptions::default(),
                &Verifier::new(&client, true),
            )
            .unwrap_err();

        assert!(matches!(err, InstallerError::Download { .. }));
        assert!(entries_in(&cache.path().join("v1.0.0")).is_empty());
    }

    #[test]
    fn test_size_mismatch_is_download_error() {
        let cache = temp_dir_in_workspace();
        let mut server = Server::new();
        let _asset = server
            .mock("GET", ASSET_PATH)
            .with_status(200)
            .with_body(BODY)
            .create();

        let client = GithubClient::new(&server.url(), None).unwrap();
        let downloader = Downloader::new(&client, cache.path());
        let options = FetchOptions {
            expected_size: Some(BODY.len() as u64 + 1),
            ..FetchOptions::default()
        };
        let err = downloader
            .fetch(&descriptor(&server), &options, &Verifier::new(&client, true))
            .unwrap_err();

        assert!(err.to_string().contains("size mismatch"));
        assert!(entries_in(&cache.path().join("v1.0.0")).is_empty());
    }
}
