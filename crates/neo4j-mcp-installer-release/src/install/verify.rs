//! SHA-256 verification of downloaded archives against the release's
//! published checksums file.

use reqwest::StatusCode;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

use neo4j_mcp_installer_core::{InstallerError, Result};

use crate::github::GithubClient;
use crate::install::locate::AssetDescriptor;

/// Result of a verification step that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Digest matched the published checksum
    Verified { digest: String },
    /// Verification was disabled by the operator
    Skipped,
}

impl Verification {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Verification::Skipped)
    }
}

pub struct Verifier<'a> {
    client: &'a GithubClient,
    skip: bool,
}

impl<'a> Verifier<'a> {
    pub fn new(client: &'a GithubClient, skip: bool) -> Self {
        Self { client, skip }
    }

    /// Checks `path` against the checksum entry for `descriptor.asset_name`.
    ///
    /// With `skip` set the checksum source is never requested.
    pub fn verify(&self, path: &Path, descriptor: &AssetDescriptor) -> Result<Verification> {
        if self.skip {
            tracing::warn!(
                asset = %descriptor.asset_name,
                "checksum verification skipped"
            );
            return Ok(Verification::Skipped);
        }

        let checksums = self.fetch_checksums(descriptor)?;
        let expected = expected_sha_from_checksums(&checksums, &descriptor.asset_name)
            .ok_or_else(|| InstallerError::ChecksumUnavailable {
                asset: descriptor.asset_name.clone(),
                reason: format!("no entry in {}", descriptor.checksum_url),
            })?;

        let actual = compute_sha256(path)?;
        if !actual.eq_ignore_ascii_case(&expected) {
            return Err(InstallerError::Mismatch {
                asset: descriptor.asset_name.clone(),
                expected,
                actual,
            });
        }

        tracing::debug!(asset = %descriptor.asset_name, digest = %actual, "checksum verified");
        Ok(Verification::Verified { digest: actual })
    }

    fn fetch_checksums(&self, descriptor: &AssetDescriptor) -> Result<String> {
        let url = &descriptor.checksum_url;
        let download_error = |reason: String| InstallerError::Download {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .download(url)
            .map_err(|e| download_error(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => {
                return Err(InstallerError::ChecksumUnavailable {
                    asset: descriptor.asset_name.clone(),
                    reason: format!("{} returned {}", url, response.status()),
                });
            }
            status if !status.is_success() => {
                return Err(download_error(format!("HTTP {}", status)));
            }
            _ => {}
        }

        response.text().map_err(|e| download_error(e.to_string()))
    }
}

/// Lowercase hex SHA-256 of the file at `path`
pub fn compute_sha256(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path).map_err(|e| {
        InstallerError::io(format!("open {} for checksum", path.display()), e)
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| {
            InstallerError::io(format!("read {} for checksum", path.display()), e)
        })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Finds the expected digest for `filename`.
///
/// Accepts the block layout (file name on one line, `sha256:<hex>` on the
/// next) and the `sha256sum` layout (`<hex>  <name>`, optionally `*<name>`).
pub fn expected_sha_from_checksums(text: &str, filename: &str) -> Option<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    for (i, line) in lines.iter().enumerate() {
        if *line == filename {
            let digest = lines
                .get(i + 1)
                .and_then(|next| next.strip_prefix("sha256:"))
                .map(str::trim);
            if let Some(digest) = digest.filter(|d| is_sha256_hex(d)) {
                return Some(digest.to_ascii_lowercase());
            }
        }

        let mut parts = line.split_whitespace();
        if let (Some(digest), Some(name), None) = (parts.next(), parts.next(), parts.next()) {
            let name = name.strip_prefix('*').unwrap_or(name);
            if name == filename && is_sha256_hex(digest) {
                return Some(digest.to_ascii_lowercase());
            }
        }
    }

    None
}

fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::locate::locate;
    use crate::install::platform::{Arch, Os, Target};
    use mockito::Server;
    use neo4j_mcp_installer_core::{ReleaseSpec, VersionRequest};
    use neo4j_mcp_installer_testkit::{
        checksums_block, checksums_coreutils, sha256_hex, temp_dir_in_workspace,
    };

    const ASSET: &str = "neo4j-mcp_Linux_x86_64.tar.gz";
    const CHECKSUMS_PATH: &str = "/v1.0.0/neo4j-mcp_1.0.0_checksums.txt";

    fn descriptor(server: &Server) -> AssetDescriptor {
        let spec = ReleaseSpec {
            repo: "neo4j/mcp".to_string(),
            version: VersionRequest::Latest,
            base_url: server.url(),
        };
        locate(&spec, "v1.0.0", Target::new(Os::Linux, Arch::X86_64).unwrap()).unwrap()
    }

    fn client(server: &Server) -> GithubClient {
        GithubClient::new(&server.url(), None).unwrap()
    }

    #[test]
    fn test_compute_sha256_known_value() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join("file.txt");
        std::fs::write(&path, b"hello world\n").unwrap();

        assert_eq!(
            compute_sha256(&path).unwrap(),
            "a948904f2f0f479b8f8197694b30184b0d2ed1c1cd2a1ec0fb85d299a192a447"
        );
    }

    #[test]
    fn test_parse_block_format() {
        let hash = "a".repeat(64);
        let text = checksums_block(&[
            ("neo4j-mcp_Darwin_arm64.tar.gz", &"b".repeat(64)),
            (ASSET, &hash),
        ]);
        assert_eq!(expected_sha_from_checksums(&text, ASSET), Some(hash));
    }

    #[test]
    fn test_parse_block_format_ignores_blank_lines() {
        let hash = "e".repeat(64);
        let text = format!("\n{ASSET}\n\n  \nsha256:{hash}\n\n");
        assert_eq!(expected_sha_from_checksums(&text, ASSET), Some(hash));
    }

    #[test]
    fn test_parse_coreutils_format() {
        let hash = "c".repeat(64);
        let text = checksums_coreutils(&[(&hash, ASSET)]);
        assert_eq!(expected_sha_from_checksums(&text, ASSET), Some(hash.clone()));

        let binary_mode = format!("{} *{}\n", hash, ASSET);
        assert_eq!(expected_sha_from_checksums(&binary_mode, ASSET), Some(hash));
    }

    #[test]
    fn test_parse_normalizes_case() {
        let upper = "ABCDEF0123456789".repeat(4);
        let text = checksums_coreutils(&[(&upper, ASSET)]);
        assert_eq!(
            expected_sha_from_checksums(&text, ASSET),
            Some(upper.to_ascii_lowercase())
        );
    }

    #[test]
    fn test_parse_requires_exact_name() {
        let text = checksums_coreutils(&[(&"d".repeat(64), "neo4j-mcp_Linux_x86_64.tar.gz.sig")]);
        assert_eq!(expected_sha_from_checksums(&text, ASSET), None);
    }

    #[test]
    fn test_parse_rejects_malformed_digest() {
        let text = checksums_block(&[(ASSET, "not-a-digest")]);
        assert_eq!(expected_sha_from_checksums(&text, ASSET), None);
    }

    #[test]
    fn test_verify_matching_digest() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join(ASSET);
        std::fs::write(&path, b"archive bytes").unwrap();

        let mut server = Server::new();
        let _sums = server
            .mock("GET", CHECKSUMS_PATH)
            .with_status(200)
            .with_body(checksums_block(&[(ASSET, &sha256_hex(b"archive bytes"))]))
            .create();

        let client = client(&server);
        let result = Verifier::new(&client, false)
            .verify(&path, &descriptor(&server))
            .unwrap();
        assert_eq!(
            result,
            Verification::Verified {
                digest: sha256_hex(b"archive bytes")
            }
        );
    }

    #[test]
    fn test_verify_uppercase_published_digest() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join(ASSET);
        std::fs::write(&path, b"archive bytes").unwrap();

        let mut server = Server::new();
        let _sums = server
            .mock("GET", CHECKSUMS_PATH)
            .with_status(200)
            .with_body(checksums_coreutils(&[(
                &sha256_hex(b"archive bytes").to_uppercase(),
                ASSET,
            )]))
            .create();

        let client = client(&server);
        assert!(
            Verifier::new(&client, false)
                .verify(&path, &descriptor(&server))
                .is_ok()
        );
    }

    #[test]
    fn test_verify_flipped_byte_is_mismatch() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join(ASSET);
        let mut bytes = b"archive bytes".to_vec();
        let published = sha256_hex(&bytes);
        bytes[0] ^= 0x01;
        std::fs::write(&path, &bytes).unwrap();

        let mut server = Server::new();
        let _sums = server
            .mock("GET", CHECKSUMS_PATH)
            .with_status(200)
            .with_body(checksums_block(&[(ASSET, &published)]))
            .create();

        let client = client(&server);
        let err = Verifier::new(&client, false)
            .verify(&path, &descriptor(&server))
            .unwrap_err();
        assert!(matches!(err, InstallerError::Mismatch { .. }));
    }

    #[test]
    fn test_skip_never_requests_checksums() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join(ASSET);
        std::fs::write(&path, b"anything").unwrap();

        let mut server = Server::new();
        let mock = server.mock("GET", CHECKSUMS_PATH).expect(0).create();

        let client = client(&server);
        let result = Verifier::new(&client, true)
            .verify(&path, &descriptor(&server))
            .unwrap();

        mock.assert();
        assert!(result.is_skipped());
    }

    #[test]
    fn test_missing_checksums_file_is_unavailable() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join(ASSET);
        std::fs::write(&path, b"anything").unwrap();

        let mut server = Server::new();
        let _sums = server.mock("GET", CHECKSUMS_PATH).with_status(404).create();

        let client = client(&server);
        let err = Verifier::new(&client, false)
            .verify(&path, &descriptor(&server))
            .unwrap_err();
        assert!(matches!(err, InstallerError::ChecksumUnavailable { .. }));
    }

    #[test]
    fn test_missing_entry_is_unavailable() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join(ASSET);
        std::fs::write(&path, b"anything").unwrap();

        let mut server = Server::new();
        let _sums = server
            .mock("GET", CHECKSUMS_PATH)
            .with_status(200)
            .with_body(checksums_block(&[(
                "neo4j-mcp_Windows_x86_64.zip",
                &"e".repeat(64),
            )]))
            .create();

        let client = client(&server);
        let err = Verifier::new(&client, false)
            .verify(&path, &descriptor(&server))
            .unwrap_err();
        assert!(matches!(err, InstallerError::ChecksumUnavailable { .. }));
    }

    #[test]
    fn test_server_error_is_download_error() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join(ASSET);
        std::fs::write(&path, b"anything").unwrap();

        let mut server = Server::new();
        let _sums = server.mock("GET", CHECKSUMS_PATH).with_status(500).create();

        let client = client(&server);
        let err = Verifier::new(&client, false)
            .verify(&path, &descriptor(&server))
            .unwrap_err();
        assert!(matches!(err, InstallerError::Download { .. }));
    }
}
