//! Asset naming and URL construction
//!
//! Maps a release and a [`Target`] to the URLs of its archive and checksum
//! file. This is a pure function of its inputs; nothing here touches the
//! network.

use url::Url;

use neo4j_mcp_installer_core::{InstallerError, ReleaseSpec, Result};

use crate::github::{join_segments, parse_base};
use crate::install::platform::Target;

/// Prefix shared by every published file name
pub const ASSET_PREFIX: &str = "neo4j-mcp";

/// Where to get one platform's build of one release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub repo: String,
    pub version: String,
    pub target: Target,
    pub asset_name: String,
    pub download_url: Url,
    pub checksum_url: Url,
}

/// `neo4j-mcp_{Os}_{arch}{ext}`, e.g. `neo4j-mcp_Windows_x86_64.zip`
pub fn asset_name(target: Target) -> String {
    format!(
        "{}_{}{}",
        ASSET_PREFIX,
        target.label(),
        target.archive_kind().extension()
    )
}

/// `neo4j-mcp_{version}_checksums.txt`, version without its leading `v`
pub fn checksums_file_name(version: &str) -> String {
    let version = version.strip_prefix('v').unwrap_or(version);
    format!("{}_{}_checksums.txt", ASSET_PREFIX, version)
}

/// Builds the descriptor for `version` (a concrete tag) on `target`
pub fn locate(spec: &ReleaseSpec, version: &str, target: Target) -> Result<AssetDescriptor> {
    let url_error = |e: crate::github::UrlError| InstallerError::Config {
        field: "base_url".to_string(),
        reason: format!("{}: {}", spec.base_url, e),
    };

    let base = parse_base(&spec.base_url).map_err(url_error)?;
    let asset_name = asset_name(target);
    let download_url = join_segments(&base, &[version, asset_name.as_str()]).map_err(url_error)?;
    let checksums_name = checksums_file_name(version);
    let checksum_url =
        join_segments(&base, &[version, checksums_name.as_str()]).map_err(url_error)?;

    Ok(AssetDescriptor {
        repo: spec.repo.clone(),
        version: version.to_string(),
        target,
        asset_name,
        download_url,
        checksum_url,
    })
}
