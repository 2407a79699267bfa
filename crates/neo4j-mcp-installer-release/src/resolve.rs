//! Version resolution against the GitHub release index

use reqwest::StatusCode;

use neo4j_mcp_installer_core::{InstallerError, Result, VersionRequest};

use crate::github::{Asset, GithubClient, Release};

/// A concrete release tag plus the assets the index lists for it
#[derive(Debug, Clone)]
pub struct ResolvedRelease {
    pub tag: String,
    pub assets: Vec<Asset>,
}

impl ResolvedRelease {
    /// Size advertised by the index for `asset_name`, if listed
    pub fn asset_size(&self, asset_name: &str) -> Option<u64> {
        self.assets
            .iter()
            .find(|a| a.name == asset_name)
            .map(|a| a.size)
    }
}

/// Turns "latest" or an explicit tag into a [`ResolvedRelease`]
pub struct VersionResolver<'a> {
    client: &'a GithubClient,
    repo: &'a str,
}

impl<'a> VersionResolver<'a> {
    pub fn new(client: &'a GithubClient, repo: &'a str) -> Self {
        Self { client, repo }
    }

    pub fn resolve(&self, request: &VersionRequest) -> Result<ResolvedRelease> {
        let (owner, name) = self
            .repo
            .split_once('/')
            .ok_or_else(|| InstallerError::Resolution(format!("invalid repository '{}'", self.repo)))?;

        let (description, release) = match request {
            VersionRequest::Latest => (
                "latest release".to_string(),
                self.fetch(&["repos", owner, name, "releases", "latest"])?,
            ),
            VersionRequest::Tag(tag) => (
                format!("release {}", tag),
                self.fetch(&["repos", owner, name, "releases", "tags", tag.as_str()])?,
            ),
        };

        let Some(release) = release else {
            return Err(InstallerError::Resolution(format!(
                "{} not found in {} (does the repository or tag exist?)",
                description, self.repo
            )));
        };

        if release.tag_name.trim().is_empty() {
            return Err(InstallerError::Resolution(format!(
                "could not determine tag_name for the {} of {}",
                description, self.repo
            )));
        }

        tracing::info!(repo = self.repo, requested = %request, tag = %release.tag_name, "resolved release");

        Ok(ResolvedRelease {
            tag: release.tag_name.trim().to_string(),
            assets: release.assets,
        })
    }

    /// `Ok(None)` on 404, error on any other failure
    fn fetch(&self, segments: &[&str]) -> Result<Option<Release>> {
        let (url, response) = self.client.api_get(segments).map_err(|e| {
            InstallerError::Resolution(format!("release index unreachable: {}", e))
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(InstallerError::Resolution(format!(
                "release index returned {} for {}",
                status, url
            )));
        }

        let release = response.json::<Release>().map_err(|e| {
            InstallerError::Resolution(format!("invalid release metadata from {}: {}", url, e))
        })?;
        Ok(Some(release))
    }
}
