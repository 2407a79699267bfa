//! HTTP client construction for GitHub interactions

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::time::Duration;
use url::Url;

use neo4j_mcp_installer_core::{Config, InstallerError, Result};

use super::url::join_segments;

/// Default timeout for GitHub API requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for release asset downloads (5 minutes for large archives)
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Default user agent for installer requests
pub const USER_AGENT: &str = "neo4j-mcp-installer";

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Builds HTTP client with appropriate settings for GitHub
///
/// # Errors
///
/// Returns error if client construction fails
pub fn build_client(timeout: Duration) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Blocking access to the release index and to release assets.
///
/// API requests carry the optional token; asset downloads never do, since
/// `base_url` may point at a third-party mirror.
#[derive(Debug, Clone)]
pub struct GithubClient {
    api: Client,
    downloads: Client,
    api_url: Url,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self> {
        let api_url = Url::parse(api_url).map_err(|e| InstallerError::Config {
            field: "api_url".to_string(),
            reason: format!("invalid URL \"{}\": {}", api_url, e),
        })?;

        let api = build_client(DEFAULT_TIMEOUT).map_err(client_error)?;
        let downloads = build_client(DOWNLOAD_TIMEOUT).map_err(client_error)?;

        Ok(Self {
            api,
            downloads,
            api_url,
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, config.github_token.clone())
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// GET `{api_url}/{segments...}` with GitHub JSON headers
    pub fn api_get(&self, segments: &[&str]) -> std::result::Result<(Url, Response), ApiError> {
        let url = join_segments(&self.api_url, segments).map_err(ApiError::Url)?;
        tracing::debug!(%url, "GET release index");

        let mut request = self.api.get(url.as_str()).header(ACCEPT, GITHUB_JSON);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().map_err(ApiError::Transport)?;
        Ok((url, response))
    }

    /// Plain GET used for release assets and checksum files
    pub fn download(&self, url: &Url) -> std::result::Result<Response, reqwest::Error> {
        tracing::debug!(%url, "GET asset");
        self.downloads.get(url.as_str()).send()
    }
}

/// Failure to reach the release index at all
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request URL: {0}")]
    Url(#[from] super::url::UrlError),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

fn client_error(e: reqwest::Error) -> InstallerError {
    InstallerError::Config {
        field: "http_client".to_string(),
        reason: e.to_string(),
    }
}
