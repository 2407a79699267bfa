use std::fmt;
use std::path::PathBuf;

use super::consts::{self, env as keys};
use super::env::EnvSnapshot;
use crate::error::{InstallerError, Result};

/// Requested release: a concrete tag or the newest published one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    Latest,
    Tag(String),
}

impl VersionRequest {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(consts::LATEST) {
            VersionRequest::Latest
        } else {
            VersionRequest::Tag(value.to_string())
        }
    }
}

impl fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRequest::Latest => f.write_str(consts::LATEST),
            VersionRequest::Tag(tag) => f.write_str(tag),
        }
    }
}

/// Which release to install and where its assets are published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSpec {
    /// GitHub repository, "owner/repo"
    pub repo: String,
    pub version: VersionRequest,
    /// Prefix of the asset download URLs, without trailing slash
    pub base_url: String,
}

/// Values supplied on the command line; `None`/`false` means "not given"
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub version: Option<String>,
    pub install_dir: Option<PathBuf>,
    pub no_verify: bool,
}

/// Immutable configuration for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    pub release: ReleaseSpec,
    /// GitHub REST API root used for release lookups
    pub api_url: String,
    pub install_dir: PathBuf,
    /// Root of the download cache; archives live under `versions/`
    pub cache_dir: PathBuf,
    pub skip_verify: bool,
    pub github_token: Option<String>,
}

impl Config {
    /// Assembles the configuration with precedence flag > env > default
    pub fn resolve(overrides: ConfigOverrides, env: &EnvSnapshot) -> Result<Self> {
        let repo = env.get(keys::REPO).unwrap_or(consts::DEFAULT_REPO).to_string();
        validate_repo(&repo)?;

        let version = match overrides.version.as_deref() {
            Some(flag) if !flag.trim().is_empty() => VersionRequest::parse(flag),
            _ => env
                .get(keys::VERSION)
                .map(VersionRequest::parse)
                .unwrap_or(VersionRequest::Latest),
        };

        let base_url = match env.get(keys::BASE_URL) {
            Some(url) => normalize_url(keys::BASE_URL, url)?,
            None => default_base_url(&repo),
        };

        let api_url = match env.get(keys::API_URL) {
            Some(url) => normalize_url(keys::API_URL, url)?,
            None => consts::DEFAULT_API_URL.to_string(),
        };

        let LocalPaths {
            install_dir,
            cache_dir,
        } = LocalPaths::resolve(overrides.install_dir, env)?;

        let skip_verify = overrides.no_verify || env.flag(keys::SKIP_VERIFY);

        Ok(Self {
            release: ReleaseSpec {
                repo,
                version,
                base_url,
            },
            api_url,
            install_dir,
            cache_dir,
            skip_verify,
            github_token: env.get(keys::GITHUB_TOKEN).map(str::to_string),
        })
    }

    /// Directory holding cached archives, one subdirectory per version
    pub fn versions_dir(&self) -> PathBuf {
        self.cache_dir.join("versions")
    }
}

/// Install and cache directories alone.
///
/// `where` and `uninstall` never talk to the release host, so they resolve
/// only these and ignore the repository and URL settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPaths {
    pub install_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl LocalPaths {
    pub fn resolve(install_dir: Option<PathBuf>, env: &EnvSnapshot) -> Result<Self> {
        let install_dir = match install_dir {
            Some(dir) => dir,
            None => match env.get(keys::INSTALL_DIR) {
                Some(dir) => PathBuf::from(dir),
                None => default_install_dir(env)?,
            },
        };

        let cache_dir = match env.get(keys::CACHE_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => default_cache_dir()?,
        };

        Ok(Self {
            install_dir,
            cache_dir,
        })
    }
}

pub fn default_base_url(repo: &str) -> String {
    format!("https://github.com/{repo}/releases/download")
}

/// `~/.local/bin` on Unix, `%LOCALAPPDATA%\neo4j-mcp\bin` on Windows
pub fn default_install_dir(env: &EnvSnapshot) -> Result<PathBuf> {
    if cfg!(windows) {
        let local = env.get(keys::LOCALAPPDATA).ok_or_else(|| InstallerError::Config {
            field: keys::LOCALAPPDATA.to_string(),
            reason: "not set; cannot determine the default install directory".to_string(),
        })?;
        return Ok(PathBuf::from(local).join(consts::APP_DIR_NAME).join("bin"));
    }

    let home = dirs::home_dir().ok_or_else(|| InstallerError::Config {
        field: "install_dir".to_string(),
        reason: "could not determine home directory".to_string(),
    })?;
    Ok(home.join(".local").join("bin"))
}

/// Per-user data directory, e.g. `~/.local/share/neo4j-mcp` on Linux
pub fn default_cache_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| InstallerError::Config {
        field: "cache_dir".to_string(),
        reason: "could not determine user data directory".to_string(),
    })?;
    Ok(base.join(consts::APP_DIR_NAME))
}

fn validate_repo(repo: &str) -> Result<()> {
    let mut parts = repo.split('/');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
    );
    if valid {
        Ok(())
    } else {
        Err(InstallerError::Config {
            field: keys::REPO.to_string(),
            reason: format!("expected \"owner/repo\", got \"{repo}\""),
        })
    }
}

fn normalize_url(field: &str, url: &str) -> Result<String> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(InstallerError::Config {
            field: field.to_string(),
            reason: format!("expected an http(s) URL, got \"{url}\""),
        });
    }
    Ok(url.trim_end_matches('/').to_string())
}
