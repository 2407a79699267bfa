//! Defaults and environment variable names

/// Environment variable names recognised by the installer
pub mod env {
    pub const REPO: &str = "NEO4J_MCP_REPO";
    pub const VERSION: &str = "NEO4J_MCP_VERSION";
    pub const BASE_URL: &str = "NEO4J_MCP_BASE_URL";
    pub const SKIP_VERIFY: &str = "NEO4J_MCP_SKIP_VERIFY";
    pub const API_URL: &str = "NEO4J_MCP_API_URL";
    pub const CACHE_DIR: &str = "NEO4J_MCP_CACHE_DIR";
    pub const INSTALL_DIR: &str = "NEO4J_MCP_INSTALL_DIR";
    pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
    pub const LOCALAPPDATA: &str = "LOCALAPPDATA";

    /// Every variable captured by `EnvSnapshot::from_process`
    pub const ALL: &[&str] = &[
        REPO,
        VERSION,
        BASE_URL,
        SKIP_VERIFY,
        API_URL,
        CACHE_DIR,
        INSTALL_DIR,
        GITHUB_TOKEN,
        LOCALAPPDATA,
    ];
}

pub const DEFAULT_REPO: &str = "neo4j/mcp";

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Application directory name under the per-user data dir
pub const APP_DIR_NAME: &str = "neo4j-mcp";

pub const LATEST: &str = "latest";
